//! Rules for two-axis models.

use crate::error::Result;
use crate::model::{
    AxisModel, BoundingBox, BoundingLine, MapAxes, StaticModel, TwoAxisGridPointsModel,
    TwoAxisGridPointsRandomOffsetModel, TwoAxisGridStepModel, TwoAxisLinePointsModel,
    TwoAxisLineStepModel, TwoAxisLissajousModel, TwoAxisPointSingleModel, TwoAxisSpiralModel,
    fermat_point_count, STEP_TOLERANCE,
};

use super::{check_common, invalid, require_finite, require_point_limit};

fn check_axes(label: &str, axes: &MapAxes) -> Result<()> {
    if axes.x_axis_name == axes.y_axis_name {
        return Err(invalid(label, "y_axis_name", "x and y must be different axes"));
    }
    Ok(())
}

fn check_count(label: &str, field: &str, count: usize) -> Result<()> {
    if count == 0 {
        return Err(invalid(label, field, "at least one point is required"));
    }
    require_point_limit(label, field, count as f64)
}

/// Validate a bounding box: finite origin, finite non-zero lengths.
pub fn validate_bounding_box(label: &str, bbox: &BoundingBox) -> Result<()> {
    require_finite(label, "x_axis_start", bbox.x_axis_start)?;
    require_finite(label, "y_axis_start", bbox.y_axis_start)?;
    for (field, length) in [
        ("x_axis_length", bbox.x_axis_length),
        ("y_axis_length", bbox.y_axis_length),
    ] {
        require_finite(label, field, length)?;
        if length == 0.0 {
            return Err(invalid(label, field, "bounding box side has zero length"));
        }
    }
    Ok(())
}

fn validate_bounding_line(label: &str, line: &BoundingLine) -> Result<()> {
    require_finite(label, "x_start", line.x_start)?;
    require_finite(label, "y_start", line.y_start)?;
    require_finite(label, "angle", line.angle)?;
    require_finite(label, "length", line.length)?;
    if line.length == 0.0 {
        return Err(invalid(label, "length", "bounding line has zero length"));
    }
    Ok(())
}

/// Validate a grid-points model.
pub fn validate_grid_points(model: &TwoAxisGridPointsModel) -> Result<()> {
    let label = TwoAxisGridPointsModel::LABEL;
    check_common(model)?;
    check_axes(label, &model.axes)?;
    validate_bounding_box(label, &model.bounding_box)?;
    check_count(label, "x_axis_points", model.x_axis_points)?;
    check_count(label, "y_axis_points", model.y_axis_points)
}

/// Validate a random-offset grid model.
pub fn validate_grid_points_random_offset(model: &TwoAxisGridPointsRandomOffsetModel) -> Result<()> {
    let label = TwoAxisGridPointsRandomOffsetModel::LABEL;
    check_common(model)?;
    check_axes(label, &model.grid.axes)?;
    validate_bounding_box(label, &model.grid.bounding_box)?;
    check_count(label, "x_axis_points", model.grid.x_axis_points)?;
    check_count(label, "y_axis_points", model.grid.y_axis_points)?;
    require_finite(label, "offset", model.offset)?;
    if model.offset < 0.0 {
        return Err(invalid(label, "offset", "offset must not be negative"));
    }
    Ok(())
}

/// Validate a grid-step model.
///
/// Each step must fit at least once into its box side.
pub fn validate_grid_step(model: &TwoAxisGridStepModel) -> Result<()> {
    let label = TwoAxisGridStepModel::LABEL;
    check_common(model)?;
    check_axes(label, &model.axes)?;
    validate_bounding_box(label, &model.bounding_box)?;

    for (field, step, length) in [
        ("x_axis_step", model.x_axis_step, model.bounding_box.x_axis_length),
        ("y_axis_step", model.y_axis_step, model.bounding_box.y_axis_length),
    ] {
        require_finite(label, field, step)?;
        if step == 0.0 {
            return Err(invalid(label, field, "step must be non-zero"));
        }
        let points = libm::floor(libm::fabs(length / step) + STEP_TOLERANCE);
        if !points.is_finite() || points < 1.0 {
            return Err(invalid(label, field, "step is larger than the bounding box"));
        }
        require_point_limit(label, field, points)?;
    }
    Ok(())
}

/// Validate a line-points model.
pub fn validate_line_points(model: &TwoAxisLinePointsModel) -> Result<()> {
    let label = TwoAxisLinePointsModel::LABEL;
    check_common(model)?;
    check_axes(label, &model.axes)?;
    validate_bounding_line(label, &model.bounding_line)?;
    check_count(label, "points", model.points)
}

/// Validate a line-step model.
pub fn validate_line_step(model: &TwoAxisLineStepModel) -> Result<()> {
    let label = TwoAxisLineStepModel::LABEL;
    check_common(model)?;
    check_axes(label, &model.axes)?;
    validate_bounding_line(label, &model.bounding_line)?;
    require_finite(label, "step", model.step)?;
    let ratio = model.bounding_line.length / model.step;
    if !ratio.is_finite() || ratio < 0.0 {
        return Err(invalid(label, "step", "step must be non-zero and point along the line"));
    }
    require_point_limit(label, "step", libm::floor(ratio + STEP_TOLERANCE) + 1.0)
}

/// Validate a spiral model.
pub fn validate_spiral(model: &TwoAxisSpiralModel) -> Result<()> {
    let label = TwoAxisSpiralModel::LABEL;
    check_common(model)?;
    check_axes(label, &model.axes)?;
    validate_bounding_box(label, &model.bounding_box)?;
    require_finite(label, "scale", model.scale)?;
    if model.scale <= 0.0 {
        return Err(invalid(label, "scale", "scale must be positive"));
    }
    let count = fermat_point_count(model.bounding_box.half_diagonal(), model.scale);
    require_point_limit(label, "scale", count)
}

/// Validate a Lissajous model.
pub fn validate_lissajous(model: &TwoAxisLissajousModel) -> Result<()> {
    let label = TwoAxisLissajousModel::LABEL;
    check_common(model)?;
    check_axes(label, &model.axes)?;
    validate_bounding_box(label, &model.bounding_box)?;
    for (field, value) in [("a", model.a), ("b", model.b)] {
        require_finite(label, field, value)?;
        if value == 0.0 {
            return Err(invalid(label, field, "frequency must be non-zero"));
        }
    }
    require_finite(label, "delta", model.delta)?;
    check_count(label, "points", model.points)
}

/// Validate a single-point model.
pub fn validate_point_single(model: &TwoAxisPointSingleModel) -> Result<()> {
    let label = TwoAxisPointSingleModel::LABEL;
    check_common(model)?;
    check_axes(label, &model.axes)?;
    require_finite(label, "x", model.x)?;
    require_finite(label, "y", model.y)
}

/// Validate a static model.
pub fn validate_static(model: &StaticModel) -> Result<()> {
    check_common(model)?;
    check_count(StaticModel::LABEL, "size", model.size)
}
