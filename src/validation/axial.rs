//! Rules for single-axis models.

use crate::error::Result;
use crate::model::{
    AxialArrayModel, AxialCollatedStepModel, AxialMultiStepModel, AxialPointsModel,
    AxialStepModel, AxisModel, STEP_TOLERANCE,
};

use super::{check_common, invalid, require_finite, require_point_limit};

fn check_lattice(label: &str, start: f64, stop: f64, step: f64) -> Result<()> {
    require_finite(label, "start", start)?;
    require_finite(label, "stop", stop)?;
    require_finite(label, "step", step)?;

    let ratio = (stop - start) / step;
    if !ratio.is_finite() {
        return Err(invalid(label, "step", "step must be non-zero"));
    }
    if ratio < 0.0 {
        return Err(invalid(
            label,
            "step",
            "step points away from stop",
        ));
    }
    require_point_limit(label, "step", libm::floor(ratio + STEP_TOLERANCE) + 1.0)
}

/// Validate a step model.
///
/// `(stop - start) / step` must be finite and non-negative.
pub fn validate_step(model: &AxialStepModel) -> Result<()> {
    check_common(model)?;
    check_lattice(AxialStepModel::LABEL, model.start, model.stop, model.step)
}

/// Validate a points model.
pub fn validate_points(model: &AxialPointsModel) -> Result<()> {
    check_common(model)?;
    require_finite(AxialPointsModel::LABEL, "start", model.start)?;
    require_finite(AxialPointsModel::LABEL, "stop", model.stop)?;
    if model.points == 0 {
        return Err(invalid(AxialPointsModel::LABEL, "points", "at least one point is required"));
    }
    require_point_limit(AxialPointsModel::LABEL, "points", model.points as f64)
}

/// Validate an array model.
pub fn validate_array(model: &AxialArrayModel) -> Result<()> {
    check_common(model)?;
    if model.positions.is_empty() {
        return Err(invalid(AxialArrayModel::LABEL, "positions", "no positions given"));
    }
    if model.positions.iter().any(|p| !p.is_finite()) {
        return Err(invalid(AxialArrayModel::LABEL, "positions", "positions must be finite"));
    }
    Ok(())
}

/// Validate a collated step model.
pub fn validate_collated_step(model: &AxialCollatedStepModel) -> Result<()> {
    check_common(model)?;
    let label = AxialCollatedStepModel::LABEL;

    if model.names.is_empty() {
        return Err(invalid(label, "names", "at least one axis is required"));
    }
    for (i, name) in model.names.iter().enumerate() {
        if model.names[..i].contains(name) {
            return Err(invalid(label, "names", alloc::format!("axis '{}' listed twice", name)));
        }
    }

    check_lattice(label, model.start, model.stop, model.step)
}

/// Validate a multi-step model.
///
/// Every step region must be a valid step model on the same axis. Regions
/// must all travel in the same direction, and each region must start at or
/// beyond the previous region's stop in that direction.
pub fn validate_multi_step(model: &AxialMultiStepModel) -> Result<()> {
    check_common(model)?;
    let label = AxialMultiStepModel::LABEL;

    if model.step_models.is_empty() {
        return Err(invalid(label, "step_models", "no step regions"));
    }

    let mut direction = 0.0;
    let mut previous: Option<&AxialStepModel> = None;

    for (index, step) in model.step_models.iter().enumerate() {
        validate_step(step).map_err(|e| e.in_field(label, "step_models", index, "axial_step"))?;

        if step.name != model.name {
            return Err(invalid(
                label,
                "step_models",
                alloc::format!(
                    "region {} scans '{}' instead of '{}'",
                    index,
                    step.name,
                    model.name
                ),
            ));
        }

        let step_direction = step.direction();
        if step_direction != 0.0 {
            if direction != 0.0 && step_direction != direction {
                return Err(invalid(
                    label,
                    "step_models",
                    alloc::format!("region {} travels against the previous regions", index),
                ));
            }
            direction = step_direction;
        }

        if let Some(prev) = previous {
            let gap = step.start - prev.stop;
            let gap_direction = if gap > 0.0 {
                1.0
            } else if gap < 0.0 {
                -1.0
            } else {
                0.0
            };
            if gap_direction != 0.0 && direction != 0.0 && gap_direction != direction {
                return Err(invalid(
                    label,
                    "step_models",
                    alloc::format!("region {} starts behind the previous region's stop", index),
                ));
            }
        }

        previous = Some(step);
    }

    Ok(())
}
