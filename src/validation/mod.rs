//! Model validation.
//!
//! Every model kind has a set of rules checked once, before any trajectory is
//! built. Validation never mutates a model; the first rule that fails is
//! reported as a [`ModelValidationError`] naming the model, the offending
//! field(s) and the cause.

mod axial;
mod compound;
mod two_axis;

use alloc::string::String;

use crate::error::{Error, ModelValidationError, Result};
use crate::model::{AxisModel, AxisName, ScanModel, MAX_POINTS};

pub use axial::{
    validate_array, validate_collated_step, validate_multi_step, validate_points, validate_step,
};
pub use compound::{
    validate_compound, validate_compound_structure, validate_concurrent, validate_consecutive,
    validate_mutator, validate_region,
};
pub use two_axis::{
    validate_bounding_box, validate_grid_points, validate_grid_points_random_offset,
    validate_grid_step, validate_line_points, validate_line_step, validate_lissajous,
    validate_point_single, validate_spiral, validate_static,
};

/// Validate any model, recursing into the members of multi-model kinds.
///
/// # Errors
///
/// Returns [`Error::Validation`] for the first rule that fails.
pub fn validate_model(model: &ScanModel) -> Result<()> {
    match model {
        ScanModel::AxialStep(m) => validate_step(m),
        ScanModel::AxialPoints(m) => validate_points(m),
        ScanModel::AxialArray(m) => validate_array(m),
        ScanModel::AxialCollatedStep(m) => validate_collated_step(m),
        ScanModel::AxialMultiStep(m) => validate_multi_step(m),
        ScanModel::TwoAxisGridPoints(m) => validate_grid_points(m),
        ScanModel::TwoAxisGridPointsRandomOffset(m) => validate_grid_points_random_offset(m),
        ScanModel::TwoAxisGridStep(m) => validate_grid_step(m),
        ScanModel::TwoAxisLinePoints(m) => validate_line_points(m),
        ScanModel::TwoAxisLineStep(m) => validate_line_step(m),
        ScanModel::TwoAxisSpiral(m) => validate_spiral(m),
        ScanModel::TwoAxisLissajous(m) => validate_lissajous(m),
        ScanModel::TwoAxisPointSingle(m) => validate_point_single(m),
        ScanModel::Static(m) => validate_static(m),
        ScanModel::Compound(m) => validate_compound(m),
        ScanModel::Concurrent(m) => validate_concurrent(m),
        ScanModel::Consecutive(m) => validate_consecutive(m),
    }
}

pub(crate) fn invalid(model: &str, field: &str, cause: impl Into<String>) -> Error {
    ModelValidationError::new(model, field, cause).into()
}

pub(crate) fn require_finite(model: &str, field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(model, field, alloc::format!("{} must be finite", field)))
    }
}

/// Reject a point count above [`MAX_POINTS`]. Counts are taken as floats so
/// they can be checked before conversion.
pub(crate) fn require_point_limit(model: &str, field: &str, count: f64) -> Result<()> {
    if count <= MAX_POINTS as f64 {
        Ok(())
    } else {
        Err(invalid(
            model,
            field,
            alloc::format!("more than {} points requested", MAX_POINTS),
        ))
    }
}

pub(crate) fn require_name(model: &str, field: &str, name: &AxisName) -> Result<()> {
    if name.is_empty() {
        Err(invalid(model, field, "axis name must be set (at most 32 characters)"))
    } else {
        Ok(())
    }
}

/// Rules shared by every model kind: named axes, one unit per axis, and
/// alternating/continuous only where the kind supports them.
pub(crate) fn check_common<M: AxisModel>(model: &M) -> Result<()> {
    let names = model.axis_names();
    for name in &names {
        require_name(M::LABEL, "name", name)?;
    }

    if model.axis_units().iter().any(|u| u.is_empty()) {
        return Err(invalid(M::LABEL, "units", "unit label must be set (at most 16 characters)"));
    }

    if model.axis_units().len() != names.len() {
        return Err(invalid(
            M::LABEL,
            "units",
            alloc::format!(
                "{} units given for {} axes",
                model.axis_units().len(),
                names.len()
            ),
        ));
    }

    if model.is_alternating() && !model.supports_alternating() {
        return Err(invalid(M::LABEL, "alternating", "this model cannot alternate"));
    }

    if model.is_continuous() && !model.supports_continuous() {
        return Err(invalid(M::LABEL, "continuous", "this model cannot be scanned continuously"));
    }

    Ok(())
}
