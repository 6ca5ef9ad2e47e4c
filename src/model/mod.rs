//! Scan model types.
//!
//! A model is an immutable parameter descriptor for one kind of axis
//! generator. Models carry no behaviour beyond simple derived quantities;
//! validation lives in [`crate::validation`] and trajectory construction in
//! [`crate::generator`].

mod axial;
mod builder;
mod compound;
mod geometry;
mod mutator;
mod region;
mod two_axis;

use alloc::vec::Vec;

use serde::Deserialize;

pub use axial::{
    AxialArrayModel, AxialCollatedStepModel, AxialMultiStepModel, AxialPointsModel,
    AxialStepModel,
};
pub use builder::{CompoundModelBuilder, MultiStepModelBuilder};
pub use compound::{CompoundModel, ConcurrentModel, ConsecutiveModel, VARIABLE_DURATION};
pub use geometry::{BoundingBox, BoundingLine, Orientation};
pub use mutator::Mutator;
pub use region::{RegionShape, ScanRegion};
pub use two_axis::{
    fermat_point_count, MapAxes, StaticModel, TwoAxisGridPointsModel, TwoAxisGridPointsRandomOffsetModel,
    TwoAxisGridStepModel, TwoAxisLinePointsModel, TwoAxisLineStepModel, TwoAxisLissajousModel,
    TwoAxisPointSingleModel, TwoAxisSpiralModel,
};

/// Name of a scannable axis (max 32 chars).
pub type AxisName = heapless::String<32>;

/// Unit label of a scannable axis (max 16 chars).
pub type Units = heapless::String<16>;

/// Units assumed when a model does not specify any.
pub const DEFAULT_UNITS: &str = "mm";

/// Fraction of a step within which a position counts as reaching its stop.
pub const STEP_TOLERANCE: f64 = 0.01;

/// Most points a single line, figure or repeat model may generate.
pub const MAX_POINTS: usize = 10_000_000;

/// Build an axis name, truncating to an empty name if it does not fit.
///
/// An empty name is rejected by validation, so an over-long name surfaces as
/// a validation error rather than a silent truncation.
pub fn axis_name(name: &str) -> AxisName {
    AxisName::try_from(name).unwrap_or_default()
}

/// Build a unit label, leaving it empty if it does not fit.
///
/// Validation rejects empty units, so an over-long label surfaces as a
/// validation error.
pub fn units(label: &str) -> Units {
    Units::try_from(label).unwrap_or_default()
}

pub(crate) fn default_units() -> Units {
    Units::try_from(DEFAULT_UNITS).unwrap_or_default()
}

/// Number of lattice points `start, start + step, ...` up to and including a
/// point within `step / 100` of `stop`.
///
/// Returns `None` when `(stop - start) / step` is not finite or is negative,
/// or when the count does not fit in `usize`.
pub fn lattice_count(start: f64, stop: f64, step: f64) -> Option<usize> {
    let ratio = (stop - start) / step;
    if !ratio.is_finite() || ratio < 0.0 {
        return None;
    }
    let steps = libm::floor(ratio + STEP_TOLERANCE);
    if steps >= usize::MAX as f64 {
        return None;
    }
    (steps as usize).checked_add(1)
}

/// Behaviour shared by every model kind.
pub trait AxisModel {
    /// Human-readable model label used in diagnostics.
    const LABEL: &'static str;

    /// Names of the axes this model scans, in order.
    fn axis_names(&self) -> Vec<AxisName>;

    /// Units of each scanned axis, parallel to [`AxisModel::axis_names`].
    fn axis_units(&self) -> Vec<Units>;

    /// Whether the direction of travel reverses on each repeat.
    fn is_alternating(&self) -> bool {
        false
    }

    /// Whether the model requests continuous (hardware-timed) motion.
    fn is_continuous(&self) -> bool {
        false
    }

    /// Whether this kind may be alternated.
    fn supports_alternating(&self) -> bool {
        true
    }

    /// Whether this kind may be scanned continuously.
    fn supports_continuous(&self) -> bool {
        true
    }

    /// Whether this kind accepts a random offset.
    fn supports_random_offset(&self) -> bool {
        false
    }
}

/// Kind of model, used as the generator registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    /// [`AxialStepModel`]
    AxialStep,
    /// [`AxialPointsModel`]
    AxialPoints,
    /// [`AxialArrayModel`]
    AxialArray,
    /// [`AxialCollatedStepModel`]
    AxialCollatedStep,
    /// [`AxialMultiStepModel`]
    AxialMultiStep,
    /// [`TwoAxisGridPointsModel`]
    TwoAxisGridPoints,
    /// [`TwoAxisGridPointsRandomOffsetModel`]
    TwoAxisGridPointsRandomOffset,
    /// [`TwoAxisGridStepModel`]
    TwoAxisGridStep,
    /// [`TwoAxisLinePointsModel`]
    TwoAxisLinePoints,
    /// [`TwoAxisLineStepModel`]
    TwoAxisLineStep,
    /// [`TwoAxisSpiralModel`]
    TwoAxisSpiral,
    /// [`TwoAxisLissajousModel`]
    TwoAxisLissajous,
    /// [`TwoAxisPointSingleModel`]
    TwoAxisPointSingle,
    /// [`StaticModel`]
    Static,
    /// [`CompoundModel`]
    Compound,
    /// [`ConcurrentModel`]
    Concurrent,
    /// [`ConsecutiveModel`]
    Consecutive,
}

impl ModelKind {
    /// Every model kind, in declaration order.
    pub const ALL: [ModelKind; 17] = [
        ModelKind::AxialStep,
        ModelKind::AxialPoints,
        ModelKind::AxialArray,
        ModelKind::AxialCollatedStep,
        ModelKind::AxialMultiStep,
        ModelKind::TwoAxisGridPoints,
        ModelKind::TwoAxisGridPointsRandomOffset,
        ModelKind::TwoAxisGridStep,
        ModelKind::TwoAxisLinePoints,
        ModelKind::TwoAxisLineStep,
        ModelKind::TwoAxisSpiral,
        ModelKind::TwoAxisLissajous,
        ModelKind::TwoAxisPointSingle,
        ModelKind::Static,
        ModelKind::Compound,
        ModelKind::Concurrent,
        ModelKind::Consecutive,
    ];

    /// Registry name of this kind (matches the TOML `kind` tag).
    pub const fn name(self) -> &'static str {
        match self {
            ModelKind::AxialStep => "axial_step",
            ModelKind::AxialPoints => "axial_points",
            ModelKind::AxialArray => "axial_array",
            ModelKind::AxialCollatedStep => "axial_collated_step",
            ModelKind::AxialMultiStep => "axial_multi_step",
            ModelKind::TwoAxisGridPoints => "two_axis_grid_points",
            ModelKind::TwoAxisGridPointsRandomOffset => "two_axis_grid_points_random_offset",
            ModelKind::TwoAxisGridStep => "two_axis_grid_step",
            ModelKind::TwoAxisLinePoints => "two_axis_line_points",
            ModelKind::TwoAxisLineStep => "two_axis_line_step",
            ModelKind::TwoAxisSpiral => "two_axis_spiral",
            ModelKind::TwoAxisLissajous => "two_axis_lissajous",
            ModelKind::TwoAxisPointSingle => "two_axis_point_single",
            ModelKind::Static => "static",
            ModelKind::Compound => "compound",
            ModelKind::Concurrent => "concurrent",
            ModelKind::Consecutive => "consecutive",
        }
    }
}

/// Any scan model, tagged by kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanModel {
    /// Single axis, fixed step.
    AxialStep(AxialStepModel),
    /// Single axis, fixed number of points.
    AxialPoints(AxialPointsModel),
    /// Single axis, explicit positions.
    AxialArray(AxialArrayModel),
    /// Several axes moved together through the same steps.
    AxialCollatedStep(AxialCollatedStepModel),
    /// Single axis, several stitched step regions.
    AxialMultiStep(AxialMultiStepModel),
    /// Grid over a bounding box, fixed point counts.
    TwoAxisGridPoints(TwoAxisGridPointsModel),
    /// Grid over a bounding box with randomly offset points.
    TwoAxisGridPointsRandomOffset(TwoAxisGridPointsRandomOffsetModel),
    /// Grid over a bounding box, fixed step sizes.
    TwoAxisGridStep(TwoAxisGridStepModel),
    /// Points along a bounding line, fixed point count.
    TwoAxisLinePoints(TwoAxisLinePointsModel),
    /// Points along a bounding line, fixed step.
    TwoAxisLineStep(TwoAxisLineStepModel),
    /// Fermat spiral clipped to a bounding box.
    TwoAxisSpiral(TwoAxisSpiralModel),
    /// Lissajous figure inside a bounding box.
    TwoAxisLissajous(TwoAxisLissajousModel),
    /// A single two-axis point.
    TwoAxisPointSingle(TwoAxisPointSingleModel),
    /// Repeated acquisition with no axis motion.
    Static(StaticModel),
    /// Nested (cartesian) composition.
    Compound(CompoundModel),
    /// Lock-step composition.
    Concurrent(ConcurrentModel),
    /// End-to-end composition.
    Consecutive(ConsecutiveModel),
}

macro_rules! dispatch {
    ($model:expr, $m:ident => $body:expr) => {
        match $model {
            ScanModel::AxialStep($m) => $body,
            ScanModel::AxialPoints($m) => $body,
            ScanModel::AxialArray($m) => $body,
            ScanModel::AxialCollatedStep($m) => $body,
            ScanModel::AxialMultiStep($m) => $body,
            ScanModel::TwoAxisGridPoints($m) => $body,
            ScanModel::TwoAxisGridPointsRandomOffset($m) => $body,
            ScanModel::TwoAxisGridStep($m) => $body,
            ScanModel::TwoAxisLinePoints($m) => $body,
            ScanModel::TwoAxisLineStep($m) => $body,
            ScanModel::TwoAxisSpiral($m) => $body,
            ScanModel::TwoAxisLissajous($m) => $body,
            ScanModel::TwoAxisPointSingle($m) => $body,
            ScanModel::Static($m) => $body,
            ScanModel::Compound($m) => $body,
            ScanModel::Concurrent($m) => $body,
            ScanModel::Consecutive($m) => $body,
        }
    };
}

fn label_of<M: AxisModel>(_: &M) -> &'static str {
    M::LABEL
}

impl ScanModel {
    /// Kind of this model.
    pub fn kind(&self) -> ModelKind {
        match self {
            ScanModel::AxialStep(_) => ModelKind::AxialStep,
            ScanModel::AxialPoints(_) => ModelKind::AxialPoints,
            ScanModel::AxialArray(_) => ModelKind::AxialArray,
            ScanModel::AxialCollatedStep(_) => ModelKind::AxialCollatedStep,
            ScanModel::AxialMultiStep(_) => ModelKind::AxialMultiStep,
            ScanModel::TwoAxisGridPoints(_) => ModelKind::TwoAxisGridPoints,
            ScanModel::TwoAxisGridPointsRandomOffset(_) => ModelKind::TwoAxisGridPointsRandomOffset,
            ScanModel::TwoAxisGridStep(_) => ModelKind::TwoAxisGridStep,
            ScanModel::TwoAxisLinePoints(_) => ModelKind::TwoAxisLinePoints,
            ScanModel::TwoAxisLineStep(_) => ModelKind::TwoAxisLineStep,
            ScanModel::TwoAxisSpiral(_) => ModelKind::TwoAxisSpiral,
            ScanModel::TwoAxisLissajous(_) => ModelKind::TwoAxisLissajous,
            ScanModel::TwoAxisPointSingle(_) => ModelKind::TwoAxisPointSingle,
            ScanModel::Static(_) => ModelKind::Static,
            ScanModel::Compound(_) => ModelKind::Compound,
            ScanModel::Concurrent(_) => ModelKind::Concurrent,
            ScanModel::Consecutive(_) => ModelKind::Consecutive,
        }
    }

    /// Human-readable label of this model's kind.
    pub fn label(&self) -> &'static str {
        dispatch!(self, m => label_of(m))
    }

    /// Names of all axes scanned by this model.
    pub fn axis_names(&self) -> Vec<AxisName> {
        dispatch!(self, m => m.axis_names())
    }

    /// Units of all axes scanned by this model.
    pub fn axis_units(&self) -> Vec<Units> {
        dispatch!(self, m => m.axis_units())
    }

    /// Whether the model alternates.
    pub fn is_alternating(&self) -> bool {
        dispatch!(self, m => m.is_alternating())
    }

    /// Whether the model requests continuous motion.
    pub fn is_continuous(&self) -> bool {
        dispatch!(self, m => m.is_continuous())
    }

    /// Whether the model kind supports alternating.
    pub fn supports_alternating(&self) -> bool {
        dispatch!(self, m => m.supports_alternating())
    }

    /// Whether the model kind supports continuous motion.
    pub fn supports_continuous(&self) -> bool {
        dispatch!(self, m => m.supports_continuous())
    }

    /// Whether the model kind supports a random offset.
    pub fn supports_random_offset(&self) -> bool {
        dispatch!(self, m => m.supports_random_offset())
    }
}

macro_rules! impl_from_model {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for ScanModel {
                fn from(model: $ty) -> Self {
                    ScanModel::$variant(model)
                }
            }
        )*
    };
}

impl_from_model!(
    AxialStep(AxialStepModel),
    AxialPoints(AxialPointsModel),
    AxialArray(AxialArrayModel),
    AxialCollatedStep(AxialCollatedStepModel),
    AxialMultiStep(AxialMultiStepModel),
    TwoAxisGridPoints(TwoAxisGridPointsModel),
    TwoAxisGridPointsRandomOffset(TwoAxisGridPointsRandomOffsetModel),
    TwoAxisGridStep(TwoAxisGridStepModel),
    TwoAxisLinePoints(TwoAxisLinePointsModel),
    TwoAxisLineStep(TwoAxisLineStepModel),
    TwoAxisSpiral(TwoAxisSpiralModel),
    TwoAxisLissajous(TwoAxisLissajousModel),
    TwoAxisPointSingle(TwoAxisPointSingleModel),
    Static(StaticModel),
    Compound(CompoundModel),
    Concurrent(ConcurrentModel),
    Consecutive(ConsecutiveModel),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_count() {
        assert_eq!(lattice_count(0.0, 10.0, 3.0), Some(4));
        assert_eq!(lattice_count(1.0, 4.0, 0.6), Some(6));
        assert_eq!(lattice_count(290.0, 295.0, 1.0), Some(6));
        assert_eq!(lattice_count(10.0, 0.0, -2.5), Some(5));
    }

    #[test]
    fn test_lattice_count_huge_ratio() {
        assert_eq!(lattice_count(0.0, 1e300, 1.0), None);
        assert_eq!(lattice_count(0.0, 1e6, 1.0), Some(1_000_001));
    }

    #[test]
    fn test_lattice_count_rejects_wrong_direction() {
        assert_eq!(lattice_count(0.0, 10.0, -1.0), None);
        assert_eq!(lattice_count(0.0, 10.0, 0.0), None);
        assert_eq!(lattice_count(1.0, 1.0, 0.0), None);
    }

    #[test]
    fn test_kind_names_are_unique() {
        for (i, a) in ModelKind::ALL.iter().enumerate() {
            for b in &ModelKind::ALL[i + 1..] {
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn test_axis_name_too_long_is_empty() {
        assert!(axis_name("a_very_long_axis_name_that_does_not_fit").is_empty());
        assert_eq!(axis_name("stage_x").as_str(), "stage_x");
    }
}
