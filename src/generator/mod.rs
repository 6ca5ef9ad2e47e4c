//! Generators: validated models bound to evaluated trajectories.
//!
//! A [`Generator`] is built once from a model through a [`ScanContext`].
//! Construction validates the model and asks the context's engine for the
//! trajectory; afterwards the generator is immutable and every accessor
//! reads the cached handle.

mod axial;
mod compound;
mod context;
mod multi;
mod regions;
mod registry;
mod template;
mod two_axis;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::engine::{
    CompoundParams, DictValue, Excluder, PointMutator, Points, Position, TrajectoryHandle,
};
use crate::error::{GeneratorError, Result};
use crate::model::{AxisName, ModelKind, ScanModel, Units, VARIABLE_DURATION};
use crate::validation::validate_model;

pub use compound::{compound_from_model, compound_of};
pub use context::ScanContext;
pub use multi::{
    check_bounds_meet, concurrent, concurrent_from_model, consecutive, consecutive_from_model,
    BOUND_TOLERANCE,
};
pub use regions::{group_regions, RegionGroup};
pub use registry::{GeneratorFactory, GeneratorRegistry, MAX_GENERATOR_KINDS, MAX_KIND_NAME_LEN};
pub use template::{compute_extent, compute_step, line_points_spacing, line_step_spacing, AxisExtent, AxisSpacing};
pub use axial::stitch_positions;

/// A validated model and the trajectory evaluated from it.
#[derive(Debug)]
pub struct Generator {
    model: Option<ScanModel>,
    trajectory: Box<dyn TrajectoryHandle>,
    members: Vec<Generator>,
    diagnostics: Vec<String>,
}

impl Generator {
    pub(crate) fn new(model: Option<ScanModel>, trajectory: Box<dyn TrajectoryHandle>) -> Self {
        Self {
            model,
            trajectory,
            members: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn with_members(mut self, members: Vec<Generator>) -> Self {
        for member in &members {
            self.diagnostics.extend(member.diagnostics.iter().cloned());
        }
        self.members = members;
        self
    }

    pub(crate) fn with_diagnostics(mut self, diagnostics: Vec<String>) -> Self {
        self.diagnostics.extend(diagnostics);
        self
    }

    /// Wrap a trajectory that has no backing model.
    ///
    /// The result behaves like any other generator except that
    /// [`Generator::model`] and [`Generator::validate`] fail.
    pub fn from_trajectory(trajectory: Box<dyn TrajectoryHandle>) -> Self {
        Self::new(None, trajectory)
    }

    /// The validated model.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::NoModel`] for a generator built with
    /// [`Generator::from_trajectory`].
    pub fn model(&self) -> Result<&ScanModel> {
        self.model.as_ref().ok_or_else(|| GeneratorError::NoModel.into())
    }

    /// Kind of the backing model, if any.
    pub fn kind(&self) -> Option<ModelKind> {
        self.model.as_ref().map(ScanModel::kind)
    }

    /// Re-run validation on the backing model.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::NoModel`] if there is no model.
    pub fn validate(&self) -> Result<()> {
        validate_model(self.model()?)
    }

    /// Number of points.
    pub fn size(&self) -> usize {
        self.trajectory.size()
    }

    /// Size of each dimension, outer to inner.
    pub fn shape(&self) -> Vec<usize> {
        self.trajectory.shape()
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.trajectory.rank()
    }

    /// Scanned axes.
    pub fn names(&self) -> &[AxisName] {
        self.trajectory.axes()
    }

    /// Units of the scanned axes.
    pub fn units(&self) -> &[Units] {
        self.trajectory.units()
    }

    /// Iterate over every point. Each call starts from the first point.
    pub fn iter(&self) -> Points<'_> {
        self.trajectory.points()
    }

    /// Position half a step before the first point.
    pub fn initial_bound(&self) -> Option<Position> {
        self.trajectory.initial_bound()
    }

    /// Position half a step after the last point.
    pub fn final_bound(&self) -> Option<Position> {
        self.trajectory.final_bound()
    }

    /// Per-point duration in seconds, or `-1.0` if variable.
    pub fn duration(&self) -> f64 {
        self.trajectory.duration()
    }

    /// Whether the trajectory is scanned continuously.
    pub fn is_continuous(&self) -> bool {
        self.trajectory.is_continuous()
    }

    /// Member generators of a multi-model generator.
    pub fn members(&self) -> &[Generator] {
        &self.members
    }

    /// Non-fatal messages recorded while building, e.g. dropped regions.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Structured description of the trajectory.
    pub fn to_dict(&self) -> DictValue {
        self.trajectory.to_dict()
    }

    /// The evaluated trajectory.
    pub fn trajectory(&self) -> &dyn TrajectoryHandle {
        self.trajectory.as_ref()
    }
}

impl<'a> IntoIterator for &'a Generator {
    type Item = crate::engine::Point;
    type IntoIter = Points<'a>;

    fn into_iter(self) -> Points<'a> {
        self.iter()
    }
}

/// Wrap primitive handles of one model in a compound carrying its
/// continuous flag, and bind the result to the model.
pub(crate) fn wrap(
    ctx: &ScanContext,
    model: ScanModel,
    primitives: &[Box<dyn TrajectoryHandle>],
    excluders: Vec<Excluder>,
    mutators: Vec<PointMutator>,
) -> Result<Generator> {
    let handles: Vec<&dyn TrajectoryHandle> = primitives.iter().map(|p| p.as_ref()).collect();
    let trajectory = ctx.engine().compound(CompoundParams {
        generators: &handles,
        excluders,
        mutators,
        duration: VARIABLE_DURATION,
        continuous: model.is_continuous(),
    })?;
    Ok(Generator::new(Some(model), trajectory))
}
