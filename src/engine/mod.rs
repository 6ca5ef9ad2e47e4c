//! Trajectory evaluation engine interface.
//!
//! The generator layer turns validated models into primitive requests
//! (lines, arrays, spirals, ...) and composition requests (compound, zip,
//! concat). A [`TrajectoryEngine`] answers them with opaque
//! [`TrajectoryHandle`]s that the generator layer owns exclusively.
//!
//! [`NativeEngine`] is the in-crate implementation. Other engines can be
//! plugged in through [`crate::generator::ScanContext::new`].

mod dict;
mod excluder;
mod mutator;
mod native;
mod trajectory;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::error::Result;
use crate::model::{AxisName, Mutator, RegionShape, Units};

pub use dict::DictValue;
pub use excluder::{Excluder, POINT_TOLERANCE};
pub use mutator::PointMutator;
pub use native::NativeEngine;
pub use trajectory::NativeTrajectory;

/// Axis positions of one point, in axis order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Position {
    values: Vec<(AxisName, f64)>,
}

impl Position {
    /// Append an axis value.
    pub fn push(&mut self, axis: AxisName, value: f64) {
        self.values.push((axis, value));
    }

    /// Value on `axis`, if present.
    pub fn get(&self, axis: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name.as_str() == axis)
            .map(|(_, v)| *v)
    }

    /// Add `delta` to the value on `axis`, if present.
    pub fn offset(&mut self, axis: &str, delta: f64) {
        if let Some((_, v)) = self.values.iter_mut().find(|(name, _)| name.as_str() == axis) {
            *v += delta;
        }
    }

    /// Axis names in order.
    pub fn axes(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// `(axis, value)` pairs in order.
    pub fn values(&self) -> &[(AxisName, f64)] {
        &self.values
    }

    /// Number of axes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the position has no axes.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// One point of a trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    /// Flat index within the trajectory.
    pub index: usize,
    /// Index within each dimension, outer to inner.
    pub indices: Vec<usize>,
    /// Axis positions after mutation.
    pub position: Position,
    /// Position half a step before the point, along the direction of travel.
    pub lower: Position,
    /// Position half a step after the point, along the direction of travel.
    pub upper: Position,
}

/// An evaluated trajectory.
///
/// Handles are immutable once returned by an engine.
pub trait TrajectoryHandle: fmt::Debug + Any + Send + Sync {
    /// Number of points.
    fn size(&self) -> usize;

    /// Size of each dimension, outer to inner.
    fn shape(&self) -> Vec<usize>;

    /// Number of dimensions.
    fn rank(&self) -> usize {
        self.shape().len()
    }

    /// Scanned axes.
    fn axes(&self) -> &[AxisName];

    /// Units of the scanned axes.
    fn units(&self) -> &[Units];

    /// Position half a step before the first point, if defined.
    fn initial_bound(&self) -> Option<Position>;

    /// Position half a step after the last point, if defined.
    fn final_bound(&self) -> Option<Position>;

    /// Point at flat `index`, or `None` past the end.
    fn point(&self, index: usize) -> Option<Point>;

    /// Per-point duration in seconds, or `-1.0` if variable.
    fn duration(&self) -> f64;

    /// Whether the trajectory is scanned continuously.
    fn is_continuous(&self) -> bool;

    /// Structured description for diagnostics.
    fn to_dict(&self) -> DictValue;

    /// Downcasting support for engines that flatten their own handles.
    fn as_any(&self) -> &dyn Any;
}

impl dyn TrajectoryHandle {
    /// Iterate over every point in order.
    pub fn points(&self) -> Points<'_> {
        Points::new(self)
    }
}

/// Iterator over the points of a [`TrajectoryHandle`].
#[derive(Debug)]
pub struct Points<'a> {
    handle: &'a dyn TrajectoryHandle,
    next: usize,
    end: usize,
}

impl<'a> Points<'a> {
    /// Iterate over every point of `handle` in order.
    pub fn new(handle: &'a dyn TrajectoryHandle) -> Self {
        Self {
            handle,
            next: 0,
            end: handle.size(),
        }
    }
}

impl Iterator for Points<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next >= self.end {
            return None;
        }
        let point = self.handle.point(self.next);
        self.next += 1;
        point
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Points<'_> {}

/// Evenly spaced points between per-axis start and stop values.
#[derive(Debug, Clone, PartialEq)]
pub struct LineParams {
    /// Axes moved together.
    pub axes: Vec<AxisName>,
    /// Units per axis.
    pub units: Vec<Units>,
    /// First position per axis.
    pub start: Vec<f64>,
    /// Last position per axis.
    pub stop: Vec<f64>,
    /// Number of points.
    pub size: usize,
    /// Step per axis, setting the half-step bounds. Derived from start, stop
    /// and size when absent, which gives a single point zero-width bounds.
    pub step: Option<Vec<f64>>,
    /// Reverse on odd repeats.
    pub alternate: bool,
}

/// Explicit positions on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayParams {
    /// Scanned axis.
    pub axis: AxisName,
    /// Axis units.
    pub units: Units,
    /// Positions in order.
    pub positions: Vec<f64>,
    /// Reverse on odd repeats.
    pub alternate: bool,
}

/// Fermat spiral around a centre.
#[derive(Debug, Clone, PartialEq)]
pub struct SpiralParams {
    /// `[x, y]` axes.
    pub axes: [AxisName; 2],
    /// `[x, y]` units.
    pub units: [Units; 2],
    /// Centre `(x, y)`.
    pub centre: (f64, f64),
    /// Radius the spiral must cover.
    pub radius: f64,
    /// Ring spacing.
    pub scale: f64,
    /// Reverse on odd repeats.
    pub alternate: bool,
}

/// Lissajous figure around a centre.
#[derive(Debug, Clone, PartialEq)]
pub struct LissajousParams {
    /// `[x, y]` axes.
    pub axes: [AxisName; 2],
    /// `[x, y]` units.
    pub units: [Units; 2],
    /// Centre `(x, y)`.
    pub centre: (f64, f64),
    /// Full extent `(width, height)`.
    pub span: (f64, f64),
    /// Frequency along x.
    pub a: f64,
    /// Frequency along y.
    pub b: f64,
    /// Phase of x relative to y.
    pub delta: f64,
    /// Number of points.
    pub size: usize,
    /// Reverse on odd repeats.
    pub alternate: bool,
}

/// Nested composition of existing trajectories.
#[derive(Debug)]
pub struct CompoundParams<'a> {
    /// Members, outer (slowest) to inner (fastest).
    pub generators: &'a [&'a dyn TrajectoryHandle],
    /// Excluders, applied before mutators.
    pub excluders: Vec<Excluder>,
    /// Mutators.
    pub mutators: Vec<PointMutator>,
    /// Per-point duration, or `-1.0`.
    pub duration: f64,
    /// Continuous scan flag.
    pub continuous: bool,
}

/// Evaluates trajectory requests.
pub trait TrajectoryEngine: fmt::Debug {
    /// Evenly spaced line on one or more axes.
    fn line(&self, params: LineParams) -> Result<Box<dyn TrajectoryHandle>>;

    /// Explicit positions on one axis.
    fn array(&self, params: ArrayParams) -> Result<Box<dyn TrajectoryHandle>>;

    /// Fermat spiral.
    fn spiral(&self, params: SpiralParams) -> Result<Box<dyn TrajectoryHandle>>;

    /// Lissajous figure.
    fn lissajous(&self, params: LissajousParams) -> Result<Box<dyn TrajectoryHandle>>;

    /// `size` points on no axes.
    fn static_points(&self, size: usize) -> Result<Box<dyn TrajectoryHandle>>;

    /// Whether [`TrajectoryEngine::excluder`] accepts this shape.
    fn supports_region(&self, shape: &RegionShape) -> bool;

    /// Excluder keeping points inside any of `shapes` on `axes`.
    fn excluder(&self, shapes: &[RegionShape], axes: [AxisName; 2]) -> Result<Excluder>;

    /// Engine form of a mutator.
    fn mutator(&self, mutator: &Mutator) -> Result<PointMutator>;

    /// Nested composition.
    fn compound(&self, params: CompoundParams<'_>) -> Result<Box<dyn TrajectoryHandle>>;

    /// Lock-step composition of equally sized members.
    fn zip(&self, members: &[&dyn TrajectoryHandle]) -> Result<Box<dyn TrajectoryHandle>>;

    /// End-to-end composition of members on the same axes.
    fn concat(&self, members: &[&dyn TrajectoryHandle]) -> Result<Box<dyn TrajectoryHandle>>;
}
