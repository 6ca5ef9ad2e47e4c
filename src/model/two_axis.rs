//! Two-axis (map) models and the axis-less static model.

use alloc::vec::Vec;

use serde::Deserialize;

use super::geometry::{BoundingBox, BoundingLine, Orientation};
use super::{axis_name, default_units, AxisModel, AxisName, Units};

/// Axis names and units shared by every two-axis model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MapAxes {
    /// Name of the x axis.
    pub x_axis_name: AxisName,
    /// Name of the y axis.
    pub y_axis_name: AxisName,
    /// Units of the x axis.
    #[serde(default = "default_units")]
    pub x_axis_units: Units,
    /// Units of the y axis.
    #[serde(default = "default_units")]
    pub y_axis_units: Units,
}

impl MapAxes {
    /// Create a pair of axes with default units.
    pub fn new(x: &str, y: &str) -> Self {
        Self {
            x_axis_name: axis_name(x),
            y_axis_name: axis_name(y),
            x_axis_units: default_units(),
            y_axis_units: default_units(),
        }
    }

    pub(crate) fn names(&self) -> Vec<AxisName> {
        alloc::vec![self.x_axis_name.clone(), self.y_axis_name.clone()]
    }

    pub(crate) fn units(&self) -> Vec<Units> {
        alloc::vec![self.x_axis_units.clone(), self.y_axis_units.clone()]
    }
}

impl Default for MapAxes {
    fn default() -> Self {
        Self::new("x", "y")
    }
}

fn default_scale() -> f64 {
    1.0
}

fn default_delta() -> f64 {
    core::f64::consts::FRAC_PI_2
}

fn default_static_size() -> usize {
    1
}

/// Grid over a bounding box with a fixed number of points per axis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwoAxisGridPointsModel {
    /// Scanned axes.
    #[serde(flatten)]
    pub axes: MapAxes,
    /// Scanned area.
    pub bounding_box: BoundingBox,
    /// Points along x.
    pub x_axis_points: usize,
    /// Points along y.
    pub y_axis_points: usize,
    /// Fast axis selection.
    #[serde(default)]
    pub orientation: Orientation,
    /// Alternate the slow axis as well as the fast one.
    #[serde(default)]
    pub alternate_both_axes: bool,
    /// Reverse the fast axis on each repeat.
    #[serde(default)]
    pub alternating: bool,
    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

impl TwoAxisGridPointsModel {
    /// Create a grid on `x`/`y` with the given point counts.
    pub fn new(x: &str, y: &str, bounding_box: BoundingBox, x_points: usize, y_points: usize) -> Self {
        Self {
            axes: MapAxes::new(x, y),
            bounding_box,
            x_axis_points: x_points,
            y_axis_points: y_points,
            orientation: Orientation::Horizontal,
            alternate_both_axes: false,
            alternating: false,
            continuous: false,
        }
    }

    /// Set the fast axis.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the alternating flag.
    pub fn with_alternating(mut self, alternating: bool) -> Self {
        self.alternating = alternating;
        self
    }

    /// Alternate both axes instead of only the fast one.
    pub fn with_alternate_both_axes(mut self, both: bool) -> Self {
        self.alternate_both_axes = both;
        self
    }

    /// Set the continuous flag.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }
}

/// Grid over a bounding box whose points are jittered by a random offset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwoAxisGridPointsRandomOffsetModel {
    /// Underlying regular grid.
    #[serde(flatten)]
    pub grid: TwoAxisGridPointsModel,
    /// Maximum offset as a percentage of the smaller grid step.
    pub offset: f64,
    /// Seed for the offset sequence.
    #[serde(default)]
    pub seed: u32,
}

/// Grid over a bounding box with a fixed step per axis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwoAxisGridStepModel {
    /// Scanned axes.
    #[serde(flatten)]
    pub axes: MapAxes,
    /// Scanned area.
    pub bounding_box: BoundingBox,
    /// Step along x (magnitude).
    pub x_axis_step: f64,
    /// Step along y (magnitude).
    pub y_axis_step: f64,
    /// Fast axis selection.
    #[serde(default)]
    pub orientation: Orientation,
    /// Alternate the slow axis as well as the fast one.
    #[serde(default)]
    pub alternate_both_axes: bool,
    /// Reverse the fast axis on each repeat.
    #[serde(default)]
    pub alternating: bool,
    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

impl TwoAxisGridStepModel {
    /// Create a stepped grid on `x`/`y`.
    pub fn new(x: &str, y: &str, bounding_box: BoundingBox, x_step: f64, y_step: f64) -> Self {
        Self {
            axes: MapAxes::new(x, y),
            bounding_box,
            x_axis_step: x_step,
            y_axis_step: y_step,
            orientation: Orientation::Horizontal,
            alternate_both_axes: false,
            alternating: false,
            continuous: false,
        }
    }
}

/// Evenly spaced points along a bounding line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwoAxisLinePointsModel {
    /// Scanned axes.
    #[serde(flatten)]
    pub axes: MapAxes,
    /// Scanned segment.
    pub bounding_line: BoundingLine,
    /// Number of points.
    pub points: usize,
    /// Reverse direction on each repeat.
    #[serde(default)]
    pub alternating: bool,
    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

impl TwoAxisLinePointsModel {
    /// Create a line with `points` evenly spaced points.
    pub fn new(x: &str, y: &str, bounding_line: BoundingLine, points: usize) -> Self {
        Self {
            axes: MapAxes::new(x, y),
            bounding_line,
            points,
            alternating: false,
            continuous: false,
        }
    }
}

/// Points along a bounding line at a fixed step from its origin.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwoAxisLineStepModel {
    /// Scanned axes.
    #[serde(flatten)]
    pub axes: MapAxes,
    /// Scanned segment.
    pub bounding_line: BoundingLine,
    /// Distance between points along the line.
    pub step: f64,
    /// Reverse direction on each repeat.
    #[serde(default)]
    pub alternating: bool,
    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

impl TwoAxisLineStepModel {
    /// Create a stepped line.
    pub fn new(x: &str, y: &str, bounding_line: BoundingLine, step: f64) -> Self {
        Self {
            axes: MapAxes::new(x, y),
            bounding_line,
            step,
            alternating: false,
            continuous: false,
        }
    }
}

/// Fermat spiral centred on a bounding box and clipped to it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwoAxisSpiralModel {
    /// Scanned axes.
    #[serde(flatten)]
    pub axes: MapAxes,
    /// Scanned area.
    pub bounding_box: BoundingBox,
    /// Spacing between successive rings.
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Reverse direction on each repeat.
    #[serde(default)]
    pub alternating: bool,
    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

/// Number of points on a Fermat spiral of `radius` with arm spacing `scale`.
///
/// Returned as a float so callers can check it before converting.
pub fn fermat_point_count(radius: f64, scale: f64) -> f64 {
    let alpha = libm::sqrt(4.0 * core::f64::consts::PI);
    let beta = scale / (2.0 * core::f64::consts::PI);
    let turns = radius / (alpha * beta);
    libm::floor(turns * turns) + 1.0
}

impl TwoAxisSpiralModel {
    /// Create a spiral over `bounding_box`.
    pub fn new(x: &str, y: &str, bounding_box: BoundingBox, scale: f64) -> Self {
        Self {
            axes: MapAxes::new(x, y),
            bounding_box,
            scale,
            alternating: false,
            continuous: false,
        }
    }
}

/// Lissajous figure filling a bounding box.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwoAxisLissajousModel {
    /// Scanned axes.
    #[serde(flatten)]
    pub axes: MapAxes,
    /// Scanned area.
    pub bounding_box: BoundingBox,
    /// Frequency along x.
    pub a: f64,
    /// Frequency along y.
    pub b: f64,
    /// Phase offset of x relative to y, in radians.
    #[serde(default = "default_delta")]
    pub delta: f64,
    /// Number of points over one period.
    pub points: usize,
    /// Reverse direction on each repeat.
    #[serde(default)]
    pub alternating: bool,
    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

impl TwoAxisLissajousModel {
    /// Create a Lissajous figure with the default phase offset.
    pub fn new(x: &str, y: &str, bounding_box: BoundingBox, a: f64, b: f64, points: usize) -> Self {
        Self {
            axes: MapAxes::new(x, y),
            bounding_box,
            a,
            b,
            delta: default_delta(),
            points,
            alternating: false,
            continuous: false,
        }
    }
}

/// A single position on two axes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TwoAxisPointSingleModel {
    /// Scanned axes.
    #[serde(flatten)]
    pub axes: MapAxes,
    /// Position on x.
    pub x: f64,
    /// Position on y.
    pub y: f64,
}

impl TwoAxisPointSingleModel {
    /// Create a single point.
    pub fn new(x_axis: &str, y_axis: &str, x: f64, y: f64) -> Self {
        Self { axes: MapAxes::new(x_axis, y_axis), x, y }
    }
}

/// Repeated acquisition without moving any axis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StaticModel {
    /// Number of repeats.
    #[serde(default = "default_static_size")]
    pub size: usize,
}

impl StaticModel {
    /// Create a static model with `size` repeats.
    pub const fn new(size: usize) -> Self {
        Self { size }
    }
}

impl Default for StaticModel {
    fn default() -> Self {
        Self::new(1)
    }
}

macro_rules! impl_map_model {
    ($ty:ty, $label:literal) => {
        impl AxisModel for $ty {
            const LABEL: &'static str = $label;

            fn axis_names(&self) -> Vec<AxisName> {
                self.axes.names()
            }

            fn axis_units(&self) -> Vec<Units> {
                self.axes.units()
            }

            fn is_alternating(&self) -> bool {
                self.alternating
            }

            fn is_continuous(&self) -> bool {
                self.continuous
            }
        }
    };
}

impl_map_model!(TwoAxisGridPointsModel, "TwoAxisGridPointsModel");
impl_map_model!(TwoAxisGridStepModel, "TwoAxisGridStepModel");
impl_map_model!(TwoAxisLinePointsModel, "TwoAxisLinePointsModel");
impl_map_model!(TwoAxisLineStepModel, "TwoAxisLineStepModel");
impl_map_model!(TwoAxisSpiralModel, "TwoAxisSpiralModel");
impl_map_model!(TwoAxisLissajousModel, "TwoAxisLissajousModel");

impl AxisModel for TwoAxisGridPointsRandomOffsetModel {
    const LABEL: &'static str = "TwoAxisGridPointsRandomOffsetModel";

    fn axis_names(&self) -> Vec<AxisName> {
        self.grid.axes.names()
    }

    fn axis_units(&self) -> Vec<Units> {
        self.grid.axes.units()
    }

    fn is_alternating(&self) -> bool {
        self.grid.alternating
    }

    fn is_continuous(&self) -> bool {
        self.grid.continuous
    }

    fn supports_random_offset(&self) -> bool {
        true
    }
}

impl AxisModel for TwoAxisPointSingleModel {
    const LABEL: &'static str = "TwoAxisPointSingleModel";

    fn axis_names(&self) -> Vec<AxisName> {
        self.axes.names()
    }

    fn axis_units(&self) -> Vec<Units> {
        self.axes.units()
    }

    fn supports_alternating(&self) -> bool {
        false
    }

    fn supports_continuous(&self) -> bool {
        false
    }
}

impl AxisModel for StaticModel {
    const LABEL: &'static str = "StaticModel";

    fn axis_names(&self) -> Vec<AxisName> {
        Vec::new()
    }

    fn axis_units(&self) -> Vec<Units> {
        Vec::new()
    }

    fn supports_alternating(&self) -> bool {
        false
    }

    fn supports_continuous(&self) -> bool {
        false
    }
}
