//! Geometry inputs for two-axis template models.

use serde::Deserialize;

/// Axis-aligned rectangle in scan coordinates.
///
/// Lengths may be negative, in which case the axis is scanned from
/// `start` towards smaller values.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingBox {
    /// Origin on the x axis.
    pub x_axis_start: f64,
    /// Origin on the y axis.
    pub y_axis_start: f64,
    /// Signed extent on the x axis.
    pub x_axis_length: f64,
    /// Signed extent on the y axis.
    pub y_axis_length: f64,
}

impl BoundingBox {
    /// Create a bounding box.
    pub const fn new(x_start: f64, y_start: f64, x_length: f64, y_length: f64) -> Self {
        Self {
            x_axis_start: x_start,
            y_axis_start: y_start,
            x_axis_length: x_length,
            y_axis_length: y_length,
        }
    }

    /// Centre of the box.
    pub fn centre(&self) -> (f64, f64) {
        (
            self.x_axis_start + self.x_axis_length / 2.0,
            self.y_axis_start + self.y_axis_length / 2.0,
        )
    }

    /// Half the diagonal length.
    pub fn half_diagonal(&self) -> f64 {
        libm::hypot(self.x_axis_length, self.y_axis_length) / 2.0
    }

    /// Minimum and maximum corners, regardless of length signs.
    pub fn extent(&self) -> ((f64, f64), (f64, f64)) {
        let x0 = self.x_axis_start;
        let x1 = self.x_axis_start + self.x_axis_length;
        let y0 = self.y_axis_start;
        let y1 = self.y_axis_start + self.y_axis_length;
        ((x0.min(x1), y0.min(y1)), (x0.max(x1), y0.max(y1)))
    }
}

/// Straight segment in scan coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BoundingLine {
    /// Origin on the x axis.
    pub x_start: f64,
    /// Origin on the y axis.
    pub y_start: f64,
    /// Length of the segment.
    pub length: f64,
    /// Angle from the x axis in radians.
    pub angle: f64,
}

impl BoundingLine {
    /// Create a bounding line.
    pub const fn new(x_start: f64, y_start: f64, length: f64, angle: f64) -> Self {
        Self { x_start, y_start, length, angle }
    }

    /// Unit direction `(cos, sin)` of the line.
    pub fn direction(&self) -> (f64, f64) {
        (libm::cos(self.angle), libm::sin(self.angle))
    }
}

/// Which axis of a two-axis template moves fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// x is the fast (inner) axis.
    #[default]
    Horizontal,
    /// y is the fast (inner) axis.
    Vertical,
}
