//! Regions of interest used to exclude scan points.

use alloc::vec::Vec;

use serde::Deserialize;

use super::{axis_name, AxisName};

/// Geometric shape of a region of interest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegionShape {
    /// Disc of `radius` around `centre`.
    Circle {
        /// Centre `(x, y)`.
        centre: (f64, f64),
        /// Radius.
        radius: f64,
    },
    /// Ellipse with semi-axes rotated by `angle` radians.
    Ellipse {
        /// Centre `(x, y)`.
        centre: (f64, f64),
        /// Semi-axes `(a, b)` before rotation.
        semi_axes: (f64, f64),
        /// Rotation in radians.
        #[serde(default)]
        angle: f64,
    },
    /// A single position.
    Point {
        /// Position on x.
        x: f64,
        /// Position on y.
        y: f64,
    },
    /// Closed polygon.
    Polygon {
        /// Vertices `(x, y)` in order.
        points: Vec<(f64, f64)>,
    },
    /// Rectangle rotated by `angle` radians about `start`.
    Rectangle {
        /// Corner `(x, y)`.
        start: (f64, f64),
        /// Side lengths `(width, height)` before rotation.
        lengths: (f64, f64),
        /// Rotation in radians.
        #[serde(default)]
        angle: f64,
    },
    /// Annular sector.
    Sector {
        /// Centre `(x, y)`.
        centre: (f64, f64),
        /// Inner and outer radius.
        radii: (f64, f64),
        /// Start and end angle in radians, counter-clockwise.
        angles: (f64, f64),
    },
    /// Free-form line. Encloses no area.
    Line {
        /// First end `(x, y)`.
        start: (f64, f64),
        /// Second end `(x, y)`.
        end: (f64, f64),
    },
}

impl RegionShape {
    /// Short name of the shape.
    pub fn name(&self) -> &'static str {
        match self {
            RegionShape::Circle { .. } => "circle",
            RegionShape::Ellipse { .. } => "ellipse",
            RegionShape::Point { .. } => "point",
            RegionShape::Polygon { .. } => "polygon",
            RegionShape::Rectangle { .. } => "rectangle",
            RegionShape::Sector { .. } => "sector",
            RegionShape::Line { .. } => "line",
        }
    }
}

/// A region of interest and the axes it constrains.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanRegion {
    /// Constrained axes: empty, or exactly two names.
    ///
    /// An empty list applies the region to the innermost two scanned axes.
    #[serde(default)]
    pub axes: Vec<AxisName>,

    /// Region geometry.
    pub shape: RegionShape,
}

impl ScanRegion {
    /// Create a region over the given axes.
    pub fn new(shape: RegionShape, axes: &[&str]) -> Self {
        Self {
            axes: axes.iter().map(|a| axis_name(a)).collect(),
            shape,
        }
    }

    /// Circle region over the given axes.
    pub fn circle(centre: (f64, f64), radius: f64, axes: &[&str]) -> Self {
        Self::new(RegionShape::Circle { centre, radius }, axes)
    }

    /// Axis-aligned rectangle region over the given axes.
    pub fn rectangle(start: (f64, f64), lengths: (f64, f64), axes: &[&str]) -> Self {
        Self::new(RegionShape::Rectangle { start, lengths, angle: 0.0 }, axes)
    }
}
