//! Point exclusion by region containment.

use alloc::vec::Vec;

use crate::model::{AxisName, RegionShape};

use super::dict::{DictBuilder, DictValue};
use super::Position;

/// Distance within which a point region matches a scan point.
pub const POINT_TOLERANCE: f64 = 1e-6;

/// Keeps points lying inside any of its shapes on a pair of axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Excluder {
    shapes: Vec<RegionShape>,
    axes: [AxisName; 2],
}

impl Excluder {
    pub(crate) fn new(shapes: Vec<RegionShape>, axes: [AxisName; 2]) -> Self {
        Self { shapes, axes }
    }

    /// Axes the excluder tests, as `(x, y)`.
    pub fn axes(&self) -> &[AxisName; 2] {
        &self.axes
    }

    /// Shapes combined by this excluder.
    pub fn shapes(&self) -> &[RegionShape] {
        &self.shapes
    }

    /// Whether `(x, y)` lies inside any shape.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.shapes.iter().any(|shape| shape_contains(shape, x, y))
    }

    /// Whether a position lies inside any shape. Positions lacking one of
    /// the excluder's axes are kept.
    pub fn contains_position(&self, position: &Position) -> bool {
        match (position.get(&self.axes[0]), position.get(&self.axes[1])) {
            (Some(x), Some(y)) => self.contains(x, y),
            _ => true,
        }
    }

    pub(crate) fn to_dict(&self) -> DictValue {
        let rois: Vec<DictValue> = self
            .shapes
            .iter()
            .map(|shape| DictBuilder::new(roi_typeid(shape)).build())
            .collect();
        DictBuilder::new("scanpointgenerator:excluder/ROIExcluder:1.0")
            .entry("axes", &self.axes[..])
            .entry("rois", rois)
            .build()
    }
}

fn roi_typeid(shape: &RegionShape) -> &'static str {
    match shape {
        RegionShape::Circle { .. } => "scanpointgenerator:roi/CircularROI:1.0",
        RegionShape::Ellipse { .. } => "scanpointgenerator:roi/EllipticalROI:1.0",
        RegionShape::Point { .. } => "scanpointgenerator:roi/PointROI:1.0",
        RegionShape::Polygon { .. } => "scanpointgenerator:roi/PolygonalROI:1.0",
        RegionShape::Rectangle { .. } => "scanpointgenerator:roi/RectangularROI:1.0",
        RegionShape::Sector { .. } => "scanpointgenerator:roi/SectorROI:1.0",
        RegionShape::Line { .. } => "scanpointgenerator:roi/LinearROI:1.0",
    }
}

/// Whether the native engine can test containment for a shape.
pub(crate) fn is_supported(shape: &RegionShape) -> bool {
    !matches!(shape, RegionShape::Line { .. })
}

fn rotate(x: f64, y: f64, angle: f64) -> (f64, f64) {
    let (s, c) = (libm::sin(angle), libm::cos(angle));
    (x * c - y * s, x * s + y * c)
}

fn wrap_angle(angle: f64) -> f64 {
    let tau = 2.0 * core::f64::consts::PI;
    let wrapped = libm::fmod(angle, tau);
    if wrapped < 0.0 {
        wrapped + tau
    } else {
        wrapped
    }
}

fn between(value: f64, a: f64, b: f64) -> bool {
    value >= a.min(b) && value <= a.max(b)
}

fn shape_contains(shape: &RegionShape, x: f64, y: f64) -> bool {
    match shape {
        RegionShape::Circle { centre, radius } => {
            let (dx, dy) = (x - centre.0, y - centre.1);
            dx * dx + dy * dy <= radius * radius
        }
        RegionShape::Ellipse { centre, semi_axes, angle } => {
            let (u, v) = rotate(x - centre.0, y - centre.1, -angle);
            let (a, b) = (u / semi_axes.0, v / semi_axes.1);
            a * a + b * b <= 1.0
        }
        RegionShape::Point { x: px, y: py } => {
            libm::fabs(x - px) <= POINT_TOLERANCE && libm::fabs(y - py) <= POINT_TOLERANCE
        }
        RegionShape::Polygon { points } => polygon_contains(points, x, y),
        RegionShape::Rectangle { start, lengths, angle } => {
            let (u, v) = rotate(x - start.0, y - start.1, -angle);
            between(u, 0.0, lengths.0) && between(v, 0.0, lengths.1)
        }
        RegionShape::Sector { centre, radii, angles } => {
            let (dx, dy) = (x - centre.0, y - centre.1);
            let r = libm::hypot(dx, dy);
            if r < radii.0 || r > radii.1 {
                return false;
            }
            let span = wrap_angle(angles.1 - angles.0);
            if span == 0.0 && angles.1 != angles.0 {
                return true;
            }
            let phi = wrap_angle(libm::atan2(dy, dx) - angles.0);
            phi <= span
        }
        RegionShape::Line { .. } => false,
    }
}

/// Even-odd ray casting.
fn polygon_contains(points: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = points.len().wrapping_sub(1);
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::axis_name;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    fn excluder(shape: RegionShape) -> Excluder {
        Excluder::new(alloc::vec![shape], [axis_name("x"), axis_name("y")])
    }

    #[test]
    fn test_circle() {
        let ex = excluder(RegionShape::Circle { centre: (1.0, 1.0), radius: 2.0 });
        assert!(ex.contains(1.0, 1.0));
        assert!(ex.contains(3.0, 1.0));
        assert!(!ex.contains(3.0, 3.0));
    }

    #[test]
    fn test_rotated_rectangle() {
        let ex = excluder(RegionShape::Rectangle {
            start: (0.0, 0.0),
            lengths: (2.0, 1.0),
            angle: FRAC_PI_2,
        });
        assert!(ex.contains(-0.5, 1.5));
        assert!(!ex.contains(1.5, 0.5));
    }

    #[test]
    fn test_ellipse() {
        let ex = excluder(RegionShape::Ellipse {
            centre: (0.0, 0.0),
            semi_axes: (2.0, 1.0),
            angle: 0.0,
        });
        assert!(ex.contains(1.9, 0.0));
        assert!(!ex.contains(0.0, 1.5));
    }

    #[test]
    fn test_polygon() {
        let ex = excluder(RegionShape::Polygon {
            points: alloc::vec![(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)],
        });
        assert!(ex.contains(1.0, 1.0));
        assert!(!ex.contains(3.0, 3.0));
    }

    #[test]
    fn test_sector() {
        let ex = excluder(RegionShape::Sector {
            centre: (0.0, 0.0),
            radii: (1.0, 2.0),
            angles: (0.0, FRAC_PI_2),
        });
        assert!(ex.contains(1.0, 1.0));
        assert!(!ex.contains(0.5, 0.5));
        assert!(!ex.contains(-1.0, 1.0));

        let wrapped = excluder(RegionShape::Sector {
            centre: (0.0, 0.0),
            radii: (0.0, 2.0),
            angles: (PI + FRAC_PI_4 * 3.0, FRAC_PI_4),
        });
        assert!(wrapped.contains(1.0, 0.1));
        assert!(wrapped.contains(1.0, -0.1));
        assert!(!wrapped.contains(-1.0, 0.0));
    }

    #[test]
    fn test_point() {
        let ex = excluder(RegionShape::Point { x: 0.5, y: 0.5 });
        assert!(ex.contains(0.5 + 1e-9, 0.5));
        assert!(!ex.contains(0.6, 0.5));
    }

    #[test]
    fn test_position_missing_axis_is_kept() {
        let ex = excluder(RegionShape::Circle { centre: (0.0, 0.0), radius: 0.1 });
        let mut position = Position::default();
        position.push(axis_name("x"), 10.0);
        assert!(ex.contains_position(&position));
    }
}
