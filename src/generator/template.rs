//! Spacing templates shared by the bounding-box and bounding-line kinds.
//!
//! Every grid-like kind reduces to two one-axis lines; every line kind to
//! one two-axis line. The functions here compute those lines from a box or
//! line and an [`AxisSpacing`], and the builders at the bottom turn them into
//! engine requests.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use crate::engine::{LineParams, TrajectoryHandle};
use crate::error::Result;
use crate::model::{AxisName, BoundingBox, BoundingLine, MapAxes, Orientation, Units, STEP_TOLERANCE};

use super::ScanContext;

/// How points are spread along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisSpacing {
    /// Fixed number of points, each centred in an equal share of the length.
    Points(usize),
    /// Fixed step; as many points as fit in the length.
    Step(f64),
}

/// Evenly spaced positions covering one axis of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisExtent {
    /// First position.
    pub start: f64,
    /// Last position.
    pub stop: f64,
    /// Signed distance between positions.
    pub step: f64,
    /// Number of positions.
    pub points: usize,
}

/// Signed step and point count for `spacing` over `length`.
///
/// A single point takes the whole length as its step so that it lands in
/// the middle. A fixed step takes the sign of `length`.
pub fn compute_step(length: f64, spacing: AxisSpacing) -> (f64, usize) {
    match spacing {
        AxisSpacing::Points(1) => (length, 1),
        AxisSpacing::Points(points) => (length / points as f64, points),
        AxisSpacing::Step(step) => {
            let magnitude = libm::fabs(step);
            let points = libm::floor(libm::fabs(length) / magnitude + STEP_TOLERANCE) as usize;
            let signed = if length < 0.0 { -magnitude } else { magnitude };
            (signed, points)
        }
    }
}

/// Positions for `spacing` over `[start, start + length]`, inset by half a
/// step at each end.
pub fn compute_extent(start: f64, length: f64, spacing: AxisSpacing) -> AxisExtent {
    let (step, points) = compute_step(length, spacing);
    let first = start + step / 2.0;
    AxisExtent {
        start: first,
        stop: first + points.saturating_sub(1) as f64 * step,
        step,
        points,
    }
}

/// Offsets along a line for a fixed number of points: `(first, step, points)`.
///
/// Points are centred in equal shares of the line.
pub fn line_points_spacing(length: f64, points: usize) -> (f64, f64, usize) {
    let step = length / points as f64;
    (step / 2.0, step, points)
}

/// Offsets along a line for a fixed step: `(first, step, points)`.
///
/// The first point sits on the line origin.
pub fn line_step_spacing(length: f64, step: f64) -> (f64, f64, usize) {
    let points = libm::floor(length / step + STEP_TOLERANCE) as usize + 1;
    (0.0, step, points)
}

/// Parameters of a box-shaped grid, independent of the model kind.
pub(crate) struct GridTemplate<'a> {
    pub axes: &'a MapAxes,
    pub bounding_box: &'a BoundingBox,
    pub x: AxisSpacing,
    pub y: AxisSpacing,
    pub orientation: Orientation,
    pub alternating: bool,
    pub alternate_both_axes: bool,
}

/// Outer and inner line of a grid, in nesting order.
pub(crate) fn grid_lines(
    ctx: &ScanContext,
    template: &GridTemplate<'_>,
) -> Result<(Vec<Box<dyn TrajectoryHandle>>, AxisExtent, AxisExtent)> {
    let bbox = template.bounding_box;
    let x = compute_extent(bbox.x_axis_start, bbox.x_axis_length, template.x);
    let y = compute_extent(bbox.y_axis_start, bbox.y_axis_length, template.y);

    let inner_alternate = template.alternating;
    let outer_alternate = template.alternating && template.alternate_both_axes;

    let axes = template.axes;
    let x_line = |alternate| axis_line(&axes.x_axis_name, &axes.x_axis_units, &x, alternate);
    let y_line = |alternate| axis_line(&axes.y_axis_name, &axes.y_axis_units, &y, alternate);

    let (outer, inner) = match template.orientation {
        Orientation::Horizontal => (y_line(outer_alternate), x_line(inner_alternate)),
        Orientation::Vertical => (x_line(outer_alternate), y_line(inner_alternate)),
    };

    let engine = ctx.engine();
    Ok((vec![engine.line(outer)?, engine.line(inner)?], x, y))
}

/// Single two-axis line along a bounding line.
pub(crate) fn diagonal_line(
    ctx: &ScanContext,
    axes: &MapAxes,
    line: &BoundingLine,
    (first, step, points): (f64, f64, usize),
    alternate: bool,
) -> Result<Box<dyn TrajectoryHandle>> {
    let (dx, dy) = line.direction();
    let last = first + points.saturating_sub(1) as f64 * step;

    ctx.engine().line(LineParams {
        axes: axes.names(),
        units: axes.units(),
        start: vec![line.x_start + first * dx, line.y_start + first * dy],
        stop: vec![line.x_start + last * dx, line.y_start + last * dy],
        size: points,
        step: Some(vec![step * dx, step * dy]),
        alternate,
    })
}

fn axis_line(name: &AxisName, units: &Units, extent: &AxisExtent, alternate: bool) -> LineParams {
    LineParams {
        axes: vec![name.clone()],
        units: vec![units.clone()],
        start: vec![extent.start],
        stop: vec![extent.stop],
        size: extent.points,
        step: Some(vec![extent.step]),
        alternate,
    }
}
