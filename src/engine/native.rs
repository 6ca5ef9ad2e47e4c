//! In-crate trajectory engine.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::f64::consts::PI;

use crate::error::{GeneratorError, Result};
use crate::model::{fermat_point_count, AxisName, Mutator, RegionShape, Units, MAX_POINTS};

use super::dict::{DictBuilder, DictValue};
use super::excluder::{self, Excluder};
use super::mutator::PointMutator;
use super::trajectory::{NativeTrajectory, Primitive};
use super::{
    ArrayParams, CompoundParams, LineParams, LissajousParams, Point, Points, SpiralParams,
    TrajectoryEngine, TrajectoryHandle,
};

/// Evaluates every request in-process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NativeEngine;

fn rejected(msg: impl Into<alloc::string::String>) -> crate::error::Error {
    GeneratorError::Engine(msg.into()).into()
}

fn boxed(primitive: Primitive) -> Result<Box<dyn TrajectoryHandle>> {
    Ok(Box::new(NativeTrajectory::primitive(primitive)?))
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

/// Positions and half-step bounds for an evenly spaced line.
///
/// `width` overrides the spacing used for the bounds.
fn line_axis(start: f64, stop: f64, size: usize, width: Option<f64>) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let step = if size > 1 {
        (stop - start) / (size - 1) as f64
    } else {
        stop - start
    };
    let half = width.unwrap_or(step) / 2.0;
    let positions: Vec<f64> = (0..size).map(|k| start + k as f64 * step).collect();
    let lower = positions.iter().map(|p| p - half).collect();
    let upper = positions.iter().map(|p| p + half).collect();
    (positions, lower, upper)
}

/// Midpoint bounds, extrapolated by half the end gaps.
fn array_bounds(positions: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = positions.len();
    if n < 2 {
        return (positions.to_vec(), positions.to_vec());
    }
    let mut edges = Vec::with_capacity(n + 1);
    edges.push(positions[0] - (positions[1] - positions[0]) / 2.0);
    for pair in positions.windows(2) {
        edges.push((pair[0] + pair[1]) / 2.0);
    }
    edges.push(positions[n - 1] + (positions[n - 1] - positions[n - 2]) / 2.0);
    (edges[..n].to_vec(), edges[1..].to_vec())
}

/// Point `(x, y)` of a Fermat spiral at continuous index `t`.
fn spiral_point(centre: (f64, f64), beta: f64, alpha: f64, t: f64) -> (f64, f64) {
    let phi = alpha * libm::sqrt(t);
    (
        centre.0 + beta * phi * libm::sin(phi),
        centre.1 + beta * phi * libm::cos(phi),
    )
}

/// Gather points of several handles into per-axis columns.
#[derive(Debug, Default)]
struct Columns {
    axes: Vec<AxisName>,
    units: Vec<Units>,
    positions: Vec<Vec<f64>>,
    lower: Vec<Vec<f64>>,
    upper: Vec<Vec<f64>>,
}

impl Columns {
    fn new(axes: &[AxisName], units: &[Units]) -> Self {
        let empty = alloc::vec![Vec::new(); axes.len()];
        Self {
            axes: axes.to_vec(),
            units: units.to_vec(),
            positions: empty.clone(),
            lower: empty.clone(),
            upper: empty,
        }
    }

    fn push(&mut self, offset: usize, axes: &[AxisName], point: &Point) {
        for (a, axis) in axes.iter().enumerate() {
            let value = point.position.get(axis).unwrap_or(f64::NAN);
            self.positions[offset + a].push(value);
            self.lower[offset + a].push(point.lower.get(axis).unwrap_or(value));
            self.upper[offset + a].push(point.upper.get(axis).unwrap_or(value));
        }
    }

    fn into_primitive(self, size: usize, dict: DictValue) -> Primitive {
        Primitive {
            axes: self.axes,
            units: self.units,
            positions: self.positions,
            lower: self.lower,
            upper: self.upper,
            size,
            alternate: false,
            dict,
        }
    }
}

impl TrajectoryEngine for NativeEngine {
    fn line(&self, params: LineParams) -> Result<Box<dyn TrajectoryHandle>> {
        let n = params.axes.len();
        if n == 0 || params.units.len() != n || params.start.len() != n || params.stop.len() != n {
            return Err(rejected("line axes, units, start and stop must have equal non-zero length"));
        }
        if params.size == 0 || params.size > MAX_POINTS {
            return Err(rejected("line size must be between 1 and MAX_POINTS"));
        }
        if !all_finite(&params.start) || !all_finite(&params.stop) {
            return Err(rejected("line start and stop must be finite"));
        }
        if let Some(step) = &params.step {
            if step.len() != n || !all_finite(step) {
                return Err(rejected("line step must be finite and given for every axis"));
            }
        }

        let mut positions = Vec::with_capacity(n);
        let mut lower = Vec::with_capacity(n);
        let mut upper = Vec::with_capacity(n);
        for (a, (start, stop)) in params.start.iter().zip(&params.stop).enumerate() {
            let width = params.step.as_ref().map(|step| step[a]);
            let (p, lo, hi) = line_axis(*start, *stop, params.size, width);
            positions.push(p);
            lower.push(lo);
            upper.push(hi);
        }

        let dict = DictBuilder::new("scanpointgenerator:generator/LineGenerator:1.0")
            .entry("axes", &params.axes[..])
            .entry("units", &params.units[..])
            .entry("start", params.start.clone())
            .entry("stop", params.stop.clone())
            .entry("size", params.size)
            .entry("alternate", params.alternate)
            .build();

        boxed(Primitive {
            axes: params.axes,
            units: params.units,
            positions,
            lower,
            upper,
            size: params.size,
            alternate: params.alternate,
            dict,
        })
    }

    fn array(&self, params: ArrayParams) -> Result<Box<dyn TrajectoryHandle>> {
        if params.positions.is_empty() || !all_finite(&params.positions) {
            return Err(rejected("array positions must be finite and non-empty"));
        }

        let (lower, upper) = array_bounds(&params.positions);
        let dict = DictBuilder::new("scanpointgenerator:generator/ArrayGenerator:1.0")
            .entry("axes", &[params.axis.clone()][..])
            .entry("units", &[params.units.clone()][..])
            .entry("points", params.positions.clone())
            .entry("alternate", params.alternate)
            .build();

        let size = params.positions.len();
        boxed(Primitive {
            axes: alloc::vec![params.axis],
            units: alloc::vec![params.units],
            positions: alloc::vec![params.positions],
            lower: alloc::vec![lower],
            upper: alloc::vec![upper],
            size,
            alternate: params.alternate,
            dict,
        })
    }

    fn spiral(&self, params: SpiralParams) -> Result<Box<dyn TrajectoryHandle>> {
        if !(params.radius.is_finite() && params.radius > 0.0) {
            return Err(rejected("spiral radius must be positive"));
        }
        if !(params.scale.is_finite() && params.scale > 0.0) {
            return Err(rejected("spiral scale must be positive"));
        }
        if !all_finite(&[params.centre.0, params.centre.1]) {
            return Err(rejected("spiral centre must be finite"));
        }

        let alpha = libm::sqrt(4.0 * PI);
        let beta = params.scale / (2.0 * PI);
        let count = fermat_point_count(params.radius, params.scale);
        if count.is_nan() || count > MAX_POINTS as f64 {
            return Err(rejected("spiral has too many points"));
        }
        let size = count as usize;

        let mut xs = [Vec::with_capacity(size), Vec::with_capacity(size), Vec::with_capacity(size)];
        let mut ys = [Vec::with_capacity(size), Vec::with_capacity(size), Vec::with_capacity(size)];
        for n in 0..size {
            let n = n as f64;
            for (k, t) in [n + 0.5, n, n + 1.0].into_iter().enumerate() {
                let (x, y) = spiral_point(params.centre, beta, alpha, t);
                xs[k].push(x);
                ys[k].push(y);
            }
        }
        let [xp, xl, xu] = xs;
        let [yp, yl, yu] = ys;

        let dict = DictBuilder::new("scanpointgenerator:generator/SpiralGenerator:1.0")
            .entry("axes", &params.axes[..])
            .entry("units", &params.units[..])
            .entry("centre", alloc::vec![params.centre.0, params.centre.1])
            .entry("radius", params.radius)
            .entry("scale", params.scale)
            .entry("size", size)
            .entry("alternate", params.alternate)
            .build();

        let [x_axis, y_axis] = params.axes;
        let [x_units, y_units] = params.units;
        boxed(Primitive {
            axes: alloc::vec![x_axis, y_axis],
            units: alloc::vec![x_units, y_units],
            positions: alloc::vec![xp, yp],
            lower: alloc::vec![xl, yl],
            upper: alloc::vec![xu, yu],
            size,
            alternate: params.alternate,
            dict,
        })
    }

    fn lissajous(&self, params: LissajousParams) -> Result<Box<dyn TrajectoryHandle>> {
        if params.size == 0 || params.size > MAX_POINTS {
            return Err(rejected("lissajous size must be between 1 and MAX_POINTS"));
        }
        let values = [
            params.centre.0,
            params.centre.1,
            params.span.0,
            params.span.1,
            params.a,
            params.b,
            params.delta,
        ];
        if !all_finite(&values) {
            return Err(rejected("lissajous parameters must be finite"));
        }

        let (half_w, half_h) = (params.span.0 / 2.0, params.span.1 / 2.0);
        let at = |i: f64| {
            let t = 2.0 * PI * i / params.size as f64;
            (
                params.centre.0 + half_w * libm::sin(params.a * t + params.delta),
                params.centre.1 + half_h * libm::sin(params.b * t),
            )
        };

        let mut xs = [Vec::new(), Vec::new(), Vec::new()];
        let mut ys = [Vec::new(), Vec::new(), Vec::new()];
        for i in 0..params.size {
            let i = i as f64;
            for (k, t) in [i, i - 0.5, i + 0.5].into_iter().enumerate() {
                let (x, y) = at(t);
                xs[k].push(x);
                ys[k].push(y);
            }
        }
        let [xp, xl, xu] = xs;
        let [yp, yl, yu] = ys;

        let dict = DictBuilder::new("scanpointgenerator:generator/LissajousGenerator:1.0")
            .entry("axes", &params.axes[..])
            .entry("units", &params.units[..])
            .entry("centre", alloc::vec![params.centre.0, params.centre.1])
            .entry("span", alloc::vec![params.span.0, params.span.1])
            .entry("a", params.a)
            .entry("b", params.b)
            .entry("delta", params.delta)
            .entry("size", params.size)
            .entry("alternate", params.alternate)
            .build();

        let [x_axis, y_axis] = params.axes;
        let [x_units, y_units] = params.units;
        boxed(Primitive {
            axes: alloc::vec![x_axis, y_axis],
            units: alloc::vec![x_units, y_units],
            positions: alloc::vec![xp, yp],
            lower: alloc::vec![xl, yl],
            upper: alloc::vec![xu, yu],
            size: params.size,
            alternate: params.alternate,
            dict,
        })
    }

    fn static_points(&self, size: usize) -> Result<Box<dyn TrajectoryHandle>> {
        if size == 0 || size > MAX_POINTS {
            return Err(rejected("static size must be between 1 and MAX_POINTS"));
        }
        let dict = DictBuilder::new("scanpointgenerator:generator/StaticPointGenerator:1.0")
            .entry("size", size)
            .build();
        boxed(Primitive::empty(size, dict))
    }

    fn supports_region(&self, shape: &RegionShape) -> bool {
        excluder::is_supported(shape)
    }

    fn excluder(&self, shapes: &[RegionShape], axes: [AxisName; 2]) -> Result<Excluder> {
        if let Some(shape) = shapes.iter().find(|s| !excluder::is_supported(s)) {
            return Err(rejected(alloc::format!("unsupported region shape '{}'", shape.name())));
        }
        if shapes.is_empty() {
            return Err(rejected("excluder needs at least one region"));
        }
        Ok(Excluder::new(shapes.to_vec(), axes))
    }

    fn mutator(&self, mutator: &Mutator) -> Result<PointMutator> {
        match mutator {
            Mutator::RandomOffset { seed, max_offset } => {
                if let Some((axis, _)) = max_offset.iter().find(|(_, o)| !o.is_finite() || **o < 0.0) {
                    return Err(rejected(alloc::format!("random offset for '{}' is not a valid maximum", axis)));
                }
                Ok(PointMutator::RandomOffset {
                    seed: *seed,
                    max_offset: max_offset.iter().map(|(a, o)| (a.clone(), *o)).collect(),
                })
            }
        }
    }

    fn compound(&self, params: CompoundParams<'_>) -> Result<Box<dyn TrajectoryHandle>> {
        if params.generators.is_empty() {
            return Err(rejected("compound needs at least one generator"));
        }

        let mut generators = Vec::new();
        let mut excluders = Vec::new();
        let mut mutators = Vec::new();
        for member in params.generators {
            match member.as_any().downcast_ref::<NativeTrajectory>() {
                Some(native) => {
                    let (g, e, m) = native.parts();
                    generators.extend_from_slice(g);
                    excluders.extend_from_slice(e);
                    mutators.extend_from_slice(m);
                }
                None => generators.push(Primitive::materialize(*member)),
            }
        }
        excluders.extend(params.excluders);
        mutators.extend(params.mutators);

        Ok(Box::new(NativeTrajectory::compound(
            generators,
            excluders,
            mutators,
            params.duration,
            params.continuous,
        )?))
    }

    fn zip(&self, members: &[&dyn TrajectoryHandle]) -> Result<Box<dyn TrajectoryHandle>> {
        let first = members.first().ok_or_else(|| rejected("zip needs at least one member"))?;
        let size = first.size();

        let mut axes: Vec<AxisName> = Vec::new();
        let mut units: Vec<Units> = Vec::new();
        for member in members {
            if member.size() != size {
                return Err(rejected("zip members must have equal size"));
            }
            for (axis, unit) in member.axes().iter().zip(member.units()) {
                if axes.contains(axis) {
                    return Err(rejected(alloc::format!("axis '{}' zipped twice", axis)));
                }
                axes.push(axis.clone());
                units.push(unit.clone());
            }
        }

        let mut columns = Columns::new(&axes, &units);
        for index in 0..size {
            let mut offset = 0;
            for member in members {
                if let Some(point) = member.point(index) {
                    columns.push(offset, member.axes(), &point);
                }
                offset += member.axes().len();
            }
        }

        let dict = DictBuilder::new("scanpointgenerator:generator/ZipGenerator:1.0")
            .entry("generators", members.iter().map(|m| m.to_dict()).collect::<Vec<_>>())
            .entry("size", size)
            .build();
        boxed(columns.into_primitive(size, dict))
    }

    fn concat(&self, members: &[&dyn TrajectoryHandle]) -> Result<Box<dyn TrajectoryHandle>> {
        let first = members.first().ok_or_else(|| rejected("concat needs at least one member"))?;
        let axes = first.axes().to_vec();

        let mut columns = Columns::new(&axes, first.units());
        let mut size = 0;
        for member in members {
            let same_axes = member.axes().len() == axes.len()
                && member.axes().iter().all(|a| axes.contains(a));
            if !same_axes {
                return Err(rejected("concat members must scan the same axes"));
            }
            for point in Points::new(*member) {
                columns.push(0, &axes, &point);
            }
            size += member.size();
        }

        let dict = DictBuilder::new("scanpointgenerator:generator/ConcatGenerator:1.0")
            .entry("generators", members.iter().map(|m| m.to_dict()).collect::<Vec<_>>())
            .entry("size", size)
            .build();
        boxed(columns.into_primitive(size, dict))
    }
}
