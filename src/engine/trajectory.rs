//! Native trajectory representation.

use alloc::vec::Vec;
use core::any::Any;
use core::ops::Range;

use crate::error::{GeneratorError, Result};
use crate::model::{AxisName, Units, VARIABLE_DURATION};

use super::dict::{DictBuilder, DictValue};
use super::excluder::Excluder;
use super::mutator::PointMutator;
use super::{Point, Points, Position, TrajectoryHandle};

/// Precomputed positions and bounds of one primitive generator.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Primitive {
    pub(crate) axes: Vec<AxisName>,
    pub(crate) units: Vec<Units>,
    /// `positions[axis][point]`
    pub(crate) positions: Vec<Vec<f64>>,
    pub(crate) lower: Vec<Vec<f64>>,
    pub(crate) upper: Vec<Vec<f64>>,
    pub(crate) size: usize,
    pub(crate) alternate: bool,
    pub(crate) dict: DictValue,
}

impl Primitive {
    /// Primitive with no axes.
    pub(crate) fn empty(size: usize, dict: DictValue) -> Self {
        Self {
            axes: Vec::new(),
            units: Vec::new(),
            positions: Vec::new(),
            lower: Vec::new(),
            upper: Vec::new(),
            size,
            alternate: false,
            dict,
        }
    }

    /// Copy every point of a foreign handle into a primitive.
    pub(crate) fn materialize(handle: &dyn TrajectoryHandle) -> Self {
        let axes = handle.axes().to_vec();
        let mut positions = alloc::vec![Vec::with_capacity(handle.size()); axes.len()];
        let mut lower = positions.clone();
        let mut upper = positions.clone();

        for point in Points::new(handle) {
            for (a, axis) in axes.iter().enumerate() {
                let value = point.position.get(axis).unwrap_or(f64::NAN);
                positions[a].push(value);
                lower[a].push(point.lower.get(axis).unwrap_or(value));
                upper[a].push(point.upper.get(axis).unwrap_or(value));
            }
        }

        Self {
            units: handle.units().to_vec(),
            size: handle.size(),
            axes,
            positions,
            lower,
            upper,
            alternate: false,
            dict: handle.to_dict(),
        }
    }

    fn has_axes(&self) -> bool {
        !self.axes.is_empty()
    }
}

/// One dimension of a compound trajectory: a contiguous run of generators
/// iterated as a unit, optionally masked by excluders.
#[derive(Debug, Clone, PartialEq)]
struct Dimension {
    generators: Range<usize>,
    alternate: bool,
    /// Kept raw indices, when masked.
    mask: Option<Vec<usize>>,
    size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    Primitive,
    Compound,
}

/// Trajectory evaluated by the native engine.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTrajectory {
    generators: Vec<Primitive>,
    excluders: Vec<Excluder>,
    mutators: Vec<PointMutator>,
    duration: f64,
    continuous: bool,
    dims: Vec<Dimension>,
    axes: Vec<AxisName>,
    units: Vec<Units>,
    size: usize,
    layout: Layout,
}

impl NativeTrajectory {
    pub(crate) fn primitive(generator: Primitive) -> Result<Self> {
        Self::build(alloc::vec![generator], Vec::new(), Vec::new(), VARIABLE_DURATION, false, Layout::Primitive)
    }

    pub(crate) fn compound(
        generators: Vec<Primitive>,
        excluders: Vec<Excluder>,
        mutators: Vec<PointMutator>,
        duration: f64,
        continuous: bool,
    ) -> Result<Self> {
        Self::build(generators, excluders, mutators, duration, continuous, Layout::Compound)
    }

    /// Parts pulled up when this trajectory is nested inside another compound.
    pub(crate) fn parts(&self) -> (&[Primitive], &[Excluder], &[PointMutator]) {
        (&self.generators, &self.excluders, &self.mutators)
    }

    fn build(
        generators: Vec<Primitive>,
        excluders: Vec<Excluder>,
        mutators: Vec<PointMutator>,
        duration: f64,
        continuous: bool,
        layout: Layout,
    ) -> Result<Self> {
        let mut axes: Vec<AxisName> = Vec::new();
        let mut units: Vec<Units> = Vec::new();
        for generator in &generators {
            for (axis, unit) in generator.axes.iter().zip(&generator.units) {
                if axes.contains(axis) {
                    return Err(GeneratorError::Engine(alloc::format!(
                        "axis '{}' generated twice",
                        axis
                    ))
                    .into());
                }
                axes.push(axis.clone());
                units.push(unit.clone());
            }
        }

        let mut trajectory = Self {
            generators,
            excluders,
            mutators,
            duration,
            continuous,
            dims: Vec::new(),
            axes,
            units,
            size: 0,
            layout,
        };
        trajectory.prepare_dimensions()?;
        Ok(trajectory)
    }

    fn generator_of(&self, axis: &AxisName) -> Option<usize> {
        self.generators.iter().position(|g| g.axes.contains(axis))
    }

    fn prepare_dimensions(&mut self) -> Result<()> {
        let mut dims: Vec<Dimension> = self
            .generators
            .iter()
            .enumerate()
            .filter(|(_, g)| g.has_axes() || g.size != 1)
            .map(|(i, g)| Dimension {
                generators: i..i + 1,
                alternate: g.alternate,
                mask: None,
                size: g.size,
            })
            .collect();

        let mut masked = alloc::vec![false; dims.len()];
        for excluder in &self.excluders {
            let mut span: Option<Range<usize>> = None;
            for axis in excluder.axes() {
                let generator = self.generator_of(axis).ok_or_else(|| {
                    GeneratorError::Engine(alloc::format!("excluder axis '{}' is not scanned", axis))
                })?;
                let dim = dims
                    .iter()
                    .position(|d| d.generators.contains(&generator))
                    .ok_or_else(|| GeneratorError::Engine(alloc::format!("axis '{}' has no dimension", axis)))?;
                span = Some(match span {
                    None => dim..dim + 1,
                    Some(r) => r.start.min(dim)..r.end.max(dim + 1),
                });
            }
            let Some(span) = span else { continue };

            if span.len() > 1 {
                let merged = Dimension {
                    generators: dims[span.start].generators.start..dims[span.end - 1].generators.end,
                    alternate: dims[span.start].alternate,
                    mask: None,
                    size: dims[span.clone()].iter().map(|d| d.size).product(),
                };
                dims.splice(span.clone(), core::iter::once(merged));
                let was_masked = masked[span.clone()].iter().any(|m| *m);
                masked.splice(span.clone(), core::iter::once(was_masked));
            }
            masked[span.start] = true;
        }

        for (dim, is_masked) in dims.iter_mut().zip(&masked) {
            if *is_masked {
                let mask = self.compute_mask(dim);
                if mask.is_empty() {
                    return Err(GeneratorError::Empty.into());
                }
                dim.size = mask.len();
                dim.mask = Some(mask);
            }
        }

        self.size = dims.iter().map(|d| d.size).product();
        self.dims = dims;
        Ok(())
    }

    fn raw_size(&self, dim: &Dimension) -> usize {
        self.generators[dim.generators.clone()].iter().map(|g| g.size).product()
    }

    fn compute_mask(&self, dim: &Dimension) -> Vec<usize> {
        let applicable: Vec<&Excluder> = self
            .excluders
            .iter()
            .filter(|ex| {
                ex.axes().iter().all(|axis| {
                    self.generator_of(axis)
                        .map(|g| dim.generators.contains(&g))
                        .unwrap_or(false)
                })
            })
            .collect();

        let mut mask = Vec::new();
        let mut indices = Vec::new();
        for raw in 0..self.raw_size(dim) {
            indices.clear();
            self.decompose(dim, raw, &mut indices);
            let mut position = Position::default();
            for (g, (index, _)) in dim.generators.clone().zip(&indices) {
                self.push_positions(g, *index, &mut position);
            }
            if applicable.iter().all(|ex| ex.contains_position(&position)) {
                mask.push(raw);
            }
        }
        mask
    }

    /// Split a raw index of `dim` into per-generator `(index, reversed)`.
    fn decompose(&self, dim: &Dimension, raw: usize, out: &mut Vec<(usize, bool)>) {
        let mut inner: usize = self.raw_size(dim);
        for g in dim.generators.clone() {
            let generator = &self.generators[g];
            let size = generator.size.max(1);
            let repeats = raw / inner;
            inner /= size;
            let mut index = (raw / inner) % size;
            let reversed = generator.alternate && repeats % 2 == 1;
            if reversed {
                index = size - 1 - index;
            }
            out.push((index, reversed));
        }
    }

    fn push_positions(&self, g: usize, index: usize, position: &mut Position) {
        let generator = &self.generators[g];
        for (a, axis) in generator.axes.iter().enumerate() {
            position.push(axis.clone(), generator.positions[a][index]);
        }
    }

    fn innermost_with_axes(&self) -> Option<usize> {
        self.generators.iter().rposition(|g| g.has_axes())
    }

    fn evaluate(&self, index: usize) -> Option<Point> {
        if index >= self.size {
            return None;
        }

        let mut dim_indices = Vec::with_capacity(self.dims.len());
        let mut generator_indices = alloc::vec![(0usize, false); self.generators.len()];
        let mut inner = self.size;
        for dim in &self.dims {
            let repeats = index / inner;
            inner /= dim.size;
            let mut i = (index / inner) % dim.size;
            let reversed = dim.alternate && repeats % 2 == 1;
            if reversed {
                i = dim.size - 1 - i;
            }
            dim_indices.push(i);

            let raw = dim.mask.as_ref().map(|m| m[i]).unwrap_or(i);
            let mut parts = Vec::with_capacity(dim.generators.len());
            self.decompose(dim, raw, &mut parts);
            for (g, (gi, intra)) in dim.generators.clone().zip(parts) {
                generator_indices[g] = (gi, intra != reversed);
            }
        }

        let bounded = self.innermost_with_axes();
        let mut position = Position::default();
        let mut lower = Position::default();
        let mut upper = Position::default();
        for (g, generator) in self.generators.iter().enumerate() {
            let (gi, reversed) = generator_indices[g];
            for (a, axis) in generator.axes.iter().enumerate() {
                let value = generator.positions[a][gi];
                position.push(axis.clone(), value);
                if Some(g) == bounded {
                    let (lo, hi) = (generator.lower[a][gi], generator.upper[a][gi]);
                    let (lo, hi) = if reversed { (hi, lo) } else { (lo, hi) };
                    lower.push(axis.clone(), lo);
                    upper.push(axis.clone(), hi);
                } else {
                    lower.push(axis.clone(), value);
                    upper.push(axis.clone(), value);
                }
            }
        }

        for mutator in &self.mutators {
            mutator.apply(index, &mut position);
        }

        Some(Point {
            index,
            indices: dim_indices,
            position,
            lower,
            upper,
        })
    }
}

impl TrajectoryHandle for NativeTrajectory {
    fn size(&self) -> usize {
        self.size
    }

    fn shape(&self) -> Vec<usize> {
        self.dims.iter().map(|d| d.size).collect()
    }

    fn axes(&self) -> &[AxisName] {
        &self.axes
    }

    fn units(&self) -> &[Units] {
        &self.units
    }

    fn initial_bound(&self) -> Option<Position> {
        if self.axes.is_empty() {
            return None;
        }
        self.evaluate(0).map(|p| p.lower)
    }

    fn final_bound(&self) -> Option<Position> {
        if self.axes.is_empty() {
            return None;
        }
        self.size.checked_sub(1).and_then(|last| self.evaluate(last)).map(|p| p.upper)
    }

    fn point(&self, index: usize) -> Option<Point> {
        self.evaluate(index)
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }

    fn to_dict(&self) -> DictValue {
        match self.layout {
            Layout::Primitive => self.generators[0].dict.clone(),
            Layout::Compound => DictBuilder::new("scanpointgenerator:generator/CompoundGenerator:1.0")
                .entry(
                    "generators",
                    self.generators.iter().map(|g| g.dict.clone()).collect::<Vec<_>>(),
                )
                .entry(
                    "excluders",
                    self.excluders.iter().map(Excluder::to_dict).collect::<Vec<_>>(),
                )
                .entry(
                    "mutators",
                    self.mutators.iter().map(PointMutator::to_dict).collect::<Vec<_>>(),
                )
                .entry("duration", self.duration)
                .entry("continuous", self.continuous)
                .build(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
