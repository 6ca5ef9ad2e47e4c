//! Nested composition of generators.

use alloc::vec::Vec;

use crate::engine::{CompoundParams, Excluder, PointMutator, TrajectoryEngine, TrajectoryHandle};
use crate::error::{Error, GeneratorError, Result};
use crate::log::debug;
use crate::model::{
    AxisModel, AxisName, CompoundModel, ModelKind, Mutator, ScanModel, ScanRegion, VARIABLE_DURATION,
};
use crate::validation::validate_compound_structure;

use super::regions::build_excluders;
use super::{Generator, ScanContext};

/// Build a compound generator from its model.
///
/// Members are built first, in order, so a failing member is reported with
/// its index. The compound's own rules (distinct axes, duration, regions,
/// mutators) are checked afterwards.
///
/// # Errors
///
/// Returns the first member failure, a validation error for the compound
/// itself, or any error raised while composing.
pub fn compound_from_model(ctx: &ScanContext, model: &CompoundModel) -> Result<Generator> {
    let label = CompoundModel::LABEL;

    let members = model
        .models
        .iter()
        .enumerate()
        .map(|(index, member)| {
            ctx.create(member.clone())
                .map_err(|e| e.in_member(label, index, member.kind().name()))
        })
        .collect::<Result<Vec<_>>>()?;

    validate_compound_structure(model)?;

    compose(
        ctx,
        Some(ScanModel::Compound(model.clone())),
        members,
        &model.regions,
        &model.mutators,
        model.duration,
        model.continuous,
    )
}

/// Nest already-built generators, outer to inner.
///
/// The result carries a compound model only if every member has one.
///
/// # Errors
///
/// Returns [`GeneratorError::NoMembers`] for an empty list and
/// [`GeneratorError::DuplicateAxis`] if two members scan the same axis.
pub fn compound_of(ctx: &ScanContext, members: Vec<Generator>) -> Result<Generator> {
    let model = members
        .iter()
        .map(|g| g.model.clone())
        .collect::<Option<Vec<_>>>()
        .map(|models| ScanModel::Compound(CompoundModel::new(models)));

    compose(ctx, model, members, &[], &[], VARIABLE_DURATION, true)
}

/// Continuous only if requested and the innermost member is continuous.
fn resolve_continuous(requested: bool, members: &[Generator]) -> bool {
    let innermost = match members.last() {
        Some(generator) => generator,
        None => return false,
    };
    let supported = innermost
        .model
        .as_ref()
        .map_or(true, ScanModel::supports_continuous);

    requested && supported && innermost.is_continuous()
}

/// Pieces of a composition the engine rejected.
struct Parts<'a> {
    members: &'a [Generator],
    handles: &'a [&'a dyn TrajectoryHandle],
    excluders: &'a [Excluder],
    mutators: &'a [PointMutator],
    mutator_models: &'a [Mutator],
}

/// Label an engine rejection with the first part that reproduces it alone:
/// the shortest failing run of members, then each region group, then each
/// mutator. The error is returned unchanged if no single part fails.
fn locate_failure(engine: &dyn TrajectoryEngine, parts: &Parts<'_>, error: Error) -> Error {
    let label = CompoundModel::LABEL;
    let fails = |count: usize, excluders: Vec<Excluder>, mutators: Vec<PointMutator>| {
        engine
            .compound(CompoundParams {
                generators: &parts.handles[..count],
                excluders,
                mutators,
                duration: VARIABLE_DURATION,
                continuous: false,
            })
            .is_err()
    };

    for (index, member) in parts.members.iter().enumerate() {
        if fails(index + 1, Vec::new(), Vec::new()) {
            let kind = member.kind().map_or("trajectory", ModelKind::name);
            return error.in_member(label, index, kind);
        }
    }

    let all = parts.handles.len();
    for (index, excluder) in parts.excluders.iter().enumerate() {
        if fails(all, alloc::vec![excluder.clone()], Vec::new()) {
            return error.in_field(label, "regions", index, "region_group");
        }
    }

    for (index, (mutator, model)) in parts.mutators.iter().zip(parts.mutator_models).enumerate() {
        if fails(all, Vec::new(), alloc::vec![mutator.clone()]) {
            return error.in_field(label, "mutators", index, model.name());
        }
    }

    debug!("compound rejection not traced to a single part");
    error
}

fn compose(
    ctx: &ScanContext,
    model: Option<ScanModel>,
    members: Vec<Generator>,
    regions: &[ScanRegion],
    mutators: &[Mutator],
    duration: f64,
    continuous: bool,
) -> Result<Generator> {
    if members.is_empty() {
        return Err(GeneratorError::NoMembers.into());
    }

    let mut axes: Vec<AxisName> = Vec::new();
    for member in &members {
        for axis in member.names() {
            if axes.contains(axis) {
                return Err(GeneratorError::DuplicateAxis(axis.as_str().into()).into());
            }
            axes.push(axis.clone());
        }
    }

    let mut diagnostics = Vec::new();
    let excluders = build_excluders(ctx, regions, &axes, &mut diagnostics)?;

    let engine = ctx.engine();
    let point_mutators = mutators
        .iter()
        .enumerate()
        .map(|(index, m)| {
            engine
                .mutator(m)
                .map_err(|e| e.in_field(CompoundModel::LABEL, "mutators", index, m.name()))
        })
        .collect::<Result<Vec<_>>>()?;

    let continuous = resolve_continuous(continuous, &members);
    let handles: Vec<&dyn TrajectoryHandle> = members.iter().map(Generator::trajectory).collect();
    let trajectory = engine
        .compound(CompoundParams {
            generators: &handles,
            excluders: excluders.clone(),
            mutators: point_mutators.clone(),
            duration,
            continuous,
        })
        .map_err(|e| {
            let parts = Parts {
                members: &members,
                handles: &handles,
                excluders: &excluders,
                mutators: &point_mutators,
                mutator_models: mutators,
            };
            locate_failure(engine, &parts, e)
        })?;

    debug!("composed {} members into {} points", members.len(), trajectory.size());

    Ok(Generator::new(model, trajectory)
        .with_members(members)
        .with_diagnostics(diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::engine::{ArrayParams, LineParams, LissajousParams, NativeEngine, SpiralParams};
    use crate::model::{AxialStepModel, BoundingBox, RegionShape, StaticModel, TwoAxisGridPointsModel};
    use alloc::boxed::Box;
    use alloc::vec;

    /// Native engine that refuses to compose anything scanning `bad`.
    #[derive(Debug)]
    struct RefusingEngine;

    impl TrajectoryEngine for RefusingEngine {
        fn line(&self, params: LineParams) -> Result<Box<dyn TrajectoryHandle>> {
            NativeEngine.line(params)
        }

        fn array(&self, params: ArrayParams) -> Result<Box<dyn TrajectoryHandle>> {
            NativeEngine.array(params)
        }

        fn spiral(&self, params: SpiralParams) -> Result<Box<dyn TrajectoryHandle>> {
            NativeEngine.spiral(params)
        }

        fn lissajous(&self, params: LissajousParams) -> Result<Box<dyn TrajectoryHandle>> {
            NativeEngine.lissajous(params)
        }

        fn static_points(&self, size: usize) -> Result<Box<dyn TrajectoryHandle>> {
            NativeEngine.static_points(size)
        }

        fn supports_region(&self, shape: &RegionShape) -> bool {
            NativeEngine.supports_region(shape)
        }

        fn excluder(&self, shapes: &[RegionShape], axes: [AxisName; 2]) -> Result<Excluder> {
            NativeEngine.excluder(shapes, axes)
        }

        fn mutator(&self, mutator: &Mutator) -> Result<PointMutator> {
            NativeEngine.mutator(mutator)
        }

        fn compound(&self, params: CompoundParams<'_>) -> Result<Box<dyn TrajectoryHandle>> {
            let refused = params
                .generators
                .iter()
                .any(|g| g.axes().iter().any(|a| a.as_str() == "bad"));
            if refused {
                return Err(GeneratorError::Engine("axis 'bad' refused".into()).into());
            }
            NativeEngine.compound(params)
        }

        fn zip(&self, members: &[&dyn TrajectoryHandle]) -> Result<Box<dyn TrajectoryHandle>> {
            NativeEngine.zip(members)
        }

        fn concat(&self, members: &[&dyn TrajectoryHandle]) -> Result<Box<dyn TrajectoryHandle>> {
            NativeEngine.concat(members)
        }
    }

    fn step(axis: &str, stop: f64) -> ScanModel {
        AxialStepModel::new(axis, 0.0, stop, 1.0).into()
    }

    #[test]
    fn test_nested_shape() {
        let ctx = ScanContext::native();
        let generator = ctx
            .create_compound(vec![step("y", 5.0), step("x", 5.0)])
            .unwrap();
        assert_eq!(generator.shape(), vec![6, 6]);
        assert_eq!(generator.size(), 36);
        assert_eq!(generator.members().len(), 2);
    }

    #[test]
    fn test_duplicate_axis_is_validation_error() {
        let ctx = ScanContext::native();
        let result = ctx.create_compound(vec![step("x", 5.0), step("x", 3.0)]);
        assert!(matches!(result, Err(Error::Validation(ref e)) if e.fields == ["models"]));
    }

    #[test]
    fn test_duplicate_axis_from_generators() {
        let ctx = ScanContext::native();
        let a = ctx.create(AxialStepModel::new("x", 0.0, 2.0, 1.0)).unwrap();
        let b = ctx.create(AxialStepModel::new("x", 0.0, 3.0, 1.0)).unwrap();
        let result = compound_of(&ctx, vec![a, b]);
        assert!(matches!(
            result,
            Err(Error::Generator(GeneratorError::DuplicateAxis(ref axis))) if axis == "x"
        ));
    }

    #[test]
    fn test_member_failure_identified() {
        let ctx = ScanContext::native();
        let bad = AxialStepModel::new("x", 0.0, 5.0, -1.0);
        let result = ctx.create_compound(vec![step("y", 2.0), bad.into()]);
        match result {
            Err(Error::Validation(e)) => {
                assert_eq!(e.model, "CompoundModel.models[1] > AxialStepModel");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_continuous_follows_innermost() {
        let ctx = ScanContext::native();
        let inner = AxialStepModel::new("x", 0.0, 2.0, 1.0).with_continuous(true);

        let generator = ctx.create_compound(vec![step("y", 2.0), inner.clone().into()]).unwrap();
        assert!(generator.is_continuous());

        let generator = ctx.create_compound(vec![inner.into(), step("y", 2.0)]).unwrap();
        assert!(!generator.is_continuous());

        let generator = ctx
            .create_compound(vec![step("y", 2.0), StaticModel::new(3).into()])
            .unwrap();
        assert!(!generator.is_continuous());
    }

    #[test]
    fn test_duration_passes_through() {
        let ctx = ScanContext::native();
        let mut model = CompoundModel::new(vec![step("x", 2.0)]);
        assert_eq!(ctx.create(model.clone()).unwrap().duration(), -1.0);

        model.duration = 0.25;
        assert_eq!(ctx.create(model).unwrap().duration(), 0.25);
    }

    #[test]
    fn test_region_on_grid() {
        let ctx = ScanContext::native();
        let grid = TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 3.0), 20, 20);
        let region = ScanRegion::circle((1.0, 1.0), 2.0, &["x", "y"]);
        let generator = ctx.create_with_regions(grid, vec![region]).unwrap();
        assert_eq!(generator.size(), 354);
        assert!(generator.diagnostics().is_empty());
    }

    #[test]
    fn test_compound_of_keeps_models() {
        let ctx = ScanContext::native();
        let a = ctx.create(AxialStepModel::new("y", 0.0, 2.0, 1.0)).unwrap();
        let b = ctx.create(AxialStepModel::new("x", 0.0, 3.0, 1.0)).unwrap();
        let generator = compound_of(&ctx, vec![a, b]).unwrap();
        assert_eq!(generator.shape(), vec![3, 4]);
        assert!(generator.validate().is_ok());
    }

    #[test]
    fn test_empty_compound() {
        let ctx = ScanContext::native();
        assert!(matches!(ctx.create_compound(vec![]), Err(Error::Validation(_))));
        assert!(matches!(
            compound_of(&ctx, vec![]),
            Err(Error::Generator(GeneratorError::NoMembers))
        ));
    }

    #[test]
    fn test_engine_rejection_names_member() {
        let native = ScanContext::native();
        let a = native.create(AxialStepModel::new("y", 0.0, 2.0, 1.0)).unwrap();
        let b = native.create(AxialStepModel::new("x", 0.0, 2.0, 1.0)).unwrap();
        let c = native.create(AxialStepModel::new("bad", 0.0, 3.0, 1.0)).unwrap();

        let ctx = ScanContext::new(RefusingEngine);
        match compound_of(&ctx, vec![a, b, c]) {
            Err(Error::Generator(GeneratorError::Member { index, ref kind, ref source })) => {
                assert_eq!(index, 2);
                assert_eq!(kind, "axial_step");
                assert!(matches!(**source, Error::Generator(GeneratorError::Engine(_))));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
