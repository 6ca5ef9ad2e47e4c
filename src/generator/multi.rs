//! Lock-step and end-to-end composition.

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::engine::{Position, TrajectoryHandle};
use crate::error::{GeneratorError, Result};
use crate::model::{AxisModel, AxisName, ConcurrentModel, ConsecutiveModel, ScanModel};
use crate::validation::{validate_concurrent, validate_consecutive};

use super::{Generator, ScanContext};

/// Largest gap allowed between the final bound of one consecutive member
/// and the initial bound of the next.
pub const BOUND_TOLERANCE: f64 = 1e-5;

fn build_members(ctx: &ScanContext, label: &str, models: &[ScanModel]) -> Result<Vec<Generator>> {
    models
        .iter()
        .enumerate()
        .map(|(index, member)| {
            ctx.create(member.clone())
                .map_err(|e| e.in_member(label, index, member.kind().name()))
        })
        .collect()
}

fn member_models(members: &[Generator]) -> Option<Vec<ScanModel>> {
    members.iter().map(|g| g.model.clone()).collect()
}

/// Build a concurrent generator from its model.
///
/// # Errors
///
/// Returns the first member failure, a validation error, or any
/// composition error from [`concurrent`].
pub fn concurrent_from_model(ctx: &ScanContext, model: &ConcurrentModel) -> Result<Generator> {
    let members = build_members(ctx, ConcurrentModel::LABEL, &model.models)?;
    validate_concurrent(model)?;
    let generator = concurrent(ctx, members)?;
    Ok(Generator { model: Some(ScanModel::Concurrent(model.clone())), ..generator })
}

/// Visit index `i` of every member together.
///
/// # Errors
///
/// Returns [`GeneratorError::SizeMismatch`] if members differ in size and
/// [`GeneratorError::DuplicateAxis`] if two members scan the same axis.
pub fn concurrent(ctx: &ScanContext, members: Vec<Generator>) -> Result<Generator> {
    let first = members.first().ok_or(GeneratorError::NoMembers)?;
    let expected = first.size();

    let mut axes: Vec<&AxisName> = Vec::new();
    for (member, generator) in members.iter().enumerate() {
        let found = generator.size();
        if found != expected {
            return Err(GeneratorError::SizeMismatch { member, expected, found }.into());
        }
        for axis in generator.names() {
            if axes.contains(&axis) {
                return Err(GeneratorError::DuplicateAxis(axis.as_str().into()).into());
            }
            axes.push(axis);
        }
    }

    let handles: Vec<&dyn TrajectoryHandle> = members.iter().map(Generator::trajectory).collect();
    let trajectory = ctx.engine().zip(&handles)?;
    let model = member_models(&members).map(|m| ScanModel::Concurrent(ConcurrentModel::new(m)));

    Ok(Generator::new(model, trajectory).with_members(members))
}

/// Build a consecutive generator from its model.
///
/// # Errors
///
/// Returns the first member failure, a validation error, or any
/// composition error from [`consecutive`].
pub fn consecutive_from_model(ctx: &ScanContext, model: &ConsecutiveModel) -> Result<Generator> {
    let members = build_members(ctx, ConsecutiveModel::LABEL, &model.models)?;
    validate_consecutive(model)?;
    let generator = consecutive(ctx, members)?;
    Ok(Generator { model: Some(ScanModel::Consecutive(model.clone())), ..generator })
}

/// Visit every member in turn.
///
/// Members must scan the same axes, and each member must start within
/// [`BOUND_TOLERANCE`] of where the previous one finished.
///
/// # Errors
///
/// Returns [`GeneratorError::NoBound`], [`GeneratorError::AxisMismatch`] or
/// [`GeneratorError::BoundMismatch`] for the first offending member.
pub fn consecutive(ctx: &ScanContext, members: Vec<Generator>) -> Result<Generator> {
    let first = members.first().ok_or(GeneratorError::NoMembers)?;
    let axes = first.names();

    let mut previous_final: Option<Position> = None;
    for (member, generator) in members.iter().enumerate() {
        let (initial, last) = match (generator.initial_bound(), generator.final_bound()) {
            (Some(initial), Some(last)) => (initial, last),
            _ => return Err(GeneratorError::NoBound { member }.into()),
        };

        let names = generator.names();
        if names.len() != axes.len() || !names.iter().all(|a| axes.contains(a)) {
            return Err(GeneratorError::AxisMismatch { member }.into());
        }

        if let Some(previous) = &previous_final {
            check_bounds_meet(member, previous, &initial)?;
        }
        previous_final = Some(last);
    }

    let handles: Vec<&dyn TrajectoryHandle> = members.iter().map(Generator::trajectory).collect();
    let trajectory = ctx.engine().concat(&handles)?;
    let model = member_models(&members).map(|m| ScanModel::Consecutive(ConsecutiveModel::new(m)));

    Ok(Generator::new(model, trajectory).with_members(members))
}

/// Check that member `member` starts where the previous member finished.
///
/// # Errors
///
/// Returns [`GeneratorError::AxisMismatch`] if an axis of `final_bound` is
/// missing from `initial_bound`, or [`GeneratorError::BoundMismatch`] if the
/// two differ by [`BOUND_TOLERANCE`] or more on any axis.
pub fn check_bounds_meet(member: usize, final_bound: &Position, initial_bound: &Position) -> Result<()> {
    for (axis, last) in final_bound.values() {
        let first = initial_bound
            .get(axis)
            .ok_or(GeneratorError::AxisMismatch { member })?;

        let gap = libm::fabs(last - first);
        if gap.is_nan() || gap >= BOUND_TOLERANCE {
            return Err(GeneratorError::BoundMismatch {
                member,
                axis: axis.to_string(),
                final_bound: *last,
                initial_bound: first,
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{axis_name, AxialArrayModel, AxialStepModel, StaticModel};
    use alloc::vec;

    fn position(axis: &str, value: f64) -> Position {
        let mut p = Position::default();
        p.push(axis_name(axis), value);
        p
    }

    #[test]
    fn test_bounds_within_tolerance() {
        assert!(check_bounds_meet(1, &position("x", 9.05), &position("x", 9.0500001)).is_ok());
        assert!(matches!(
            check_bounds_meet(1, &position("x", 9.05), &position("x", 9.1)),
            Err(Error::Generator(GeneratorError::BoundMismatch { member: 1, .. }))
        ));
        assert!(matches!(
            check_bounds_meet(2, &position("x", 1.0), &position("y", 1.0)),
            Err(Error::Generator(GeneratorError::AxisMismatch { member: 2 }))
        ));
    }

    #[test]
    fn test_concurrent_sizes() {
        let ctx = ScanContext::native();
        let x = ctx.create(AxialStepModel::new("x", 0.0, 4.0, 1.0)).unwrap();
        let y = ctx.create(AxialStepModel::new("y", 10.0, 14.0, 1.0)).unwrap();
        let zipped = concurrent(&ctx, vec![x, y]).unwrap();
        assert_eq!(zipped.size(), 5);
        assert_eq!(zipped.members().len(), 2);
        assert!(matches!(zipped.kind(), Some(crate::model::ModelKind::Concurrent)));

        let x = ctx.create(AxialStepModel::new("x", 0.0, 4.0, 1.0)).unwrap();
        let short = ctx.create(AxialStepModel::new("y", 0.0, 3.0, 1.0)).unwrap();
        assert!(matches!(
            concurrent(&ctx, vec![x, short]),
            Err(Error::Generator(GeneratorError::SizeMismatch { member: 1, expected: 5, found: 4 }))
        ));
    }

    #[test]
    fn test_concurrent_rejects_shared_axis() {
        let ctx = ScanContext::native();
        let a = ctx.create(AxialStepModel::new("x", 0.0, 4.0, 1.0)).unwrap();
        let b = ctx.create(AxialStepModel::new("x", 5.0, 9.0, 1.0)).unwrap();
        assert!(matches!(
            concurrent(&ctx, vec![a, b]),
            Err(Error::Generator(GeneratorError::DuplicateAxis(_)))
        ));
    }

    #[test]
    fn test_consecutive_joins_at_bounds() {
        let ctx = ScanContext::native();
        let a = ctx.create(AxialStepModel::new("x", 0.0, 4.0, 1.0)).unwrap();
        let b = ctx.create(AxialStepModel::new("x", 5.0, 8.0, 1.0)).unwrap();
        let joined = consecutive(&ctx, vec![a, b]).unwrap();
        assert_eq!(joined.size(), 9);
        let xs: Vec<f64> = joined.iter().map(|p| p.position.get("x").unwrap()).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
    }

    #[test]
    fn test_consecutive_rejects_gap() {
        let ctx = ScanContext::native();
        let a = ctx.create(AxialStepModel::new("x", 0.0, 4.0, 1.0)).unwrap();
        let b = ctx.create(AxialStepModel::new("x", 6.0, 8.0, 1.0)).unwrap();
        assert!(matches!(
            consecutive(&ctx, vec![a, b]),
            Err(Error::Generator(GeneratorError::BoundMismatch { member: 1, .. }))
        ));
    }

    #[test]
    fn test_consecutive_needs_bounds_and_axes() {
        let ctx = ScanContext::native();
        let a = ctx.create(StaticModel::new(2)).unwrap();
        let b = ctx.create(StaticModel::new(2)).unwrap();
        assert!(matches!(
            consecutive(&ctx, vec![a, b]),
            Err(Error::Generator(GeneratorError::NoBound { member: 0 }))
        ));

        let x = ctx.create(AxialArrayModel::new("x", &[0.0, 1.0])).unwrap();
        let y = ctx.create(AxialArrayModel::new("y", &[1.5, 2.0])).unwrap();
        assert!(matches!(
            consecutive(&ctx, vec![x, y]),
            Err(Error::Generator(GeneratorError::AxisMismatch { member: 1 }))
        ));
    }

    #[test]
    fn test_concurrent_model_labels_members() {
        let ctx = ScanContext::native();
        let model = ConcurrentModel::new(vec![
            AxialStepModel::new("x", 0.0, 4.0, 1.0).into(),
            AxialStepModel::new("y", 0.0, 4.0, 0.0).into(),
        ]);
        match ctx.create(model) {
            Err(Error::Validation(e)) => {
                assert_eq!(e.model, "ConcurrentModel.models[1] > AxialStepModel");
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
