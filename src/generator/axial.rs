//! Single-axis generators.

use alloc::vec;
use alloc::vec::Vec;

use crate::engine::{ArrayParams, LineParams};
use crate::error::Result;
use crate::log::trace;
use crate::model::{
    AxialArrayModel, AxialCollatedStepModel, AxialMultiStepModel, AxialPointsModel,
    AxialStepModel, AxisModel, ScanModel,
};
use crate::validation::{
    invalid, validate_array, validate_collated_step, validate_multi_step, validate_points,
    validate_step,
};

use super::{wrap, Generator, ScanContext};

fn lattice_size(label: &str, size: Option<usize>) -> Result<usize> {
    size.ok_or_else(|| invalid(label, "step", "step does not reach stop"))
}

/// Line from `start` in `step` increments up to `stop`.
pub(crate) fn step(ctx: &ScanContext, model: &AxialStepModel) -> Result<Generator> {
    validate_step(model)?;
    let size = lattice_size(AxialStepModel::LABEL, model.size())?;

    let line = ctx.engine().line(LineParams {
        axes: model.axis_names(),
        units: model.axis_units(),
        start: vec![model.start],
        stop: vec![model.start + (size - 1) as f64 * model.step],
        size,
        step: Some(vec![model.step]),
        alternate: model.alternating,
    })?;

    wrap(ctx, ScanModel::AxialStep(model.clone()), &[line], Vec::new(), Vec::new())
}

/// Line with a fixed number of points between `start` and `stop`.
pub(crate) fn points(ctx: &ScanContext, model: &AxialPointsModel) -> Result<Generator> {
    validate_points(model)?;

    let line = ctx.engine().line(LineParams {
        axes: model.axis_names(),
        units: model.axis_units(),
        start: vec![model.start],
        stop: vec![model.stop],
        size: model.points,
        step: None,
        alternate: model.alternating,
    })?;

    wrap(ctx, ScanModel::AxialPoints(model.clone()), &[line], Vec::new(), Vec::new())
}

/// Explicit positions.
pub(crate) fn array(ctx: &ScanContext, model: &AxialArrayModel) -> Result<Generator> {
    validate_array(model)?;

    let array = ctx.engine().array(ArrayParams {
        axis: model.name.clone(),
        units: model.units.clone(),
        positions: model.positions.clone(),
        alternate: model.alternating,
    })?;

    wrap(ctx, ScanModel::AxialArray(model.clone()), &[array], Vec::new(), Vec::new())
}

/// One line driving every listed axis to the same positions.
pub(crate) fn collated_step(ctx: &ScanContext, model: &AxialCollatedStepModel) -> Result<Generator> {
    validate_collated_step(model)?;
    let size = lattice_size(AxialCollatedStepModel::LABEL, model.size())?;
    let axes = model.axis_names();
    let stop = model.start + (size - 1) as f64 * model.step;

    let line = ctx.engine().line(LineParams {
        start: vec![model.start; axes.len()],
        stop: vec![stop; axes.len()],
        units: model.axis_units(),
        step: Some(vec![model.step; axes.len()]),
        axes,
        size,
        alternate: model.alternating,
    })?;

    wrap(ctx, ScanModel::AxialCollatedStep(model.clone()), &[line], Vec::new(), Vec::new())
}

/// Step regions stitched into one array of positions.
pub(crate) fn multi_step(ctx: &ScanContext, model: &AxialMultiStepModel) -> Result<Generator> {
    validate_multi_step(model)?;

    let array = ctx.engine().array(ArrayParams {
        axis: model.name.clone(),
        units: model.units.clone(),
        positions: stitch_positions(model),
        alternate: model.alternating,
    })?;

    wrap(ctx, ScanModel::AxialMultiStep(model.clone()), &[array], Vec::new(), Vec::new())
}

/// Positions of every step region in order.
///
/// The first point of a region is dropped when the previous region ended on
/// its own stop (within a hundredth of its step) and this region starts at
/// that stop (within a hundredth of this step).
pub fn stitch_positions(model: &AxialMultiStepModel) -> Vec<f64> {
    let mut positions = Vec::new();
    // Previous region and whether its last point landed on its stop.
    let mut previous: Option<(&AxialStepModel, bool)> = None;

    for region in &model.step_models {
        let size = region.size().unwrap_or(0);
        if size == 0 {
            continue;
        }
        let tolerance = libm::fabs(region.step / 100.0);

        let first = match previous {
            Some((prev, true)) if libm::fabs(region.start - prev.stop) < tolerance => 1,
            _ => 0,
        };
        if first == 1 {
            trace!("eliding duplicate point at region boundary {}", region.start);
        }

        positions.extend((first..size).map(|k| region.start + k as f64 * region.step));

        let last = region.start + (size - 1) as f64 * region.step;
        previous = Some((region, libm::fabs(last - region.stop) < tolerance));
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;

    fn xs(generator: &Generator) -> Vec<f64> {
        generator.iter().map(|p| p.position.get("x").unwrap()).collect()
    }

    #[test]
    fn test_step_count() {
        let ctx = ScanContext::native();
        let generator = step(&ctx, &AxialStepModel::new("x", 0.0, 10.0, 3.0)).unwrap();
        assert_eq!(generator.size(), 4);
        assert_eq!(xs(&generator), vec![0.0, 3.0, 6.0, 9.0]);
        assert_eq!(generator.shape(), vec![4]);
        assert_eq!(generator.names()[0].as_str(), "x");
        assert_eq!(generator.units()[0].as_str(), "mm");
    }

    #[test]
    fn test_step_tolerates_rounding() {
        let ctx = ScanContext::native();
        let generator = step(&ctx, &AxialStepModel::new("x", 1.0, 4.0, 0.6)).unwrap();
        assert_eq!(generator.size(), 6);
    }

    #[test]
    fn test_single_point_step() {
        let ctx = ScanContext::native();
        let generator = step(&ctx, &AxialStepModel::new("x", 2.0, 2.0, 1.0)).unwrap();
        assert_eq!(generator.size(), 1);
        assert_eq!(xs(&generator), vec![2.0]);
    }

    #[test]
    fn test_wrong_direction_rejected() {
        let ctx = ScanContext::native();
        let result = step(&ctx, &AxialStepModel::new("x", 0.0, 10.0, -1.0));
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_points() {
        let ctx = ScanContext::native();
        let generator = points(&ctx, &AxialPointsModel::new("x", 0.0, 4.0, 5)).unwrap();
        assert_eq!(xs(&generator), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_array_keeps_order() {
        let ctx = ScanContext::native();
        let generator = array(&ctx, &AxialArrayModel::new("x", &[3.0, 1.0, 2.0])).unwrap();
        assert_eq!(xs(&generator), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_collated_moves_axes_together() {
        let ctx = ScanContext::native();
        let model = AxialCollatedStepModel::new(&["a", "b"], 0.0, 2.0, 1.0);
        let generator = collated_step(&ctx, &model).unwrap();
        assert_eq!(generator.size(), 3);
        assert_eq!(generator.rank(), 1);
        for point in generator.iter() {
            assert_eq!(point.position.get("a"), point.position.get("b"));
        }
    }

    #[test]
    fn test_multi_step_elides_shared_boundary() {
        let model = AxialMultiStepModel::new("x")
            .with_step(0.0, 9.0, 3.0)
            .with_step(9.0, 15.0, 3.0);
        assert_eq!(stitch_positions(&model), vec![0.0, 3.0, 6.0, 9.0, 12.0, 15.0]);
    }

    #[test]
    fn test_multi_step_keeps_point_when_previous_stops_short() {
        // 0..10 step 3 ends on 9, short of its stop, so 9 appears twice.
        let model = AxialMultiStepModel::new("x")
            .with_step(0.0, 10.0, 3.0)
            .with_step(9.0, 15.0, 3.0);
        assert_eq!(stitch_positions(&model), vec![0.0, 3.0, 6.0, 9.0, 9.0, 12.0, 15.0]);
    }

    #[test]
    fn test_multi_step_changes_step() {
        let model = AxialMultiStepModel::new("x")
            .with_step(0.0, 1.0, 0.5)
            .with_step(1.0, 3.0, 1.0);
        let positions = stitch_positions(&model);
        assert_eq!(positions.len(), 5);
        assert_relative_eq!(positions[4], 3.0);

        let ctx = ScanContext::native();
        let generator = multi_step(&ctx, &model).unwrap();
        assert_eq!(generator.size(), 5);
    }

    #[test]
    fn test_single_point_step_has_half_step_bounds() {
        let ctx = ScanContext::native();
        let generator = step(&ctx, &AxialStepModel::new("x", 2.0, 2.0, 1.0)).unwrap();
        assert_eq!(xs(&generator), vec![2.0]);
        assert_eq!(generator.initial_bound().unwrap().get("x"), Some(1.5));
        assert_eq!(generator.final_bound().unwrap().get("x"), Some(2.5));
    }
}
