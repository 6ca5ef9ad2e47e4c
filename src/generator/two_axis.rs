//! Two-axis (map) generators and the static generator.

use alloc::vec;
use alloc::vec::Vec;

use crate::engine::{LineParams, LissajousParams, SpiralParams};
use crate::error::Result;
use crate::model::{
    AxisModel, Mutator, RegionShape, ScanModel, StaticModel, TwoAxisGridPointsModel,
    TwoAxisGridPointsRandomOffsetModel, TwoAxisGridStepModel, TwoAxisLinePointsModel,
    TwoAxisLineStepModel, TwoAxisLissajousModel, TwoAxisPointSingleModel, TwoAxisSpiralModel,
};
use crate::validation::{
    validate_grid_points, validate_grid_points_random_offset, validate_grid_step,
    validate_line_points, validate_line_step, validate_lissajous, validate_point_single,
    validate_spiral, validate_static,
};

use super::template::{
    diagonal_line, grid_lines, line_points_spacing, line_step_spacing, AxisSpacing, GridTemplate,
};
use super::{wrap, Generator, ScanContext};

fn points_template(model: &TwoAxisGridPointsModel) -> GridTemplate<'_> {
    GridTemplate {
        axes: &model.axes,
        bounding_box: &model.bounding_box,
        x: AxisSpacing::Points(model.x_axis_points),
        y: AxisSpacing::Points(model.y_axis_points),
        orientation: model.orientation,
        alternating: model.alternating,
        alternate_both_axes: model.alternate_both_axes,
    }
}

/// Grid with a fixed number of points per axis.
pub(crate) fn grid_points(ctx: &ScanContext, model: &TwoAxisGridPointsModel) -> Result<Generator> {
    validate_grid_points(model)?;
    let (lines, _, _) = grid_lines(ctx, &points_template(model))?;
    wrap(ctx, ScanModel::TwoAxisGridPoints(model.clone()), &lines, Vec::new(), Vec::new())
}

/// Grid with every point jittered by a seeded random offset.
///
/// The maximum offset on both axes is `offset` percent of the smaller step.
pub(crate) fn grid_points_random_offset(
    ctx: &ScanContext,
    model: &TwoAxisGridPointsRandomOffsetModel,
) -> Result<Generator> {
    validate_grid_points_random_offset(model)?;
    let grid = &model.grid;
    let (lines, x, y) = grid_lines(ctx, &points_template(grid))?;

    let step = libm::fmin(libm::fabs(x.step), libm::fabs(y.step));
    let max_offset = model.offset / 100.0 * step;
    let mutator = ctx.engine().mutator(&Mutator::random_offset(
        model.seed,
        &[
            (grid.axes.x_axis_name.as_str(), max_offset),
            (grid.axes.y_axis_name.as_str(), max_offset),
        ],
    ))?;

    wrap(
        ctx,
        ScanModel::TwoAxisGridPointsRandomOffset(model.clone()),
        &lines,
        Vec::new(),
        vec![mutator],
    )
}

/// Grid with a fixed step per axis.
pub(crate) fn grid_step(ctx: &ScanContext, model: &TwoAxisGridStepModel) -> Result<Generator> {
    validate_grid_step(model)?;
    let template = GridTemplate {
        axes: &model.axes,
        bounding_box: &model.bounding_box,
        x: AxisSpacing::Step(model.x_axis_step),
        y: AxisSpacing::Step(model.y_axis_step),
        orientation: model.orientation,
        alternating: model.alternating,
        alternate_both_axes: model.alternate_both_axes,
    };
    let (lines, _, _) = grid_lines(ctx, &template)?;
    wrap(ctx, ScanModel::TwoAxisGridStep(model.clone()), &lines, Vec::new(), Vec::new())
}

/// Fixed number of points centred along a line.
pub(crate) fn line_points(ctx: &ScanContext, model: &TwoAxisLinePointsModel) -> Result<Generator> {
    validate_line_points(model)?;
    let spacing = line_points_spacing(model.bounding_line.length, model.points);
    let line = diagonal_line(ctx, &model.axes, &model.bounding_line, spacing, model.alternating)?;
    wrap(ctx, ScanModel::TwoAxisLinePoints(model.clone()), &[line], Vec::new(), Vec::new())
}

/// Fixed step along a line, starting at its origin.
pub(crate) fn line_step(ctx: &ScanContext, model: &TwoAxisLineStepModel) -> Result<Generator> {
    validate_line_step(model)?;
    let spacing = line_step_spacing(model.bounding_line.length, model.step);
    let line = diagonal_line(ctx, &model.axes, &model.bounding_line, spacing, model.alternating)?;
    wrap(ctx, ScanModel::TwoAxisLineStep(model.clone()), &[line], Vec::new(), Vec::new())
}

/// Fermat spiral covering the bounding box, clipped to it.
pub(crate) fn spiral(ctx: &ScanContext, model: &TwoAxisSpiralModel) -> Result<Generator> {
    validate_spiral(model)?;
    let bbox = &model.bounding_box;
    let axes = &model.axes;
    let engine = ctx.engine();

    let spiral = engine.spiral(SpiralParams {
        axes: [axes.x_axis_name.clone(), axes.y_axis_name.clone()],
        units: [axes.x_axis_units.clone(), axes.y_axis_units.clone()],
        centre: bbox.centre(),
        radius: bbox.half_diagonal(),
        scale: model.scale,
        alternate: model.alternating,
    })?;

    let clip = engine.excluder(
        &[RegionShape::Rectangle {
            start: (bbox.x_axis_start, bbox.y_axis_start),
            lengths: (bbox.x_axis_length, bbox.y_axis_length),
            angle: 0.0,
        }],
        [axes.x_axis_name.clone(), axes.y_axis_name.clone()],
    )?;

    wrap(ctx, ScanModel::TwoAxisSpiral(model.clone()), &[spiral], vec![clip], Vec::new())
}

/// Lissajous figure filling the bounding box.
pub(crate) fn lissajous(ctx: &ScanContext, model: &TwoAxisLissajousModel) -> Result<Generator> {
    validate_lissajous(model)?;
    let bbox = &model.bounding_box;
    let axes = &model.axes;

    let figure = ctx.engine().lissajous(LissajousParams {
        axes: [axes.x_axis_name.clone(), axes.y_axis_name.clone()],
        units: [axes.x_axis_units.clone(), axes.y_axis_units.clone()],
        centre: bbox.centre(),
        span: (bbox.x_axis_length, bbox.y_axis_length),
        a: model.a,
        b: model.b,
        delta: model.delta,
        size: model.points,
        alternate: model.alternating,
    })?;

    wrap(ctx, ScanModel::TwoAxisLissajous(model.clone()), &[figure], Vec::new(), Vec::new())
}

/// One point on two axes.
pub(crate) fn point_single(ctx: &ScanContext, model: &TwoAxisPointSingleModel) -> Result<Generator> {
    validate_point_single(model)?;

    let line = ctx.engine().line(LineParams {
        axes: model.axis_names(),
        units: model.axis_units(),
        start: vec![model.x, model.y],
        stop: vec![model.x, model.y],
        size: 1,
        step: None,
        alternate: false,
    })?;

    wrap(ctx, ScanModel::TwoAxisPointSingle(model.clone()), &[line], Vec::new(), Vec::new())
}

/// Repeats without motion.
pub(crate) fn static_points(ctx: &ScanContext, model: &StaticModel) -> Result<Generator> {
    validate_static(model)?;
    let repeats = ctx.engine().static_points(model.size)?;
    wrap(ctx, ScanModel::Static(model.clone()), &[repeats], Vec::new(), Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, BoundingLine, Orientation};
    use approx::assert_relative_eq;

    fn coords(generator: &Generator) -> Vec<(f64, f64)> {
        generator
            .iter()
            .map(|p| (p.position.get("x").unwrap(), p.position.get("y").unwrap()))
            .collect()
    }

    #[test]
    fn test_grid_points_horizontal() {
        let ctx = ScanContext::native();
        let model = TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 3.0), 3, 2);
        let generator = grid_points(&ctx, &model).unwrap();

        assert_eq!(generator.shape(), vec![2, 3]);
        assert_eq!(generator.names()[0].as_str(), "y");
        assert_eq!(generator.names()[1].as_str(), "x");

        let points = coords(&generator);
        assert_relative_eq!(points[0].0, 0.5);
        assert_relative_eq!(points[0].1, 0.75);
        assert_relative_eq!(points[2].0, 2.5);
        assert_relative_eq!(points[3].1, 2.25);
    }

    #[test]
    fn test_grid_points_vertical() {
        let ctx = ScanContext::native();
        let model = TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 3.0), 3, 2)
            .with_orientation(Orientation::Vertical);
        let generator = grid_points(&ctx, &model).unwrap();
        assert_eq!(generator.shape(), vec![3, 2]);
        assert_eq!(generator.names()[0].as_str(), "x");
    }

    #[test]
    fn test_single_column_is_centred() {
        let ctx = ScanContext::native();
        let model = TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 3.0), 1, 3);
        let generator = grid_points(&ctx, &model).unwrap();
        assert!(coords(&generator).iter().all(|(x, _)| (*x - 1.5).abs() < 1e-12));
    }

    #[test]
    fn test_snake_grid() {
        let ctx = ScanContext::native();
        let model = TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 2.0), 3, 2)
            .with_alternating(true);
        let xs: Vec<f64> = coords(&grid_points(&ctx, &model).unwrap()).iter().map(|p| p.0).collect();
        assert_eq!(xs, vec![0.5, 1.5, 2.5, 2.5, 1.5, 0.5]);
    }

    #[test]
    fn test_random_offset_is_bounded_and_seeded() {
        let ctx = ScanContext::native();
        let grid = TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 4.0, 4.0), 4, 4);
        let plain = coords(&grid_points(&ctx, &grid).unwrap());

        let model = TwoAxisGridPointsRandomOffsetModel { grid, offset: 10.0, seed: 3 };
        let first = coords(&grid_points_random_offset(&ctx, &model).unwrap());
        let second = coords(&grid_points_random_offset(&ctx, &model).unwrap());
        assert_eq!(first, second);

        for (jittered, regular) in first.iter().zip(&plain) {
            assert!((jittered.0 - regular.0).abs() <= 0.1 + 1e-12);
            assert!((jittered.1 - regular.1).abs() <= 0.1 + 1e-12);
        }
        assert_ne!(first, plain);
    }

    #[test]
    fn test_grid_step() {
        let ctx = ScanContext::native();
        let model = TwoAxisGridStepModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 2.0), 1.0, 1.0);
        let generator = grid_step(&ctx, &model).unwrap();
        assert_eq!(generator.shape(), vec![2, 3]);
        assert_relative_eq!(coords(&generator)[0].0, 0.5);
    }

    #[test]
    fn test_line_points_diagonal() {
        let ctx = ScanContext::native();
        let line = BoundingLine::new(0.0, 0.0, 2.0, core::f64::consts::FRAC_PI_4);
        let generator = line_points(&ctx, &TwoAxisLinePointsModel::new("x", "y", line, 2)).unwrap();
        let points = coords(&generator);
        assert_eq!(generator.rank(), 1);
        let d = core::f64::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(points[0].0, 0.5 * d, epsilon = 1e-12);
        assert_relative_eq!(points[1].1, 1.5 * d, epsilon = 1e-12);
    }

    #[test]
    fn test_line_step_starts_at_origin() {
        let ctx = ScanContext::native();
        let line = BoundingLine::new(1.0, 2.0, 3.0, 0.0);
        let generator = line_step(&ctx, &TwoAxisLineStepModel::new("x", "y", line, 1.0)).unwrap();
        let points = coords(&generator);
        assert_eq!(points.len(), 4);
        assert_relative_eq!(points[0].0, 1.0);
        assert_relative_eq!(points[3].0, 4.0);
        assert_relative_eq!(points[3].1, 2.0);
    }

    #[test]
    fn test_spiral_is_clipped_to_box() {
        let ctx = ScanContext::native();
        let model = TwoAxisSpiralModel::new("x", "y", BoundingBox::new(0.0, 0.0, 2.0, 2.0), 0.5);
        let generator = spiral(&ctx, &model).unwrap();
        assert_eq!(generator.size(), 17);
        for (x, y) in coords(&generator) {
            assert!((0.0..=2.0).contains(&x) && (0.0..=2.0).contains(&y));
        }
    }

    #[test]
    fn test_lissajous_stays_in_box() {
        let ctx = ScanContext::native();
        let model = TwoAxisLissajousModel::new("x", "y", BoundingBox::new(-1.0, -1.0, 2.0, 2.0), 3.0, 2.0, 50);
        let generator = lissajous(&ctx, &model).unwrap();
        assert_eq!(generator.size(), 50);
        for (x, y) in coords(&generator) {
            assert!(x.abs() <= 1.0 + 1e-12 && y.abs() <= 1.0 + 1e-12);
        }
    }

    #[test]
    fn test_point_single() {
        let ctx = ScanContext::native();
        let generator = point_single(&ctx, &TwoAxisPointSingleModel::new("x", "y", 3.0, 4.0)).unwrap();
        assert_eq!(coords(&generator), vec![(3.0, 4.0)]);
    }

    #[test]
    fn test_static() {
        let ctx = ScanContext::native();
        let single = static_points(&ctx, &StaticModel::default()).unwrap();
        assert_eq!(single.size(), 1);
        assert_eq!(single.rank(), 0);
        assert!(single.names().is_empty());

        let repeated = static_points(&ctx, &StaticModel::new(5)).unwrap();
        assert_eq!(repeated.shape(), vec![5]);
        assert!(repeated.initial_bound().is_none());
    }

    #[test]
    fn test_single_column_bounds_span_box() {
        let ctx = ScanContext::native();
        let model = TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 3.0), 1, 3);
        let generator = grid_points(&ctx, &model).unwrap();
        assert_relative_eq!(generator.initial_bound().unwrap().get("x").unwrap(), 0.0);
        assert_relative_eq!(generator.final_bound().unwrap().get("x").unwrap(), 3.0);
    }
}
