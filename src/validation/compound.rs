//! Rules for multi-model kinds, regions and mutators.

use alloc::vec::Vec;

use crate::error::Result;
use crate::model::{
    AxisModel, AxisName, CompoundModel, ConcurrentModel, ConsecutiveModel, Mutator, RegionShape,
    ScanModel, ScanRegion, VARIABLE_DURATION,
};

use super::{invalid, require_finite, require_name, validate_model};

fn first_duplicate(names: &[AxisName]) -> Option<&AxisName> {
    names
        .iter()
        .enumerate()
        .find(|(i, name)| names[..*i].contains(name))
        .map(|(_, name)| name)
}

fn validate_members(label: &str, models: &[ScanModel]) -> Result<()> {
    if models.is_empty() {
        return Err(invalid(label, "models", "no member models"));
    }
    for (index, member) in models.iter().enumerate() {
        validate_model(member).map_err(|e| e.in_member(label, index, member.kind().name()))?;
    }
    Ok(())
}

/// Check a compound model's own rules without validating its members.
///
/// Used when the members have already been validated by building their
/// generators.
pub fn validate_compound_structure(model: &CompoundModel) -> Result<()> {
    let label = CompoundModel::LABEL;

    if model.models.is_empty() {
        return Err(invalid(label, "models", "no member models"));
    }

    let names = model.axis_names();
    if let Some(axis) = first_duplicate(&names) {
        return Err(invalid(
            label,
            "models",
            alloc::format!("axis '{}' is scanned by more than one model", axis),
        ));
    }

    require_finite(label, "duration", model.duration)?;
    if model.duration < 0.0 && model.duration != VARIABLE_DURATION {
        return Err(invalid(label, "duration", "duration must be non-negative or -1 (variable)"));
    }

    for region in &model.regions {
        validate_region(label, region)?;
    }

    for mutator in &model.mutators {
        validate_mutator(label, mutator, &names)?;
    }

    Ok(())
}

/// Validate a compound model and every member model.
pub fn validate_compound(model: &CompoundModel) -> Result<()> {
    validate_members(CompoundModel::LABEL, &model.models)?;
    validate_compound_structure(model)
}

/// Validate a concurrent model: valid members on disjoint axes.
pub fn validate_concurrent(model: &ConcurrentModel) -> Result<()> {
    let label = ConcurrentModel::LABEL;
    validate_members(label, &model.models)?;
    if let Some(axis) = first_duplicate(&model.axis_names()) {
        return Err(invalid(
            label,
            "models",
            alloc::format!("axis '{}' is scanned by more than one model", axis),
        ));
    }
    Ok(())
}

/// Validate a consecutive model: valid members.
///
/// Axis agreement and bound matching are checked when the generator is built.
pub fn validate_consecutive(model: &ConsecutiveModel) -> Result<()> {
    validate_members(ConsecutiveModel::LABEL, &model.models)
}

/// Validate a region of interest belonging to `label`.
pub fn validate_region(label: &str, region: &ScanRegion) -> Result<()> {
    match region.axes.as_slice() {
        [] => {}
        [a, b] => {
            require_name(label, "regions", a)?;
            require_name(label, "regions", b)?;
            if a == b {
                return Err(invalid(label, "regions", "region axes must be different"));
            }
        }
        other => {
            return Err(invalid(
                label,
                "regions",
                alloc::format!("a region constrains 0 or 2 axes, not {}", other.len()),
            ))
        }
    }

    let values: Vec<f64> = match &region.shape {
        RegionShape::Circle { centre, radius } => {
            if *radius <= 0.0 {
                return Err(invalid(label, "regions", "circle radius must be positive"));
            }
            alloc::vec![centre.0, centre.1, *radius]
        }
        RegionShape::Ellipse { centre, semi_axes, angle } => {
            if semi_axes.0 <= 0.0 || semi_axes.1 <= 0.0 {
                return Err(invalid(label, "regions", "ellipse semi-axes must be positive"));
            }
            alloc::vec![centre.0, centre.1, semi_axes.0, semi_axes.1, *angle]
        }
        RegionShape::Point { x, y } => alloc::vec![*x, *y],
        RegionShape::Polygon { points } => {
            if points.len() < 3 {
                return Err(invalid(label, "regions", "a polygon needs at least 3 vertices"));
            }
            points.iter().flat_map(|p| [p.0, p.1]).collect()
        }
        RegionShape::Rectangle { start, lengths, angle } => {
            if lengths.0 == 0.0 || lengths.1 == 0.0 {
                return Err(invalid(label, "regions", "rectangle side has zero length"));
            }
            alloc::vec![start.0, start.1, lengths.0, lengths.1, *angle]
        }
        RegionShape::Sector { centre, radii, angles } => {
            if radii.0 < 0.0 || radii.1 <= radii.0 {
                return Err(invalid(label, "regions", "sector radii must satisfy 0 <= inner < outer"));
            }
            alloc::vec![centre.0, centre.1, radii.0, radii.1, angles.0, angles.1]
        }
        RegionShape::Line { start, end } => alloc::vec![start.0, start.1, end.0, end.1],
    };

    if values.iter().any(|v| !v.is_finite()) {
        return Err(invalid(
            label,
            "regions",
            alloc::format!("{} region parameters must be finite", region.shape.name()),
        ));
    }
    Ok(())
}

/// Validate a mutator against the axes scanned by its owner.
pub fn validate_mutator(label: &str, mutator: &Mutator, axes: &[AxisName]) -> Result<()> {
    match mutator {
        Mutator::RandomOffset { max_offset, .. } => {
            for (axis, offset) in max_offset {
                if !axes.contains(axis) {
                    return Err(invalid(
                        label,
                        "mutators",
                        alloc::format!("random offset on unscanned axis '{}'", axis),
                    ));
                }
                if !offset.is_finite() || *offset < 0.0 {
                    return Err(invalid(
                        label,
                        "mutators",
                        alloc::format!("maximum offset for '{}' must be finite and non-negative", axis),
                    ));
                }
            }
        }
    }
    Ok(())
}
