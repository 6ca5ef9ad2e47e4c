//! Grouping of regions of interest into excluders.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::engine::Excluder;
use crate::error::{GeneratorError, Result};
use crate::log::log_warn;
use crate::model::{AxisModel, AxisName, CompoundModel, ScanRegion};

use super::ScanContext;

/// Regions sharing the axis pair of the first region in the group.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionGroup {
    /// Axes of the first region placed in the group.
    pub axes: Vec<AxisName>,
    /// Members in the order they were given.
    pub regions: Vec<ScanRegion>,
}

/// Group regions by axes.
///
/// A region joins the first existing group whose axes are all among its
/// own axes; otherwise it starts a new group keyed by its axes. Groups keep
/// first-seen order and regions keep input order within a group.
pub fn group_regions(regions: &[ScanRegion]) -> Vec<RegionGroup> {
    let mut groups: Vec<RegionGroup> = Vec::new();

    for region in regions {
        let found = groups
            .iter_mut()
            .find(|group| group.axes.iter().all(|axis| region.axes.contains(axis)));

        match found {
            Some(group) => group.regions.push(region.clone()),
            None => groups.push(RegionGroup {
                axes: region.axes.clone(),
                regions: alloc::vec![region.clone()],
            }),
        }
    }

    groups
}

/// Give every region an explicit axis pair.
///
/// Regions without axes apply to the two innermost scanned axes. Every axis
/// must be scanned.
pub(crate) fn resolve_axes(regions: &[ScanRegion], scanned: &[AxisName]) -> Result<Vec<ScanRegion>> {
    regions
        .iter()
        .enumerate()
        .map(|(index, region)| {
            let mut region = region.clone();
            if region.axes.is_empty() {
                if scanned.len() < 2 {
                    return Err(GeneratorError::RegionAxes(format!(
                        "region {} needs two scanned axes, found {}",
                        index,
                        scanned.len()
                    ))
                    .into());
                }
                region.axes = scanned[scanned.len() - 2..].to_vec();
            }
            if let Some(axis) = region.axes.iter().find(|axis| !scanned.contains(axis)) {
                return Err(GeneratorError::RegionAxes(format!(
                    "region {} uses axis '{}' which is not scanned",
                    index, axis
                ))
                .into());
            }
            Ok(region)
        })
        .collect()
}

/// Build one excluder per non-empty region group.
///
/// Shapes the engine cannot represent are dropped with a diagnostic; a group
/// left with no shapes is dropped the same way.
pub(crate) fn build_excluders(
    ctx: &ScanContext,
    regions: &[ScanRegion],
    scanned: &[AxisName],
    diagnostics: &mut Vec<String>,
) -> Result<Vec<Excluder>> {
    let resolved = resolve_axes(regions, scanned)?;
    let engine = ctx.engine();
    let mut excluders = Vec::new();

    for (index, group) in group_regions(&resolved).into_iter().enumerate() {
        let axes: [AxisName; 2] = match group.axes.as_slice() {
            [x, y] => [x.clone(), y.clone()],
            other => {
                return Err(GeneratorError::RegionAxes(format!(
                    "region group {} has {} axes, expected 2",
                    index,
                    other.len()
                ))
                .into())
            }
        };

        let mut shapes = Vec::with_capacity(group.regions.len());
        for region in group.regions {
            if engine.supports_region(&region.shape) {
                shapes.push(region.shape);
            } else {
                log_warn!("dropping unsupported {} region", region.shape.name());
                diagnostics.push(format!(
                    "{} region on ({}, {}) is not supported and was ignored",
                    region.shape.name(),
                    axes[0],
                    axes[1]
                ));
            }
        }

        if shapes.is_empty() {
            diagnostics.push(format!(
                "region group on ({}, {}) has no usable regions and was ignored",
                axes[0], axes[1]
            ));
            continue;
        }

        let excluder = engine
            .excluder(&shapes, axes)
            .map_err(|e| e.in_field(CompoundModel::LABEL, "regions", index, "region_group"))?;
        excluders.push(excluder);
    }

    Ok(excluders)
}
