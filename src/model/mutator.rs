//! Point mutators.

use alloc::collections::BTreeMap;

use serde::Deserialize;

use super::{axis_name, AxisName};

/// Transform applied to each point after exclusion.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutator {
    /// Add a bounded pseudo-random offset per axis.
    RandomOffset {
        /// Seed of the offset sequence.
        seed: u32,
        /// Maximum absolute offset per axis.
        max_offset: BTreeMap<AxisName, f64>,
    },
}

impl Mutator {
    /// Random offset mutator from `(axis, max offset)` pairs.
    pub fn random_offset(seed: u32, max_offset: &[(&str, f64)]) -> Self {
        Mutator::RandomOffset {
            seed,
            max_offset: max_offset
                .iter()
                .map(|(axis, offset)| (axis_name(axis), *offset))
                .collect(),
        }
    }

    /// Short name of the mutator kind.
    pub fn name(&self) -> &'static str {
        match self {
            Mutator::RandomOffset { .. } => "random_offset",
        }
    }
}
