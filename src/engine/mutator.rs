//! Point mutators evaluated by the native engine.

use alloc::vec::Vec;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::AxisName;

use super::dict::{DictBuilder, DictValue};
use super::Position;

/// Mutator ready to be applied to generated points.
#[derive(Debug, Clone, PartialEq)]
pub enum PointMutator {
    /// Adds an offset drawn uniformly from `[-max, max]` to each listed axis.
    RandomOffset {
        /// Sequence seed.
        seed: u32,
        /// Maximum absolute offset per axis, non-negative and finite.
        max_offset: Vec<(AxisName, f64)>,
    },
}

impl PointMutator {
    /// Apply the mutator to the position of point `index`.
    ///
    /// Offsets depend only on the seed, the point index and the axis order,
    /// so evaluating a point twice gives the same position.
    pub fn apply(&self, index: usize, position: &mut Position) {
        match self {
            PointMutator::RandomOffset { seed, max_offset } => {
                let mut rng = point_rng(*seed, index);
                for (axis, max) in max_offset {
                    let max = libm::fabs(*max);
                    position.offset(axis, rng.gen_range(-max..=max));
                }
            }
        }
    }

    pub(crate) fn to_dict(&self) -> DictValue {
        match self {
            PointMutator::RandomOffset { seed, max_offset } => {
                let axes: Vec<AxisName> = max_offset.iter().map(|(a, _)| a.clone()).collect();
                let offsets: Vec<f64> = max_offset.iter().map(|(_, o)| *o).collect();
                DictBuilder::new("scanpointgenerator:mutator/RandomOffsetMutator:1.0")
                    .entry("seed", *seed)
                    .entry("axes", &axes[..])
                    .entry("max_offset", offsets)
                    .build()
            }
        }
    }
}

/// Generator for one point: the seed fills the high word, the index the low.
fn point_rng(seed: u32, index: usize) -> StdRng {
    StdRng::seed_from_u64((u64::from(seed) << 32) ^ index as u64)
}
