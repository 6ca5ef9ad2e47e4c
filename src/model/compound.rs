//! Multi-model aggregates.

use alloc::vec::Vec;

use serde::Deserialize;

use super::mutator::Mutator;
use super::region::ScanRegion;
use super::{AxisModel, AxisName, ScanModel, Units};

/// Duration value meaning "variable or unspecified".
pub const VARIABLE_DURATION: f64 = -1.0;

fn default_duration() -> f64 {
    VARIABLE_DURATION
}

fn default_true() -> bool {
    true
}

/// Nested composition: members ordered outer (slowest) to inner (fastest).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CompoundModel {
    /// Member models, outer to inner.
    pub models: Vec<ScanModel>,

    /// Regions of interest excluding points.
    #[serde(default)]
    pub regions: Vec<ScanRegion>,

    /// Mutators applied after exclusion.
    #[serde(default)]
    pub mutators: Vec<Mutator>,

    /// Per-point duration in seconds, or [`VARIABLE_DURATION`].
    #[serde(default = "default_duration")]
    pub duration: f64,

    /// Request continuous motion (honoured only if the innermost model allows it).
    #[serde(default = "default_true")]
    pub continuous: bool,
}

impl CompoundModel {
    /// Create a compound of the given members with no regions or mutators.
    pub fn new(models: Vec<ScanModel>) -> Self {
        Self {
            models,
            regions: Vec::new(),
            mutators: Vec::new(),
            duration: VARIABLE_DURATION,
            continuous: true,
        }
    }

    /// Innermost (fastest) member, if any.
    pub fn innermost(&self) -> Option<&ScanModel> {
        self.models.last()
    }
}

impl AxisModel for CompoundModel {
    const LABEL: &'static str = "CompoundModel";

    fn axis_names(&self) -> Vec<AxisName> {
        self.models.iter().flat_map(|m| m.axis_names()).collect()
    }

    fn axis_units(&self) -> Vec<Units> {
        self.models.iter().flat_map(|m| m.axis_units()).collect()
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }

    fn supports_alternating(&self) -> bool {
        false
    }
}

/// Lock-step composition: index `i` of every member is visited together.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConcurrentModel {
    /// Member models, all of equal size.
    pub models: Vec<ScanModel>,
}

impl ConcurrentModel {
    /// Create a concurrent composition.
    pub fn new(models: Vec<ScanModel>) -> Self {
        Self { models }
    }
}

impl AxisModel for ConcurrentModel {
    const LABEL: &'static str = "ConcurrentModel";

    fn axis_names(&self) -> Vec<AxisName> {
        self.models.iter().flat_map(|m| m.axis_names()).collect()
    }

    fn axis_units(&self) -> Vec<Units> {
        self.models.iter().flat_map(|m| m.axis_units()).collect()
    }

    fn supports_alternating(&self) -> bool {
        false
    }
}

/// End-to-end composition over the same axes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConsecutiveModel {
    /// Member models, visited in order.
    pub models: Vec<ScanModel>,
}

impl ConsecutiveModel {
    /// Create a consecutive composition.
    pub fn new(models: Vec<ScanModel>) -> Self {
        Self { models }
    }
}

impl AxisModel for ConsecutiveModel {
    const LABEL: &'static str = "ConsecutiveModel";

    fn axis_names(&self) -> Vec<AxisName> {
        self.models.first().map(|m| m.axis_names()).unwrap_or_default()
    }

    fn axis_units(&self) -> Vec<Units> {
        self.models.first().map(|m| m.axis_units()).unwrap_or_default()
    }

    fn supports_alternating(&self) -> bool {
        false
    }
}
