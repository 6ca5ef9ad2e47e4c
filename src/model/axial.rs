//! Single-axis models.

use alloc::vec::Vec;

use serde::Deserialize;

use super::{axis_name, default_units, lattice_count, AxisModel, AxisName, Units};

/// One axis scanned from `start` to `stop` in fixed steps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxialStepModel {
    /// Scanned axis.
    pub name: AxisName,

    /// Axis units.
    #[serde(default = "default_units")]
    pub units: Units,

    /// First position.
    pub start: f64,

    /// Declared last position.
    pub stop: f64,

    /// Signed increment between positions.
    pub step: f64,

    /// Reverse direction on each repeat.
    #[serde(default)]
    pub alternating: bool,

    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

impl AxialStepModel {
    /// Create a step model with default units.
    pub fn new(name: &str, start: f64, stop: f64, step: f64) -> Self {
        Self {
            name: axis_name(name),
            units: default_units(),
            start,
            stop,
            step,
            alternating: false,
            continuous: false,
        }
    }

    /// Set the axis units.
    pub fn with_units(mut self, units: &str) -> Self {
        self.units = super::units(units);
        self
    }

    /// Set the alternating flag.
    pub fn with_alternating(mut self, alternating: bool) -> Self {
        self.alternating = alternating;
        self
    }

    /// Set the continuous flag.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    /// Number of lattice points, or `None` if the step cannot reach `stop`.
    pub fn size(&self) -> Option<usize> {
        lattice_count(self.start, self.stop, self.step)
    }

    /// Sign of travel: `1.0`, `-1.0`, or `0.0` for a single-point model.
    pub fn direction(&self) -> f64 {
        let delta = self.stop - self.start;
        if delta > 0.0 {
            1.0
        } else if delta < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

impl AxisModel for AxialStepModel {
    const LABEL: &'static str = "AxialStepModel";

    fn axis_names(&self) -> Vec<AxisName> {
        alloc::vec![self.name.clone()]
    }

    fn axis_units(&self) -> Vec<Units> {
        alloc::vec![self.units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// One axis scanned with a fixed number of evenly spaced points.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxialPointsModel {
    /// Scanned axis.
    pub name: AxisName,

    /// Axis units.
    #[serde(default = "default_units")]
    pub units: Units,

    /// First position.
    pub start: f64,

    /// Last position.
    pub stop: f64,

    /// Number of points (at least one).
    pub points: usize,

    /// Reverse direction on each repeat.
    #[serde(default)]
    pub alternating: bool,

    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

impl AxialPointsModel {
    /// Create a points model with default units.
    pub fn new(name: &str, start: f64, stop: f64, points: usize) -> Self {
        Self {
            name: axis_name(name),
            units: default_units(),
            start,
            stop,
            points,
            alternating: false,
            continuous: false,
        }
    }

    /// Set the alternating flag.
    pub fn with_alternating(mut self, alternating: bool) -> Self {
        self.alternating = alternating;
        self
    }

    /// Set the continuous flag.
    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }
}

impl AxisModel for AxialPointsModel {
    const LABEL: &'static str = "AxialPointsModel";

    fn axis_names(&self) -> Vec<AxisName> {
        alloc::vec![self.name.clone()]
    }

    fn axis_units(&self) -> Vec<Units> {
        alloc::vec![self.units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// One axis visiting an explicit list of positions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxialArrayModel {
    /// Scanned axis.
    pub name: AxisName,

    /// Axis units.
    #[serde(default = "default_units")]
    pub units: Units,

    /// Positions in visiting order.
    pub positions: Vec<f64>,

    /// Reverse direction on each repeat.
    #[serde(default)]
    pub alternating: bool,

    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

impl AxialArrayModel {
    /// Create an array model with default units.
    pub fn new(name: &str, positions: &[f64]) -> Self {
        Self {
            name: axis_name(name),
            units: default_units(),
            positions: positions.to_vec(),
            alternating: false,
            continuous: false,
        }
    }

    /// Set the alternating flag.
    pub fn with_alternating(mut self, alternating: bool) -> Self {
        self.alternating = alternating;
        self
    }
}

impl AxisModel for AxialArrayModel {
    const LABEL: &'static str = "AxialArrayModel";

    fn axis_names(&self) -> Vec<AxisName> {
        alloc::vec![self.name.clone()]
    }

    fn axis_units(&self) -> Vec<Units> {
        alloc::vec![self.units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// Several axes moved together through the same start/stop/step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxialCollatedStepModel {
    /// Scanned axes, all driven to the same position.
    pub names: Vec<AxisName>,

    /// Units per axis. Empty means every axis uses the default units.
    #[serde(default)]
    pub units: Vec<Units>,

    /// First position.
    pub start: f64,

    /// Declared last position.
    pub stop: f64,

    /// Signed increment between positions.
    pub step: f64,

    /// Reverse direction on each repeat.
    #[serde(default)]
    pub alternating: bool,

    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

impl AxialCollatedStepModel {
    /// Create a collated step model with default units.
    pub fn new(names: &[&str], start: f64, stop: f64, step: f64) -> Self {
        Self {
            names: names.iter().map(|n| axis_name(n)).collect(),
            units: Vec::new(),
            start,
            stop,
            step,
            alternating: false,
            continuous: false,
        }
    }

    /// Number of lattice points, or `None` if the step cannot reach `stop`.
    pub fn size(&self) -> Option<usize> {
        lattice_count(self.start, self.stop, self.step)
    }
}

impl AxisModel for AxialCollatedStepModel {
    const LABEL: &'static str = "AxialCollatedStepModel";

    fn axis_names(&self) -> Vec<AxisName> {
        self.names.clone()
    }

    fn axis_units(&self) -> Vec<Units> {
        if self.units.is_empty() {
            self.names.iter().map(|_| default_units()).collect()
        } else {
            self.units.clone()
        }
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}

/// One axis scanned through several step regions in sequence.
///
/// Adjacent regions that share a boundary position visit it once.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AxialMultiStepModel {
    /// Scanned axis; every step model must use the same name.
    pub name: AxisName,

    /// Axis units.
    #[serde(default = "default_units")]
    pub units: Units,

    /// Step regions in visiting order.
    pub step_models: Vec<AxialStepModel>,

    /// Reverse direction on each repeat.
    #[serde(default)]
    pub alternating: bool,

    /// Request continuous motion.
    #[serde(default)]
    pub continuous: bool,
}

impl AxialMultiStepModel {
    /// Create an empty multi-step model.
    pub fn new(name: &str) -> Self {
        Self {
            name: axis_name(name),
            units: default_units(),
            step_models: Vec::new(),
            alternating: false,
            continuous: false,
        }
    }

    /// Append a step region on this model's axis.
    pub fn with_step(mut self, start: f64, stop: f64, step: f64) -> Self {
        let model = AxialStepModel {
            name: self.name.clone(),
            units: self.units.clone(),
            ..AxialStepModel::new("", start, stop, step)
        };
        self.step_models.push(model);
        self
    }
}

impl AxisModel for AxialMultiStepModel {
    const LABEL: &'static str = "AxialMultiStepModel";

    fn axis_names(&self) -> Vec<AxisName> {
        alloc::vec![self.name.clone()]
    }

    fn axis_units(&self) -> Vec<Units> {
        alloc::vec![self.units.clone()]
    }

    fn is_alternating(&self) -> bool {
        self.alternating
    }

    fn is_continuous(&self) -> bool {
        self.continuous
    }
}
