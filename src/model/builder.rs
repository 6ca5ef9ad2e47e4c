//! Builders for programmatic model creation.

use alloc::vec::Vec;

use super::axial::{AxialMultiStepModel, AxialStepModel};
use super::compound::{CompoundModel, VARIABLE_DURATION};
use super::mutator::Mutator;
use super::region::ScanRegion;
use super::{axis_name, default_units, AxisModel, AxisName, ScanModel, Units};
use crate::error::{GeneratorError, ModelValidationError, Result};

/// Builder for compound scan models.
#[derive(Debug, Clone)]
pub struct CompoundModelBuilder {
    models: Vec<ScanModel>,
    regions: Vec<ScanRegion>,
    mutators: Vec<Mutator>,
    duration: f64,
    continuous: bool,
}

impl Default for CompoundModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompoundModelBuilder {
    /// Create a new compound builder.
    pub fn new() -> Self {
        Self {
            models: Vec::new(),
            regions: Vec::new(),
            mutators: Vec::new(),
            duration: VARIABLE_DURATION,
            continuous: true,
        }
    }

    /// Append a member model inside the previous ones.
    pub fn model(mut self, model: impl Into<ScanModel>) -> Self {
        self.models.push(model.into());
        self
    }

    /// Add a region of interest.
    pub fn region(mut self, region: ScanRegion) -> Self {
        self.regions.push(region);
        self
    }

    /// Add a mutator.
    pub fn mutator(mut self, mutator: Mutator) -> Self {
        self.mutators.push(mutator);
        self
    }

    /// Set the per-point duration in seconds.
    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds;
        self
    }

    /// Request or refuse continuous motion.
    pub fn continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    /// Build the compound model.
    ///
    /// # Errors
    ///
    /// Returns an error if no member model was added.
    pub fn build(self) -> Result<CompoundModel> {
        if self.models.is_empty() {
            return Err(GeneratorError::NoMembers.into());
        }

        Ok(CompoundModel {
            models: self.models,
            regions: self.regions,
            mutators: self.mutators,
            duration: self.duration,
            continuous: self.continuous,
        })
    }
}

/// Builder for multi-step models on one axis.
#[derive(Debug, Clone)]
pub struct MultiStepModelBuilder {
    name: Option<AxisName>,
    units: Units,
    steps: Vec<(f64, f64, f64)>,
    alternating: bool,
    continuous: bool,
}

impl Default for MultiStepModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiStepModelBuilder {
    /// Create a new multi-step builder.
    pub fn new() -> Self {
        Self {
            name: None,
            units: default_units(),
            steps: Vec::new(),
            alternating: false,
            continuous: false,
        }
    }

    /// Set the scanned axis.
    pub fn axis(mut self, name: &str) -> Self {
        self.name = Some(axis_name(name));
        self
    }

    /// Set the axis units.
    pub fn units(mut self, units: &str) -> Self {
        self.units = super::units(units);
        self
    }

    /// Append a step region.
    pub fn step(mut self, start: f64, stop: f64, step: f64) -> Self {
        self.steps.push((start, stop, step));
        self
    }

    /// Set the alternating flag.
    pub fn alternating(mut self, alternating: bool) -> Self {
        self.alternating = alternating;
        self
    }

    /// Set the continuous flag.
    pub fn continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    /// Build the multi-step model.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is missing or no step region was added.
    pub fn build(self) -> Result<AxialMultiStepModel> {
        let name = self
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                ModelValidationError::new(
                    AxialMultiStepModel::LABEL,
                    "name",
                    "axis not specified",
                )
            })?;

        if self.steps.is_empty() {
            return Err(ModelValidationError::new(
                AxialMultiStepModel::LABEL,
                "step_models",
                "no step regions",
            )
            .into());
        }

        let step_models = self
            .steps
            .iter()
            .map(|&(start, stop, step)| AxialStepModel {
                name: name.clone(),
                units: self.units.clone(),
                start,
                stop,
                step,
                alternating: false,
                continuous: false,
            })
            .collect();

        Ok(AxialMultiStepModel {
            name,
            units: self.units,
            step_models,
            alternating: self.alternating,
            continuous: self.continuous,
        })
    }
}
