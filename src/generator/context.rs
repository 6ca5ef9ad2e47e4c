//! Scan-session composition context.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::engine::{NativeEngine, TrajectoryEngine};
use crate::error::{GeneratorError, Result};
use crate::log::debug;
use crate::model::{CompoundModel, ScanModel, ScanRegion};

use super::registry::GeneratorRegistry;
use super::Generator;

/// Engine and generator registry shared by every construction in a scan
/// session.
#[derive(Debug)]
pub struct ScanContext {
    engine: Box<dyn TrajectoryEngine>,
    registry: GeneratorRegistry,
}

impl Default for ScanContext {
    fn default() -> Self {
        Self::native()
    }
}

impl ScanContext {
    /// Context using the native engine and every built-in generator kind.
    pub fn native() -> Self {
        Self::new(NativeEngine)
    }

    /// Context using `engine` and every built-in generator kind.
    pub fn new(engine: impl TrajectoryEngine + 'static) -> Self {
        Self::with_registry(engine, GeneratorRegistry::with_defaults())
    }

    /// Context using `engine` and a custom registry.
    pub fn with_registry(engine: impl TrajectoryEngine + 'static, registry: GeneratorRegistry) -> Self {
        Self {
            engine: Box::new(engine),
            registry,
        }
    }

    /// The evaluation engine.
    pub fn engine(&self) -> &dyn TrajectoryEngine {
        self.engine.as_ref()
    }

    /// The generator registry.
    pub fn registry(&self) -> &GeneratorRegistry {
        &self.registry
    }

    /// Mutable access to the generator registry.
    pub fn registry_mut(&mut self) -> &mut GeneratorRegistry {
        &mut self.registry
    }

    /// Build the generator for a model.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the model is invalid,
    /// [`GeneratorError::UnknownKind`] if no constructor is registered for its
    /// kind, or any error raised by the engine.
    pub fn create(&self, model: impl Into<ScanModel>) -> Result<Generator> {
        let model = model.into();
        let kind = model.kind().name();
        let factory = self
            .registry
            .get(kind)
            .ok_or_else(|| GeneratorError::UnknownKind(kind.into()))?;

        let generator = factory(self, &model)?;
        debug!("built {} generator with {} points", kind, generator.size());
        Ok(generator)
    }

    /// Build a compound generator nesting `models` outer to inner.
    ///
    /// # Errors
    ///
    /// See [`ScanContext::create`].
    pub fn create_compound(&self, models: Vec<ScanModel>) -> Result<Generator> {
        self.create(CompoundModel::new(models))
    }

    /// Build a generator for `model` restricted to `regions`.
    ///
    /// # Errors
    ///
    /// See [`ScanContext::create`].
    pub fn create_with_regions(
        &self,
        model: impl Into<ScanModel>,
        regions: Vec<ScanRegion>,
    ) -> Result<Generator> {
        let mut compound = CompoundModel::new(alloc::vec![model.into()]);
        compound.regions = regions;
        self.create(compound)
    }
}
