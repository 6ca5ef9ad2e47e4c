//! Generator registry for model-kind lookup.

use core::fmt;

use heapless::{FnvIndexMap, String};

use crate::error::{ConfigError, GeneratorError, Result};
use crate::model::{ModelKind, ScanModel};

use super::{axial, compound, multi, two_axis, Generator, ScanContext};

/// Constructor turning a model into a generator.
pub type GeneratorFactory = fn(&ScanContext, &ScanModel) -> Result<Generator>;

/// Maximum number of generator kinds in the registry.
pub const MAX_GENERATOR_KINDS: usize = 32;

/// Longest kind name the registry accepts.
pub const MAX_KIND_NAME_LEN: usize = 48;

type KindName = String<MAX_KIND_NAME_LEN>;

/// Registry mapping model-kind names to generator constructors.
pub struct GeneratorRegistry {
    factories: FnvIndexMap<KindName, GeneratorFactory, MAX_GENERATOR_KINDS>,
}

impl fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl Clone for GeneratorRegistry {
    fn clone(&self) -> Self {
        Self {
            factories: self.factories.clone(),
        }
    }
}

impl Default for GeneratorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn mismatch(model: &ScanModel) -> crate::error::Error {
    GeneratorError::UnknownKind(alloc::format!(
        "{} passed to a constructor for another kind",
        model.kind().name()
    ))
    .into()
}

macro_rules! factory {
    ($name:ident, $variant:ident, $build:path) => {
        fn $name(ctx: &ScanContext, model: &ScanModel) -> Result<Generator> {
            match model {
                ScanModel::$variant(m) => $build(ctx, m),
                other => Err(mismatch(other)),
            }
        }
    };
}

factory!(create_step, AxialStep, axial::step);
factory!(create_points, AxialPoints, axial::points);
factory!(create_array, AxialArray, axial::array);
factory!(create_collated_step, AxialCollatedStep, axial::collated_step);
factory!(create_multi_step, AxialMultiStep, axial::multi_step);
factory!(create_grid_points, TwoAxisGridPoints, two_axis::grid_points);
factory!(create_grid_points_random_offset, TwoAxisGridPointsRandomOffset, two_axis::grid_points_random_offset);
factory!(create_grid_step, TwoAxisGridStep, two_axis::grid_step);
factory!(create_line_points, TwoAxisLinePoints, two_axis::line_points);
factory!(create_line_step, TwoAxisLineStep, two_axis::line_step);
factory!(create_spiral, TwoAxisSpiral, two_axis::spiral);
factory!(create_lissajous, TwoAxisLissajous, two_axis::lissajous);
factory!(create_point_single, TwoAxisPointSingle, two_axis::point_single);
factory!(create_static, Static, two_axis::static_points);
factory!(create_compound, Compound, compound::compound_from_model);
factory!(create_concurrent, Concurrent, multi::concurrent_from_model);
factory!(create_consecutive, Consecutive, multi::consecutive_from_model);

fn default_factory(kind: ModelKind) -> GeneratorFactory {
    match kind {
        ModelKind::AxialStep => create_step,
        ModelKind::AxialPoints => create_points,
        ModelKind::AxialArray => create_array,
        ModelKind::AxialCollatedStep => create_collated_step,
        ModelKind::AxialMultiStep => create_multi_step,
        ModelKind::TwoAxisGridPoints => create_grid_points,
        ModelKind::TwoAxisGridPointsRandomOffset => create_grid_points_random_offset,
        ModelKind::TwoAxisGridStep => create_grid_step,
        ModelKind::TwoAxisLinePoints => create_line_points,
        ModelKind::TwoAxisLineStep => create_line_step,
        ModelKind::TwoAxisSpiral => create_spiral,
        ModelKind::TwoAxisLissajous => create_lissajous,
        ModelKind::TwoAxisPointSingle => create_point_single,
        ModelKind::Static => create_static,
        ModelKind::Compound => create_compound,
        ModelKind::Concurrent => create_concurrent,
        ModelKind::Consecutive => create_consecutive,
    }
}

impl GeneratorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: FnvIndexMap::new(),
        }
    }

    /// Registry with a constructor for every built-in model kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for kind in ModelKind::ALL {
            let registered = registry.register(kind.name(), default_factory(kind));
            debug_assert!(registered.is_ok(), "built-in kind {} not registered", kind.name());
        }
        registry
    }

    /// Register (or replace) the constructor for a kind name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is too long or the registry is full.
    pub fn register(&mut self, kind: &str, factory: GeneratorFactory) -> Result<()> {
        let key = KindName::try_from(kind)
            .map_err(|_| ConfigError::RegistryFull(kind.into()))?;

        self.factories
            .insert(key, factory)
            .map_err(|_| ConfigError::RegistryFull(kind.into()))?;

        Ok(())
    }

    /// Get the constructor for a kind name.
    pub fn get(&self, kind: &str) -> Option<GeneratorFactory> {
        let key = KindName::try_from(kind).ok()?;
        self.factories.get(&key).copied()
    }

    /// Check if a kind has a constructor.
    pub fn contains(&self, kind: &str) -> bool {
        if let Ok(key) = KindName::try_from(kind) {
            self.factories.contains_key(&key)
        } else {
            false
        }
    }

    /// Remove the constructor for a kind name.
    pub fn remove(&mut self, kind: &str) -> Option<GeneratorFactory> {
        let key = KindName::try_from(kind).ok()?;
        self.factories.remove(&key)
    }

    /// Get the number of registered kinds.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Get an iterator over registered kind names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StaticModel;

    fn always_static(ctx: &ScanContext, _model: &ScanModel) -> Result<Generator> {
        ctx.create(StaticModel::new(7))
    }

    #[test]
    fn test_defaults() {
        let registry = GeneratorRegistry::with_defaults();
        assert_eq!(registry.len(), ModelKind::ALL.len());
        assert!(registry.contains("two_axis_grid_points"));
        assert!(!registry.contains("nonexistent"));
    }

    #[test]
    fn test_defaults_fit_every_kind_name() {
        let registry = GeneratorRegistry::with_defaults();
        for kind in ModelKind::ALL {
            assert!(kind.name().len() <= MAX_KIND_NAME_LEN);
            assert!(registry.contains(kind.name()), "{} missing", kind.name());
        }
        assert!(registry.contains("two_axis_grid_points_random_offset"));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = GeneratorRegistry::with_defaults();
        registry.register("axial_step", always_static).unwrap();
        assert_eq!(registry.len(), ModelKind::ALL.len());

        let ctx = ScanContext::with_registry(crate::engine::NativeEngine, registry);
        let generator = ctx
            .create(crate::model::AxialStepModel::new("x", 0.0, 1.0, 0.5))
            .unwrap();
        assert_eq!(generator.size(), 7);
    }

    #[test]
    fn test_name_too_long() {
        let mut registry = GeneratorRegistry::new();
        let result = registry.register("a_generator_kind_name_that_is_far_far_far_too_long_to_fit", always_static);
        assert!(result.is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_remove() {
        let mut registry = GeneratorRegistry::with_defaults();
        assert!(registry.remove("static").is_some());
        assert!(!registry.contains("static"));
        assert!(registry.remove("static").is_none());
    }
}
