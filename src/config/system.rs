//! Scan configuration - root configuration structure.

use heapless::{FnvIndexMap, String};
use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::generator::{Generator, ScanContext};
use crate::model::CompoundModel;

/// Maximum number of named scans in one configuration.
pub const MAX_SCANS: usize = 32;

/// Root configuration structure from TOML.
///
/// Each `[scans.<name>]` table is a compound model.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    /// Named scan definitions.
    #[serde(default)]
    pub scans: FnvIndexMap<String<32>, CompoundModel, MAX_SCANS>,
}

impl ScanConfig {
    /// Get a scan definition by name.
    pub fn scan(&self, name: &str) -> Option<&CompoundModel> {
        self.scans
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    /// List all scan names.
    pub fn scan_names(&self) -> impl Iterator<Item = &str> {
        self.scans.keys().map(|s| s.as_str())
    }

    /// Build the generator for a named scan.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ScanNotFound`] for an unknown name, otherwise
    /// any error raised while building the compound generator.
    pub fn build(&self, ctx: &ScanContext, name: &str) -> Result<Generator> {
        let model = self
            .scan(name)
            .ok_or_else(|| ConfigError::ScanNotFound(String::try_from(name).unwrap_or_default()))?;

        ctx.create(model.clone())
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scans: FnvIndexMap::new(),
        }
    }
}
