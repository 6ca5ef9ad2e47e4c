//! Configuration validation.

use alloc::format;

use crate::error::{Error, Result};
use crate::validation::validate_compound;

use super::ScanConfig;

/// Validate a scan configuration.
///
/// Every scan must be a valid compound model. A failing scan's name is
/// prepended to the model label of the validation error.
pub fn validate_config(config: &ScanConfig) -> Result<()> {
    for (name, scan) in config.scans.iter() {
        validate_compound(scan).map_err(|e| match e {
            Error::Validation(mut inner) => {
                inner.model = format!("scans.{} > {}", name, inner.model);
                Error::Validation(inner)
            }
            other => other,
        })?;
    }

    Ok(())
}
