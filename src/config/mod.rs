//! Scan definition files.
//!
//! Named scans are loaded from TOML (with the `std` feature) or from any
//! other serde source, validated, and built into generators on demand.

mod system;
#[cfg(feature = "std")]
mod loader;
mod validation;

pub use system::{ScanConfig, MAX_SCANS};
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};
