//! # scan-compose
//!
//! Validated composition of multi-dimensional motor-scan trajectories.
//!
//! ## Features
//!
//! - **Declarative models**: line, grid, spiral, lissajous and static scans,
//!   nested, zipped or concatenated
//! - **Up-front validation**: every rule is checked when a generator is built,
//!   never while iterating
//! - **Regions of interest**: points outside circles, rectangles, polygons and
//!   other shapes are excluded, grouped by axis pair
//! - **Pluggable evaluation**: generators talk to a [`TrajectoryEngine`];
//!   [`NativeEngine`] is included
//! - **Configuration-driven**: named scans load from TOML files
//! - **no_std compatible**: core library needs only `alloc`
//!
//! ## Quick Start
//!
//! ```rust
//! use scan_compose::model::{AxialStepModel, BoundingBox, TwoAxisGridPointsModel};
//! use scan_compose::ScanContext;
//!
//! let ctx = ScanContext::native();
//! let generator = ctx
//!     .create_compound(vec![
//!         AxialStepModel::new("temperature", 290.0, 295.0, 1.0).into(),
//!         TwoAxisGridPointsModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 3.0), 3, 3).into(),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(generator.shape(), vec![6, 3, 3]);
//! for point in generator.iter().take(2) {
//!     assert_eq!(point.position.get("temperature"), Some(290.0));
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and `std::error::Error`
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
#![allow(clippy::result_large_err)]

extern crate alloc;

pub(crate) mod log;

// Core modules
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod model;
pub mod validation;

// Re-exports for ergonomic API
pub use config::{validate_config, ScanConfig};
pub use engine::{DictValue, NativeEngine, Point, Position, TrajectoryEngine, TrajectoryHandle};
pub use error::{ConfigError, Error, GeneratorError, ModelValidationError, Result};
pub use generator::{Generator, GeneratorRegistry, ScanContext};
pub use model::{CompoundModel, CompoundModelBuilder, ModelKind, ScanModel, ScanRegion};
pub use validation::validate_model;

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::{load_config, parse_config};
