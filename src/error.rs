//! Error types for scan-compose.
//!
//! Provides unified error handling across model validation, generator
//! construction and scan configuration loading.

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all scan-compose operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A model failed validation
    Validation(ModelValidationError),
    /// A generator could not be built from validated parameters
    Generator(GeneratorError),
    /// Scan configuration parsing or lookup error
    Config(ConfigError),
}

/// A model parameter failed its validation rules.
///
/// Raised synchronously during generator construction, never during iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelValidationError {
    /// Label of the offending model, including its member path when nested.
    pub model: String,
    /// Names of the offending fields.
    pub fields: Vec<String>,
    /// Human-readable cause.
    pub cause: String,
}

impl ModelValidationError {
    /// Create a validation error for a single field.
    pub fn new(model: &str, field: &str, cause: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            fields: alloc::vec![field.to_string()],
            cause: cause.into(),
        }
    }

    /// Create a validation error covering several fields.
    pub fn with_fields(model: &str, fields: &[&str], cause: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
            cause: cause.into(),
        }
    }

    /// Prefix the model label with the parent model and member index.
    pub fn within(self, parent: &str, index: usize) -> Self {
        self.within_field(parent, "models", index)
    }

    /// Prefix the model label with the parent model, the list field holding
    /// this member, and its index in that list.
    pub fn within_field(mut self, parent: &str, field: &str, index: usize) -> Self {
        self.model = alloc::format!("{}.{}[{}] > {}", parent, field, index, self.model);
        self
    }
}

/// Generator construction errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorError {
    /// Same axis appears in more than one sub-trajectory
    DuplicateAxis(String),
    /// Concurrent members report different sizes
    SizeMismatch {
        /// Index of the offending member
        member: usize,
        /// Size of the first member
        expected: usize,
        /// Size of the offending member
        found: usize,
    },
    /// Consecutive members do not meet at their bounds
    BoundMismatch {
        /// Index of the incoming member
        member: usize,
        /// Axis on which the bounds differ
        axis: String,
        /// Final bound of the outgoing member
        final_bound: f64,
        /// Initial bound of the incoming member
        initial_bound: f64,
    },
    /// Consecutive members scan different axes
    AxisMismatch {
        /// Index of the offending member
        member: usize,
    },
    /// Member has no well-defined initial/final bound
    NoBound {
        /// Index of the offending member
        member: usize,
    },
    /// A member generator could not be built
    Member {
        /// Index of the offending member
        index: usize,
        /// Kind name of the offending member
        kind: String,
        /// Underlying failure
        source: Box<Error>,
    },
    /// No constructor registered for a model kind
    UnknownKind(String),
    /// Generator was created without a backing model
    NoModel,
    /// Region axes could not be resolved against the scanned axes
    RegionAxes(String),
    /// Multi-model generator created with no members
    NoMembers,
    /// Trajectory contains no points after exclusion
    Empty,
    /// The evaluation engine rejected the composed parameters
    Engine(String),
}

/// Scan configuration errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(String),
    /// Scan name not found in configuration
    ScanNotFound(heapless::String<32>),
    /// Generator kind name too long or registry full
    RegistryFull(String),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(String),
}

impl Error {
    /// Check whether this error, or the member failure it wraps, is a validation failure.
    pub fn is_validation(&self) -> bool {
        match self {
            Error::Validation(_) => true,
            Error::Generator(GeneratorError::Member { source, .. }) => source.is_validation(),
            _ => false,
        }
    }

    /// Identify a member failure within a multi-model or compound parent.
    ///
    /// Validation failures stay validation failures with an extended model label;
    /// everything else is wrapped in [`GeneratorError::Member`].
    pub fn in_member(self, parent: &str, index: usize, kind: &str) -> Self {
        self.in_field(parent, "models", index, kind)
    }

    /// Like [`Error::in_member`], for members held in a list field other
    /// than `models`.
    pub fn in_field(self, parent: &str, field: &str, index: usize, kind: &str) -> Self {
        match self {
            Error::Validation(e) => Error::Validation(e.within_field(parent, field, index)),
            other => Error::Generator(GeneratorError::Member {
                index,
                kind: kind.to_string(),
                source: Box::new(other),
            }),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(e) => write!(f, "Model validation error: {}", e),
            Error::Generator(e) => write!(f, "Generator error: {}", e),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl fmt::Display for ModelValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.model, self.fields.join(", "), self.cause)
    }
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::DuplicateAxis(axis) => {
                write!(f, "Axis '{}' is scanned by more than one generator", axis)
            }
            GeneratorError::SizeMismatch { member, expected, found } => write!(
                f,
                "Concurrent member {} has size {}, expected {}",
                member, found, expected
            ),
            GeneratorError::BoundMismatch { member, axis, final_bound, initial_bound } => write!(
                f,
                "Consecutive member {} starts at {} on '{}' but the previous member ends at {}",
                member, initial_bound, axis, final_bound
            ),
            GeneratorError::AxisMismatch { member } => {
                write!(f, "Consecutive member {} scans different axes", member)
            }
            GeneratorError::NoBound { member } => {
                write!(f, "Member {} has no well-defined bounds", member)
            }
            GeneratorError::Member { index, kind, source } => {
                write!(f, "Member {} ({}) failed: {}", index, kind, source)
            }
            GeneratorError::UnknownKind(kind) => {
                write!(f, "No generator registered for model kind '{}'", kind)
            }
            GeneratorError::NoModel => write!(f, "Generator has no backing model"),
            GeneratorError::RegionAxes(msg) => write!(f, "Cannot resolve region axes: {}", msg),
            GeneratorError::NoMembers => write!(f, "Multi-model generator has no members"),
            GeneratorError::Empty => write!(f, "Trajectory contains no points"),
            GeneratorError::Engine(msg) => write!(f, "Evaluation engine rejected parameters: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::ScanNotFound(name) => write!(f, "Scan '{}' not found", name),
            ConfigError::RegistryFull(name) => {
                write!(f, "Cannot register generator kind '{}': registry full or name too long", name)
            }
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

// Conversion impls
impl From<ModelValidationError> for Error {
    fn from(e: ModelValidationError) -> Self {
        Error::Validation(e)
    }
}

impl From<GeneratorError> for Error {
    fn from(e: GeneratorError) -> Self {
        Error::Generator(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ModelValidationError {}

#[cfg(feature = "std")]
impl std::error::Error for GeneratorError {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
