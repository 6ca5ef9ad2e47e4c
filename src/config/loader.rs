//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{ConfigError, Error, Result};

use super::ScanConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or validated.
///
/// # Example
///
/// ```rust,ignore
/// use scan_compose::{load_config, ScanContext};
///
/// let config = load_config("scans.toml")?;
/// let generator = config.build(&ScanContext::native(), "overview")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ScanConfig> {
    let content = fs::read_to_string(path.as_ref())
        .map_err(|e| Error::Config(ConfigError::IoError(e.to_string())))?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or any scan fails validation.
pub fn parse_config(content: &str) -> Result<ScanConfig> {
    let config: ScanConfig = toml::from_str(content)
        .map_err(|e| Error::Config(ConfigError::ParseError(e.message().to_string())))?;

    super::validation::validate_config(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let toml = r#"
[[scans.line.models]]
kind = "axial_step"
name = "x"
start = 0.0
stop = 10.0
step = 3.0
"#;

        let config = parse_config(toml).unwrap();
        let scan = config.scan("line").unwrap();
        assert_eq!(scan.models.len(), 1);
        assert_eq!(scan.duration, -1.0);
        assert!(scan.continuous);
    }

    #[test]
    fn test_parse_error() {
        let result = parse_config("[[scans.line.models]]\nkind = \"no_such_kind\"\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/scans.toml");
        assert!(matches!(result, Err(Error::Config(ConfigError::IoError(_)))));
    }
}
