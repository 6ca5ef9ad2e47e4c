//! Unit tests for scan configuration validation.

use scan_compose::config::{parse_config, validate_config, ScanConfig};
use scan_compose::error::{ConfigError, Error};

/// Test validation of a valid configuration.
#[test]
fn test_valid_config_passes_validation() {
    let toml_str = r#"
[[scans.map.models]]
kind = "axial_step"
name = "z"
start = 0.0
stop = 1.0
step = 0.5

[[scans.map.models]]
kind = "two_axis_spiral"
x_axis_name = "x"
y_axis_name = "y"
scale = 0.5
bounding_box = { x_axis_start = 0.0, y_axis_start = 0.0, x_axis_length = 2.0, y_axis_length = 2.0 }
"#;

    let config: ScanConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    assert!(validate_config(&config).is_ok());
}

/// Test validation fails for a step that never reaches its stop.
#[test]
fn test_step_in_wrong_direction() {
    let toml_str = r#"
[[scans.bad.models]]
kind = "axial_step"
name = "x"
start = 0.0
stop = 10.0
step = -1.0
"#;

    let result = parse_config(toml_str);
    match result {
        Err(Error::Validation(e)) => {
            assert_eq!(e.model, "scans.bad > CompoundModel.models[0] > AxialStepModel");
        }
        other => panic!("unexpected {:?}", other),
    }
}

/// Test validation fails when two members scan the same axis.
#[test]
fn test_duplicate_axis_rejected() {
    let toml_str = r#"
[[scans.dup.models]]
kind = "axial_step"
name = "x"
start = 0.0
stop = 1.0
step = 1.0

[[scans.dup.models]]
kind = "axial_points"
name = "x"
start = 0.0
stop = 1.0
points = 2
"#;

    let result = parse_config(toml_str);
    assert!(matches!(result, Err(Error::Validation(ref e)) if e.fields == ["models"]));
}

/// Test validation fails for a mutator on an axis the scan does not move.
#[test]
fn test_mutator_on_unscanned_axis() {
    let toml_str = r#"
[[scans.jitter.models]]
kind = "axial_step"
name = "x"
start = 0.0
stop = 1.0
step = 1.0

[[scans.jitter.mutators]]
kind = "random_offset"
seed = 1
max_offset = { y = 0.1 }
"#;

    let result = parse_config(toml_str);
    assert!(matches!(result, Err(Error::Validation(ref e)) if e.fields == ["mutators"]));
}

/// Test validation fails for a region constraining three axes.
#[test]
fn test_region_with_three_axes() {
    let toml_str = r#"
[[scans.roi.models]]
kind = "two_axis_grid_points"
x_axis_name = "x"
y_axis_name = "y"
x_axis_points = 4
y_axis_points = 4
bounding_box = { x_axis_start = 0.0, y_axis_start = 0.0, x_axis_length = 1.0, y_axis_length = 1.0 }

[[scans.roi.regions]]
axes = ["x", "y", "z"]
shape = { kind = "circle", centre = [0.5, 0.5], radius = 0.5 }
"#;

    let config: ScanConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let result = validate_config(&config);
    assert!(matches!(result, Err(Error::Validation(ref e)) if e.fields == ["regions"]));
}

/// Test malformed TOML reports a parse error.
#[test]
fn test_malformed_toml() {
    let result = parse_config("[[scans.x.models]\nkind = ");
    assert!(matches!(result, Err(Error::Config(ConfigError::ParseError(_)))));
}
