//! Unit tests for TOML scan-definition parsing.

use scan_compose::config::{load_config, ScanConfig};
use scan_compose::model::{Mutator, Orientation, RegionShape, ScanModel};

/// Test parsing a single step scan.
#[test]
fn test_parse_step_scan() {
    let toml_str = r#"
[[scans.line.models]]
kind = "axial_step"
name = "stage_x"
units = "um"
start = 0.0
stop = 10.0
step = 2.5
alternating = true
"#;

    let config: ScanConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let scan = config.scan("line").expect("Scan not found");

    match &scan.models[0] {
        ScanModel::AxialStep(model) => {
            assert_eq!(model.name.as_str(), "stage_x");
            assert_eq!(model.units.as_str(), "um");
            assert_eq!(model.step, 2.5);
            assert!(model.alternating);
            assert!(!model.continuous);
        }
        other => panic!("unexpected model {:?}", other),
    }
    assert_eq!(scan.duration, -1.0);
    assert!(scan.continuous);
    assert!(scan.regions.is_empty());
}

/// Test parsing a grid with orientation and default units.
#[test]
fn test_parse_grid_scan() {
    let toml_str = r#"
[[scans.map.models]]
kind = "two_axis_grid_step"
x_axis_name = "x"
y_axis_name = "y"
x_axis_step = 0.5
y_axis_step = 0.25
orientation = "vertical"
bounding_box = { x_axis_start = 0.0, y_axis_start = 0.0, x_axis_length = 2.0, y_axis_length = 1.0 }
"#;

    let config: ScanConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    match &config.scan("map").unwrap().models[0] {
        ScanModel::TwoAxisGridStep(model) => {
            assert_eq!(model.orientation, Orientation::Vertical);
            assert_eq!(model.axes.x_axis_units.as_str(), "mm");
            assert_eq!(model.bounding_box.x_axis_length, 2.0);
        }
        other => panic!("unexpected model {:?}", other),
    }
}

/// Test parsing regions and mutators attached to a scan.
#[test]
fn test_parse_regions_and_mutators() {
    let toml_str = r#"
[scans.roi]
duration = 0.2
continuous = false

[[scans.roi.models]]
kind = "two_axis_grid_points"
x_axis_name = "x"
y_axis_name = "y"
x_axis_points = 10
y_axis_points = 10
bounding_box = { x_axis_start = 0.0, y_axis_start = 0.0, x_axis_length = 1.0, y_axis_length = 1.0 }

[[scans.roi.regions]]
shape = { kind = "polygon", points = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]] }

[[scans.roi.regions]]
axes = ["x", "y"]
shape = { kind = "ellipse", centre = [0.5, 0.5], semi_axes = [0.4, 0.2] }

[[scans.roi.mutators]]
kind = "random_offset"
seed = 12
max_offset = { x = 0.01, y = 0.02 }
"#;

    let config: ScanConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let scan = config.scan("roi").unwrap();

    assert_eq!(scan.duration, 0.2);
    assert!(!scan.continuous);
    assert!(scan.regions[0].axes.is_empty());
    assert!(matches!(scan.regions[0].shape, RegionShape::Polygon { ref points } if points.len() == 3));
    assert!(matches!(scan.regions[1].shape, RegionShape::Ellipse { angle, .. } if angle == 0.0));

    let Mutator::RandomOffset { seed, max_offset } = &scan.mutators[0];
    assert_eq!(*seed, 12);
    assert_eq!(max_offset.len(), 2);
}

/// Test parsing nested multi-model kinds.
#[test]
fn test_parse_nested_models() {
    let toml_str = r#"
[[scans.nested.models]]
kind = "concurrent"
models = [
    { kind = "axial_points", name = "a", start = 0.0, stop = 1.0, points = 3 },
    { kind = "axial_array", name = "b", positions = [5.0, 6.0, 7.0] },
]

[[scans.nested.models]]
kind = "consecutive"
models = [
    { kind = "axial_step", name = "x", start = 0.0, stop = 2.0, step = 1.0 },
    { kind = "axial_step", name = "x", start = 3.0, stop = 5.0, step = 1.0 },
]
"#;

    let config: ScanConfig = toml::from_str(toml_str).expect("Failed to parse TOML");
    let scan = config.scan("nested").unwrap();
    assert!(matches!(scan.models[0], ScanModel::Concurrent(ref m) if m.models.len() == 2));
    assert!(matches!(scan.models[1], ScanModel::Consecutive(ref m) if m.models.len() == 2));
}

/// Test loading a scan file from disk.
#[test]
fn test_load_config_from_file() {
    let toml_str = r#"
[[scans.quick.models]]
kind = "static"
size = 3
"#;

    let path = std::env::temp_dir().join("scan_compose_load_config.toml");
    std::fs::write(&path, toml_str).expect("Failed to write temp file");

    let config = load_config(&path).expect("Failed to load config");
    std::fs::remove_file(&path).ok();

    assert!(matches!(config.scan("quick").unwrap().models[0], ScanModel::Static(ref m) if m.size == 3));
}

/// Test building a random-offset grid scan from its kind name.
#[test]
fn test_build_random_offset_grid_scan() {
    let toml_str = r#"
[[scans.jitter.models]]
kind = "two_axis_grid_points_random_offset"
x_axis_name = "x"
y_axis_name = "y"
x_axis_points = 4
y_axis_points = 3
offset = 5.0
seed = 8
bounding_box = { x_axis_start = 0.0, y_axis_start = 0.0, x_axis_length = 4.0, y_axis_length = 3.0 }
"#;

    let config = scan_compose::parse_config(toml_str).expect("Failed to parse TOML");
    let ctx = scan_compose::ScanContext::native();
    let generator = config.build(&ctx, "jitter").expect("Failed to build scan");

    assert_eq!(generator.shape(), vec![3, 4]);
    for point in generator.iter() {
        let x = point.position.get("x").unwrap();
        assert!((x - (x.floor() + 0.5)).abs() <= 0.05 + 1e-12);
    }
}
