//! Integration test for loading detector configuration from disk.

use sentinel_security::{IntegratorConfig, SecurityConfig, SecurityError};

fn temp_config_path(tag: &str) -> std::path::PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("sentinel_{tag}_{id}.toml"))
}

#[test]
fn test_load_from_file() {
    let path = temp_config_path("valid");
    std::fs::write(
        &path,
        r"
        [direction]
        precision_margin_deg = 1.5

        [aim.checks]
        periodicity = false

        [aim.periodicity_buffer]
        decay_rate = 0.02
        trigger_threshold = 4.0
        post_trigger_floor = 1.0
        ",
    )
    .unwrap();

    let config = SecurityConfig::load(&path).unwrap();
    assert!((config.direction.precision_margin_deg - 1.5).abs() < 1e-12);
    assert!(!config.aim.checks.periodicity);
    assert!(config.aim.checks.rank);
    assert_eq!(
        config.aim.periodicity_buffer,
        IntegratorConfig::new(0.02, 4.0, 1.0)
    );

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_load_rejects_out_of_range_margin() {
    let path = temp_config_path("invalid");
    std::fs::write(&path, "[direction]\nprecision_margin_deg = -1.0\n").unwrap();

    let err = SecurityConfig::load(&path).unwrap_err();
    assert!(matches!(err, SecurityError::InvalidConfig(_)));
    assert!(err.to_string().contains("precision_margin_deg"));

    std::fs::remove_file(&path).ok();
}

#[test]
fn test_io_error_names_path() {
    let path = temp_config_path("missing");
    let err = SecurityConfig::load(&path).unwrap_err();
    assert!(err.to_string().contains("sentinel_missing_"));
}
