use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use hiresim::{ConfigError, Settings};

fn unique_temp_path(name: &str, ext: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("hiresim-{name}-{stamp}.{ext}"))
}

#[test]
fn loads_yaml_settings_file() {
    let path = unique_temp_path("settings", "yaml");
    fs::write(
        &path,
        "max_candidates_to_consider: 250\nmin_interview_length: 0.5\nmedian_compensation: 260000\n",
    )
    .expect("fixture should be written");

    let settings = Settings::load(&path).expect("yaml should load");
    assert_eq!(settings.max_candidates_to_consider, 250);
    assert_eq!(settings.min_interview_length, 0.5);
    assert_eq!(settings.median_compensation, 260_000.0);
    assert_eq!(settings.max_interview_length, 2.0);

    let _ = fs::remove_file(path);
}

#[test]
fn loads_json_settings_file() {
    let path = unique_temp_path("settings", "json");
    fs::write(&path, r#"{"max_interview_length": 3.0, "default_interview_length": 1.5}"#)
        .expect("fixture should be written");

    let settings = Settings::load(&path).expect("json should load");
    assert_eq!(settings.max_interview_length, 3.0);
    assert_eq!(settings.clamp_duration(10.0), 3.0);
    assert_eq!(settings.clamp_duration(0.1), 0.25);

    let _ = fs::remove_file(path);
}

#[test]
fn missing_file_reports_its_path() {
    let path = unique_temp_path("missing", "yaml");
    let err = Settings::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { path: ref p, .. } if *p == path));
}

#[test]
fn inconsistent_settings_are_rejected() {
    let err = Settings::from_yaml_str("min_interview_length: 3.0\nmax_interview_length: 1.0\n")
        .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));

    let err = Settings::from_json_str(r#"{"p25_compensation": 700000}"#).unwrap_err();
    assert!(err.to_string().contains("non-decreasing"));

    let err = Settings::from_json_str(r#"{"max_candidates_to_consider": 0}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn malformed_documents_surface_parse_errors() {
    assert!(matches!(
        Settings::from_yaml_str("max_candidates_to_consider: [1, 2"),
        Err(ConfigError::Yaml(_))
    ));
    assert!(matches!(
        Settings::from_json_str("{\"max_candidates_to_consider\": \"many\"}"),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn overrides_then_validation_catch_bad_combinations() {
    let mut settings = Settings::default();
    settings
        .apply_env_overrides(|key| (key == "HIRESIM_MAX_INTERVIEW_LENGTH").then(|| "0.1".to_string()))
        .expect("override parses");
    assert_eq!(settings.max_interview_length, 0.1);
    assert!(settings.validate().is_err());
}
