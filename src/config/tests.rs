//! Configuration tests
//!
//! The round-trip tests are guards for the hand-written TOML template: every
//! field that `to_toml()` emits must parse back into `FileConfig` with the
//! same value.

use super::*;

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn default_config_round_trips() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

#[test]
fn every_emitted_field_survives_the_round_trip() {
    let config = Config {
        theme: "Nord".to_string(),
        demo_mode: false,
        api: ApiConfig {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 15,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            file_enabled: true,
            file_dir: PathBuf::from("/tmp/afya-logs"),
            file_rotation: LogRotation::Hourly,
            file_prefix: "afya-dev".to_string(),
        },
    };

    let toml_str = config.to_toml();
    let parsed: FileConfig = toml::from_str(&toml_str).expect("template should parse");

    assert_eq!(parsed.theme.as_deref(), Some("Nord"));

    let api = parsed.api.expect("api section should be present");
    assert_eq!(api.base_url.as_deref(), Some("http://localhost:8000"));
    assert_eq!(api.timeout_secs, Some(15));

    let logging = parsed.logging.expect("logging section should be present");
    assert_eq!(logging.level.as_deref(), Some("debug"));
    assert_eq!(logging.file_enabled, Some(true));
    assert_eq!(logging.file_dir.as_deref(), Some("/tmp/afya-logs"));
    assert_eq!(logging.file_rotation.as_deref(), Some("hourly"));
    assert_eq!(logging.file_prefix.as_deref(), Some("afya-dev"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Merge helpers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn file_values_override_defaults() {
    let api = ApiConfig::from_file(Some(FileApi {
        base_url: Some("http://localhost:8000".to_string()),
        timeout_secs: None,
    }));
    assert_eq!(api.base_url, "http://localhost:8000");
    assert_eq!(api.timeout_secs, ApiConfig::default().timeout_secs);

    let logging = LoggingConfig::from_file(Some(FileLogging {
        level: Some("trace".to_string()),
        file_enabled: Some(true),
        file_dir: None,
        file_rotation: Some("never".to_string()),
        file_prefix: None,
    }));
    assert_eq!(logging.level, "trace");
    assert!(logging.file_enabled);
    assert_eq!(logging.file_rotation, LogRotation::Never);
    assert_eq!(logging.file_prefix, "afya");
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    let api = ApiConfig::from_file(None);
    assert_eq!(api.base_url, DEFAULT_BASE_URL);

    let logging = LoggingConfig::from_file(None);
    assert_eq!(logging.level, "info");
    assert!(!logging.file_enabled);
}

// ─────────────────────────────────────────────────────────────────────────────
// Log rotation
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn log_rotation_parses_case_insensitively() {
    assert_eq!(LogRotation::from_str("HOURLY"), LogRotation::Hourly);
    assert_eq!(LogRotation::from_str("daily"), LogRotation::Daily);
    assert_eq!(LogRotation::from_str("Never"), LogRotation::Never);
    assert_eq!(LogRotation::from_str("weekly"), LogRotation::Daily);
}

#[test]
fn log_rotation_round_trips_through_strings() {
    for rotation in [LogRotation::Hourly, LogRotation::Daily, LogRotation::Never] {
        assert_eq!(LogRotation::from_str(rotation.as_str()), rotation);
    }
}
