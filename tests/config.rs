//! Configuration system tests
//!
//! Tests for config paths and outline config loading/saving.

use outline_model::config::{ConfigError, OutlineConfig};
use outline_model::config_paths;
use outline_model::fuzzy::ScorerKind;

// ========================================================================
// Config Paths Tests
// ========================================================================

#[test]
fn test_config_dir_returns_some() {
    assert!(config_paths::config_dir().is_some());
}

#[test]
fn test_config_dir_contains_app_name() {
    let dir = config_paths::config_dir().unwrap();
    assert!(dir.to_string_lossy().contains("outline-model"));
}

#[test]
fn test_config_file_ends_with_yaml() {
    let path = config_paths::config_file().unwrap();
    assert!(path.to_string_lossy().ends_with("config.yaml"));
}

#[test]
fn test_logs_dir_is_subdir_of_config() {
    let config = config_paths::config_dir().unwrap();
    let logs = config_paths::logs_dir().unwrap();
    assert!(logs.starts_with(&config));
}

// ========================================================================
// Outline Config Tests
// ========================================================================

#[test]
fn test_default_config() {
    let config = OutlineConfig::default();
    assert!(config.adopt_single_group);
    assert_eq!(config.scorer, ScorerKind::Subsequence);
}

#[test]
fn test_parse_empty_document_uses_defaults() {
    let config = OutlineConfig::parse("{}").unwrap();
    assert_eq!(config, OutlineConfig::default());
}

#[test]
fn test_parse_partial_config() {
    let config = OutlineConfig::parse("adopt_single_group: false\n").unwrap();
    assert!(!config.adopt_single_group);
    assert_eq!(config.scorer, ScorerKind::Subsequence);
}

#[test]
fn test_parse_scorer() {
    let config = OutlineConfig::parse("scorer: nucleo\n").unwrap();
    assert!(config.adopt_single_group);
    assert_eq!(config.scorer, ScorerKind::Nucleo);
}

#[test]
fn test_parse_unknown_scorer_is_error() {
    let err = OutlineConfig::parse("scorer: telepathy\n").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
    assert!(err.to_string().starts_with("Parse error"));
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.yaml");

    let config = OutlineConfig {
        adopt_single_group: false,
        scorer: ScorerKind::Nucleo,
    };
    config.save_to(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("scorer: nucleo"));

    let loaded = OutlineConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = OutlineConfig::load_from(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::IoError(_)));
}

#[test]
fn test_load_malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "adopt_single_group: [not, a, bool]\n").unwrap();

    let err = OutlineConfig::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
}
