/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use doctrans::app_config::{Config, EmptyResponsePolicy, LogLevel};
use doctrans::translation::{FontPolicy, Granularity, RenderMode};
use std::path::PathBuf;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "uk");
    assert_eq!(config.target_language, "en");
    assert_eq!(config.granularity, Granularity::Sentence);
    assert_eq!(config.render_mode, RenderMode::Complex);
    assert_eq!(config.translation.concurrent_requests, 4);
    assert_eq!(config.translation.timeout_secs, 30);
    assert_eq!(config.translation.empty_response, EmptyResponsePolicy::Accept);
    assert!(!config.translation.dump_table);
    assert_eq!(config.rendering.output_dir, PathBuf::from("output"));
    assert_eq!(config.rendering.media_dir, PathBuf::from("output/media"));
    assert_eq!(config.rendering.image_base, "media");
    assert_eq!(config.rendering.title, "Translation");
    assert_eq!(config.rendering.font_policy, FontPolicy::Halve);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.source_language = "invalid".to_string();
    assert!(config.validate().is_err());

    config.source_language = "uk".to_string();
    config.target_language = "ukr".to_string();
    assert!(config.validate().is_err(), "same language in two notations");

    config.target_language = "en".to_string();
    config.translation.concurrent_requests = 0;
    assert!(config.validate().is_err());

    config.translation.concurrent_requests = 4;
    config.translation.timeout_secs = 0;
    assert!(config.validate().is_err());

    config.translation.timeout_secs = 30;
    config.translation.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());

    config.translation.endpoint = "http://localhost:8080/translate".to_string();
    config.rendering.font_policy = FontPolicy::Fixed { size: 0 };
    assert!(config.validate().is_err());

    config.rendering.font_policy = FontPolicy::Fixed { size: 14 };
    assert!(config.validate().is_ok());
}

/// Test policies are read from their lowercase JSON form
#[test]
fn test_config_deserialization_withPolicies_shouldParseTaggedValues() -> Result<()> {
    let json = r#"{
        "source_language": "de",
        "target_language": "fr",
        "granularity": "paragraph",
        "render_mode": "simple",
        "translation": { "empty_response": "reject", "dump_table": true },
        "rendering": { "font_policy": { "policy": "fixed", "size": 14 } },
        "log_level": "debug"
    }"#;

    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.granularity, Granularity::Paragraph);
    assert_eq!(config.render_mode, RenderMode::Simple);
    assert_eq!(config.translation.empty_response, EmptyResponsePolicy::Reject);
    assert!(config.translation.dump_table);
    assert_eq!(config.translation.concurrent_requests, 4);
    assert_eq!(config.rendering.font_policy, FontPolicy::Fixed { size: 14 });
    assert_eq!(config.rendering.image_base, "media");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created.source_language, "uk");

    let mut changed = created.clone();
    changed.target_language = "de".to_string();
    changed.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.target_language, "de");
    Ok(())
}

/// Test a broken config file is reported
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test the language pair follows the configured codes
#[test]
fn test_language_pair_shouldUseConfiguredCodes() {
    let config = Config::default();
    let pair = config.language_pair();
    assert_eq!(pair.source, "uk");
    assert_eq!(pair.target, "en");
    assert_eq!(pair.to_string(), "uk -> en");
}
