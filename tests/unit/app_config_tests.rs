/*!
 * Tests for configuration loading, overrides and validation
 */

use std::collections::HashMap;

use jp2subs::app_config::{Config, LogLevel, ENV_API_KEY, ENV_API_URL, ENV_LLAMA_BINARY};
use jp2subs::errors::ConfigError;

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_load_withPartialFile_shouldFillDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "conf.json",
        r#"{"translation": {"target_languages": ["fr", "de"], "provider": "local"}}"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.source_language, "ja");
    assert_eq!(config.translation.target_languages, vec!["fr", "de"]);
    assert_eq!(config.translation.provider, "local");
    assert_eq!(config.translation.block_size, 20);
    assert_eq!(config.providers.local.binary_path, "llama.exe");
    assert_eq!(config.providers.api.timeout_secs, 120);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_load_withMissingFile_shouldReturnDefaults() {
    let dir = create_temp_dir().unwrap();
    let config = Config::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_load_withInvalidJson_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "conf.json", "{ not json").unwrap();
    assert!(Config::load(&path).is_err());
}

#[test]
fn test_saveThenLoad_shouldPreserveGlossaryOrder() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");
    let mut config = Config::default();
    config.translation.glossary.insert("先輩", "senpai");
    config.translation.glossary.insert("学校", "school");
    config.translation.glossary.insert("ありがとう", "thanks");

    config.save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();

    let keys: Vec<&str> = loaded.translation.glossary.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["先輩", "学校", "ありがとう"]);
}

#[test]
fn test_applyOverrides_shouldPreferEnvironmentValues() {
    let env: HashMap<&str, &str> = [
        (ENV_LLAMA_BINARY, "/usr/local/bin/llama-cli"),
        (ENV_API_URL, "http://localhost:8080/translate"),
        (ENV_API_KEY, ""),
    ]
    .into_iter()
    .collect();
    let mut config = Config::default();

    config
        .providers
        .apply_overrides(|name| env.get(name).map(|v| v.to_string()));

    assert_eq!(config.providers.local.binary_path, "/usr/local/bin/llama-cli");
    assert_eq!(config.providers.local.model_path, "model.gguf");
    assert_eq!(config.providers.api.endpoint, "http://localhost:8080/translate");
    assert_eq!(config.providers.api.api_key, None);
}

#[test]
fn test_validate_shouldRejectBadValues() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.translation.target_languages = vec!["en".to_string(), "klingonese".to_string()];
    assert_eq!(
        config.validate().unwrap_err(),
        ConfigError::InvalidLanguage("klingonese".to_string())
    );

    let mut config = Config::default();
    config.translation.tics = "drop".to_string();
    assert!(matches!(
        config.validate().unwrap_err(),
        ConfigError::InvalidOption { name: "tics", .. }
    ));

    let mut config = Config::default();
    config.translation.provider = "api".to_string();
    assert_eq!(config.validate().unwrap_err(), ConfigError::MissingEndpoint);
    config.providers.api.endpoint = "https://translate.example.com/v1".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_toOptions_shouldCarryTranslationSettings() {
    let mut config = Config::default();
    config.translation.mode = "draft+postedit".to_string();
    config.translation.block_size = 8;

    let options = config.translation.to_options();

    assert_eq!(options.target_langs, vec!["en"]);
    assert_eq!(options.mode, "draft+postedit");
    assert_eq!(options.block_size, 8);
    assert!(options.glossary.is_none());
}
