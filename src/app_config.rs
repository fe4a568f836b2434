use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::ConfigError;
use crate::translation::{Glossary, TranslationOptions};

/// Application configuration module
/// This module handles loading, validating and saving configuration settings.
/// The configuration is read once at startup (file, then environment) and
/// handed to the engine as an explicit value afterwards.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Translation options
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Provider settings
    #[serde(default)]
    pub providers: ProviderSettings,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation options as stored in the config file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    // @field: Languages to translate into, in order
    #[serde(default = "default_target_languages")]
    pub target_languages: Vec<String>,

    // @field: "llm" or "draft+postedit"
    #[serde(default = "default_mode")]
    pub mode: String,

    // @field: Provider name (echo, local, api)
    #[serde(default = "default_provider")]
    pub provider: String,

    // @field: Segments per provider call
    #[serde(default = "default_block_size")]
    pub block_size: usize,

    // @field: "keep" or "drop"
    #[serde(default = "default_keep")]
    pub honorifics: String,

    // @field: "keep" or "light"
    #[serde(default = "default_keep")]
    pub tics: String,

    // @field: Mandatory terminology
    #[serde(default)]
    pub glossary: Glossary,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_languages: default_target_languages(),
            mode: default_mode(),
            provider: default_provider(),
            block_size: default_block_size(),
            honorifics: default_keep(),
            tics: default_keep(),
            glossary: Glossary::default(),
        }
    }
}

impl TranslationConfig {
    /// Build orchestrator options from this configuration
    pub fn to_options(&self) -> TranslationOptions {
        TranslationOptions {
            target_langs: self.target_languages.clone(),
            mode: self.mode.clone(),
            provider: self.provider.clone(),
            block_size: self.block_size,
            glossary: if self.glossary.is_empty() {
                None
            } else {
                Some(self.glossary.clone())
            },
            honorifics: self.honorifics.clone(),
            tics: self.tics.clone(),
        }
    }
}

/// Settings for the providers that need them
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ProviderSettings {
    #[serde(default)]
    pub local: LocalProviderConfig,

    #[serde(default)]
    pub api: ApiProviderConfig,
}

/// Locally invoked model binary (llama.cpp style CLI)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LocalProviderConfig {
    /// Path of the executable
    #[serde(default = "default_llama_binary")]
    pub binary_path: String,

    /// Path of the model weights passed with `-m`
    #[serde(default = "default_llama_model")]
    pub model_path: String,
}

impl Default for LocalProviderConfig {
    fn default() -> Self {
        Self {
            binary_path: default_llama_binary(),
            model_path: default_llama_model(),
        }
    }
}

/// Remote HTTP translation API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiProviderConfig {
    /// Endpoint URL; empty means not configured
    #[serde(default)]
    pub endpoint: String,

    /// Bearer token, if the endpoint needs one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiProviderConfig {
    /// Check that the endpoint is present and parses as an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        let parsed = url::Url::parse(endpoint)
            .map_err(|e| ConfigError::InvalidEndpoint(format!("{}: {}", endpoint, e)))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidEndpoint(format!(
                "{}: unsupported scheme '{}'",
                endpoint, other
            ))),
        }
    }
}

pub const ENV_LLAMA_BINARY: &str = "JP2SUBS_LLAMA_BINARY";
pub const ENV_LLAMA_MODEL: &str = "JP2SUBS_LLAMA_MODEL";
pub const ENV_API_URL: &str = "JP2SUBS_API_URL";
pub const ENV_API_KEY: &str = "JP2SUBS_API_KEY";

impl ProviderSettings {
    /// Overlay values from a variable lookup (normally the process environment).
    ///
    /// Empty variables are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(binary) = get(ENV_LLAMA_BINARY) {
            self.local.binary_path = binary;
        }
        if let Some(model) = get(ENV_LLAMA_MODEL) {
            self.local.model_path = model;
        }
        if let Some(url) = get(ENV_API_URL) {
            self.api.endpoint = url;
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api.api_key = Some(key);
        }
    }

    /// Overlay the `JP2SUBS_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "ja".to_string()
}

fn default_target_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_mode() -> String {
    "llm".to_string()
}

fn default_provider() -> String {
    "echo".to_string()
}

fn default_block_size() -> usize {
    20
}

fn default_keep() -> String {
    "keep".to_string()
}

fn default_llama_binary() -> String {
    "llama.exe".to_string()
}

fn default_llama_model() -> String {
    "model.gguf".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            translation: TranslationConfig::default(),
            providers: ProviderSettings::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file not found at '{}', using defaults.", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .context(format!("Failed to open config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        fs::write(path, json)
            .context(format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        crate::language_utils::validate_language_code(&self.source_language)?;
        for lang in &self.translation.target_languages {
            crate::language_utils::validate_language_code(lang)?;
        }

        self.translation.to_options().validate()?;

        if self.translation.provider.trim().eq_ignore_ascii_case("api") {
            self.providers.api.validate()?;
        }

        Ok(())
    }
}
