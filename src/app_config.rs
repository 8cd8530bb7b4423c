use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::language_utils::{self, LanguagePair};
use crate::providers::google::DEFAULT_ENDPOINT;
use crate::translation::assembler::RenderMode;
use crate::translation::placeholders::FontPolicy;
use crate::translation::segmenter::Granularity;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Size of the units sent for translation
    #[serde(default)]
    pub granularity: Granularity,

    /// Plain-text render or image/font-preserving render
    #[serde(default)]
    pub render_mode: RenderMode,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Output and placeholder rendering config
    #[serde(default)]
    pub rendering: RenderingConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// What to do when the provider answers without any translated text
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmptyResponsePolicy {
    /// Keep the empty string and log a warning
    #[default]
    Accept,
    /// Fail the run with `ProviderError::EmptyTranslation`
    Reject,
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    // @field: Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    // @field: Max concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Timeout seconds per request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Handling of empty provider answers
    #[serde(default)]
    pub empty_response: EmptyResponsePolicy,

    // @field: Write translation_table.json next to the output
    #[serde(default)]
    pub dump_table: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            concurrent_requests: default_concurrent_requests(),
            timeout_secs: default_timeout_secs(),
            empty_response: EmptyResponsePolicy::default(),
            dump_table: false,
        }
    }
}

impl TranslationConfig {
    /// Per-request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Where artifacts go and how placeholders are rendered
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderingConfig {
    /// Directory receiving the HTML files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory receiving the extracted images
    #[serde(default = "default_media_dir")]
    pub media_dir: PathBuf,

    /// Prefix of every `<img src>`, relative to the HTML file
    #[serde(default = "default_image_base")]
    pub image_base: String,

    /// `<title>` of the generated page
    #[serde(default = "default_title")]
    pub title: String,

    /// Correction applied to style tokens
    #[serde(default)]
    pub font_policy: FontPolicy,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            media_dir: default_media_dir(),
            image_base: default_image_base(),
            title: default_title(),
            font_policy: FontPolicy::default(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
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
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "uk".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_media_dir() -> PathBuf {
    PathBuf::from("output/media")
}

fn default_image_base() -> String {
    "media".to_string()
}

fn default_title() -> String {
    "Translation".to_string()
}

impl Config {
    /// Load a configuration file, or write and return the defaults when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = language_utils::get_language_name(&self.source_language)?;
        let _target_name = language_utils::get_language_name(&self.target_language)?;

        if language_utils::language_codes_match(&self.source_language, &self.target_language) {
            return Err(anyhow!(
                "Source and target language must differ (both are '{}')",
                self.source_language
            ));
        }

        if self.translation.concurrent_requests == 0 {
            return Err(anyhow!("translation.concurrent_requests must be at least 1"));
        }

        if self.translation.timeout_secs == 0 {
            return Err(anyhow!("translation.timeout_secs must be at least 1"));
        }

        Url::parse(&self.translation.endpoint)
            .with_context(|| format!("Invalid translation endpoint: {}", self.translation.endpoint))?;

        if let FontPolicy::Fixed { size: 0 } = self.rendering.font_policy {
            return Err(anyhow!("rendering.font_policy: fixed size must be positive"));
        }

        Ok(())
    }

    /// Language pair of the run
    pub fn language_pair(&self) -> LanguagePair {
        LanguagePair::new(&self.source_language, &self.target_language)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            granularity: Granularity::default(),
            render_mode: RenderMode::default(),
            translation: TranslationConfig::default(),
            rendering: RenderingConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
