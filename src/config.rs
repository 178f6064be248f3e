//! Configuration management for Destina
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and validates every setting before the clients are built.

use crate::DestinaError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the Gemini credential
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Root configuration structure for Destina
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DestinaConfig {
    /// Generative model settings
    #[serde(default)]
    pub gemini: GeminiConfig,
    /// Encyclopedia lookup settings
    #[serde(default)]
    pub wikipedia: WikipediaConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Web UI settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Gemini API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// API key; usually supplied through `GEMINI_API_KEY`
    pub api_key: Option<String>,
    /// Model identifier, including the `models/` prefix
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Base URL of the Generative Language API
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_gemini_timeout")]
    pub timeout_seconds: u32,
}

/// Wikipedia API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaConfig {
    /// MediaWiki action API endpoint
    #[serde(default = "default_wikipedia_base_url")]
    pub base_url: String,
    /// Number of sentences requested for a summary
    #[serde(default = "default_wikipedia_sentences")]
    pub sentences: u32,
    /// Request timeout in seconds
    #[serde(default = "default_wikipedia_timeout")]
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Web UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_port")]
    pub port: u16,
}

// Default value functions
fn default_gemini_model() -> String {
    "models/gemini-1.5-pro-latest".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_timeout() -> u32 {
    60
}

fn default_wikipedia_base_url() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_wikipedia_sentences() -> u32 {
    3
}

fn default_wikipedia_timeout() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_server_port() -> u16 {
    8501
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_seconds: default_gemini_timeout(),
        }
    }
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_wikipedia_base_url(),
            sentences: default_wikipedia_sentences(),
            timeout_seconds: default_wikipedia_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_server_port(),
        }
    }
}

impl DestinaConfig {
    /// Load configuration from `config_path`, or the default file location when
    /// `None`, followed by environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // DESTINA_GEMINI__MODEL, DESTINA_SERVER__PORT, ...
        builder = builder.add_source(
            Environment::with_prefix("DESTINA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DestinaConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        if let Ok(key) = std::env::var(GEMINI_API_KEY_VAR) {
            config.gemini.api_key = Some(key);
        }

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("destina").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.gemini.model.is_empty() {
            self.gemini.model = default_gemini_model();
        }
        if self.gemini.base_url.is_empty() {
            self.gemini.base_url = default_gemini_base_url();
        }
        if self.gemini.timeout_seconds == 0 {
            self.gemini.timeout_seconds = default_gemini_timeout();
        }
        if self.wikipedia.base_url.is_empty() {
            self.wikipedia.base_url = default_wikipedia_base_url();
        }
        if self.wikipedia.sentences == 0 {
            self.wikipedia.sentences = default_wikipedia_sentences();
        }
        if self.wikipedia.timeout_seconds == 0 {
            self.wikipedia.timeout_seconds = default_wikipedia_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_server_port();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// The key is optional; a missing key only disables recommendations.
    pub fn validate_api_key(&self) -> Result<()> {
        if let Some(api_key) = &self.gemini.api_key {
            if api_key.trim().is_empty() {
                return Err(DestinaError::config(format!(
                    "Gemini API key cannot be empty if provided. Either unset {GEMINI_API_KEY_VAR} or provide a valid key."
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.gemini.timeout_seconds > 300 {
            return Err(DestinaError::config("Gemini timeout cannot exceed 300 seconds").into());
        }

        if self.wikipedia.timeout_seconds > 300 {
            return Err(DestinaError::config("Wikipedia timeout cannot exceed 300 seconds").into());
        }

        if !(1..=10).contains(&self.wikipedia.sentences) {
            return Err(DestinaError::config(
                "Wikipedia summary sentences must be between 1 and 10",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DestinaError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DestinaError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Gemini", &self.gemini.base_url),
            ("Wikipedia", &self.wikipedia.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(DestinaError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if !self.gemini.model.starts_with("models/") {
            return Err(DestinaError::config(format!(
                "Gemini model '{}' must start with 'models/'",
                self.gemini.model
            ))
            .into());
        }

        Ok(())
    }
}
