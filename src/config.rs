//! Runtime settings.
//!
//! Settings are layered, lowest precedence first:
//! 1. Built-in defaults
//! 2. An optional TOML file, named by `DESKHAND_CONFIG` or found in the
//!    usual places
//! 3. Environment variables (a `.env` file is loaded into the environment by
//!    the binary before this module runs)
//!
//! # Configuration File Format
//!
//! Every key is optional:
//!
//! ```toml
//! base_url = "https://openrouter.ai/api/v1"
//! model = "openai/gpt-4o-mini"
//! base_folder = "/home/hikam/Tugas Hikam"
//! max_pdf_chars = 20000
//! request_timeout_secs = 60
//! system_prompt = "Kamu adalah AI Agent ..."
//! ```

use crate::prompts;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_BASE_URL: &str = "OPENROUTER_BASE_URL";
pub const ENV_MODEL: &str = "OPENROUTER_MODEL";
pub const ENV_BASE_FOLDER: &str = "BASE_FOLDER";
pub const ENV_MAX_PDF_CHARS: &str = "MAX_PDF_CHARS";
pub const ENV_REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT";
pub const ENV_CONFIG_PATH: &str = "DESKHAND_CONFIG";

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_BASE_FOLDER_NAME: &str = "Tugas Hikam";
const DEFAULT_MAX_PDF_CHARS: usize = 20_000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    /// IO error while reading configuration.
    #[error("IO error reading configuration: {0}")]
    Io(String),
    /// An environment variable holds a value of the wrong shape.
    #[error("Invalid value for {key}: '{value}' is not a whole number")]
    InvalidValue { key: &'static str, value: String },
    /// No API key was configured.
    #[error("OPENROUTER_API_KEY is not set. Set the environment variable or add it to a .env file.")]
    MissingApiKey,
}

/// Settings for one assistant session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Bearer token for the chat endpoint.
    pub api_key: Option<String>,
    /// Endpoint root; requests go to `{base_url}/chat/completions`.
    pub base_url: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Folder the classifier sorts and PDF names are resolved against.
    pub base_folder: PathBuf,
    /// Maximum number of characters of PDF text embedded in a prompt.
    pub max_pdf_chars: usize,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Instruction message prepended to every exchange.
    pub system_prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_folder: default_base_folder(),
            max_pdf_chars: DEFAULT_MAX_PDF_CHARS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            system_prompt: prompts::SYSTEM_PROMPT.to_string(),
        }
    }
}

fn default_base_folder() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(DEFAULT_BASE_FOLDER_NAME),
        None => PathBuf::from(DEFAULT_BASE_FOLDER_NAME),
    }
}

impl Settings {
    /// Loads settings from the config file chain, then the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file named by `DESKHAND_CONFIG` is missing or
    /// malformed, or if a numeric environment variable cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();
        let mut settings = Self::load_file(config_path_from(lookup).as_deref())?;
        settings.apply_env(lookup)?;
        Ok(settings)
    }

    /// Loads the file layer only.
    ///
    /// Attempts the following in order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.deskhandrc.toml` in the current directory
    /// 3. Look for `~/.config/deskhand/config.toml` in the home directory
    /// 4. Fall back to defaults
    pub fn load_file(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".deskhandrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("deskhand")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml(&content)
    }

    /// Parses settings from TOML text; missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Overlays environment variables resolved through `lookup`.
    ///
    /// Unset variables leave the current value alone.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.model = model;
        }
        if let Some(folder) = lookup(ENV_BASE_FOLDER) {
            self.base_folder = PathBuf::from(folder);
        }
        if let Some(raw) = lookup(ENV_MAX_PDF_CHARS) {
            self.max_pdf_chars = parse_number(ENV_MAX_PDF_CHARS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT) {
            self.request_timeout_secs = parse_number(ENV_REQUEST_TIMEOUT, &raw)?;
        }
        Ok(())
    }

    /// Returns the API key, treating an empty key as missing.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Returns the config file named by `DESKHAND_CONFIG`, ignoring an empty value.
pub fn config_path_from<F>(lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(ENV_CONFIG_PATH)
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
}

fn parse_number<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}
