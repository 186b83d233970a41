//! Client configuration
//!
//! Defaults, optionally overlaid by a TOML file, then by the
//! `PARLEY_BACKEND_URL` environment variable.

use crate::{ParleyError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const BACKEND_URL_ENV: &str = "PARLEY_BACKEND_URL";

/// Where the backend lives and how to reach it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub chat_path: String,
    pub voice_path: String,
    /// No timeout unless set
    pub request_timeout_secs: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            chat_path: "/chat".to_string(),
            voice_path: "/voice/main".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl BackendConfig {
    pub fn chat_url(&self) -> String {
        join_url(&self.base_url, &self.chat_path)
    }

    pub fn voice_url(&self) -> String {
        join_url(&self.base_url, &self.voice_path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub max_message_chars: usize,
    pub suggestion_count: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_chars: 4000,
            suggestion_count: 4,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceConfig {
    /// How long the error state lingers before reverting to idle
    pub error_recovery_ms: u64,
    pub upload_file_name: String,
    pub upload_field: String,
    pub enable_audio: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            error_recovery_ms: 2000,
            upload_file_name: "voice.wav".to_string(),
            upload_field: "file".to_string(),
            enable_audio: true,
        }
    }
}

impl VoiceConfig {
    pub fn error_recovery(&self) -> Duration {
        Duration::from_millis(self.error_recovery_ms)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub backend: BackendConfig,
    pub chat: ChatConfig,
    pub voice: VoiceConfig,
}

impl ClientConfig {
    /// Default location: `<config dir>/parley/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("parley").join("config.toml"))
    }

    /// Load configuration from an explicit file, the default location, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
            if !url.trim().is_empty() {
                debug!("Backend URL overridden from {}", BACKEND_URL_ENV);
                config.backend.base_url = url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ParleyError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = toml::from_str(&raw).map_err(|e| {
            ParleyError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend.base_url = url.into();
        self
    }

    /// Run without microphone or speaker
    pub fn without_audio(mut self) -> Self {
        self.voice.enable_audio = false;
        self
    }

    pub fn with_error_recovery(mut self, delay: Duration) -> Self {
        self.voice.error_recovery_ms = delay.as_millis() as u64;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.backend.base_url).map_err(|e| {
            ParleyError::ConfigError(format!(
                "Invalid backend URL {:?}: {}",
                self.backend.base_url, e
            ))
        })?;

        if self.chat.max_message_chars == 0 {
            return Err(ParleyError::ConfigError(
                "chat.max_message_chars must be greater than zero".to_string(),
            ));
        }

        if self.voice.upload_field.is_empty() {
            return Err(ParleyError::ConfigError(
                "voice.upload_field must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
