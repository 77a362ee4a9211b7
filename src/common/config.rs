use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use crate::camera::CameraPosition;
use crate::core::capture::CAPTURE_DELAY;
use crate::common::error::{FaceAuthError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.biologreen.com/v1";

pub const API_KEY_ENV: &str = "BIOLOGREEN_API_KEY";
pub const BASE_URL_ENV: &str = "BIOLOGREEN_BASE_URL";

/// Options the SDK is initialized with.
#[derive(Debug, Clone)]
pub struct SdkOptions {
    pub api_key: String,
    /// Overrides [`DEFAULT_BASE_URL`], e.g. for local testing.
    pub base_url: Option<String>,
    pub debounce: Duration,
    pub camera_position: CameraPosition,
    pub request_timeout: Option<Duration>,
}

impl SdkOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            debounce: CAPTURE_DELAY,
            camera_position: CameraPosition::Front,
            request_timeout: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_camera_position(mut self, position: CameraPosition) -> Self {
        self.camera_position = position;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CaptureConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub camera_position: CameraPosition,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            camera_position: CameraPosition::default(),
        }
    }
}

fn default_debounce_ms() -> u64 {
    CAPTURE_DELAY.as_millis() as u64
}

impl Config {
    /// Loads the first config file found in [`crate::common::config_search_paths`].
    /// With no file anywhere, falls back to defaults plus environment overrides,
    /// so `BIOLOGREEN_API_KEY` alone is enough.
    pub fn load() -> Result<Self> {
        let searched = crate::common::config_search_paths();
        match searched.iter().find(|path| path.exists()) {
            Some(path) => Self::load_from_path(path),
            None => {
                tracing::debug!(
                    "No config file found (searched: {}), using defaults and environment",
                    searched
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                Self::from_env()
            }
        }
    }

    /// Defaults plus environment overrides, validated.
    pub fn from_env() -> Result<Self> {
        let config = Self::default().with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FaceAuthError::Config(format!(
                "Config file not found: {}", path.display()
            )));
        }

        tracing::debug!("Loading config from: {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?.with_env_overrides();

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| FaceAuthError::Config(format!("Config parse error: {}", e)))
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(std::env::var(API_KEY_ENV).ok(), std::env::var(BASE_URL_ENV).ok())
    }

    /// Replaces the API key and base URL with any non-empty value given.
    pub fn with_overrides(mut self, api_key: Option<String>, base_url: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|key| !key.is_empty()) {
            self.api.api_key = key;
        }
        if let Some(url) = base_url.filter(|url| !url.is_empty()) {
            self.api.base_url = Some(url);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.api_key.trim().is_empty() {
            return Err(FaceAuthError::Config(format!(
                "api.api_key must be set (or provide {})", API_KEY_ENV
            )));
        }

        if let Some(url) = &self.api.base_url {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(FaceAuthError::Config(format!(
                    "api.base_url must start with http:// or https://, got {}", url
                )));
            }
        }

        if let Some(timeout) = self.api.timeout_seconds {
            if !(1..=300).contains(&timeout) {
                return Err(FaceAuthError::Config(format!(
                    "api.timeout_seconds must be between 1 and 300, got {}", timeout
                )));
            }
        }

        if !(1..=10_000).contains(&self.capture.debounce_ms) {
            return Err(FaceAuthError::Config(format!(
                "capture.debounce_ms must be between 1 and 10000, got {}",
                self.capture.debounce_ms
            )));
        }

        Ok(())
    }

    pub fn sdk_options(&self) -> SdkOptions {
        SdkOptions {
            api_key: self.api.api_key.clone(),
            base_url: self.api.base_url.clone(),
            debounce: Duration::from_millis(self.capture.debounce_ms),
            camera_position: self.capture.camera_position,
            request_timeout: self.api.timeout_seconds.map(Duration::from_secs),
        }
    }
}
