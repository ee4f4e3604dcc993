//! Settings file
//!
//! Loads `config/galaxy_settings.yaml` (or the file named by
//! `GALAXY_NAV_CONFIG`). Every section is optional and falls back to its
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use galaxy_core::NavigatorConfig;
use serde::{Deserialize, Serialize};

/// Environment variable naming the settings file.
pub const CONFIG_ENV_VAR: &str = "GALAXY_NAV_CONFIG";

/// Settings file used when the environment doesn't name one.
pub const DEFAULT_CONFIG_PATH: &str = "config/galaxy_settings.yaml";

/// Root settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxySettings {
    pub api: ApiSettings,
    pub navigation: NavigatorConfig,
    pub render: RenderSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Render loop period
    pub frame_interval_ms: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
        }
    }
}

impl RenderSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl GalaxySettings {
    /// Load from a YAML file
    pub fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::load_from_str(&content)
    }

    /// Load from a YAML string
    pub fn load_from_str(yaml: &str) -> Result<Self, SettingsError> {
        let settings: Self =
            serde_yaml::from_str(yaml).map_err(|e| SettingsError::ParseError(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load the file named by `GALAXY_NAV_CONFIG`, else the default file if
    /// present, else defaults.
    pub fn from_env() -> Result<Self, SettingsError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load_from_file(&PathBuf::from(path)),
            _ => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::load_from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| SettingsError::Invalid(format!("api.base_url: {e}")))?;
        if self.render.frame_interval_ms == 0 {
            return Err(SettingsError::Invalid(
                "render.frame_interval_ms must be positive".to_string(),
            ));
        }
        self.navigation
            .validate()
            .map_err(|e| SettingsError::Invalid(format!("navigation: {e}")))
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    ParseError(String),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
