use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::kernel::context::DEFAULT_LOCATION;
use crate::kernel::controller::ControllerConfig;
use crate::render::Presentation;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
    #[error("unknown setting {0:?}")]
    UnknownKey(String),
}

/// Where stage data comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// In-process rule engine.
    #[default]
    Local,
    Http,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "http" => Ok(BackendKind::Http),
            other => Err(ConfigError::Invalid {
                key: "backend".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    pub backend: BackendKind,
    pub base_url: String,
    pub location: String,
    pub presentation: Presentation,
    /// Per-request limit. None = wait indefinitely.
    pub request_timeout_ms: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            location: DEFAULT_LOCATION.to_string(),
            presentation: Presentation::default(),
            request_timeout_ms: None,
        }
    }
}

/// Environment variable for each setting key.
const ENV_KEYS: [(&str, &str); 5] = [
    ("backend", "VOYAGER_BACKEND"),
    ("base_url", "VOYAGER_BASE_URL"),
    ("location", "VOYAGER_LOCATION"),
    ("presentation", "VOYAGER_PRESENTATION"),
    ("timeout_ms", "VOYAGER_TIMEOUT_MS"),
];

impl DemoConfig {
    /// Defaults overlaid with `VOYAGER_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for (key, var) in ENV_KEYS {
            if let Some(value) = lookup(var) {
                config.set(key, &value)?;
            }
        }
        Ok(config)
    }

    /// Overrides one setting from its textual form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "backend" => self.backend = value.parse()?,
            "base_url" => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(invalid(key, value));
                }
                self.base_url = trimmed.to_string();
            }
            "location" => {
                let trimmed = value.trim();
                if trimmed.is_empty() {
                    return Err(invalid(key, value));
                }
                self.location = trimmed.to_string();
            }
            "presentation" => self.presentation = value.parse()?,
            "timeout_ms" => {
                let trimmed = value.trim();
                self.request_timeout_ms = match trimmed {
                    "" | "none" | "0" => None,
                    ms => Some(ms.parse().map_err(|_| invalid(key, value))?),
                };
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig {
            presentation: self.presentation,
            request_timeout: self.request_timeout(),
        }
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    }
}
