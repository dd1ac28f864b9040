//! CLI configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_commerce::CatalogSettings;
use storefront_data::TimeoutConfig;

/// Environment variable overriding `backend.url`.
pub const BACKEND_URL_ENV: &str = "STOREFRONT_BACKEND_URL";

/// Storefront configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Backend connection.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Catalog tunables.
    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl StorefrontConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Apply overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_backend_url(std::env::var(BACKEND_URL_ENV).ok())
    }

    /// Replace the backend URL when an override is given and not blank.
    pub fn with_backend_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            self.backend.url = url.trim().to_string();
        }
        self
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the content backend.
    #[serde(default = "default_url")]
    pub url: String,

    /// Base URL assets are served from (default: `url`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_url: Option<String>,

    /// Total request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Connect timeout in milliseconds (default: a quarter of `timeout_ms`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,
}

fn default_url() -> String {
    "http://localhost:8055".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl BackendConfig {
    /// Base URL for asset links.
    pub fn asset_base(&self) -> &str {
        self.asset_url.as_deref().unwrap_or(&self.url)
    }

    /// Request timeouts.
    pub fn timeouts(&self) -> TimeoutConfig {
        let total = Duration::from_millis(self.timeout_ms);
        match self.connect_timeout_ms {
            Some(connect) => TimeoutConfig::new(Duration::from_millis(connect), total),
            None => TimeoutConfig::from_total(total),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            asset_url: None,
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: None,
        }
    }
}
