//! Client configuration.
//!
//! Defaults match the production deployment; `ApiConfig::from_env` overlays
//! `BADA_*` environment variables on top of them.

use std::{path::PathBuf, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Production backend endpoint.
pub const DEFAULT_API_URL: &str = "https://script.google.com/macros/s/AKfycbwJImU7gmrEV5QCtez-RX7cS9t2_KQ8_g16B2YzH7FX7bmTL45CWs_T1YWCFuaEa5rA/exec";

/// Storage key holding the auth token.
pub const TOKEN_KEY: &str = "bada_auth_token";

/// Storage key holding the serialized user profile.
pub const USER_KEY: &str = "bada_user";

/// Bridge requests without a response after this long are abandoned.
pub const DEFAULT_BRIDGE_TIMEOUT_SECS: u64 = 30;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid environment variable value.
    #[error("invalid value for environment variable '{name}': {message}")]
    InvalidEnvVar { name: String, message: String },

    /// Unknown transport strategy name.
    #[error("unknown transport '{0}' (expected 'direct' or 'bridge')")]
    UnknownTransport(String),
}

impl ConfigError {
    /// Creates an invalid env var error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Transport strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    /// Plain POST with a JSON body.
    #[default]
    Direct,
    /// Callback-bound script loading for hosts that block direct calls.
    Bridge,
}

impl FromStr for TransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "bridge" => Ok(Self::Bridge),
            other => Err(ConfigError::UnknownTransport(other.to_string())),
        }
    }
}

/// API client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend endpoint.
    pub api_url: String,
    /// Storage key for the auth token.
    pub token_key: String,
    /// Storage key for the user profile.
    pub user_key: String,
    /// Transport strategy.
    pub transport: TransportKind,
    /// Bridge request timeout in seconds.
    pub bridge_timeout_secs: u64,
    /// Unauthenticated entry page.
    pub login_page: String,
    /// Landing page after login.
    pub dashboard_page: String,
    /// File backing durable storage. Defaults under the user data dir.
    pub storage_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_key: TOKEN_KEY.to_string(),
            user_key: USER_KEY.to_string(),
            transport: TransportKind::default(),
            bridge_timeout_secs: DEFAULT_BRIDGE_TIMEOUT_SECS,
            login_page: "index.html".to_string(),
            dashboard_page: "dashboard.html".to_string(),
            storage_path: None,
        }
    }
}

impl ApiConfig {
    /// Create a configuration for `api_url` with all other defaults.
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with `BADA_*` environment variables.
    ///
    /// # Errors
    /// Returns error if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Overlay `BADA_*` environment variables.
    ///
    /// # Errors
    /// Returns error if a variable holds an invalid value.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    /// Overlay `BADA_*` variables resolved through `lookup`.
    ///
    /// # Errors
    /// Returns error if a variable holds an invalid value.
    pub fn with_vars<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BADA_API_URL") {
            self.api_url = url;
        }
        if let Some(kind) = lookup("BADA_TRANSPORT") {
            self.transport = kind
                .parse()
                .map_err(|e: ConfigError| ConfigError::invalid_env_var("BADA_TRANSPORT", e.to_string()))?;
        }
        if let Some(path) = lookup("BADA_STORAGE_PATH") {
            self.storage_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup("BADA_BRIDGE_TIMEOUT_SECS") {
            self.bridge_timeout_secs = secs.trim().parse().map_err(|_| {
                ConfigError::invalid_env_var("BADA_BRIDGE_TIMEOUT_SECS", "expected seconds")
            })?;
        }
        tracing::debug!(transport = ?self.transport, api_url = %self.api_url, "Loaded API config");
        Ok(self)
    }

    /// Bridge request timeout.
    #[must_use]
    pub const fn bridge_timeout(&self) -> Duration {
        Duration::from_secs(self.bridge_timeout_secs)
    }

    /// Resolved storage file path.
    ///
    /// Falls back to `<data dir>/bada/storage.json`; `None` when no data dir
    /// exists on this platform.
    #[must_use]
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage_path
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("bada").join("storage.json")))
    }
}
