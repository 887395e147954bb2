//! # Server Configuration
//!
//! Settings for the HTTP shell, resolved from (lowest to highest precedence):
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`--config tempo.toml`)
//! 3. Environment variables
//! 4. CLI flags (applied by the `server` command)
//!
//! ## Environment Variables
//!
//! - `TEMPO_HOST`: bind address
//! - `TEMPO_PORT`: bind port
//! - `TEMPO_RATE_LIMIT`: requests per second (0 disables rate limiting)
//! - `TEMPO_CORS_ORIGINS`: comma-separated origins, or "*" for all
//!
//! ## File Format
//!
//! ```toml
//! host = "0.0.0.0"
//! port = 9000
//! rate_limit = 50
//! cors_origins = ["https://tempo.example.com"]
//! body_limit_bytes = 65536
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::AppError;

/// Default request body limit: 1 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Default rate limit: 100 requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

/// Effective configuration of the HTTP shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Requests per second; 0 disables the limiter.
    pub rate_limit: u32,
    /// `None` means localhost only; `["*"]` allows every origin.
    pub cors_origins: Option<Vec<String>>,
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rate_limit: DEFAULT_RATE_LIMIT,
            cors_origins: None,
            body_limit_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Resolve defaults, then the optional file, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_env(|key| std::env::var(key).ok()))
    }

    /// Parse a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        toml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, AppError> {
        toml::from_str(content).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Overlay environment variables read through `lookup`.
    ///
    /// Unparseable values are ignored with a warning.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(host) = lookup("TEMPO_HOST").filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(raw) = lookup("TEMPO_PORT") {
            match raw.trim().parse() {
                Ok(port) => self.port = port,
                Err(e) => tracing::warn!("Ignoring TEMPO_PORT='{}': {}", raw, e),
            }
        }
        if let Some(raw) = lookup("TEMPO_RATE_LIMIT") {
            match raw.trim().parse() {
                Ok(rps) => self.rate_limit = rps,
                Err(e) => tracing::warn!("Ignoring TEMPO_RATE_LIMIT='{}': {}", raw, e),
            }
        }
        if let Some(raw) = lookup("TEMPO_CORS_ORIGINS") {
            let origins: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            self.cors_origins = Some(origins);
        }
        self
    }

    /// Apply CLI flag overrides.
    #[must_use]
    pub fn with_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    /// `host:port` bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// TESTS
// =============================================================================
