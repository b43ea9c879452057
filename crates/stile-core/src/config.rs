//! Configuration management for stile.
//!
//! Loads configuration from ${STILE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the authentication server
    pub auth_base_url: String,

    /// Consecutive failures before attempts are locked out
    pub max_failures: u32,

    /// How long a lockout lasts, in seconds
    pub lockout_duration_secs: u64,

    /// Timeout for authentication requests, in seconds
    pub request_timeout_secs: u64,
}

impl Config {
    const DEFAULT_AUTH_BASE_URL: &str = "https://auth.example.com";
    pub const DEFAULT_MAX_FAILURES: u32 = 3;
    pub const DEFAULT_LOCKOUT_DURATION_SECS: u64 = 300;
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Loads configuration from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    pub fn lockout_duration(&self) -> Duration {
        Duration::from_secs(self.lockout_duration_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_base_url: Self::DEFAULT_AUTH_BASE_URL.to_string(),
            max_failures: Self::DEFAULT_MAX_FAILURES,
            lockout_duration_secs: Self::DEFAULT_LOCKOUT_DURATION_SECS,
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

pub mod paths {
    //! Path resolution for stile configuration and data files.
    //!
    //! STILE_HOME resolution order:
    //! 1. STILE_HOME environment variable (if set)
    //! 2. ~/.config/stile (default)

    use std::path::PathBuf;

    /// Returns the stile home directory.
    ///
    /// Checks STILE_HOME env var first, falls back to ~/.config/stile
    pub fn stile_home() -> PathBuf {
        if let Ok(home) = std::env::var("STILE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir()
            .map(|h| h.join(".config").join("stile"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        stile_home().join("config.toml")
    }

    /// Returns the path to the durable lockout record.
    pub fn lockout_path() -> PathBuf {
        stile_home().join("lockout.json")
    }

    /// Returns the path to the saved session token.
    pub fn session_path() -> PathBuf {
        stile_home().join("session.json")
    }
}
