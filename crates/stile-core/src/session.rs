//! Saved session token cache.
//!
//! Stores the session token in `${STILE_HOME}/session.json` with
//! restricted permissions (0600). Tokens are never logged in full.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config;
use crate::gateway::SessionToken;
use crate::persist;

/// File-backed store for the "remember me" session token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default session path.
    pub fn new() -> Self {
        Self::at(config::paths::session_path())
    }

    /// Store at a specific path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the saved token, if any. An absent file means no token.
    pub fn load(&self) -> Result<Option<SessionToken>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;
        let token = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))?;
        Ok(Some(token))
    }

    /// Loads the saved token, filtering out an expired one.
    pub fn load_valid(&self) -> Result<Option<SessionToken>> {
        Ok(self.load()?.filter(|token| !token.is_expired()))
    }

    /// Persists `token`, overwriting any previous one. Idempotent.
    pub fn save(&self, token: &SessionToken) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(token).context("Failed to serialize session token")?;
        persist::write_atomic_private(&self.path, &contents)
    }

    /// Removes the saved token. Safe to call when nothing is stored.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove session at {}", self.path.display())),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
///
/// Counts characters, not bytes; tokens come from an external server
/// and need not be ASCII.
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 16 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(12).collect();
    format!("{prefix}...")
}
