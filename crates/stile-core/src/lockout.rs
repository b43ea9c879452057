//! Brute-force lockout policy.
//!
//! Tracks consecutive authentication failures and a lockout expiry in
//! `${STILE_HOME}/lockout.json`. The record survives restarts; every
//! mutation is written to disk before the caller proceeds.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::clock::now_millis_u64;
use crate::config::{self, Config};
use crate::persist;

/// Durable lockout record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockoutRecord {
    /// Consecutive failed attempts since the last success.
    pub failure_count: u32,
    /// Epoch-millisecond timestamp until which attempts are rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lockout_expiry: Option<u64>,
}

/// Counts failures and locks out once the threshold is reached.
#[derive(Debug)]
pub struct LockoutPolicy {
    record: LockoutRecord,
    path: PathBuf,
    max_failures: u32,
    lockout_duration: Duration,
}

impl LockoutPolicy {
    /// Loads the policy from the default record path.
    pub fn load(config: &Config) -> Result<Self> {
        Self::load_from(
            config::paths::lockout_path(),
            config.max_failures,
            config.lockout_duration(),
        )
    }

    /// Loads the record from `path`, treating an absent file as a zero record.
    pub fn load_from(path: PathBuf, max_failures: u32, lockout_duration: Duration) -> Result<Self> {
        let record = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read lockout record from {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse lockout record from {}", path.display()))?
        } else {
            LockoutRecord::default()
        };

        Ok(Self {
            record,
            path,
            max_failures,
            lockout_duration,
        })
    }

    pub fn record(&self) -> &LockoutRecord {
        &self.record
    }

    pub fn failure_count(&self) -> u32 {
        self.record.failure_count
    }

    /// True while a lockout expiry is set and not yet elapsed.
    ///
    /// An elapsed expiry means unlocked, but the stale record stays on
    /// disk until the next success clears it or the next failure
    /// overwrites it.
    pub fn is_locked_out(&self) -> bool {
        match self.record.lockout_expiry {
            Some(expiry) => now_millis_u64() < expiry,
            None => false,
        }
    }

    /// Counts one failed attempt; reaching `max_failures` sets the expiry.
    pub fn record_failure(&mut self) -> Result<()> {
        self.record.failure_count += 1;
        if self.record.failure_count >= self.max_failures {
            let duration_ms =
                u64::try_from(self.lockout_duration.as_millis()).unwrap_or(u64::MAX);
            self.record.lockout_expiry = Some(now_millis_u64().saturating_add(duration_ms));
        }
        self.persist()
    }

    /// Clears the record after a successful login.
    pub fn record_success(&mut self) -> Result<()> {
        self.record = LockoutRecord::default();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.record)
            .context("Failed to serialize lockout record")?;
        persist::write_atomic(&self.path, &contents)
    }
}
