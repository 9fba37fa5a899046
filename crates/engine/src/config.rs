//! Configuration system for the virtual machine.
//!
//! This module defines the configuration structures used to parameterize a
//! machine. It provides:
//! 1. **Defaults:** Baseline constants (tape size, throttle threshold, yield delay).
//! 2. **Structures:** Hierarchical config for the tape and the execution scheduler.
//!
//! Configuration is supplied as JSON from the embedding host via
//! [`Config::from_json`], or use `Config::default()`.

use serde::Deserialize;
use std::time::Duration;

/// Default configuration constants for the machine.
mod defaults {
    /// Number of cells on the tape (512 bytes).
    pub const TAPE_SIZE: usize = 512;

    /// Instructions executed per scheduler batch during continuous runs.
    ///
    /// After this many instructions the machine yields to the host so a
    /// tight loop cannot starve it.
    pub const THROTTLE_THRESHOLD: u32 = 1000;

    /// Delay in milliseconds before a yielded continuous run resumes.
    pub const YIELD_DELAY_MS: u64 = 5;
}

/// Root configuration structure containing all machine settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use bfvm_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.tape.size, 512);
/// assert_eq!(config.exec.throttle, 1000);
/// ```
///
/// Deserializing from JSON (typical host usage):
///
/// ```
/// use bfvm_core::config::Config;
///
/// let json = r#"{
///     "tape": { "size": 64 },
///     "exec": { "throttle": 100, "yield_delay_ms": 1 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.tape.size, 64);
/// assert_eq!(config.exec.throttle, 100);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Tape memory configuration.
    #[serde(default)]
    pub tape: TapeConfig,
    /// Scheduler and throttling configuration.
    #[serde(default)]
    pub exec: ExecConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error for malformed JSON or
    /// wrongly-typed fields.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Tape memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TapeConfig {
    /// Number of cells on the tape.
    #[serde(default = "TapeConfig::default_size")]
    pub size: usize,
}

impl TapeConfig {
    /// Returns the default tape size in cells.
    fn default_size() -> usize {
        defaults::TAPE_SIZE
    }
}

impl Default for TapeConfig {
    fn default() -> Self {
        Self {
            size: defaults::TAPE_SIZE,
        }
    }
}

/// Scheduler and throttling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecConfig {
    /// Instructions executed per batch during continuous runs.
    #[serde(default = "ExecConfig::default_throttle")]
    pub throttle: u32,

    /// Delay in milliseconds before a yielded continuous run resumes.
    #[serde(default = "ExecConfig::default_yield_delay_ms")]
    pub yield_delay_ms: u64,
}

impl ExecConfig {
    /// Returns the default throttle threshold.
    fn default_throttle() -> u32 {
        defaults::THROTTLE_THRESHOLD
    }

    /// Returns the default yield delay in milliseconds.
    fn default_yield_delay_ms() -> u64 {
        defaults::YIELD_DELAY_MS
    }

    /// Returns the yield delay as a [`Duration`].
    pub const fn yield_delay(&self) -> Duration {
        Duration::from_millis(self.yield_delay_ms)
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            throttle: defaults::THROTTLE_THRESHOLD,
            yield_delay_ms: defaults::YIELD_DELAY_MS,
        }
    }
}
