//! Glide configuration system
//!
//! This crate provides centralized configuration for Glide animations,
//! loading defaults from `glide.toml` with environment variable overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Default duration applied to every new animation, in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 500.0;

/// Errors that can occur while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`GlideConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Main configuration structure for Glide
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GlideConfig {
    /// Timing defaults for new animations
    pub timing: TimingConfig,
    /// Easing alias table extensions
    pub easing: EasingConfig,
}

/// Timing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingConfig {
    /// Duration of a transition in milliseconds (default: 500)
    pub duration_ms: f64,
    /// Easing applied to every new animation, if any (e.g. "in-out")
    pub easing: Option<String>,
}

/// Easing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct EasingConfig {
    /// Extra alias -> CSS timing function mappings, consulted before the built-in table
    pub aliases: BTreeMap<String, String>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: None,
        }
    }
}

impl GlideConfig {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the glide.toml configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration from the default location (glide.toml in the current directory)
    /// or return default configuration if the file doesn't exist
    pub fn load_or_default() -> Self {
        Self::load_from_file("glide.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("GLIDE_DURATION_MS") {
            if let Ok(ms) = val.parse::<f64>() {
                self.timing.duration_ms = ms;
            }
        }
        if let Ok(easing) = std::env::var("GLIDE_EASING") {
            self.timing.easing = if easing.is_empty() { None } else { Some(easing) };
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from glide.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
