//! Configuration file support for Healthlog.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/healthlog/config.toml`.
//! The `[validation]` section is the single canonical rule set used by every
//! validator in this crate.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationRules,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Inclusive numeric bounds
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True for finite values within `[min, max]`
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }
}

/// Inclusive character-count bounds
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LengthRule {
    pub min: usize,
    pub max: usize,
}

/// Canonical validation rule set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ValidationRules {
    /// Height in cm
    #[serde(default = "default_height")]
    pub height: Bounds,

    /// Weight in kg
    #[serde(default = "default_weight")]
    pub weight: Bounds,

    #[serde(default = "default_systolic")]
    pub systolic: Bounds,

    #[serde(default = "default_diastolic")]
    pub diastolic: Bounds,

    #[serde(default = "default_username_length")]
    pub username_length: LengthRule,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            height: default_height(),
            weight: default_weight(),
            systolic: default_systolic(),
            diastolic: default_diastolic(),
            username_length: default_username_length(),
        }
    }
}

impl ValidationRules {
    /// Reject rule sets whose bounds are inverted or non-finite
    pub fn check(&self) -> Result<()> {
        let numeric = [
            ("height", self.height),
            ("weight", self.weight),
            ("systolic", self.systolic),
            ("diastolic", self.diastolic),
        ];
        for (name, bounds) in numeric {
            if !bounds.min.is_finite() || !bounds.max.is_finite() || bounds.min > bounds.max {
                return Err(Error::Config(format!(
                    "validation.{} bounds are invalid: min={} max={}",
                    name, bounds.min, bounds.max
                )));
            }
        }
        if self.username_length.min == 0 || self.username_length.min > self.username_length.max {
            return Err(Error::Config(format!(
                "validation.username_length bounds are invalid: min={} max={}",
                self.username_length.min, self.username_length.max
            )));
        }
        Ok(())
    }
}

/// Export configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

// Default value functions
fn default_height() -> Bounds {
    Bounds::new(100.0, 250.0)
}

fn default_weight() -> Bounds {
    Bounds::new(30.0, 200.0)
}

fn default_systolic() -> Bounds {
    Bounds::new(70.0, 200.0)
}

fn default_diastolic() -> Bounds {
    Bounds::new(40.0, 130.0)
}

fn default_username_length() -> LengthRule {
    LengthRule { min: 4, max: 20 }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(config_path) if config_path.exists() => Self::load_from(&config_path),
            config_path => {
                tracing::info!(
                    "No config file found at {:?}, using defaults",
                    config_path
                );
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validation.check()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path, if the platform has a config dir
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|base| base.join("healthlog").join("config.toml"))
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
