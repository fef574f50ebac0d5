use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult};

/// Monte-Carlo engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Base seed for reproducibility (None = fresh entropy on every call)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Simulate path chunks on the rayon pool (needs the `parallel` feature)
    #[serde(default)]
    pub parallel: bool,
    /// Paths per RNG stream
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            seed: None,
            parallel: false,
            chunk_size: default_chunk_size(),
        }
    }
}

impl MonteCarloConfig {
    /// Deterministic engine: same seed, same prices.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        if self.chunk_size == 0 {
            return Err(PricingError::invalid_parameter(
                "chunk_size",
                "must be at least 1, got 0",
            ));
        }
        Ok(())
    }
}

/// Settings for the adaptive Monte-Carlo calibration loop.
///
/// The defaults reproduce the reference search: start from one path and one
/// step, stop once the step count exceeds 20,000, never cap the path count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationConfig {
    #[serde(default = "default_initial_count")]
    pub initial_paths: usize,

    #[serde(default = "default_initial_count")]
    pub initial_steps: usize,

    /// The loop stops at its head once `steps > max_steps`
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Optional guard on path growth (None = unbounded, as in the reference loop)
    #[serde(default)]
    pub max_paths: Option<usize>,

    #[serde(default)]
    pub monte_carlo: MonteCarloConfig,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            initial_paths: default_initial_count(),
            initial_steps: default_initial_count(),
            max_steps: default_max_steps(),
            max_paths: None,
            monte_carlo: MonteCarloConfig::default(),
        }
    }
}

impl CalibrationConfig {
    /// Exact reference behaviour, unseeded
    pub fn reference() -> Self {
        Self::default()
    }

    /// Reference behaviour with a fixed seed, for tests and reproducible reports
    pub fn reproducible(seed: u64) -> Self {
        Self {
            monte_carlo: MonteCarloConfig::seeded(seed),
            ..Self::default()
        }
    }

    /// Bounded search for interactive use: lower step cap, path cap, parallel paths
    pub fn fast() -> Self {
        Self {
            initial_paths: 1,
            initial_steps: 1,
            max_steps: 256,
            max_paths: Some(1 << 20),
            monte_carlo: MonteCarloConfig {
                parallel: true,
                ..MonteCarloConfig::default()
            },
        }
    }

    pub fn validate(&self) -> PricingResult<()> {
        if self.initial_paths == 0 {
            return Err(PricingError::invalid_parameter(
                "initial_paths",
                "must be at least 1, got 0",
            ));
        }
        if self.initial_steps == 0 {
            return Err(PricingError::invalid_parameter(
                "initial_steps",
                "must be at least 1, got 0",
            ));
        }
        if self.max_paths == Some(0) {
            return Err(PricingError::invalid_parameter(
                "max_paths",
                "must be at least 1 when set",
            ));
        }
        self.monte_carlo.validate()
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> PricingResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| PricingError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading calibration config {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("parsing calibration config {}", path.display()))
    }
}

fn default_chunk_size() -> usize {
    4096
}

fn default_initial_count() -> usize {
    1
}

fn default_max_steps() -> usize {
    20_000
}
