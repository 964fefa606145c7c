//! World configuration.
//!
//! All tunables of the streaming world and the headless driver live in one JSON document.
//! Missing fields fall back to their defaults, so `{}` is a valid configuration.
//!
//! ```json
//! {
//!     "grid_dimension": 5,
//!     "block_size": 8.0,
//!     "load_margin": 32.0,
//!     "ordering": "approach",
//!     "seed": 42
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine_state::tiles::OrderingPolicy;

/// Errors raised while loading a [`WorldConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid configuration JSON
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is outside its allowed range
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables of the chunk grid, the camera and the headless driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    // === Grid ===
    /// Chunks along each side of the grid
    pub grid_dimension: usize,
    /// World-space edge length of one block
    pub block_size: f32,
    /// Margin added around the camera view before visibility tests
    pub load_margin: f32,
    /// Sub-region ordering of chunk loads
    pub ordering: OrderingPolicy,
    /// Seed for block values, coin flips and shuffles (None = random)
    pub seed: Option<u64>,

    // === Camera ===
    /// View width and height in world units
    pub viewport: [f32; 2],
    /// World units moved per unit of pan input
    pub camera_speed: f32,

    // === Miners ===
    /// Number of miners spawned in the centre chunk
    pub miner_count: usize,
    /// Seconds between miner steps
    pub miner_step_seconds: f32,

    // === Driver ===
    /// Simulation ticks per second
    pub tick_rate: f32,
    /// Ticks simulated by the headless driver
    pub simulation_ticks: u64,
    /// Ticks per full circle of the driver's camera path
    pub pan_period_ticks: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            grid_dimension: 5,
            block_size: 8.0,
            load_margin: 32.0,
            ordering: OrderingPolicy::Approach,
            seed: None,
            viewport: [800.0, 640.0],
            camera_speed: 10.0,
            miner_count: 10,
            miner_step_seconds: 1.0,
            tick_rate: 60.0,
            simulation_ticks: 600,
            pan_period_ticks: 240,
        }
    }
}

impl WorldConfig {
    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates the JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_dimension == 0 {
            return Err(ConfigError::Invalid("grid_dimension must be at least 1".into()));
        }
        if !is_positive(self.block_size) {
            return Err(ConfigError::Invalid(format!(
                "block_size must be positive, got {}",
                self.block_size
            )));
        }
        if self.load_margin.is_nan() || self.load_margin < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "load_margin must not be negative, got {}",
                self.load_margin
            )));
        }
        if !self.viewport.iter().all(|&side| is_positive(side)) {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive, got {:?}",
                self.viewport
            )));
        }
        if !is_positive(self.tick_rate) {
            return Err(ConfigError::Invalid(format!(
                "tick_rate must be positive, got {}",
                self.tick_rate
            )));
        }
        if !is_positive(self.miner_step_seconds) {
            return Err(ConfigError::Invalid(format!(
                "miner_step_seconds must be positive, got {}",
                self.miner_step_seconds
            )));
        }
        if self.pan_period_ticks == 0 {
            return Err(ConfigError::Invalid("pan_period_ticks must be at least 1".into()));
        }
        Ok(())
    }
}

/// Strictly positive and not NaN.
fn is_positive(value: f32) -> bool {
    !value.is_nan() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_the_reference_sizing() {
        let config = WorldConfig::default();
        assert_eq!(config.grid_dimension, 5);
        assert_eq!(config.block_size, 8.0);
        assert_eq!(config.ordering, OrderingPolicy::Approach);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_uses_defaults() {
        assert_eq!(WorldConfig::from_json_str("{}").unwrap(), WorldConfig::default());
    }

    #[test]
    fn partial_document_overrides_named_fields() {
        let config =
            WorldConfig::from_json_str(r#"{ "ordering": "shuffled", "seed": 42, "grid_dimension": 7 }"#)
                .unwrap();
        assert_eq!(config.ordering, OrderingPolicy::Shuffled);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.grid_dimension, 7);
        assert_eq!(config.block_size, 8.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "block_size": 0.0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "grid_dimension": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            WorldConfig::from_json_str(r#"{ "ordering": "spiral" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn nan_values_are_rejected() {
        let configs = [
            WorldConfig { block_size: f32::NAN, ..WorldConfig::default() },
            WorldConfig { load_margin: f32::NAN, ..WorldConfig::default() },
            WorldConfig { viewport: [800.0, f32::NAN], ..WorldConfig::default() },
            WorldConfig { tick_rate: f32::NAN, ..WorldConfig::default() },
            WorldConfig { miner_step_seconds: f32::NAN, ..WorldConfig::default() },
        ];
        for config in configs {
            assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))), "{config:?}");
        }

        let negative_margin = WorldConfig { load_margin: -1.0, ..WorldConfig::default() };
        assert!(negative_margin.validate().is_err());
    }

    #[test]
    fn load_reads_a_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, r#"{{ "load_margin": 0.0, "miner_count": 2 }}"#).expect("write config");

        let config = WorldConfig::load(file.path()).unwrap();
        assert_eq!(config.load_margin, 0.0);
        assert_eq!(config.miner_count, 2);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = WorldConfig::load("/nonexistent/tile-world.json").unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
        assert!(error.to_string().contains("/nonexistent/tile-world.json"));
    }
}
