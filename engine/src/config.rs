//! Configuration management for the CoalWatch engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with COALWATCH_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

use crate::ingest::IngestMode;
use crate::services::StochasticRiskModel;

/// Engine configuration
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    /// Current environment (development, production)
    pub environment: String,

    /// Forecast configuration
    pub forecast: ForecastConfig,

    /// Ingestion configuration
    pub ingest: IngestConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ForecastConfig {
    /// Number of days each forecast run covers
    pub horizon_days: u32,

    /// Fixed RNG seed for the reference model; unset means entropy-seeded
    #[serde(default)]
    pub seed: Option<u64>,
}

impl ForecastConfig {
    /// Reference risk model implied by this configuration.
    pub fn model(&self) -> StochasticRiskModel {
        match self.seed {
            Some(seed) => StochasticRiskModel::from_seed(seed),
            None => StochasticRiskModel::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct IngestConfig {
    /// Abort a batch on the first bad row instead of skipping it
    pub strict: bool,
}

impl IngestConfig {
    /// Ingest mode implied by this configuration.
    pub fn mode(&self) -> IngestMode {
        if self.strict {
            IngestMode::Strict
        } else {
            IngestMode::Lenient
        }
    }
}

impl EngineConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("COALWATCH_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("forecast.horizon_days", 30)?
            .set_default("ingest.strict", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (COALWATCH_ prefix)
            .add_source(
                Environment::with_prefix("COALWATCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            seed: None,
        }
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { strict: false }
    }
}
