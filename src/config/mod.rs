//! Configuration module - environment variable parsing

use std::env;

use crate::util::time::DEFAULT_TICK_RATE;

/// Simulation configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Seed for the per-simulation RNG (multishot spread jitter)
    pub seed: u64,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl SimConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Result<Self, ConfigError> {
        let tick_rate = match env::var("SIM_TICK_RATE") {
            Ok(v) => v
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidTickRate(v))?,
            Err(_) => DEFAULT_TICK_RATE,
        };

        if tick_rate == 0 {
            return Err(ConfigError::InvalidTickRate("0".to_string()));
        }

        let seed = match env::var("SIM_SEED") {
            Ok(v) => v.parse::<u64>().map_err(|_| ConfigError::InvalidSeed(v))?,
            Err(_) => 0,
        };

        Ok(Self {
            tick_rate,
            seed,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: DEFAULT_TICK_RATE,
            seed: 0,
            log_level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid tick rate: {0}")]
    InvalidTickRate(String),

    #[error("Invalid RNG seed: {0}")]
    InvalidSeed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_baseline() {
        let config = SimConfig::default();
        assert_eq!(config.tick_rate, 60);
        assert_eq!(config.seed, 0);
    }
}
