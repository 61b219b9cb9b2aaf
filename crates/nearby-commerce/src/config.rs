//! Simulation configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::CommerceError;

/// Tunables for the simulated store channel and geolocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Delay before store replies arrive, in milliseconds.
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Delay before the simulated location lookup resolves, in milliseconds.
    #[serde(default = "default_locate_delay_ms")]
    pub locate_delay_ms: u64,

    /// A store is in stock when its draw is strictly above this value.
    #[serde(default = "default_availability_cutoff")]
    pub availability_cutoff: f64,

    /// Number of nearby stores offered for messaging.
    #[serde(default = "default_nearby_limit")]
    pub nearby_limit: usize,

    /// Fixed seed for reproducible replies. Entropy is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_reply_delay_ms() -> u64 {
    2500
}

fn default_locate_delay_ms() -> u64 {
    1500
}

fn default_availability_cutoff() -> f64 {
    0.3
}

fn default_nearby_limit() -> usize {
    crate::search::DEFAULT_NEARBY_LIMIT
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            locate_delay_ms: default_locate_delay_ms(),
            availability_cutoff: default_availability_cutoff(),
            nearby_limit: default_nearby_limit(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Delay before store replies arrive.
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }

    /// Delay before the location lookup resolves.
    pub fn locate_delay(&self) -> Duration {
        Duration::from_millis(self.locate_delay_ms)
    }

    /// Set a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the values are usable.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if !(0.0..=1.0).contains(&self.availability_cutoff) {
            return Err(CommerceError::InvalidConfig(format!(
                "availability_cutoff must be within [0, 1], got {}",
                self.availability_cutoff
            )));
        }
        Ok(())
    }
}
