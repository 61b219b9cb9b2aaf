//! Customer location lookup.

use std::time::Duration;

use async_trait::async_trait;

use crate::checkout::DeliveryAddress;
use crate::config::SimulationConfig;
use crate::CommerceError;

/// Resolves the customer's current address for delivery.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_address(&self) -> Result<DeliveryAddress, CommerceError>;
}

/// Pretends to geolocate and always lands at the same address.
#[derive(Debug, Clone)]
pub struct SimulatedLocator {
    delay: Duration,
}

impl SimulatedLocator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.locate_delay())
    }
}

impl Default for SimulatedLocator {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

#[async_trait]
impl LocationProvider for SimulatedLocator {
    async fn current_address(&self) -> Result<DeliveryAddress, CommerceError> {
        tracing::debug!(delay_ms = self.delay.as_millis() as u64, "locating customer");
        tokio::time::sleep(self.delay).await;
        Ok(DeliveryAddress::new("123 Your Street, Apt 4B", "New York", "10001"))
    }
}
