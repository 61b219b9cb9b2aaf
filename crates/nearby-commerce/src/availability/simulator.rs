//! Simulated store reply channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::availability::{EtaLabel, RandomSource, ReplyMap, StoreReply};
use crate::catalog::Product;
use crate::checkout::StoreSelection;
use crate::config::SimulationConfig;
use crate::CommerceError;

/// Draws above this pick the longer ETA.
const LONG_ETA_CUTOFF: f64 = 0.5;

/// Asks a set of stores whether they carry a product.
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Resolve one reply per selected store.
    async fn request_availability(
        &self,
        stores: &StoreSelection,
        product: &Product,
    ) -> Result<ReplyMap, CommerceError>;
}

/// Stand-in for real store messaging.
///
/// Each request waits the configured delay and then draws an independent
/// reply per store from the injected [`RandomSource`]. Only one request may be
/// outstanding at a time; dropping the pending future cancels it and frees
/// the slot.
pub struct AvailabilitySimulator<R> {
    config: SimulationConfig,
    rng: Mutex<R>,
    in_flight: AtomicBool,
}

impl<R: RandomSource> AvailabilitySimulator<R> {
    /// Create a simulator.
    pub fn new(config: SimulationConfig, rng: R) -> Self {
        Self {
            config,
            rng: Mutex::new(rng),
            in_flight: AtomicBool::new(false),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Check if a request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Message the selected stores and wait for their replies.
    ///
    /// The result has exactly one entry per selected store.
    pub async fn request_availability(
        &self,
        stores: &StoreSelection,
        product: &Product,
    ) -> Result<ReplyMap, CommerceError> {
        if stores.is_empty() {
            return Err(CommerceError::EmptyStoreSelection);
        }
        let _slot = InFlightSlot::acquire(&self.in_flight)?;

        tracing::info!(
            product = %product.id,
            stores = ?stores.ids(),
            delay_ms = self.config.reply_delay_ms,
            "messaging stores"
        );
        tokio::time::sleep(self.config.reply_delay()).await;

        let replies = self.draw_replies(stores, product);
        tracing::info!(
            product = %product.id,
            available = replies.values().filter(|r| r.is_available()).count(),
            total = replies.len(),
            "store replies received"
        );
        Ok(replies)
    }

    fn draw_replies(&self, stores: &StoreSelection, product: &Product) -> ReplyMap {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);

        stores
            .ids()
            .iter()
            .map(|id| {
                let reply = if rng.next_f64() > self.config.availability_cutoff {
                    let price = product.price_range.interpolate(rng.next_f64());
                    let eta = if rng.next_f64() > LONG_ETA_CUTOFF {
                        EtaLabel::TwoToThreeHours
                    } else {
                        EtaLabel::OneToTwoHours
                    };
                    StoreReply::in_stock(price, eta)
                } else {
                    StoreReply::out_of_stock()
                };
                tracing::debug!(store = %id, available = reply.is_available(), "drew reply");
                (id.clone(), reply)
            })
            .collect()
    }
}

#[async_trait]
impl<R: RandomSource> AvailabilityProvider for AvailabilitySimulator<R> {
    async fn request_availability(
        &self,
        stores: &StoreSelection,
        product: &Product,
    ) -> Result<ReplyMap, CommerceError> {
        AvailabilitySimulator::request_availability(self, stores, product).await
    }
}

/// Holds the single in-flight slot until dropped.
struct InFlightSlot<'a>(&'a AtomicBool);

impl<'a> InFlightSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CommerceError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| {
                tracing::warn!("rejected availability request while another is pending");
                CommerceError::RequestInFlight
            })
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
