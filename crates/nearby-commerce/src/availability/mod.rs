//! Availability module.
//!
//! Simulated store replies and location lookup. Both sit behind async traits
//! so a real messaging channel or geolocation service can replace them.

mod locate;
mod random;
mod reply;
mod simulator;

pub use locate::{LocationProvider, SimulatedLocator};
pub use random::{RandomSource, ScriptedRandom, SeededRandom};
pub use reply::{available_store_ids, EtaLabel, ReplyMap, StoreReply};
pub use simulator::{AvailabilityProvider, AvailabilitySimulator};
