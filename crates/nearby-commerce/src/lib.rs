//! Domain logic for the "find it at a nearby store" shopping flow.
//!
//! This crate provides the engine behind the flow:
//!
//! - **Catalog**: Read-only products, colors, and stores behind [`CatalogRepository`]
//! - **Search**: Product text search and the nearby-store matcher
//! - **Availability**: Simulated store replies with an injectable random source
//! - **Checkout**: Fulfillment options, form validation, and the purchase flow state machine
//!
//! # Example
//!
//! ```rust,ignore
//! use nearby_commerce::prelude::*;
//!
//! let catalog = InMemoryCatalog::seeded();
//! let product = catalog.product(&ProductId::new("4")).unwrap();
//! let stores = find_nearby_stores(&catalog, &product.category, DEFAULT_NEARBY_LIMIT);
//!
//! let mut flow = PurchaseFlow::new(product.clone());
//! flow.choose_color(&ColorId::new("c1"))?;
//! flow.toggle_store(&catalog, &stores[0].id)?;
//!
//! let simulator = AvailabilitySimulator::new(SimulationConfig::default(), SeededRandom::from_entropy());
//! let ticket = flow.begin_request()?;
//! let replies = simulator.request_availability(flow.selected_stores().unwrap(), &product).await?;
//! flow.receive_replies(&ticket, replies)?;
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod money;

pub mod availability;
pub mod catalog;
pub mod checkout;
pub mod search;

pub use config::SimulationConfig;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::SimulationConfig;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        CatalogRepository, Color, GeoPoint, InMemoryCatalog, PriceRange, Product, Store,
        StoreHours,
    };

    // Search
    pub use crate::search::{
        featured_products, find_nearby_stores, search_products, ProductQuery, ALL_CATEGORIES,
        DEFAULT_NEARBY_LIMIT, SEARCH_CATEGORIES,
    };

    // Availability
    pub use crate::availability::{
        AvailabilityProvider, AvailabilitySimulator, EtaLabel, LocationProvider, RandomSource,
        ReplyMap, ScriptedRandom, SeededRandom, SimulatedLocator, StoreReply,
    };

    // Checkout
    pub use crate::checkout::{
        list_options, DeliveryAddress, FlowState, FlowStep, Fulfillment, FulfillmentForm,
        FulfillmentKind, FulfillmentOption, OrderStatus, OrderSummary, PurchaseFlow,
        StoreSelection,
    };
}
