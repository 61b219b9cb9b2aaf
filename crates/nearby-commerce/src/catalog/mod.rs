//! Product catalog module.
//!
//! Contains products, colors, stores, and the read-only repository that owns them.

mod product;
mod repository;
mod seed;
mod store;

pub use product::{Color, PriceRange, Product};
pub use repository::{CatalogRepository, InMemoryCatalog};
pub use store::{GeoPoint, Store, StoreHours};
