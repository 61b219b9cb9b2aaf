//! Search module.
//!
//! Product text search and the nearby-store matcher.

mod nearby;
mod query;

pub use nearby::{find_nearby_stores, ALL_CATEGORIES, DEFAULT_NEARBY_LIMIT};
pub use query::{featured_products, search_products, ProductQuery, SEARCH_CATEGORIES};
