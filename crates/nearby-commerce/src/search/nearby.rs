//! Nearby-store matching.

use crate::catalog::{CatalogRepository, Store};

/// Category value that matches every store.
pub const ALL_CATEGORIES: &str = "All";

/// Number of stores offered when the caller doesn't say.
pub const DEFAULT_NEARBY_LIMIT: usize = 4;

/// Find the closest stores that carry a category.
///
/// Stores are kept when their category equals `category`, or unconditionally
/// when `category` is [`ALL_CATEGORIES`]. They are ordered by ascending
/// distance; ties keep catalog order. At most `limit` stores are returned and
/// an empty result is not an error.
pub fn find_nearby_stores<'a, C>(catalog: &'a C, category: &str, limit: usize) -> Vec<&'a Store>
where
    C: CatalogRepository + ?Sized,
{
    let mut matches: Vec<&Store> = catalog
        .stores()
        .iter()
        .filter(|store| category == ALL_CATEGORIES || store.category == category)
        .collect();

    // sort_by is stable
    matches.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    matches.truncate(limit);

    tracing::debug!(
        category,
        limit,
        found = matches.len(),
        "matched nearby stores"
    );

    matches
}
