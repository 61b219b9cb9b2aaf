//! Product text search.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogRepository, Product};

/// Categories offered as browse filters.
pub const SEARCH_CATEGORIES: [&str; 5] = [
    "Home & Kitchen",
    "Electronics",
    "Hardware",
    "Sports & Outdoors",
    "Tools",
];

/// A product search query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    /// Free text matched against name, brand, and category.
    pub text: String,
    /// Exact category filter.
    pub category: Option<String>,
}

impl ProductQuery {
    /// Create a new query from free text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
        }
    }

    /// Restrict results to one category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// A query with blank text never matches anything.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Check if a product satisfies this query.
    pub fn matches(&self, product: &Product) -> bool {
        if self.is_blank() {
            return false;
        }

        let needle = self.text.to_lowercase();
        let text_hit = [&product.name, &product.brand, &product.category]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));

        text_hit
            && self
                .category
                .as_deref()
                .map_or(true, |category| product.category == category)
    }
}

/// Run a text search over the catalog, preserving catalog order.
pub fn search_products<'a, C>(catalog: &'a C, query: &ProductQuery) -> Vec<&'a Product>
where
    C: CatalogRepository + ?Sized,
{
    let results: Vec<&Product> = catalog
        .products()
        .iter()
        .filter(|product| query.matches(product))
        .collect();

    tracing::debug!(
        text = %query.text,
        category = ?query.category,
        found = results.len(),
        "product search"
    );

    results
}

/// The first `count` products, shown before any search is made.
pub fn featured_products<C>(catalog: &C, count: usize) -> Vec<&Product>
where
    C: CatalogRepository + ?Sized,
{
    catalog.products().iter().take(count).collect()
}
