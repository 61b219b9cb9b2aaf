//! Read-only catalog access.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{seed, Product, Store};
use crate::ids::{ProductId, StoreId};
use crate::CommerceError;

/// Read-only access to products and stores.
///
/// Implementations are built once at startup and shared by reference. A
/// missing record is `None`, never an error.
pub trait CatalogRepository: Send + Sync {
    /// Look up a product by id.
    fn product(&self, id: &ProductId) -> Option<&Product>;

    /// Look up a store by id.
    fn store(&self, id: &StoreId) -> Option<&Store>;

    /// All products, in catalog order.
    fn products(&self) -> &[Product];

    /// All stores, in catalog order.
    fn stores(&self) -> &[Store];
}

/// A catalog held entirely in memory.
///
/// Deserializing runs the same checks as [`InMemoryCatalog::new`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogDocument")]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    stores: Vec<Store>,
}

/// Wire form of [`InMemoryCatalog`].
#[derive(Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    stores: Vec<Store>,
}

impl TryFrom<CatalogDocument> for InMemoryCatalog {
    type Error = CommerceError;

    fn try_from(document: CatalogDocument) -> Result<Self, Self::Error> {
        Self::new(document.products, document.stores)
    }
}

impl InMemoryCatalog {
    /// Create a catalog, checking its invariants.
    pub fn new(products: Vec<Product>, stores: Vec<Store>) -> Result<Self, CommerceError> {
        let catalog = Self { products, stores };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The reference catalog used by the prototype.
    pub fn seeded() -> Self {
        Self {
            products: seed::products(),
            stores: seed::stores(),
        }
    }

    /// Load a catalog document of the form `{"products": [...], "stores": [...]}`.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let catalog = Self::try_from(document)?;
        tracing::debug!(
            products = catalog.products.len(),
            stores = catalog.stores.len(),
            "loaded catalog document"
        );
        Ok(catalog)
    }

    /// Serialize the catalog as a JSON document.
    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check id uniqueness, price ranges, and distances.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let mut product_ids = HashSet::new();
        for product in &self.products {
            if !product_ids.insert(&product.id) {
                return Err(invalid(format!("duplicate product id {}", product.id)));
            }
            if !product.price_range.is_valid() {
                return Err(invalid(format!(
                    "product {} has an invalid price range",
                    product.id
                )));
            }
            let mut color_ids = HashSet::new();
            for color in &product.colors {
                if !color_ids.insert(&color.id) {
                    return Err(invalid(format!(
                        "product {} has duplicate color id {}",
                        product.id, color.id
                    )));
                }
            }
        }

        let mut store_ids = HashSet::new();
        for store in &self.stores {
            if !store_ids.insert(&store.id) {
                return Err(invalid(format!("duplicate store id {}", store.id)));
            }
            if !store.distance_km.is_finite() || store.distance_km < 0.0 {
                return Err(invalid(format!(
                    "store {} has invalid distance {}",
                    store.id, store.distance_km
                )));
            }
        }

        Ok(())
    }
}

fn invalid(reason: String) -> CommerceError {
    CommerceError::InvalidCatalog(reason)
}

impl CatalogRepository for InMemoryCatalog {
    fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    fn store(&self, id: &StoreId) -> Option<&Store> {
        self.stores.iter().find(|s| &s.id == id)
    }

    fn products(&self) -> &[Product] {
        &self.products
    }

    fn stores(&self) -> &[Store] {
        &self.stores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_seeded_catalog_is_valid() {
        let catalog = InMemoryCatalog::seeded();
        assert_eq!(catalog.products().len(), 4);
        assert_eq!(catalog.stores().len(), 6);
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_lookup_hit_and_miss() {
        let catalog = InMemoryCatalog::seeded();
        assert_eq!(
            catalog.product(&ProductId::new("2")).map(|p| p.brand.as_str()),
            Some("DeWalt")
        );
        assert!(catalog.product(&ProductId::new("99")).is_none());
        assert!(catalog.store(&StoreId::new("s7")).is_none());
    }

    #[test]
    fn test_lookup_is_idempotent() {
        let catalog = InMemoryCatalog::seeded();
        let id = StoreId::new("s3");
        assert_eq!(catalog.store(&id), catalog.store(&id));
        let pid = ProductId::new("1");
        assert_eq!(catalog.product(&pid), catalog.product(&pid));
    }

    #[test]
    fn test_duplicate_store_rejected() {
        let mut stores = seed::stores();
        stores[1].id = StoreId::new("s1");
        let err = InMemoryCatalog::new(seed::products(), stores).unwrap_err();
        assert!(matches!(err, CommerceError::InvalidCatalog(_)));
    }

    #[test]
    fn test_inverted_price_range_rejected() {
        let mut products = seed::products();
        products[0].price_range.min = Money::usd(99_999);
        assert!(InMemoryCatalog::new(products, seed::stores()).is_err());
    }

    #[test]
    fn test_negative_distance_rejected() {
        let mut stores = seed::stores();
        stores[0].distance_km = -1.0;
        assert!(InMemoryCatalog::new(Vec::new(), stores).is_err());
    }

    #[test]
    fn test_json_document_reload() {
        let catalog = InMemoryCatalog::seeded();
        let json = catalog.to_json().unwrap();
        let reloaded = InMemoryCatalog::from_json(&json).unwrap();
        assert_eq!(reloaded, catalog);
    }

    #[test]
    fn test_invalid_document_rejected_on_every_path() {
        let mut stores = seed::stores();
        stores[0].distance_km = -1.0;
        let json = serde_json::json!({ "stores": stores }).to_string();

        assert!(matches!(
            InMemoryCatalog::from_json(&json),
            Err(CommerceError::InvalidCatalog(_))
        ));
        let err = serde_json::from_str::<InMemoryCatalog>(&json).unwrap_err();
        assert!(err.to_string().contains("invalid distance"));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            InMemoryCatalog::from_json("{\"products\": 3}"),
            Err(CommerceError::SerializationError(_))
        ));
    }
}
