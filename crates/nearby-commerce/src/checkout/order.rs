//! Order summary types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Color, PriceRange, Product, Store};
use crate::checkout::DeliveryAddress;
use crate::ids::{OrderId, ProductId, StoreId};
use crate::money::Money;
use crate::CommerceError;

/// Pickup time shown on the summary.
pub const PICKUP_SUMMARY_ETA: &str = "~1 hour";

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order placed, awaiting store confirmation.
    #[default]
    Pending,
    /// Store confirmed the order.
    Confirmed,
    /// Ready for pickup or out for delivery.
    Ready,
    /// Handed to the customer.
    Completed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Ready => "ready",
            OrderStatus::Completed => "completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Ready => "Ready",
            OrderStatus::Completed => "Completed",
        }
    }

    /// The status that follows this one, if any.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Ready),
            OrderStatus::Ready => Some(OrderStatus::Completed),
            OrderStatus::Completed => None,
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed)
    }
}

/// The product as it was when the order was placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub price_range: PriceRange,
    pub image: Option<String>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            price_range: product.price_range,
            image: product.primary_image().map(str::to_string),
        }
    }
}

/// The pickup store as it was when the order was placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickupStore {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub distance_km: f64,
    pub phone: String,
}

impl From<&Store> for PickupStore {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id.clone(),
            name: store.name.clone(),
            address: store.address.clone(),
            city: store.city.clone(),
            distance_km: store.distance_km,
            phone: store.phone.clone(),
        }
    }
}

/// How the order will be fulfilled, with everything the summary shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OrderFulfillment {
    Delivery {
        address: DeliveryAddress,
        fee: Money,
        eta: String,
    },
    Pickup { store: PickupStore, eta: String },
}

impl OrderFulfillment {
    /// Time estimate shown to the customer.
    pub fn eta(&self) -> &str {
        match self {
            OrderFulfillment::Delivery { eta, .. } | OrderFulfillment::Pickup { eta, .. } => eta,
        }
    }
}

/// A confirmed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSummary {
    /// Unique order identifier.
    pub id: OrderId,
    /// Ordered product.
    pub product: ProductSnapshot,
    /// Chosen color.
    pub color: Color,
    /// Fulfillment details.
    pub fulfillment: OrderFulfillment,
    /// Order status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

impl OrderSummary {
    /// Create a confirmed order.
    pub fn new(
        product: &Product,
        color: Color,
        fulfillment: OrderFulfillment,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: OrderId::generate(),
            product: ProductSnapshot::from(product),
            color,
            fulfillment,
            status: OrderStatus::Confirmed,
            created_at,
        }
    }

    /// Move to the next status.
    pub fn advance(&mut self) -> Result<OrderStatus, CommerceError> {
        let next = self.status.next().ok_or_else(|| CommerceError::InvalidTransition {
            from: self.status.as_str().to_string(),
            to: "none".to_string(),
        })?;
        self.status = next;
        Ok(next)
    }

    /// Check if this is a pickup order.
    pub fn is_pickup(&self) -> bool {
        matches!(self.fulfillment, OrderFulfillment::Pickup { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogRepository, InMemoryCatalog};
    use crate::ids::ColorId;

    fn summary() -> OrderSummary {
        let catalog = InMemoryCatalog::seeded();
        let product = catalog.product(&ProductId::new("4")).unwrap();
        let store = catalog.store(&StoreId::new("s2")).unwrap();
        let color = product.color(&ColorId::new("c1")).cloned().unwrap();
        OrderSummary::new(
            product,
            color,
            OrderFulfillment::Pickup {
                store: PickupStore::from(store),
                eta: PICKUP_SUMMARY_ETA.to_string(),
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_summary_snapshots_product() {
        let order = summary();
        assert_eq!(order.product.name, "LED Smart Bulb 16M Colors");
        assert_eq!(order.product.price_range.display(), "$49.99 - $79.99");
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert!(order.is_pickup());
        assert_eq!(order.fulfillment.eta(), "~1 hour");
    }

    #[test]
    fn test_status_progression() {
        let mut order = summary();
        assert_eq!(order.advance().unwrap(), OrderStatus::Ready);
        assert_eq!(order.advance().unwrap(), OrderStatus::Completed);
        assert!(order.status.is_terminal());
        assert!(order.advance().is_err());
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_string(&OrderStatus::Ready).unwrap(), "\"ready\"");
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }
}
