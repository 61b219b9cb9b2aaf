//! Fulfillment options and form validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Store;
use crate::checkout::DeliveryAddress;
use crate::ids::StoreId;
use crate::money::Money;
use crate::CommerceError;

/// Delivery fee charged on every delivery order.
pub const DELIVERY_FEE: Money = Money::usd(799);
/// Delivery time shown for delivery orders.
pub const DELIVERY_ETA: &str = "2-3 hours";
/// Preparation time shown for pickup orders.
pub const PICKUP_ETA: &str = "Ready in 1 hour";

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentKind {
    /// Courier to the customer's address.
    Delivery,
    /// Customer collects from a store.
    Pickup,
}

impl FulfillmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentKind::Delivery => "delivery",
            FulfillmentKind::Pickup => "pickup",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FulfillmentKind::Delivery => "Home Delivery",
            FulfillmentKind::Pickup => "Store Pickup",
        }
    }
}

impl fmt::Display for FulfillmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fulfillment choice offered to the customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FulfillmentOption {
    /// Which kind this option is.
    pub kind: FulfillmentKind,
    /// Display name.
    pub label: String,
    /// Description.
    pub description: String,
    /// Fee added to the order.
    pub fee: Money,
    /// Time estimate.
    pub eta: String,
    /// Whether the option can be chosen.
    pub available: bool,
}

impl FulfillmentOption {
    /// Check if this option is free.
    pub fn is_free(&self) -> bool {
        self.fee.is_zero()
    }
}

/// Build the fulfillment options for the stores that confirmed availability.
///
/// Always returns delivery first and pickup second. Pickup is only available
/// when at least one store has the product.
pub fn list_options(available_stores: &[&Store]) -> Vec<FulfillmentOption> {
    vec![
        FulfillmentOption {
            kind: FulfillmentKind::Delivery,
            label: FulfillmentKind::Delivery.display_name().to_string(),
            description: "Get it delivered to your doorstep".to_string(),
            fee: DELIVERY_FEE,
            eta: DELIVERY_ETA.to_string(),
            available: true,
        },
        FulfillmentOption {
            kind: FulfillmentKind::Pickup,
            label: FulfillmentKind::Pickup.display_name().to_string(),
            description: "Pick up from a nearby store".to_string(),
            fee: Money::zero(DELIVERY_FEE.currency),
            eta: PICKUP_ETA.to_string(),
            available: !available_stores.is_empty(),
        },
    ]
}

/// A validated fulfillment choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fulfillment {
    /// Deliver to an address.
    Delivery {
        address: DeliveryAddress,
        fee: Money,
        eta: String,
    },
    /// Collect from a store that confirmed availability.
    Pickup { store_id: StoreId },
}

impl Fulfillment {
    pub fn kind(&self) -> FulfillmentKind {
        match self {
            Fulfillment::Delivery { .. } => FulfillmentKind::Delivery,
            Fulfillment::Pickup { .. } => FulfillmentKind::Pickup,
        }
    }

    /// Fee charged for this fulfillment.
    pub fn fee(&self) -> Money {
        match self {
            Fulfillment::Delivery { fee, .. } => *fee,
            Fulfillment::Pickup { .. } => Money::zero(DELIVERY_FEE.currency),
        }
    }
}

/// The fulfillment form as the customer filled it in.
///
/// Fields for the unchosen kind are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FulfillmentForm {
    pub kind: Option<FulfillmentKind>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub pickup_store: Option<StoreId>,
}

impl FulfillmentForm {
    /// A delivery form.
    pub fn delivery(address: DeliveryAddress) -> Self {
        Self {
            kind: Some(FulfillmentKind::Delivery),
            address: address.address,
            city: address.city,
            postal_code: address.postal_code,
            pickup_store: None,
        }
    }

    /// A pickup form.
    pub fn pickup(store_id: StoreId) -> Self {
        Self {
            kind: Some(FulfillmentKind::Pickup),
            pickup_store: Some(store_id),
            ..Self::default()
        }
    }

    /// Fill the address fields, e.g. from a location lookup.
    pub fn fill_address(&mut self, address: DeliveryAddress) {
        self.address = address.address;
        self.city = address.city;
        self.postal_code = address.postal_code;
    }

    /// Check the form is complete for its kind.
    ///
    /// `available` is the set of stores that confirmed they have the product;
    /// a pickup store outside it is treated as not chosen.
    pub fn validate(&self, available: &[StoreId]) -> Result<Fulfillment, CommerceError> {
        match self.kind {
            None => Err(CommerceError::missing(&["fulfillment type"])),
            Some(FulfillmentKind::Delivery) => {
                let address = DeliveryAddress::new(
                    self.address.trim(),
                    self.city.trim(),
                    self.postal_code.trim(),
                );
                let missing = address.missing_fields();
                if !missing.is_empty() {
                    return Err(CommerceError::missing(&missing));
                }
                Ok(Fulfillment::Delivery {
                    address,
                    fee: DELIVERY_FEE,
                    eta: DELIVERY_ETA.to_string(),
                })
            }
            Some(FulfillmentKind::Pickup) => match &self.pickup_store {
                Some(store_id) if available.contains(store_id) => Ok(Fulfillment::Pickup {
                    store_id: store_id.clone(),
                }),
                _ => Err(CommerceError::missing(&["pickup store"])),
            },
        }
    }
}
