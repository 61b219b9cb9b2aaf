//! Checkout module.
//!
//! Contains the store selection, fulfillment options and form, order summary,
//! and the purchase flow state machine.

mod address;
mod flow;
mod fulfillment;
mod order;
mod selection;

pub use address::DeliveryAddress;
pub use flow::{FlowState, FlowStep, PurchaseFlow};
pub use fulfillment::{
    list_options, Fulfillment, FulfillmentForm, FulfillmentKind, FulfillmentOption, DELIVERY_ETA,
    DELIVERY_FEE, PICKUP_ETA,
};
pub use order::{
    OrderFulfillment, OrderStatus, OrderSummary, PickupStore, ProductSnapshot, PICKUP_SUMMARY_ETA,
};
pub use selection::StoreSelection;
