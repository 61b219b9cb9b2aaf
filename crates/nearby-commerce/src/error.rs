//! Commerce error types.

use thiserror::Error;

/// Errors that can occur while driving the nearby shopping flow.
///
/// Plain lookups never produce these: a missing product or store is a `None`
/// from [`CatalogRepository`](crate::catalog::CatalogRepository). The
/// `*NotFound` variants are raised only when an operation needs the record
/// to exist.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Store not found.
    #[error("Store not found: {0}")]
    StoreNotFound(String),

    /// Store exists but is not one of the nearby stores offered for the product.
    #[error("Store is not nearby for this product: {0}")]
    StoreNotNearby(String),

    /// Color not found on the product.
    #[error("Color not found: {0}")]
    ColorNotFound(String),

    /// Color exists but is out of stock.
    #[error("Color is out of stock: {0}")]
    ColorUnavailable(String),

    /// Required fields are missing before a step can proceed.
    #[error("Validation error: missing {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    /// Every contacted store reported the product as unavailable.
    #[error("No stores have this product available")]
    NoAvailability,

    /// An availability request was made with no stores selected.
    #[error("No stores selected")]
    EmptyStoreSelection,

    /// An availability request is already outstanding for this flow.
    #[error("An availability request is already pending")]
    RequestInFlight,

    /// Replies arrived for a request the flow is no longer waiting on.
    #[error("Replies do not match the pending request: {0}")]
    StaleReplies(String),

    /// A restored flow holds data its step does not allow.
    #[error("Invalid flow state: {0}")]
    InvalidFlowState(String),

    /// Invalid flow state transition.
    #[error("Invalid flow transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Catalog data violates an invariant.
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Invalid simulation configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CommerceError {
    /// Build a validation error from the names of the missing fields.
    pub fn missing(fields: &[&str]) -> Self {
        CommerceError::Validation {
            missing: fields.iter().map(|f| (*f).to_string()).collect(),
        }
    }

    /// Check if this error should be shown to the user so they can fix their input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            CommerceError::Validation { .. }
                | CommerceError::NoAvailability
                | CommerceError::EmptyStoreSelection
                | CommerceError::ColorUnavailable(_)
                | CommerceError::StoreNotNearby(_)
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
