//! Store reply types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::StoreId;
use crate::money::Money;
use crate::CommerceError;

/// Estimated time until the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EtaLabel {
    #[serde(rename = "1-2 hours")]
    OneToTwoHours,
    #[serde(rename = "2-3 hours")]
    TwoToThreeHours,
}

impl EtaLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EtaLabel::OneToTwoHours => "1-2 hours",
            EtaLabel::TwoToThreeHours => "2-3 hours",
        }
    }
}

impl fmt::Display for EtaLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One store's answer to an availability request.
///
/// Price and ETA are present exactly when the store has the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReplyRecord", into = "ReplyRecord")]
pub struct StoreReply {
    available: bool,
    price: Option<Money>,
    eta: Option<EtaLabel>,
}

impl StoreReply {
    /// The store has the product.
    pub fn in_stock(price: Money, eta: EtaLabel) -> Self {
        Self {
            available: true,
            price: Some(price),
            eta: Some(eta),
        }
    }

    /// The store does not have the product.
    pub fn out_of_stock() -> Self {
        Self {
            available: false,
            price: None,
            eta: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Quoted price, when available.
    pub fn price(&self) -> Option<Money> {
        self.price
    }

    /// Quoted ETA, when available.
    pub fn eta(&self) -> Option<EtaLabel> {
        self.eta
    }

    /// Short status line, e.g. "In Stock - $54.20 (1-2 hours)".
    pub fn summary(&self) -> String {
        match (self.price, self.eta) {
            (Some(price), Some(eta)) => format!("In Stock - {} ({})", price.display(), eta),
            _ => "Out of Stock".to_string(),
        }
    }
}

/// Wire form of [`StoreReply`].
#[derive(Serialize, Deserialize)]
struct ReplyRecord {
    available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eta: Option<EtaLabel>,
}

impl TryFrom<ReplyRecord> for StoreReply {
    type Error = CommerceError;

    fn try_from(record: ReplyRecord) -> Result<Self, Self::Error> {
        match (record.available, record.price, record.eta) {
            (true, Some(price), Some(eta)) => Ok(StoreReply::in_stock(price, eta)),
            (false, None, None) => Ok(StoreReply::out_of_stock()),
            (true, _, _) => Err(CommerceError::SerializationError(
                "available reply requires price and eta".to_string(),
            )),
            (false, _, _) => Err(CommerceError::SerializationError(
                "unavailable reply must not carry price or eta".to_string(),
            )),
        }
    }
}

impl From<StoreReply> for ReplyRecord {
    fn from(reply: StoreReply) -> Self {
        ReplyRecord {
            available: reply.available,
            price: reply.price,
            eta: reply.eta,
        }
    }
}

/// Replies keyed by store.
pub type ReplyMap = BTreeMap<StoreId, StoreReply>;

/// Ids of the stores that reported the product in stock, in key order.
pub fn available_store_ids(replies: &ReplyMap) -> Vec<StoreId> {
    replies
        .iter()
        .filter(|(_, reply)| reply.is_available())
        .map(|(id, _)| id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_stock_reply() {
        let reply = StoreReply::in_stock(Money::usd(5420), EtaLabel::OneToTwoHours);
        assert!(reply.is_available());
        assert_eq!(reply.price(), Some(Money::usd(5420)));
        assert_eq!(reply.summary(), "In Stock - $54.20 (1-2 hours)");
    }

    #[test]
    fn test_out_of_stock_reply_has_no_quote() {
        let reply = StoreReply::out_of_stock();
        assert!(!reply.is_available());
        assert!(reply.price().is_none());
        assert!(reply.eta().is_none());
        assert_eq!(
            serde_json::to_string(&reply).unwrap(),
            r#"{"available":false}"#
        );
    }

    #[test]
    fn test_eta_wire_labels() {
        assert_eq!(
            serde_json::to_string(&EtaLabel::TwoToThreeHours).unwrap(),
            "\"2-3 hours\""
        );
        let reply: StoreReply = serde_json::from_str(
            r#"{"available":true,"price":{"amount_cents":100,"currency":"USD"},"eta":"1-2 hours"}"#,
        )
        .unwrap();
        assert_eq!(reply.eta(), Some(EtaLabel::OneToTwoHours));
    }

    #[test]
    fn test_inconsistent_reply_rejected() {
        assert!(serde_json::from_str::<StoreReply>(r#"{"available":true}"#).is_err());
        assert!(serde_json::from_str::<StoreReply>(r#"{"available":false,"eta":"1-2 hours"}"#).is_err());
    }

    #[test]
    fn test_available_store_ids() {
        let mut replies = ReplyMap::new();
        replies.insert(StoreId::new("s6"), StoreReply::in_stock(Money::usd(1), EtaLabel::OneToTwoHours));
        replies.insert(StoreId::new("s2"), StoreReply::out_of_stock());
        assert_eq!(available_store_ids(&replies), vec![StoreId::new("s6")]);
    }
}
