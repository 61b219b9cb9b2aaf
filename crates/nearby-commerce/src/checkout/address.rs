//! Delivery address type.

use serde::{Deserialize, Serialize};

/// Where a delivery order is sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryAddress {
    /// Street address, including apartment or suite.
    pub address: String,
    /// City.
    pub city: String,
    /// Postal/ZIP code. Optional.
    #[serde(default)]
    pub postal_code: String,
}

impl DeliveryAddress {
    /// Create a new address.
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = vec![self.address.trim(), self.city.trim()];
        if !self.postal_code.trim().is_empty() {
            parts.push(self.postal_code.trim());
        }
        parts.join(", ")
    }

    /// Names of the required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.address.trim().is_empty() {
            missing.push("address");
        }
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        missing
    }

    /// Check if address is complete.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_line() {
        let addr = DeliveryAddress::new("123 Your Street, Apt 4B", "New York", "10001");
        assert_eq!(addr.one_line(), "123 Your Street, Apt 4B, New York, 10001");

        let no_zip = DeliveryAddress::new("1 Elm St", "Boston", "");
        assert_eq!(no_zip.one_line(), "1 Elm St, Boston");
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let addr = DeliveryAddress::new("   ", "", "10001");
        assert_eq!(addr.missing_fields(), vec!["address", "city"]);
        assert!(!addr.is_complete());
    }
}
