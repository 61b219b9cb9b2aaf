//! Physical store types.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::ids::StoreId;

/// Geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Daily opening hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHours {
    /// Opening time.
    pub open: NaiveTime,
    /// Closing time.
    pub close: NaiveTime,
}

impl StoreHours {
    /// Create opening hours from hour/minute pairs.
    ///
    /// Returns `None` for out-of-range values.
    pub fn from_hm(open: (u32, u32), close: (u32, u32)) -> Option<Self> {
        Some(Self {
            open: NaiveTime::from_hms_opt(open.0, open.1, 0)?,
            close: NaiveTime::from_hms_opt(close.0, close.1, 0)?,
        })
    }

    /// Check if the store is open at a time of day.
    ///
    /// Hours that wrap past midnight (close before open) are supported.
    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        if self.open <= self.close {
            time >= self.open && time < self.close
        } else {
            time >= self.open || time < self.close
        }
    }

    /// Format as "09:00 - 21:00".
    pub fn display(&self) -> String {
        format!("{} - {}", self.open.format("%H:%M"), self.close.format("%H:%M"))
    }
}

/// A store that can be messaged about a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    /// Unique store identifier.
    pub id: StoreId,
    /// Display name.
    pub name: String,
    /// Category label, matched against product categories.
    pub category: String,
    /// Street address.
    pub address: String,
    /// City or district.
    pub city: String,
    /// Distance from the customer, in kilometers.
    pub distance_km: f64,
    /// Store location.
    pub location: GeoPoint,
    /// Contact phone number.
    pub phone: String,
    /// Whether the store delivers.
    pub delivery_available: bool,
    /// Opening hours.
    pub hours: StoreHours,
}

impl Store {
    /// Format the address as a single line.
    pub fn one_line_address(&self) -> String {
        format!("{}, {}", self.address, self.city)
    }

    /// Short label for the store's fulfillment capability.
    pub fn capability_label(&self) -> &'static str {
        if self.delivery_available {
            "Delivery Available"
        } else {
            "Pickup Only"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_store_hours_open() {
        let hours = StoreHours::from_hm((9, 0), (21, 0)).unwrap();
        assert!(hours.is_open_at(at(9, 0)));
        assert!(hours.is_open_at(at(20, 59)));
        assert!(!hours.is_open_at(at(21, 0)));
        assert!(!hours.is_open_at(at(8, 30)));
        assert_eq!(hours.display(), "09:00 - 21:00");
    }

    #[test]
    fn test_store_hours_overnight() {
        let hours = StoreHours::from_hm((22, 0), (6, 0)).unwrap();
        assert!(hours.is_open_at(at(23, 0)));
        assert!(hours.is_open_at(at(2, 0)));
        assert!(!hours.is_open_at(at(12, 0)));
    }

    #[test]
    fn test_store_hours_invalid() {
        assert!(StoreHours::from_hm((25, 0), (6, 0)).is_none());
    }

    #[test]
    fn test_store_hours_serde_round_trip_format() {
        let hours = StoreHours::from_hm((10, 0), (20, 0)).unwrap();
        let json = serde_json::to_string(&hours).unwrap();
        assert_eq!(json, r#"{"open":"10:00:00","close":"20:00:00"}"#);
    }
}
