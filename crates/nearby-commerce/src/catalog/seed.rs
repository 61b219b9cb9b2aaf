//! Reference catalog data: four products and six stores.

use chrono::NaiveTime;

use crate::catalog::{Color, GeoPoint, PriceRange, Product, Store, StoreHours};
use crate::ids::{ProductId, StoreId};
use crate::money::Money;

pub(crate) fn products() -> Vec<Product> {
    vec![
        Product {
            id: ProductId::new("1"),
            name: "Stainless Steel Rice Cooker".to_string(),
            brand: "PanasoniC".to_string(),
            description: "Advanced 10-cup rice cooker with fuzzy logic technology and keep-warm function"
                .to_string(),
            images: vec![
                unsplash("photo-1556910103-1c02411ad7bc"),
                unsplash("photo-1578749556568-bc2c40e68b61"),
                unsplash("photo-1578749556568-bc2c40e68b61"),
            ],
            colors: vec![
                Color::new("c1", "Silver", "#C0C0C0", true),
                Color::new("c2", "Black", "#000000", true),
                Color::new("c3", "White", "#FFFFFF", false),
            ],
            price_range: usd_range(12999, 17999),
            category: "Home & Kitchen".to_string(),
        },
        Product {
            id: ProductId::new("2"),
            name: "Cordless Power Drill".to_string(),
            brand: "DeWalt".to_string(),
            description: "20V compact cordless drill with LED work light and 1/2 inch single sleeve chuck"
                .to_string(),
            images: vec![
                unsplash("photo-1530124566582-a618bc2615dc"),
                unsplash("photo-1504384308090-c894fdcc538d"),
                unsplash("photo-1565043666747-69f6646db940"),
            ],
            colors: vec![
                Color::new("c1", "Yellow", "#FFEB3B", true),
                Color::new("c2", "Black", "#000000", true),
            ],
            price_range: usd_range(9999, 14999),
            category: "Hardware".to_string(),
        },
        Product {
            id: ProductId::new("3"),
            name: "Stainless Steel Kitchen Sink".to_string(),
            brand: "Kohler".to_string(),
            description: "Double bowl undermount sink with sound dampening and drainboard".to_string(),
            images: vec![
                unsplash("photo-1552321554-5fefe8c9ef14"),
                unsplash("photo-1585771724684-38269d6639fd"),
                unsplash("photo-1585771724684-38269d6639fd"),
            ],
            colors: vec![
                Color::new("c1", "Stainless Steel", "#D3D3D3", true),
                Color::new("c2", "Matte Black", "#1A1A1A", true),
            ],
            price_range: usd_range(29999, 49999),
            category: "Home & Kitchen".to_string(),
        },
        Product {
            id: ProductId::new("4"),
            name: "LED Smart Bulb 16M Colors".to_string(),
            brand: "Philips Hue".to_string(),
            description: "16 million color options, dimmable, voice controlled compatible".to_string(),
            images: vec![
                unsplash("photo-1565043666747-69f6646db940"),
                unsplash("photo-1578500494198-246f612d03b3"),
                unsplash("photo-1578500494198-246f612d03b3"),
            ],
            colors: vec![
                Color::new("c1", "White", "#FFFFFF", true),
                Color::new("c2", "Warm White", "#FFF8DC", true),
                Color::new("c3", "Cool White", "#F0F8FF", true),
            ],
            price_range: usd_range(4999, 7999),
            category: "Electronics".to_string(),
        },
    ]
}

pub(crate) fn stores() -> Vec<Store> {
    vec![
        store(
            "s1",
            "HomeStore Plus",
            "Home & Kitchen",
            ("123 Main Street", "Downtown"),
            2.3,
            GeoPoint::new(40.7128, -74.006),
            "+1-555-0101",
            true,
            hours(9, 21),
        ),
        store(
            "s2",
            "TechMart Central",
            "Electronics",
            ("456 Oak Avenue", "Midtown"),
            3.1,
            GeoPoint::new(40.758, -73.9855),
            "+1-555-0102",
            true,
            hours(10, 20),
        ),
        store(
            "s3",
            "Mega Store North",
            "Home & Kitchen",
            ("789 Park Place", "North District"),
            5.2,
            GeoPoint::new(40.7614, -73.9776),
            "+1-555-0103",
            false,
            hours(8, 22),
        ),
        store(
            "s4",
            "Retail Hub Downtown",
            "General Retail",
            ("321 Market Street", "Central"),
            4.5,
            GeoPoint::new(40.7505, -73.997),
            "+1-555-0104",
            true,
            hours(9, 20),
        ),
        store(
            "s5",
            "Hardware Pro Warehouse",
            "Hardware",
            ("555 Industrial Boulevard", "Warehouse District"),
            6.8,
            GeoPoint::new(40.7489, -73.968),
            "+1-555-0105",
            true,
            hours(7, 19),
        ),
        store(
            "s6",
            "ElectroWorld Express",
            "Electronics",
            ("888 Tech Lane", "Innovation Hub"),
            3.8,
            GeoPoint::new(40.7614, -73.9776),
            "+1-555-0106",
            true,
            hours(10, 21),
        ),
    ]
}

fn unsplash(photo: &str) -> String {
    format!("https://images.unsplash.com/{photo}?w=500&h=500&fit=crop")
}

fn usd_range(min_cents: i64, max_cents: i64) -> PriceRange {
    PriceRange::new(Money::usd(min_cents), Money::usd(max_cents))
}

fn hours(open_hour: u32, close_hour: u32) -> StoreHours {
    let on_the_hour = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
    StoreHours {
        open: on_the_hour(open_hour),
        close: on_the_hour(close_hour),
    }
}

#[allow(clippy::too_many_arguments)]
fn store(
    id: &str,
    name: &str,
    category: &str,
    (address, city): (&str, &str),
    distance_km: f64,
    location: GeoPoint,
    phone: &str,
    delivery_available: bool,
    hours: StoreHours,
) -> Store {
    Store {
        id: StoreId::new(id),
        name: name.to_string(),
        category: category.to_string(),
        address: address.to_string(),
        city: city.to_string(),
        distance_km,
        location,
        phone: phone.to_string(),
        delivery_available,
        hours,
    }
}
