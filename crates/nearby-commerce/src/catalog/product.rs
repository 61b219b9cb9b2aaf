//! Product and color types.

use crate::ids::{ColorId, ProductId};
use crate::money::Money;
use crate::CommerceError;
use serde::{Deserialize, Serialize};

/// The span of prices a product sells for across stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lowest price.
    pub min: Money,
    /// Highest price.
    pub max: Money,
}

impl PriceRange {
    /// Create a new price range.
    pub fn new(min: Money, max: Money) -> Self {
        Self { min, max }
    }

    /// Check the range is ordered, non-negative, and single-currency.
    pub fn is_valid(&self) -> bool {
        self.min.currency == self.max.currency
            && !self.min.is_negative()
            && self.min.amount_cents <= self.max.amount_cents
    }

    /// Check if a price falls inside the range (inclusive).
    pub fn contains(&self, price: &Money) -> bool {
        price.currency == self.min.currency
            && price.amount_cents >= self.min.amount_cents
            && price.amount_cents <= self.max.amount_cents
    }

    /// Price at `fraction` of the way from min to max, rounded to the cent.
    ///
    /// `fraction` is clamped to `[0, 1]`, so the result is always inside the range.
    pub fn interpolate(&self, fraction: f64) -> Money {
        let fraction = fraction.clamp(0.0, 1.0);
        let span = (self.max.amount_cents - self.min.amount_cents) as f64;
        let offset = (span * fraction).round() as i64;
        Money::new(self.min.amount_cents + offset, self.min.currency)
    }

    /// Format as "$min - $max".
    pub fn display(&self) -> String {
        format!("{} - {}", self.min.display(), self.max.display())
    }
}

/// A color variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Identifier, unique within the owning product.
    pub id: ColorId,
    /// Display name.
    pub name: String,
    /// Hex color value (e.g., "#C0C0C0").
    pub hex: String,
    /// Whether this color can be ordered.
    pub available: bool,
}

impl Color {
    /// Create a new color.
    pub fn new(
        id: impl Into<ColorId>,
        name: impl Into<String>,
        hex: impl Into<String>,
        available: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hex: hex.into(),
            available,
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Brand name.
    pub brand: String,
    /// Full description.
    pub description: String,
    /// Image URLs, primary image first.
    #[serde(default)]
    pub images: Vec<String>,
    /// Color variants.
    #[serde(default)]
    pub colors: Vec<Color>,
    /// Price span across stores.
    pub price_range: PriceRange,
    /// Category label, matched against store categories.
    pub category: String,
}

impl Product {
    /// Look up a color by id.
    pub fn color(&self, id: &ColorId) -> Option<&Color> {
        self.colors.iter().find(|c| &c.id == id)
    }

    /// Colors that can currently be ordered.
    pub fn available_colors(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter().filter(|c| c.available)
    }

    /// The color preselected on the product page: the first orderable one.
    pub fn default_color(&self) -> Option<&Color> {
        self.available_colors().next()
    }

    /// Resolve a color the user wants to carry forward.
    ///
    /// Unknown and out-of-stock colors are rejected.
    pub fn select_color(&self, id: &ColorId) -> Result<&Color, CommerceError> {
        let color = self
            .color(id)
            .ok_or_else(|| CommerceError::ColorNotFound(id.to_string()))?;
        if !color.available {
            return Err(CommerceError::ColorUnavailable(color.name.clone()));
        }
        Ok(color)
    }

    /// Primary image URL.
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
