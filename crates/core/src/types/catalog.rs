//! Catalog shapes handed to the engine by the product catalog.
//!
//! The engine trusts these as given: it never checks that a selected size or
//! color is actually offered. [`Product::offers`] exists for callers that
//! want to gate their own inputs.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// Garment size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Size {
    XS,
    S,
    M,
    L,
    XL,
    XXL,
    #[serde(rename = "3XL")]
    XXXL,
}

impl Size {
    /// All sizes in display order.
    pub const ALL: [Self; 7] = [
        Self::XS,
        Self::S,
        Self::M,
        Self::L,
        Self::XL,
        Self::XXL,
        Self::XXXL,
    ];

    /// Label as printed on size guides and stored in order rows.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::XS => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::XXL => "XXL",
            Self::XXXL => "3XL",
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Size {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("invalid size: {s}"))
    }
}

/// A garment color. `code` is the canonical key (a hex string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductColor {
    pub code: String,
    pub name: String,
}

impl ProductColor {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Colors are identified by code alone; names are display text.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

/// A catalog product as seen by the customization engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    /// Base unit price before customization.
    pub price: Price,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<Size>,
    #[serde(default)]
    pub colors: Vec<ProductColor>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub is_customizable: bool,
}

const fn default_true() -> bool {
    true
}

impl Product {
    /// Whether the catalog declares this size/color combination.
    #[must_use]
    pub fn offers(&self, size: Size, color: &ProductColor) -> bool {
        self.sizes.contains(&size) && self.colors.iter().any(|c| c.same_as(color))
    }

    /// Default selections shown when the product page opens.
    #[must_use]
    pub fn default_selection(&self) -> Option<(Size, &ProductColor)> {
        Some((*self.sizes.first()?, self.colors.first()?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn tee() -> Product {
        Product {
            id: ProductId::generate(),
            name: "Kaos Polos".to_string(),
            slug: "kaos-polos".to_string(),
            price: Price::idr(150_000),
            images: Vec::new(),
            sizes: vec![Size::M, Size::L],
            colors: vec![ProductColor::new("#000000", "Black")],
            in_stock: true,
            is_customizable: true,
        }
    }

    #[test]
    fn test_size_serde_uses_labels() {
        assert_eq!(serde_json::to_string(&Size::XXXL).unwrap(), "\"3XL\"");
        let size: Size = serde_json::from_str("\"XL\"").unwrap();
        assert_eq!(size, Size::XL);
    }

    #[test]
    fn test_size_from_str() {
        assert_eq!("3xl".parse::<Size>().unwrap(), Size::XXXL);
        assert!("XXXXL".parse::<Size>().is_err());
    }

    #[test]
    fn test_offers() {
        let product = tee();
        assert!(product.offers(Size::M, &ProductColor::new("#000000", "Hitam")));
        assert!(!product.offers(Size::M, &ProductColor::new("#000", "Black")));
        assert!(!product.offers(Size::XS, &ProductColor::new("#000000", "Black")));
        assert!(!product.offers(Size::M, &ProductColor::new("#FFFFFF", "White")));
    }

    #[test]
    fn test_default_selection() {
        let product = tee();
        let (size, color) = product.default_selection().unwrap();
        assert_eq!(size, Size::M);
        assert_eq!(color.name, "Black");
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "name": "Kaos",
            "slug": "kaos",
            "price": 150000
        }))
        .unwrap();
        assert!(product.in_stock);
        assert!(!product.is_customizable);
        assert!(product.default_selection().is_none());
    }
}
