//! Quote a customized product from a YAML file.
//!
//! # Usage
//!
//! ```bash
//! kaos-cli quote order.yaml
//! ```
//!
//! # File format
//!
//! ```yaml
//! product:
//!   name: Kaos Polos
//!   price: 150000
//! design:
//!   front:
//!     image_url: https://cdn.example/logo.png
//!     offset: { x: 5, y: -2 }
//!     scale: 1.2
//!   leftArm:
//!     text: EUY!
//!   back:
//!     toggled: true
//! variants:
//!   - { size: L, color: { code: "#000000", name: Black }, quantity: 2 }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use kaos_euy_core::cart::{Cart, CartLine};
use kaos_euy_core::composer::{ProductRef, VariantComposer};
use kaos_euy_core::customization::{DesignSet, Offset, PrintPosition};
use kaos_euy_core::{OrderType, Price, ProductColor, ProductId, Size};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::config::CliConfig;

/// Product section of a quote file.
#[derive(Debug, Deserialize)]
pub struct QuoteProduct {
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub price: Price,
}

/// Design for one position.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuotePart {
    pub image_url: Option<String>,
    pub text: Option<String>,
    pub offset: Option<Offset>,
    pub scale: Option<f64>,
    /// Apply the position even without content.
    pub toggled: bool,
}

#[derive(Debug, Deserialize)]
pub struct QuoteVariant {
    pub size: Size,
    pub color: ProductColor,
    #[serde(default = "one")]
    pub quantity: u32,
}

const fn one() -> u32 {
    1
}

/// A whole quote file.
#[derive(Debug, Deserialize)]
pub struct QuoteFile {
    pub product: QuoteProduct,
    #[serde(default)]
    pub design: BTreeMap<PrintPosition, QuotePart>,
    #[serde(default)]
    pub variants: Vec<QuoteVariant>,
}

/// Computed quote.
#[derive(Debug)]
pub struct Quote {
    pub fee_per_unit: Price,
    pub unit_total: Price,
    pub lines: Vec<CartLine>,
    pub subtotal: Price,
    pub item_count: u32,
    pub order_type: OrderType,
    pub customization: Value,
}

fn apply_design(design: &mut DesignSet, parts: &BTreeMap<PrintPosition, QuotePart>) {
    for (&position, part) in parts {
        if let Some(url) = &part.image_url {
            design.set_image(position, url.as_str(), None);
        }
        if let Some(text) = &part.text {
            design.set_text(position, text.as_str());
        }
        if part.toggled && !design.part(position).applied() {
            design.toggle(position);
        }
        if let Some(offset) = part.offset {
            design.set_offset(position, offset);
        }
        if let Some(scale) = part.scale {
            design.set_scale(position, scale);
        }
    }
}

/// Run the design and variants of a quote file through the engine.
#[must_use]
pub fn build_quote(file: &QuoteFile, config: &CliConfig) -> Quote {
    let mut design = DesignSet::new();
    apply_design(&mut design, &file.design);

    let mut composer = VariantComposer::new(ProductRef {
        id: file.product.id.unwrap_or_else(ProductId::generate),
        name: file.product.name.clone(),
        base_price: file.product.price,
    });
    for variant in &file.variants {
        composer.add_variant(variant.size, variant.color.clone(), variant.quantity);
    }

    let fee_per_unit = config.pricing.fee_per_unit(&design);
    let unit_total = composer.unit_total(fee_per_unit);

    let mut cart = Cart::new();
    composer.commit_into(&mut design, &config.pricing, &mut cart);

    let customization = cart
        .lines()
        .first()
        .map_or(Value::Null, |line| line.customization.customization().to_json());

    Quote {
        fee_per_unit,
        unit_total,
        subtotal: cart.subtotal(),
        item_count: cart.item_count(),
        order_type: cart.order_type(config.bulk_order_threshold),
        lines: cart.lines().to_vec(),
        customization,
    }
}

/// Read a quote file and log the result.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn run(path: &Path, config: &CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(path = %path.display(), "Loading quote");
    let content = tokio::fs::read_to_string(path).await?;
    let file: QuoteFile = serde_yaml::from_str(&content)?;

    if file.variants.is_empty() {
        return Err("quote file has no variants".into());
    }

    let quote = build_quote(&file, config);

    info!(
        product = %file.product.name,
        base = %file.product.price,
        fee_per_unit = %quote.fee_per_unit,
        unit_total = %quote.unit_total,
        "Unit price"
    );
    for line in &quote.lines {
        info!(
            size = %line.size,
            color = %line.color.name,
            quantity = line.quantity,
            line_total = %line.line_total(),
            "Variant"
        );
    }
    info!(
        items = quote.item_count,
        subtotal = %quote.subtotal,
        order_type = ?quote.order_type,
        "Batch total"
    );
    info!(
        customization = %serde_json::to_string_pretty(&quote.customization)?,
        "Frozen customization"
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use kaos_euy_core::customization::PricingRule;
    use serde_json::json;

    use super::*;

    const SAMPLE: &str = r##"
product:
  name: Kaos Polos
  price: 150000
design:
  front:
    image_url: https://cdn.test/logo.png
    offset: { x: 35, y: -2 }
  leftArm:
    text: EUY!
variants:
  - { size: L, color: { code: "#000000", name: Black }, quantity: 2 }
"##;

    fn config() -> CliConfig {
        CliConfig {
            pricing: PricingRule::default(),
            bulk_order_threshold: 10,
        }
    }

    #[test]
    fn test_sample_quote() {
        let file: QuoteFile = serde_yaml::from_str(SAMPLE).unwrap();
        let quote = build_quote(&file, &config());

        assert_eq!(quote.fee_per_unit, Price::idr(50_000));
        assert_eq!(quote.unit_total, Price::idr(200_000));
        assert_eq!(quote.subtotal, Price::idr(400_000));
        assert_eq!(quote.lines.len(), 1);
        assert_eq!(quote.order_type, OrderType::Personal);
        assert_eq!(
            quote.customization["applied_positions"],
            json!(["front", "leftArm"])
        );
        assert_eq!(quote.customization["parts"]["front"]["position"]["x"], json!(20.0));
    }

    #[test]
    fn test_toggled_position_is_billed() {
        let file: QuoteFile = serde_yaml::from_str(
            r##"
product: { name: Kaos, price: 100000 }
design:
  back: { toggled: true }
variants:
  - { size: M, color: { code: "#FFFFFF", name: White }, quantity: 12 }
"##,
        )
        .unwrap();
        let quote = build_quote(&file, &config());
        assert_eq!(quote.fee_per_unit, Price::idr(25_000));
        assert_eq!(quote.order_type, OrderType::Bulk);
    }
}
