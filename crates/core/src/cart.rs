//! Shopping cart.
//!
//! Lines accumulate across add-to-cart actions. Two lines merge only when
//! they are the same garment with the same frozen customization; the same
//! shirt with a different design is a separate line.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::customization::CustomizationSnapshot;
use crate::{CartLineId, OrderType, Price, ProductColor, ProductId, Size};

/// One product variant with its frozen customization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub product_name: String,
    /// Base unit price before customization.
    pub unit_price: Price,
    pub size: Size,
    pub color: ProductColor,
    pub quantity: u32,
    pub customization: CustomizationSnapshot,
}

impl CartLine {
    /// Customization fee per unit.
    #[must_use]
    pub const fn custom_fee(&self) -> Price {
        self.customization.fee_per_unit()
    }

    /// Base price plus customization fee.
    #[must_use]
    pub fn unit_total(&self) -> Price {
        self.unit_price + self.custom_fee()
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_total().times(self.quantity)
    }

    /// Whether `other` describes the same purchasable item.
    #[must_use]
    pub fn merges_with(&self, other: &Self) -> bool {
        self.product_id == other.product_id
            && self.size == other.size
            && self.color.same_as(&other.color)
            && self.customization == other.customization
    }
}

/// The buyer's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add lines, merging each into a matching existing line by quantity.
    pub fn add_lines(&mut self, lines: impl IntoIterator<Item = CartLine>) {
        for line in lines {
            if let Some(existing) = self.lines.iter_mut().find(|l| l.merges_with(&line)) {
                existing.quantity = existing.quantity.saturating_add(line.quantity);
                debug!(line = %existing.id, quantity = existing.quantity, "merged cart line");
            } else {
                debug!(line = %line.id, product = %line.product_id, "added cart line");
                self.lines.push(line);
            }
        }
    }

    /// Replace a line's quantity. Zero or less removes the line.
    ///
    /// Returns `false` if no line has this id.
    pub fn update_quantity(&mut self, id: CartLineId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.lines
            .iter_mut()
            .find(|l| l.id == id)
            .map(|l| l.quantity = quantity)
            .is_some()
    }

    /// Remove a line. Returns `false` if no line has this id.
    pub fn remove(&mut self, id: CartLineId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |sum, l| sum.saturating_add(l.quantity))
    }

    /// Personal or bulk, given the store's threshold.
    #[must_use]
    pub fn order_type(&self, bulk_threshold: u32) -> OrderType {
        OrderType::classify(self.item_count(), bulk_threshold)
    }
}
