//! Variant composer: one product, several size/color selections, one design.
//!
//! The composer collects an in-progress batch of variants for the product
//! currently on screen. Committing the batch freezes the current design
//! once and emits one [`CartLine`] per variant, all sharing that snapshot.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::cart::{Cart, CartLine};
use crate::customization::{CustomizationSnapshot, DesignSet, PricingRule};
use crate::{CartLineId, Price, Product, ProductColor, ProductId, Size, VariantId};

/// What the composer needs to know about the product being customized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    pub base_price: Price,
}

impl From<&Product> for ProductRef {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            base_price: product.price,
        }
    }
}

/// One (size, color, quantity) selection in the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: VariantId,
    pub size: Size,
    pub color: ProductColor,
    pub quantity: u32,
}

/// In-progress batch of variants for a single product.
#[derive(Debug, Clone)]
pub struct VariantComposer {
    product: ProductRef,
    variants: Vec<Variant>,
}

impl VariantComposer {
    #[must_use]
    pub fn new(product: impl Into<ProductRef>) -> Self {
        Self {
            product: product.into(),
            variants: Vec::new(),
        }
    }

    #[must_use]
    pub const fn product(&self) -> &ProductRef {
        &self.product
    }

    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Switch to another product.
    ///
    /// Drops the batch and resets the design, so nothing authored for the
    /// previous product carries over.
    pub fn open_product(&mut self, product: impl Into<ProductRef>, design: &mut DesignSet) {
        self.product = product.into();
        self.variants.clear();
        design.reset_all();
        debug!(product = %self.product.id, "opened product for customization");
    }

    /// Add a selection, merging with an existing `(color.code, size)` entry.
    ///
    /// A quantity of zero is treated as one. Returns the id of the variant
    /// that now holds the quantity.
    pub fn add_variant(&mut self, size: Size, color: ProductColor, quantity: u32) -> VariantId {
        let quantity = quantity.max(1);

        if let Some(existing) = self
            .variants
            .iter_mut()
            .find(|v| v.size == size && v.color.same_as(&color))
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            debug!(variant = %existing.id, quantity = existing.quantity, "merged variant");
            return existing.id;
        }

        let id = VariantId::generate();
        self.variants.push(Variant {
            id,
            size,
            color,
            quantity,
        });
        debug!(variant = %id, %size, quantity, "added variant");
        id
    }

    /// Replace a variant's quantity. Zero or less removes the variant.
    ///
    /// Returns `false` if no variant has this id.
    pub fn update_variant_quantity(&mut self, id: VariantId, quantity: i64) -> bool {
        let Ok(quantity) = u32::try_from(quantity.max(0)) else {
            return self.set_quantity(id, u32::MAX);
        };
        if quantity == 0 {
            return self.remove_variant(id);
        }
        self.set_quantity(id, quantity)
    }

    fn set_quantity(&mut self, id: VariantId, quantity: u32) -> bool {
        self.variants
            .iter_mut()
            .find(|v| v.id == id)
            .map(|v| v.quantity = quantity)
            .is_some()
    }

    /// Remove a variant. Returns `false` if no variant has this id.
    pub fn remove_variant(&mut self, id: VariantId) -> bool {
        let before = self.variants.len();
        self.variants.retain(|v| v.id != id);
        self.variants.len() != before
    }

    /// Sum of quantities across the batch.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.variants
            .iter()
            .fold(0, |sum, v| sum.saturating_add(v.quantity))
    }

    /// Base price plus customization fee, per unit.
    #[must_use]
    pub fn unit_total(&self, fee_per_unit: Price) -> Price {
        self.product.base_price + fee_per_unit
    }

    /// Batch total for live display before commit.
    #[must_use]
    pub fn line_total(&self, fee_per_unit: Price) -> Price {
        self.unit_total(fee_per_unit).times(self.total_quantity())
    }

    /// Cart lines the batch would produce with the given snapshot.
    #[must_use]
    pub fn lines(&self, snapshot: &CustomizationSnapshot) -> Vec<CartLine> {
        self.variants
            .iter()
            .map(|variant| CartLine {
                id: CartLineId::generate(),
                product_id: self.product.id,
                product_name: self.product.name.clone(),
                unit_price: self.product.base_price,
                size: variant.size,
                color: variant.color.clone(),
                quantity: variant.quantity,
                customization: snapshot.clone(),
            })
            .collect()
    }

    /// Freeze the design and hand one line per variant to `sink`.
    ///
    /// An empty batch is a no-op returning `Ok(0)`. The batch is cleared and
    /// the design reset only after `sink` succeeds; on error both are left as
    /// they were so the buyer can retry.
    ///
    /// # Errors
    ///
    /// Returns whatever error `sink` returns.
    #[instrument(skip_all, fields(product = %self.product.id, variants = self.variants.len()))]
    pub fn commit<E>(
        &mut self,
        design: &mut DesignSet,
        pricing: &PricingRule,
        sink: impl FnOnce(Vec<CartLine>) -> Result<(), E>,
    ) -> Result<usize, E> {
        if self.variants.is_empty() {
            return Ok(0);
        }

        let snapshot = CustomizationSnapshot::capture(design, pricing);
        let lines = self.lines(&snapshot);
        let count = lines.len();
        sink(lines)?;

        self.variants.clear();
        design.reset_all();
        debug!(count, fee_per_unit = %snapshot.fee_per_unit(), "committed variants");
        Ok(count)
    }

    /// Commit straight into a cart.
    pub fn commit_into(
        &mut self,
        design: &mut DesignSet,
        pricing: &PricingRule,
        cart: &mut Cart,
    ) -> usize {
        let result: Result<usize, std::convert::Infallible> =
            self.commit(design, pricing, |lines| {
                cart.add_lines(lines);
                Ok(())
            });
        match result {
            Ok(count) => count,
            Err(never) => match never {},
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::customization::{PrintPosition, fee_per_unit};

    fn product() -> ProductRef {
        ProductRef {
            id: ProductId::generate(),
            name: "Kaos Polos".to_string(),
            base_price: Price::idr(150_000),
        }
    }

    fn black() -> ProductColor {
        ProductColor::new("#000000", "Black")
    }

    #[test]
    fn test_add_merges_same_color_and_size() {
        let mut composer = VariantComposer::new(product());
        let first = composer.add_variant(Size::M, black(), 2);
        let second = composer.add_variant(Size::M, ProductColor::new("#000000", "Hitam"), 3);

        assert_eq!(first, second);
        assert_eq!(composer.variants().len(), 1);
        assert_eq!(composer.variants()[0].quantity, 5);
    }

    #[test]
    fn test_add_distinct_variants() {
        let mut composer = VariantComposer::new(product());
        composer.add_variant(Size::M, black(), 1);
        composer.add_variant(Size::L, black(), 1);
        composer.add_variant(Size::M, ProductColor::new("#FFFFFF", "White"), 1);
        assert_eq!(composer.variants().len(), 3);
        assert_eq!(composer.total_quantity(), 3);
    }

    #[test]
    fn test_zero_quantity_add_counts_as_one() {
        let mut composer = VariantComposer::new(product());
        composer.add_variant(Size::S, black(), 0);
        assert_eq!(composer.total_quantity(), 1);
    }

    #[test]
    fn test_update_quantity() {
        let mut composer = VariantComposer::new(product());
        let id = composer.add_variant(Size::M, black(), 2);
        composer.add_variant(Size::XL, black(), 1);

        assert!(composer.update_variant_quantity(id, 7));
        assert_eq!(composer.total_quantity(), 8);

        assert!(composer.update_variant_quantity(id, 0));
        assert_eq!(composer.variants().len(), 1);
        assert!(!composer.update_variant_quantity(id, 3));
    }

    #[test]
    fn test_negative_quantity_removes() {
        let mut composer = VariantComposer::new(product());
        let id = composer.add_variant(Size::M, black(), 2);
        assert!(composer.update_variant_quantity(id, -4));
        assert!(composer.is_empty());
    }

    #[test]
    fn test_remove_variant() {
        let mut composer = VariantComposer::new(product());
        let id = composer.add_variant(Size::M, black(), 2);
        assert!(composer.remove_variant(id));
        assert!(!composer.remove_variant(id));
    }

    #[test]
    fn test_live_totals() {
        let mut composer = VariantComposer::new(product());
        composer.add_variant(Size::L, black(), 2);
        composer.add_variant(Size::M, black(), 1);
        let fee = Price::idr(50_000);
        assert_eq!(composer.unit_total(fee), Price::idr(200_000));
        assert_eq!(composer.line_total(fee), Price::idr(600_000));
    }

    #[test]
    fn test_empty_commit_is_noop() {
        let mut composer = VariantComposer::new(product());
        let mut design = DesignSet::new();
        design.toggle(PrintPosition::Front);

        let mut called = false;
        let count = composer
            .commit(&mut design, &PricingRule::default(), |_| {
                called = true;
                Ok::<_, ()>(())
            })
            .unwrap();

        assert_eq!(count, 0);
        assert!(!called);
        assert!(design.part(PrintPosition::Front).applied());
    }

    #[test]
    fn test_commit_shares_snapshot_and_resets() {
        let mut composer = VariantComposer::new(product());
        let mut design = DesignSet::new();
        design.set_text(PrintPosition::Back, "EUY!");
        composer.add_variant(Size::M, black(), 1);
        composer.add_variant(Size::L, black(), 2);

        let mut emitted = Vec::new();
        let count = composer
            .commit(&mut design, &PricingRule::default(), |lines| {
                emitted = lines;
                Ok::<_, ()>(())
            })
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(emitted[0].customization, emitted[1].customization);
        assert_eq!(emitted[0].custom_fee(), Price::idr(25_000));
        assert!(composer.is_empty());
        assert_eq!(fee_per_unit(&design), Price::zero());
    }

    #[test]
    fn test_failed_commit_leaves_state() {
        let mut composer = VariantComposer::new(product());
        let mut design = DesignSet::new();
        design.set_text(PrintPosition::Front, "EUY!");
        composer.add_variant(Size::M, black(), 1);

        let result = composer.commit(&mut design, &PricingRule::default(), |_| Err("offline"));

        assert_eq!(result, Err("offline"));
        assert_eq!(composer.total_quantity(), 1);
        assert_eq!(design.part(PrintPosition::Front).text(), "EUY!");
    }

    #[test]
    fn test_open_product_resets() {
        let mut composer = VariantComposer::new(product());
        let mut design = DesignSet::new();
        design.set_text(PrintPosition::Front, "EUY!");
        composer.add_variant(Size::M, black(), 1);

        let next = product();
        composer.open_product(next.clone(), &mut design);

        assert_eq!(composer.product(), &next);
        assert!(composer.is_empty());
        assert!(crate::customization::applied_positions(&design).is_empty());
    }
}
