//! Customization fee derivation.
//!
//! The fee is strictly linear in the number of applied positions: no
//! proration, no multi-position discount. A position toggled on without any
//! image or text still counts.

use crate::Price;

use super::{DesignSet, PrintPosition};

/// Fee per applied position, in rupiah.
pub const PRICE_PER_POSITION: i64 = 25_000;

/// Positions with `applied = true`, in canonical order.
#[must_use]
pub fn applied_positions(design: &DesignSet) -> Vec<PrintPosition> {
    design
        .parts()
        .filter(|(_, part)| part.applied())
        .map(|(position, _)| position)
        .collect()
}

/// Per-unit customization fee at the standard rate.
#[must_use]
pub fn fee_per_unit(design: &DesignSet) -> Price {
    PricingRule::default().fee_per_unit(design)
}

/// Fee schedule for customization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingRule {
    price_per_position: Price,
}

impl Default for PricingRule {
    fn default() -> Self {
        Self::new(Price::idr(PRICE_PER_POSITION))
    }
}

impl PricingRule {
    #[must_use]
    pub const fn new(price_per_position: Price) -> Self {
        Self { price_per_position }
    }

    #[must_use]
    pub const fn price_per_position(&self) -> Price {
        self.price_per_position
    }

    /// Fee for `count` applied positions.
    #[must_use]
    pub fn fee_for(&self, count: usize) -> Price {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.price_per_position.times(count)
    }

    /// Per-unit customization fee for the current design.
    #[must_use]
    pub fn fee_per_unit(&self, design: &DesignSet) -> Price {
        self.fee_for(applied_positions(design).len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_positions_is_free() {
        let design = DesignSet::new();
        assert!(applied_positions(&design).is_empty());
        assert_eq!(fee_per_unit(&design), Price::zero());
    }

    #[test]
    fn test_fee_is_linear() {
        let mut design = DesignSet::new();
        design.set_text(PrintPosition::Front, "A");
        design.set_text(PrintPosition::Back, "B");
        assert_eq!(fee_per_unit(&design), Price::idr(50_000));

        design.toggle(PrintPosition::LeftArm);
        design.toggle(PrintPosition::RightArm);
        assert_eq!(fee_per_unit(&design), Price::idr(100_000));
    }

    #[test]
    fn test_applied_positions_are_canonically_ordered() {
        let mut design = DesignSet::new();
        design.toggle(PrintPosition::RightArm);
        design.set_image(PrintPosition::Front, "https://cdn.test/f.png", None);
        design.set_text(PrintPosition::LeftArm, "EUY!");
        assert_eq!(
            applied_positions(&design),
            vec![
                PrintPosition::Front,
                PrintPosition::LeftArm,
                PrintPosition::RightArm
            ]
        );
    }

    #[test]
    fn test_bare_toggle_is_billed() {
        let mut design = DesignSet::new();
        design.toggle(PrintPosition::Back);
        assert_eq!(fee_per_unit(&design), Price::idr(25_000));
    }

    #[test]
    fn test_repeated_calls_agree() {
        let mut design = DesignSet::new();
        design.set_text(PrintPosition::Front, "EUY!");
        assert_eq!(fee_per_unit(&design), fee_per_unit(&design));
        assert_eq!(applied_positions(&design), applied_positions(&design));
    }

    #[test]
    fn test_custom_rate() {
        let mut design = DesignSet::new();
        design.toggle(PrintPosition::Front);
        design.toggle(PrintPosition::Back);
        let rule = PricingRule::new(Price::idr(30_000));
        assert_eq!(rule.fee_per_unit(&design), Price::idr(60_000));
    }
}
