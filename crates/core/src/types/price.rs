//! Type-safe price representation using decimal arithmetic.
//!
//! The store sells in Indonesian Rupiah only. IDR has no minor subdivision in
//! practice, so every amount the storefront produces is a whole number of
//! rupiah; the `Decimal` backing keeps arithmetic exact regardless.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An amount of money in rupiah.
///
/// Serializes as a bare JSON number carrying the exact decimal digits (an
/// integer whenever the amount is whole) so it matches the `unit_price`,
/// `custom_fee` and `line_total` columns of persisted order rows. Numbers and
/// numeric strings both deserialize.
///
/// ```
/// use kaos_euy_core::Price;
///
/// let unit = Price::idr(150_000) + Price::idr(50_000);
/// assert_eq!(unit.times(2), Price::idr(400_000));
/// assert_eq!(unit.to_string(), "Rp 200.000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a whole rupiah amount.
    #[must_use]
    pub fn idr(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Create a price from an arbitrary decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// The zero amount.
    #[must_use]
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Multiply by a unit count.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Amount rounded to a whole rupiah, halves away from zero, as sent to
    /// the payment gateway.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Whole-rupiah amount as an integer, if it fits.
    #[must_use]
    pub fn whole_rupiah(&self) -> Option<i64> {
        self.rounded().to_i64()
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::arbitrary_precision::serialize(&self.0.normalize(), serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::arbitrary_precision::deserialize(deserializer).map(Self)
    }
}

impl fmt::Display for Price {
    /// Formats like `id-ID` currency output: `Rp 1.250.000`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.rounded().to_string();
        let (sign, digits) = whole
            .strip_prefix('-')
            .map_or(("", whole.as_str()), |rest| ("-", rest));

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }

        write!(f, "{sign}Rp {grouped}")
    }
}
