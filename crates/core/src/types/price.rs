//! Type-safe price representation using decimal arithmetic.
//!
//! The store trades in a single currency (Algerian dinar), so a price is just
//! a decimal amount. Amounts are kept at two decimal places so that sums of
//! modifiers, tier prices and shipping never drift.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Sub};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Number of decimal places every amount is normalised to.
pub const PRICE_SCALE: u32 = 2;

/// Display suffix for the store currency.
pub const CURRENCY_SUFFIX: &str = "DA";

/// A monetary amount in the store currency.
///
/// `Price` may be negative: option modifiers are signed adjustments and share
/// this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest magnitude a `NUMERIC(12,2)` column holds: 9 999 999 999.99.
    pub const MAX_STORED: Self =
        Self(Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, PRICE_SCALE));

    /// Create a price, rounding to two decimal places.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self(amount.round_dp(PRICE_SCALE))
    }

    /// Create a price from a whole number of dinars.
    #[must_use]
    pub fn from_whole(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }

    /// Underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is below zero.
    #[must_use]
    pub const fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Whether the amount is too large, in either direction, to be stored.
    #[must_use]
    pub fn exceeds_storage(&self) -> bool {
        self.0.abs() > Self::MAX_STORED.0
    }

    /// Multiply by a unit count, or `None` on overflow.
    #[must_use]
    pub fn checked_times(self, count: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(count)).map(Self::new)
    }

    /// Add two amounts, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self::new)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.0 + rhs.0)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.0 - rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {CURRENCY_SUFFIX}", self.0.normalize())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        <Decimal as Deserialize>::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_price_rounds_to_two_places() {
        let price = Price::new(Decimal::new(123_456, 3));
        assert_eq!(price.amount(), Decimal::new(12_346, 2));
    }

    #[test]
    fn test_price_times() {
        assert_eq!(
            Price::from_whole(1000).checked_times(3),
            Some(Price::from_whole(3000))
        );
        assert_eq!(Price::from_whole(1000).checked_times(0), Some(Price::ZERO));
    }

    #[test]
    fn test_price_arithmetic_overflow_is_none() {
        let huge = Price::new(Decimal::from_scientific("1e25").unwrap());
        assert_eq!(huge.checked_times(100_000), None);
        assert_eq!(Price::new(Decimal::MAX).checked_add(Price::from_whole(1)), None);
        assert_eq!(
            Price::from_whole(2).checked_add(Price::from_whole(3)),
            Some(Price::from_whole(5))
        );
    }

    #[test]
    fn test_price_storage_bound() {
        assert_eq!(Price::MAX_STORED.to_string(), "9999999999.99 DA");
        assert!(!Price::MAX_STORED.exceeds_storage());
        assert!(Price::from_whole(10_000_000_000).exceeds_storage());
        assert!(Price::from_whole(-10_000_000_000).exceeds_storage());
        assert!(!Price::from_whole(-500).exceeds_storage());
    }

    #[test]
    fn test_price_sum_and_negative() {
        let total: Price = [Price::from_whole(200), Price::from_whole(-50)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_whole(150));
        assert!(Price::from_whole(-1).is_negative());
        assert!(!Price::ZERO.is_negative());
    }

    #[test]
    fn test_price_deserializes_numbers_and_strings() {
        let from_number: Price = serde_json::from_str("1800").unwrap();
        let from_string: Price = serde_json::from_str("\"1800.00\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number, Price::from_whole(1800));

        let rounded: Price = serde_json::from_str("\"12.346\"").unwrap();
        assert_eq!(rounded.amount(), Decimal::new(1235, 2));
        assert!(serde_json::from_str::<Price>("\"cheap\"").is_err());
    }

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_whole(4400).to_string(), "4400 DA");
        assert_eq!(Price::new(Decimal::new(99_950, 2)).to_string(), "999.5 DA");
    }
}
