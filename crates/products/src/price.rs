//! Product price value object.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use catalog_core::{Field, FieldError, ValueObject};

/// Number of fractional digits a price carries.
pub const PRICE_SCALE: u32 = 2;

/// Upper bound (inclusive) of a price.
pub const PRICE_MAX: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// A validated, non-negative price with exactly two fractional digits.
///
/// Submitted values with more precision are rounded (midpoint away from zero)
/// the same way a `decimal(18,2)` column would store them; the range check runs
/// on the rounded value.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::from_parts(0, 0, 0, false, PRICE_SCALE));

    pub fn parse(raw: Option<Decimal>) -> Result<Self, FieldError> {
        let raw = raw.ok_or_else(|| FieldError::new(Field::Price, "Price is required"))?;

        let mut amount =
            raw.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        if amount.is_sign_negative() && !amount.is_zero() || amount > PRICE_MAX {
            return Err(FieldError::new(
                Field::Price,
                format!("Price must be between 0 and {PRICE_MAX}"),
            ));
        }

        // Normalises -0.00 and pads to two fractional digits.
        amount.set_sign_positive(true);
        amount.rescale(PRICE_SCALE);
        Ok(Self(amount))
    }

    /// Rebuild a price from its smallest-unit representation (storage).
    pub fn from_cents(cents: i64) -> Result<Self, FieldError> {
        Self::parse(Some(Decimal::new(cents, PRICE_SCALE)))
    }

    /// Smallest-unit representation; bounded by `PRICE_MAX * 100`.
    pub fn cents(&self) -> i64 {
        self.0.mantissa() as i64
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

impl ValueObject for Price {}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
