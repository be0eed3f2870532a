//! Upper bounds on user-entered quantities.
//!
//! Within these bounds every intermediate of the pricing pipeline fits in a
//! 96-bit decimal, so the arithmetic cannot overflow.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::RoastPricingError;
use crate::types::{Grams, Kilograms, Money};
use crate::RoastPricingResult;

/// Largest accepted yen amount (one trillion).
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Largest accepted green-bean purchase or blend batch, in kg.
pub const MAX_WEIGHT_KG: Kilograms = dec!(1000000);

/// Largest accepted bag size, in grams.
pub const MAX_BAG_G: Grams = dec!(10000000);

/// Smallest accepted retail bag, in grams.
pub const MIN_SALES_UNIT_G: Grams = Decimal::ONE;

/// `value` must lie in `[0, MAX_AMOUNT]`.
pub fn check_amount(field: &str, value: Money) -> RoastPricingResult<()> {
    check_range(field, value, Decimal::ZERO, MAX_AMOUNT)
}

pub fn check_range(
    field: &str,
    value: Decimal,
    min: Decimal,
    max: Decimal,
) -> RoastPricingResult<()> {
    if value < min || value > max {
        return Err(RoastPricingError::InvalidInput {
            field: field.into(),
            reason: format!("Must be between {min} and {max}, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_amount_bounds() {
        assert!(check_amount("price", Decimal::ZERO).is_ok());
        assert!(check_amount("price", MAX_AMOUNT).is_ok());
        assert!(check_amount("price", MAX_AMOUNT + Decimal::ONE).is_err());
        assert!(check_amount("price", dec!(-0.01)).is_err());
    }
}
