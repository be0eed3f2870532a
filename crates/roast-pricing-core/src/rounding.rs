use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::Money;

/// Shelf prices are quoted in 10-yen steps.
pub const PRICE_INCREMENT: Money = dec!(10);

/// Round up to the next 10-yen shelf price.
///
/// Always the ceiling: a recommended price never undercuts the target cost
/// ratio it was derived from.
pub fn ceil_to_price_step(value: Money) -> Money {
    (value / PRICE_INCREMENT).ceil() * PRICE_INCREMENT
}

/// Whole-yen display value, banker's rounding on exact halves.
pub fn round_yen(value: Money) -> i64 {
    saturating_i64(value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
}

/// Integer display value with the fractional part dropped (e.g. roasted grams).
pub fn truncate_units(value: Decimal) -> i64 {
    saturating_i64(value.trunc())
}

/// Fee schedules charge whole yen, truncated.
pub fn floor_yen(value: Money) -> Money {
    value.floor()
}

/// Whole-yen display value rounded toward negative infinity (profits).
pub fn floor_to_yen(value: Money) -> i64 {
    saturating_i64(value.floor())
}

fn saturating_i64(value: Decimal) -> i64 {
    value.to_i64().unwrap_or(if value.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}
