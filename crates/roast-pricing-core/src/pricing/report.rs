use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::pricing::bean::{BeanInput, BeanPricing};
use crate::rounding::{round_yen, truncate_units};
use crate::types::{Kilograms, Money};

/// One result line as shown to the user: whole yen, whole grams.
///
/// Purchase price is truncated; derived amounts are rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeanRow {
    /// 1-based form slot
    pub slot: usize,
    pub name: String,
    pub purchase_price: i64,
    pub purchase_weight_kg: Kilograms,
    pub roasted_weight_g: i64,
    pub sellable_units: u64,
    pub cost_per_bag: i64,
    pub price_retail: i64,
    pub price_wholesale: i64,
    pub breakeven_units: u64,
    /// One decimal place
    pub breakeven_rate_pct: Decimal,
    pub expected_profit: i64,
    pub tax_amount_retail: i64,
    pub is_profitable: bool,
}

impl BeanRow {
    pub fn new(slot: usize, input: &BeanInput, pricing: &BeanPricing) -> Self {
        BeanRow {
            slot,
            name: pricing.name.clone(),
            purchase_price: truncate_units(input.purchase_price),
            purchase_weight_kg: input.purchase_weight_kg,
            roasted_weight_g: truncate_units(pricing.roasted_weight_g),
            sellable_units: pricing.sellable_units,
            cost_per_bag: round_yen(pricing.cost_per_bag),
            price_retail: round_yen(pricing.price_retail),
            price_wholesale: round_yen(pricing.price_wholesale),
            breakeven_units: pricing.breakeven_units,
            breakeven_rate_pct: pricing
                .breakeven_rate_pct
                .round_dp_with_strategy(1, RoundingStrategy::MidpointNearestEven),
            expected_profit: round_yen(pricing.expected_profit),
            tax_amount_retail: round_yen(pricing.tax_amount_retail),
            is_profitable: pricing.is_profitable,
        }
    }
}

/// Summary across every priced bean, truncated to whole yen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub bean_count: usize,
    pub total_sellable_units: u64,
    pub total_purchase_price: i64,
    pub total_expected_profit: i64,
}

impl Totals {
    pub fn from_beans<'a>(
        beans: impl IntoIterator<Item = (&'a BeanInput, &'a BeanPricing)>,
    ) -> Self {
        let mut bean_count = 0;
        let mut total_sellable_units = 0u64;
        let mut purchase = Money::ZERO;
        let mut profit = Money::ZERO;
        for (input, pricing) in beans {
            bean_count += 1;
            total_sellable_units = total_sellable_units.saturating_add(pricing.sellable_units);
            purchase += input.purchase_price;
            profit += pricing.expected_profit;
        }
        Totals {
            bean_count,
            total_sellable_units,
            total_purchase_price: truncate_units(purchase),
            total_expected_profit: truncate_units(profit),
        }
    }
}
