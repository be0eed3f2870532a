use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RoastPricingError;
use crate::limits::{check_amount, check_range, MAX_WEIGHT_KG};
use crate::pricing::settings::PricingSettings;
use crate::rounding::ceil_to_price_step;
use crate::types::{Grams, Kilograms, Money, Percent};
use crate::RoastPricingResult;

/// Break-even reported when no number of bags recovers the investment.
pub const BREAKEVEN_UNREACHABLE: u64 = 999_999;

fn default_target_rate_retail() -> Percent {
    dec!(30)
}

fn default_target_rate_wholesale() -> Percent {
    dec!(50)
}

/// One green-bean purchase as entered on the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeanInput {
    /// Display name, e.g. "Ethiopia Yirgacheffe"
    pub name: String,
    /// Total purchase cost including tax and shipping (JPY)
    pub purchase_price: Money,
    /// Green-bean weight (kg)
    pub purchase_weight_kg: Kilograms,
    /// Target cost ratio for retail sales, in percent (1-100)
    #[serde(default = "default_target_rate_retail")]
    pub target_rate_retail_pct: Percent,
    /// Target cost ratio for wholesale, in percent (1-100)
    #[serde(default = "default_target_rate_wholesale")]
    pub target_rate_wholesale_pct: Percent,
}

impl BeanInput {
    pub fn new(
        name: impl Into<String>,
        purchase_price: Money,
        purchase_weight_kg: Kilograms,
        target_rate_retail_pct: Percent,
        target_rate_wholesale_pct: Percent,
    ) -> Self {
        BeanInput {
            name: name.into(),
            purchase_price,
            purchase_weight_kg,
            target_rate_retail_pct,
            target_rate_wholesale_pct,
        }
    }

    /// A form slot counts only once it has a name, a price and a weight.
    pub fn is_filled(&self) -> bool {
        !self.name.trim().is_empty()
            && self.purchase_price > Decimal::ZERO
            && self.purchase_weight_kg > Decimal::ZERO
    }

    pub fn validate(&self) -> RoastPricingResult<()> {
        if self.purchase_price <= Decimal::ZERO {
            return Err(RoastPricingError::InvalidInput {
                field: "purchase_price".into(),
                reason: format!("'{}': purchase price must be positive", self.name),
            });
        }
        if self.purchase_weight_kg <= Decimal::ZERO {
            return Err(RoastPricingError::InvalidInput {
                field: "purchase_weight_kg".into(),
                reason: format!("'{}': purchase weight must be positive", self.name),
            });
        }
        check_amount("purchase_price", self.purchase_price)?;
        check_range(
            "purchase_weight_kg",
            self.purchase_weight_kg,
            Decimal::ZERO,
            MAX_WEIGHT_KG,
        )?;
        for (field, pct) in [
            ("target_rate_retail_pct", self.target_rate_retail_pct),
            ("target_rate_wholesale_pct", self.target_rate_wholesale_pct),
        ] {
            if pct < Decimal::ONE || pct > dec!(100) {
                return Err(RoastPricingError::InvalidInput {
                    field: field.into(),
                    reason: format!("'{}': target cost ratio must be 1-100%, got {pct}", self.name),
                });
            }
        }
        Ok(())
    }
}

/// Full-precision pricing of one bean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeanPricing {
    pub name: String,
    /// purchase_weight_kg * 1000 * (1 - loss) * (1 - handpick loss)
    pub roasted_weight_g: Grams,
    /// floor(roasted_weight_g / sales_unit_g)
    pub sellable_units: u64,
    /// Purchase price plus per-roast utilities
    pub investment: Money,
    /// investment / sellable_units + packaging
    pub cost_per_bag: Money,
    /// cost_per_bag / retail target ratio, before rounding
    pub price_retail_raw: Money,
    /// Retail shelf price, ceiling to 10 yen
    pub price_retail: Money,
    pub price_wholesale_raw: Money,
    pub price_wholesale: Money,
    /// Commission on one retail sale
    pub fee_per_bag: Money,
    pub shipping_per_bag: Money,
    /// price_retail - fee - shipping
    pub revenue_per_bag: Money,
    /// revenue_per_bag - packaging
    pub contribution_per_bag: Money,
    /// ceil(investment / contribution_per_bag), or BREAKEVEN_UNREACHABLE
    pub breakeven_units: u64,
    pub breakeven_reachable: bool,
    /// Share of full-batch retail revenue needed to recover the investment
    pub breakeven_rate_pct: Percent,
    /// revenue_per_bag - cost_per_bag
    pub profit_per_bag: Money,
    /// contribution_per_bag * sellable_units - investment
    pub expected_profit: Money,
    /// Consumption tax contained in the retail price
    pub tax_amount_retail: Money,
    pub is_profitable: bool,
}

/// Roasted yield in grams after roasting and hand-picking losses.
pub fn roasted_weight_g(purchase_weight_kg: Kilograms, settings: &PricingSettings) -> Grams {
    purchase_weight_kg
        * dec!(1000)
        * (Decimal::ONE - settings.loss_rate)
        * (Decimal::ONE - settings.handpick_loss_rate)
}

/// Whole bags obtainable from `roasted_g`. Partial bags are not sellable.
pub fn sellable_units(roasted_g: Grams, sales_unit_g: Grams) -> RoastPricingResult<Decimal> {
    if sales_unit_g <= Decimal::ZERO {
        return Err(RoastPricingError::DivisionByZero {
            context: "sellable units (sales unit)".into(),
        });
    }
    roasted_g
        .checked_div(sales_unit_g)
        .map(|units| units.floor())
        .ok_or_else(|| RoastPricingError::InvalidInput {
            field: "sales_unit_g".into(),
            reason: format!("{roasted_g} g over {sales_unit_g} g bags is out of range"),
        })
}

/// Price at which `cost` makes up `target_rate_pct` of the price, ceiling to 10 yen.
/// Returns (raw, rounded).
pub fn price_for_cost_ratio(
    cost: Money,
    target_rate_pct: Percent,
) -> RoastPricingResult<(Money, Money)> {
    if target_rate_pct <= Decimal::ZERO {
        return Err(RoastPricingError::DivisionByZero {
            context: "target cost ratio".into(),
        });
    }
    let raw = cost
        .checked_div(target_rate_pct / dec!(100))
        .ok_or_else(|| RoastPricingError::InvalidInput {
            field: "target_rate_pct".into(),
            reason: format!("price for cost {cost} at {target_rate_pct}% is out of range"),
        })?;
    Ok((raw, ceil_to_price_step(raw)))
}

/// Price one bean. `Ok(None)` when the purchase yields no sellable bag.
pub fn price_bean(
    bean: &BeanInput,
    settings: &PricingSettings,
) -> RoastPricingResult<Option<BeanPricing>> {
    settings.validate()?;
    bean.validate()?;
    compute_bean(bean, settings)
}

/// Pricing pipeline over already-validated inputs.
pub(crate) fn compute_bean(
    bean: &BeanInput,
    settings: &PricingSettings,
) -> RoastPricingResult<Option<BeanPricing>> {
    let roasted = roasted_weight_g(bean.purchase_weight_kg, settings);
    let units = sellable_units(roasted, settings.sales_unit_g)?;

    if units <= Decimal::ZERO {
        debug!(bean = %bean.name, %roasted, "no sellable bags, excluding bean");
        return Ok(None);
    }

    let investment = bean.purchase_price + settings.utility_cost_per_roast;
    let cost_per_bag = investment / units + settings.packaging_cost_per_bag;

    let (price_retail_raw, price_retail) =
        price_for_cost_ratio(cost_per_bag, bean.target_rate_retail_pct)?;
    let (price_wholesale_raw, price_wholesale) =
        price_for_cost_ratio(cost_per_bag, bean.target_rate_wholesale_pct)?;

    let fee_per_bag = settings.fees.fee(price_retail);
    let shipping_per_bag = settings.fees.shipping();
    let revenue_per_bag = price_retail - fee_per_bag - shipping_per_bag;
    let contribution_per_bag = revenue_per_bag - settings.packaging_cost_per_bag;

    let breakeven = if contribution_per_bag > Decimal::ZERO {
        investment
            .checked_div(contribution_per_bag)
            .and_then(|bags| bags.ceil().to_u64())
    } else {
        None
    };
    let breakeven_reachable = breakeven.is_some();
    let breakeven_units = breakeven.unwrap_or(BREAKEVEN_UNREACHABLE);

    let full_batch_revenue = price_retail * units;
    if full_batch_revenue.is_zero() {
        return Err(RoastPricingError::DivisionByZero {
            context: format!("recovery ratio for '{}'", bean.name),
        });
    }
    let breakeven_rate_pct = investment / full_batch_revenue * dec!(100);

    let expected_profit = contribution_per_bag * units - investment;
    let tax_amount_retail =
        price_retail * settings.tax_rate / (Decimal::ONE + settings.tax_rate);

    let sellable_units = units.to_u64().ok_or_else(|| RoastPricingError::InvalidInput {
        field: "purchase_weight_kg".into(),
        reason: format!("'{}': sellable bag count {units} is out of range", bean.name),
    })?;

    debug!(
        bean = %bean.name,
        sellable_units,
        %cost_per_bag,
        %price_retail,
        %expected_profit,
        "priced bean"
    );

    Ok(Some(BeanPricing {
        name: bean.name.clone(),
        roasted_weight_g: roasted,
        sellable_units,
        investment,
        cost_per_bag,
        price_retail_raw,
        price_retail,
        price_wholesale_raw,
        price_wholesale,
        fee_per_bag,
        shipping_per_bag,
        revenue_per_bag,
        contribution_per_bag,
        breakeven_units,
        breakeven_reachable,
        breakeven_rate_pct,
        profit_per_bag: revenue_per_bag - cost_per_bag,
        expected_profit,
        tax_amount_retail,
        is_profitable: expected_profit > Decimal::ZERO,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ethiopia() -> BeanInput {
        BeanInput::new("Ethiopia", dec!(10000), dec!(1.0), dec!(30), dec!(50))
    }

    #[test]
    fn test_roasted_weight_applies_both_losses() {
        let settings = PricingSettings {
            handpick_loss_rate: dec!(0.05),
            ..PricingSettings::default()
        };
        // 1000g * 0.8 * 0.95 = 760g
        assert_eq!(roasted_weight_g(dec!(1), &settings), dec!(760));
    }

    #[test]
    fn test_sellable_units_floors() {
        assert_eq!(sellable_units(dec!(799.9), dec!(100)).unwrap(), dec!(7));
        assert!(sellable_units(dec!(800), Decimal::ZERO).is_err());
    }

    #[test]
    fn test_validate_rejects_target_rate_out_of_range() {
        let mut bean = ethiopia();
        bean.target_rate_retail_pct = dec!(0.5);
        assert!(bean.validate().is_err());
        bean.target_rate_retail_pct = dec!(101);
        assert!(bean.validate().is_err());
    }

    #[test]
    fn test_is_filled_requires_name() {
        let mut bean = ethiopia();
        assert!(bean.is_filled());
        bean.name = "   ".into();
        assert!(!bean.is_filled());
    }

    #[test]
    fn test_profit_per_bag_matches_totals() {
        let p = price_bean(&ethiopia(), &PricingSettings::default())
            .unwrap()
            .unwrap();
        // (4170 * 0.9 - 1250) * 8 = 20024 = 4170 * 8 * 0.9 - 10000
        assert_eq!(p.profit_per_bag * dec!(8), p.expected_profit);
    }
}
