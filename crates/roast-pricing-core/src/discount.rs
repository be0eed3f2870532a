use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RoastPricingError;
use crate::fees::FeeModel;
use crate::limits::{check_range, MAX_BAG_G};
use crate::pricing::bean::{compute_bean, roasted_weight_g, sellable_units, BeanInput};
use crate::pricing::settings::PricingSettings;
use crate::rounding::{ceil_to_price_step, floor_to_yen, round_yen};
use crate::types::{with_metadata, ComputationOutput, Grams, Money, Percent};
use crate::RoastPricingResult;

/// The profit curve sweeps discounts from 0% up to this value.
pub const CURVE_MAX_DISCOUNT_PCT: u32 = 50;
pub const CURVE_STEP_PCT: usize = 5;

fn default_big_bag_g() -> Grams {
    dec!(200)
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for the bulk-bag / discount profit simulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountInput {
    /// Bean whose regular bag price is scaled
    pub bean: BeanInput,
    #[serde(default)]
    pub settings: PricingSettings,
    /// Size of the bulk bag in grams
    #[serde(default = "default_big_bag_g")]
    pub big_bag_g: Grams,
    /// Discount off the scaled price, in percent
    #[serde(default)]
    pub discount_rate_pct: Percent,
}

/// Margin health of a discounted sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginStatus {
    /// Profitable and the cost ratio is within the wholesale target
    Safe,
    /// Profitable but the cost ratio exceeds the wholesale target
    Warning,
    /// The sale loses money
    Danger,
}

impl MarginStatus {
    pub fn classify(profit: Money, cost_ratio_pct: Percent, wholesale_target_pct: Percent) -> Self {
        if profit <= Decimal::ZERO {
            MarginStatus::Danger
        } else if cost_ratio_pct <= wholesale_target_pct {
            MarginStatus::Safe
        } else {
            MarginStatus::Warning
        }
    }
}

/// Result of selling one bulk bag at one discount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountPoint {
    pub discount_pct: Percent,
    /// ceil(scaled_price * (1 - discount) / 10) * 10
    pub final_price: Money,
    pub fee: Money,
    /// final_price - bag_cost - fee - shipping
    pub profit: Money,
    /// bag_cost / final_price * 100
    pub cost_ratio_pct: Percent,
    pub status: MarginStatus,
}

/// Full-precision figures of one simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountDetail {
    pub bean_name: String,
    /// Regular retail price of one sales-unit bag
    pub base_price_retail: Money,
    pub base_cost_per_bag: Money,
    pub base_price_per_g: Money,
    pub base_cost_per_g: Money,
    pub big_bag_g: Grams,
    /// Undiscounted price of the bulk bag
    pub scaled_price: Money,
    pub bag_cost: Money,
    pub shipping: Money,
    pub fee_label: String,
    pub wholesale_target_pct: Percent,
    /// The requested discount
    pub quote: DiscountPoint,
    /// Discounts 0%, 5%, ... 50%
    pub curve: Vec<DiscountPoint>,
}

/// The requested discount as shown to the user: whole yen, ratio to 1 dp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRow {
    pub bean_name: String,
    pub big_bag_g: Grams,
    pub scaled_price: i64,
    pub bag_cost: i64,
    pub discount_pct: Percent,
    pub final_price: i64,
    pub fee: i64,
    pub fee_label: String,
    pub shipping: i64,
    /// Floored to whole yen
    pub profit: i64,
    pub cost_ratio_pct: Percent,
    pub wholesale_target_pct: Percent,
    pub status: MarginStatus,
}

impl DiscountRow {
    pub fn new(detail: &DiscountDetail) -> Self {
        let quote = DiscountPointRow::from(&detail.quote);
        DiscountRow {
            bean_name: detail.bean_name.clone(),
            big_bag_g: detail.big_bag_g,
            scaled_price: round_yen(detail.scaled_price),
            bag_cost: round_yen(detail.bag_cost),
            discount_pct: quote.discount_pct,
            final_price: quote.final_price,
            fee: quote.fee,
            fee_label: detail.fee_label.clone(),
            shipping: round_yen(detail.shipping),
            profit: quote.profit,
            cost_ratio_pct: quote.cost_ratio_pct,
            wholesale_target_pct: detail.wholesale_target_pct,
            status: quote.status,
        }
    }
}

/// One curve point in whole yen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountPointRow {
    pub discount_pct: Percent,
    pub final_price: i64,
    pub fee: i64,
    pub profit: i64,
    pub cost_ratio_pct: Percent,
    pub status: MarginStatus,
}

impl From<&DiscountPoint> for DiscountPointRow {
    fn from(point: &DiscountPoint) -> Self {
        DiscountPointRow {
            discount_pct: point.discount_pct,
            final_price: round_yen(point.final_price),
            fee: round_yen(point.fee),
            profit: floor_to_yen(point.profit),
            cost_ratio_pct: point
                .cost_ratio_pct
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero),
            status: point.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountOutput {
    /// Requested discount, whole yen
    pub summary: DiscountRow,
    /// Profit curve, whole yen
    pub points: Vec<DiscountPointRow>,
    /// Largest curve discount that still makes a profit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_profitable_discount_pct: Option<Percent>,
    pub detail: DiscountDetail,
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Price a bulk bag from the bean's per-gram retail price and sweep discounts.
pub fn simulate_discount(
    input: &DiscountInput,
) -> RoastPricingResult<ComputationOutput<DiscountOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // -- Validation ----------------------------------------------------------
    input.settings.validate()?;
    input.bean.validate()?;

    if input.big_bag_g <= Decimal::ZERO {
        return Err(RoastPricingError::InvalidInput {
            field: "big_bag_g".into(),
            reason: "Bag size must be a positive number of grams".into(),
        });
    }
    check_range("big_bag_g", input.big_bag_g, Decimal::ZERO, MAX_BAG_G)?;

    if input.discount_rate_pct < Decimal::ZERO || input.discount_rate_pct > dec!(100) {
        return Err(RoastPricingError::InvalidInput {
            field: "discount_rate_pct".into(),
            reason: format!("Discount must be 0-100%, got {}", input.discount_rate_pct),
        });
    }

    // -- Base bag ------------------------------------------------------------
    let settings = &input.settings;
    let base = match compute_bean(&input.bean, settings)? {
        Some(p) => p,
        None => {
            let roasted = roasted_weight_g(input.bean.purchase_weight_kg, settings);
            return Err(RoastPricingError::InsufficientYield {
                bean: input.bean.name.clone(),
                sellable_units: sellable_units(roasted, settings.sales_unit_g)?,
            });
        }
    };

    let base_price_per_g = base.price_retail / settings.sales_unit_g;
    let base_cost_per_g = base.cost_per_bag / settings.sales_unit_g;
    let scaled_price = base_price_per_g * input.big_bag_g;
    let bag_cost = base_cost_per_g * input.big_bag_g;
    let wholesale_target_pct = input.bean.target_rate_wholesale_pct;

    let quote_at = |discount_pct: Percent| {
        quote_bag(
            scaled_price,
            discount_pct,
            bag_cost,
            &settings.fees,
            wholesale_target_pct,
        )
    };

    // -- Requested discount and sweep ----------------------------------------
    let quote = quote_at(input.discount_rate_pct);
    let curve: Vec<DiscountPoint> = (0..=CURVE_MAX_DISCOUNT_PCT)
        .step_by(CURVE_STEP_PCT)
        .map(|d| quote_at(Decimal::from(d)))
        .collect();

    let max_profitable_discount_pct = curve
        .iter()
        .filter(|p| p.profit > Decimal::ZERO)
        .map(|p| p.discount_pct)
        .max();

    match quote.status {
        MarginStatus::Danger => warnings.push(format!(
            "A {}% discount on a {} g bag loses money",
            input.discount_rate_pct.normalize(),
            input.big_bag_g.normalize()
        )),
        MarginStatus::Warning => warnings.push(format!(
            "Cost ratio {}% exceeds the wholesale target of {}%",
            quote.cost_ratio_pct.round_dp(1),
            wholesale_target_pct.normalize()
        )),
        MarginStatus::Safe => {}
    }

    let detail = DiscountDetail {
        bean_name: base.name,
        base_price_retail: base.price_retail,
        base_cost_per_bag: base.cost_per_bag,
        base_price_per_g,
        base_cost_per_g,
        big_bag_g: input.big_bag_g,
        scaled_price,
        bag_cost,
        shipping: settings.fees.shipping(),
        fee_label: settings.fees.label(),
        wholesale_target_pct,
        quote,
        curve,
    };
    let output = DiscountOutput {
        summary: DiscountRow::new(&detail),
        points: detail.curve.iter().map(DiscountPointRow::from).collect(),
        max_profitable_discount_pct,
        detail,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Bulk bag discount simulation (per-gram scaling, 10-yen ceiling, fee-adjusted profit)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Quote one bulk bag at `discount_pct`.
fn quote_bag(
    scaled_price: Money,
    discount_pct: Percent,
    bag_cost: Money,
    fees: &FeeModel,
    wholesale_target_pct: Percent,
) -> DiscountPoint {
    let discounted = scaled_price * (Decimal::ONE - discount_pct / dec!(100));
    let final_price = ceil_to_price_step(discounted);
    let fee = fees.fee(final_price);
    let profit = final_price - bag_cost - fee - fees.shipping();
    let cost_ratio_pct = if final_price > Decimal::ZERO {
        bag_cost / final_price * dec!(100)
    } else {
        dec!(100)
    };

    DiscountPoint {
        discount_pct,
        final_price,
        fee,
        profit,
        cost_ratio_pct,
        status: MarginStatus::classify(profit, cost_ratio_pct, wholesale_target_pct),
    }
}
