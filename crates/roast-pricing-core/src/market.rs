use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RoastPricingError;
use crate::limits::check_amount;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RoastPricingResult;

/// A recommended price within this distance of the median is in line with the market.
const IN_LINE_BAND_PCT: Percent = dec!(5);

/// Input for comparing a recommended price against competitor listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketReferenceInput {
    /// Our recommended retail price for one bag
    pub recommended_price: Money,
    /// Competitor prices for a comparable bag
    pub competitor_prices: Vec<Money>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketPosition {
    BelowMarket,
    InLine,
    AboveMarket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketReferenceOutput {
    /// Median competitor price, rounded to whole yen
    pub median_price: Money,
    pub min_price: Money,
    pub max_price: Money,
    pub sample_size: usize,
    /// (recommended - median) / median * 100
    pub premium_pct: Percent,
    pub position: MarketPosition,
}

/// Median of `prices`, averaging the two middle values for even counts.
pub fn median_price(prices: &[Money]) -> Option<Money> {
    if prices.is_empty() {
        return None;
    }
    let mut sorted = prices.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / dec!(2)
    } else {
        sorted[mid]
    };
    Some(median.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
}

/// Position a recommended price against the competitor median.
pub fn market_reference(
    input: &MarketReferenceInput,
) -> RoastPricingResult<ComputationOutput<MarketReferenceOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.recommended_price <= Decimal::ZERO {
        return Err(RoastPricingError::InvalidInput {
            field: "recommended_price".into(),
            reason: "Recommended price must be positive".into(),
        });
    }
    check_amount("recommended_price", input.recommended_price)?;
    for price in &input.competitor_prices {
        check_amount("competitor_prices", *price)?;
    }
    if input.competitor_prices.iter().any(|p| *p <= Decimal::ZERO) {
        return Err(RoastPricingError::InvalidInput {
            field: "competitor_prices".into(),
            reason: "Competitor prices must be positive".into(),
        });
    }

    let median = median_price(&input.competitor_prices).ok_or_else(|| {
        RoastPricingError::InvalidInput {
            field: "competitor_prices".into(),
            reason: "At least one competitor price is required".into(),
        }
    })?;
    if input.competitor_prices.len() < 3 {
        warnings.push(format!(
            "Only {} competitor price(s); the median is not representative",
            input.competitor_prices.len()
        ));
    }

    let premium_pct = (input.recommended_price - median) / median * dec!(100);
    let position = if premium_pct.abs() <= IN_LINE_BAND_PCT {
        MarketPosition::InLine
    } else if premium_pct < Decimal::ZERO {
        MarketPosition::BelowMarket
    } else {
        MarketPosition::AboveMarket
    };

    let output = MarketReferenceOutput {
        median_price: median,
        min_price: input.competitor_prices.iter().copied().min().unwrap_or(median),
        max_price: input.competitor_prices.iter().copied().max().unwrap_or(median),
        sample_size: input.competitor_prices.len(),
        premium_pct,
        position,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Competitor price reference (median, premium over market)",
        input,
        warnings,
        elapsed,
        output,
    ))
}
