use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RoastPricingError;
use crate::limits::{check_amount, check_range, MAX_WEIGHT_KG};
use crate::pricing::bean::{compute_bean, BeanInput, BeanPricing};
use crate::pricing::report::BeanRow;
use crate::pricing::settings::PricingSettings;
use crate::types::{with_metadata, ComputationOutput, Kilograms, Money, Percent};
use crate::RoastPricingResult;

/// Ratios may miss 100% by this much before the recipe is flagged.
const RATIO_TOLERANCE_PCT: Percent = dec!(0.1);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One green bean in a blend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendIngredient {
    pub name: String,
    pub price_per_kg: Money,
    /// Share of the blend by weight, in percent
    pub ratio_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendRecipe {
    pub name: String,
    pub ingredients: Vec<BlendIngredient>,
    /// Green weight of one blend batch
    pub total_batch_weight_kg: Kilograms,
    pub target_rate_retail_pct: Percent,
    pub target_rate_wholesale_pct: Percent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendInput {
    pub recipe: BlendRecipe,
    #[serde(default)]
    pub settings: PricingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendOutput {
    pub name: String,
    pub ratio_total_pct: Percent,
    /// Ratios add up to 100% within tolerance
    pub ratio_valid: bool,
    /// Σ price_per_kg * ratio
    pub avg_cost_per_kg: Money,
    /// avg_cost_per_kg * total_batch_weight_kg
    pub total_cost: Money,
    /// Pricing of the blend treated as a single bean; `None` if it fills no bag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<BeanPricing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<BeanRow>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Cost a blend recipe and price it as one virtual bean.
pub fn price_blend(input: &BlendInput) -> RoastPricingResult<ComputationOutput<BlendOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let recipe = &input.recipe;

    // -- Validation ----------------------------------------------------------
    input.settings.validate()?;
    validate_recipe(recipe)?;

    // -- Recipe cost ---------------------------------------------------------
    let ratio_total_pct: Percent = recipe.ingredients.iter().map(|i| i.ratio_pct).sum();
    let ratio_valid = (ratio_total_pct - dec!(100)).abs() <= RATIO_TOLERANCE_PCT;
    if !ratio_valid {
        warnings.push(format!(
            "Ingredient ratios add up to {}%, not 100%",
            ratio_total_pct.normalize()
        ));
    }

    let avg_cost_per_kg: Money = recipe
        .ingredients
        .iter()
        .map(|i| i.price_per_kg * i.ratio_pct / dec!(100))
        .sum();
    let total_cost = avg_cost_per_kg * recipe.total_batch_weight_kg;

    // -- Virtual bean ----------------------------------------------------------
    let purchase_price =
        total_cost.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    if purchase_price <= Decimal::ZERO {
        return Err(RoastPricingError::InvalidInput {
            field: "ingredients".into(),
            reason: "Blend batch cost must be positive".into(),
        });
    }

    let bean = BeanInput::new(
        recipe.name.clone(),
        purchase_price,
        recipe.total_batch_weight_kg,
        recipe.target_rate_retail_pct,
        recipe.target_rate_wholesale_pct,
    );
    bean.validate()?;

    let pricing = compute_bean(&bean, &input.settings)?;
    if pricing.is_none() {
        warnings.push(format!(
            "'{}': a {} kg batch does not fill a single bag",
            recipe.name,
            recipe.total_batch_weight_kg.normalize()
        ));
    }
    let row = pricing.as_ref().map(|p| BeanRow::new(1, &bean, p));

    let output = BlendOutput {
        name: recipe.name.clone(),
        ratio_total_pct,
        ratio_valid,
        avg_cost_per_kg,
        total_cost,
        pricing,
        row,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Blend recipe costing (weighted green cost, priced as a single batch)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

fn validate_recipe(recipe: &BlendRecipe) -> RoastPricingResult<()> {
    if recipe.ingredients.is_empty() {
        return Err(RoastPricingError::InvalidInput {
            field: "ingredients".into(),
            reason: "A blend needs at least one ingredient".into(),
        });
    }

    for ingredient in &recipe.ingredients {
        check_amount("ingredients.price_per_kg", ingredient.price_per_kg)?;
        if ingredient.ratio_pct < Decimal::ZERO || ingredient.ratio_pct > dec!(100) {
            return Err(RoastPricingError::InvalidInput {
                field: "ingredients.ratio_pct".into(),
                reason: format!("'{}': ratio must be 0-100%", ingredient.name),
            });
        }
    }

    if recipe.total_batch_weight_kg <= Decimal::ZERO {
        return Err(RoastPricingError::InvalidInput {
            field: "total_batch_weight_kg".into(),
            reason: "Batch weight must be positive".into(),
        });
    }
    check_range(
        "total_batch_weight_kg",
        recipe.total_batch_weight_kg,
        Decimal::ZERO,
        MAX_WEIGHT_KG,
    )?;

    Ok(())
}
