use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::RoastPricingError;
use crate::pricing::bean::{compute_bean, roasted_weight_g, sellable_units, BeanInput, BeanPricing};
use crate::pricing::report::{BeanRow, Totals};
use crate::pricing::settings::PricingSettings;
use crate::types::{with_metadata, ComputationOutput, Grams};
use crate::RoastPricingResult;

/// The form holds at most this many beans.
pub const MAX_BEANS: usize = 5;

/// Input for pricing every bean on the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeanBatchInput {
    /// Form slots in order; unfilled slots are skipped
    pub beans: Vec<BeanInput>,
    #[serde(default)]
    pub settings: PricingSettings,
}

/// A bean that produced a result, with its 1-based form slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricedBean {
    pub slot: usize,
    #[serde(flatten)]
    pub pricing: BeanPricing,
}

/// A filled slot that could not be priced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExcludedBean {
    pub slot: usize,
    pub name: String,
    pub roasted_weight_g: Grams,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPricingOutput {
    /// Full-precision results
    pub beans: Vec<PricedBean>,
    /// Display rows (whole yen)
    pub rows: Vec<BeanRow>,
    pub excluded: Vec<ExcludedBean>,
    pub totals: Totals,
}

/// Price every filled bean on the form.
///
/// Beans whose roasted yield does not fill a single bag are listed in
/// `excluded` and never appear in `beans` or `rows`.
pub fn price_beans(
    input: &BeanBatchInput,
) -> RoastPricingResult<ComputationOutput<BatchPricingOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    // -- Validation ----------------------------------------------------------
    if input.beans.len() > MAX_BEANS {
        return Err(RoastPricingError::InvalidInput {
            field: "beans".into(),
            reason: format!(
                "At most {MAX_BEANS} beans can be compared, got {}",
                input.beans.len()
            ),
        });
    }
    input.settings.validate()?;

    let mut filled: Vec<(usize, &BeanInput)> = Vec::with_capacity(input.beans.len());
    for (i, bean) in input.beans.iter().enumerate() {
        let slot = i + 1;
        if bean.is_filled() {
            bean.validate()?;
            filled.push((slot, bean));
        } else if is_partially_filled(bean) {
            warnings.push(format!(
                "Slot {slot} skipped: name, purchase price and purchase weight are all required"
            ));
        }
    }

    // -- Per-bean pricing ----------------------------------------------------
    let mut priced: Vec<(usize, &BeanInput, BeanPricing)> = Vec::with_capacity(filled.len());
    let mut excluded = Vec::new();
    for (slot, bean) in filled {
        match compute_bean(bean, &input.settings)? {
            Some(pricing) => priced.push((slot, bean, pricing)),
            None => {
                let roasted = roasted_weight_g(bean.purchase_weight_kg, &input.settings);
                let units = sellable_units(roasted, input.settings.sales_unit_g)?;
                warnings.push(format!(
                    "'{}' excluded: {} g roasted does not fill a {} g bag",
                    bean.name,
                    roasted.normalize(),
                    input.settings.sales_unit_g.normalize()
                ));
                excluded.push(ExcludedBean {
                    slot,
                    name: bean.name.clone(),
                    roasted_weight_g: roasted,
                    reason: format!("insufficient yield ({units} sellable bags)"),
                });
            }
        }
    }

    if priced.is_empty() {
        warnings.push("No beans to price: enter at least one name, price and weight".into());
    }

    for (_, _, pricing) in &priced {
        if !pricing.breakeven_reachable {
            warnings.push(format!(
                "'{}': fees and shipping consume the whole retail price; break-even is unreachable",
                pricing.name
            ));
        } else if !pricing.is_profitable {
            warnings.push(format!(
                "'{}': selling every bag at the retail price does not recover the purchase",
                pricing.name
            ));
        }
    }

    // -- Report --------------------------------------------------------------
    let rows = priced
        .iter()
        .map(|(slot, bean, pricing)| BeanRow::new(*slot, bean, pricing))
        .collect();
    let totals = Totals::from_beans(priced.iter().map(|(_, bean, pricing)| (*bean, pricing)));
    debug!(
        priced = totals.bean_count,
        excluded = excluded.len(),
        "batch priced"
    );

    let output = BatchPricingOutput {
        beans: priced
            .into_iter()
            .map(|(slot, _, pricing)| PricedBean { slot, pricing })
            .collect(),
        rows,
        excluded,
        totals,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Roasted bean pricing (yield loss, bag quantization, cost-ratio pricing, break-even)",
        &serde_json::json!({
            "slots": input.beans.len(),
            "settings": input.settings,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn is_partially_filled(bean: &BeanInput) -> bool {
    !bean.name.trim().is_empty()
        || bean.purchase_price != Decimal::ZERO
        || bean.purchase_weight_kg != Decimal::ZERO
}
