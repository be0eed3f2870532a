use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use roast_pricing_core::fees::{self, FeeComparisonInput, DEFAULT_CUSTOM_RATE};

use super::load_input;

/// Arguments for sales channel fee comparison
#[derive(Args)]
pub struct FeesArgs {
    /// Path to a JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Shelf price of one bag (JPY)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Shipping charged on online orders (JPY)
    #[arg(long, default_value = "0")]
    pub shipping_cost: Decimal,

    /// Rate for the custom plan / payment method (e.g. 0.0324)
    #[arg(long)]
    pub custom_rate: Option<Decimal>,
}

pub fn run_fees(args: FeesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fee_input: FeeComparisonInput = match load_input(args.input.as_deref(), "fees")? {
        Some(fee_input) => fee_input,
        None => FeeComparisonInput {
            price: args
                .price
                .ok_or("--input <file>, stdin, or --price is required for fee comparison")?,
            shipping_cost: args.shipping_cost,
            custom_rate: args.custom_rate.unwrap_or(DEFAULT_CUSTOM_RATE),
        },
    };
    let result = fees::compare_fees(&fee_input)?;
    Ok(serde_json::to_value(result)?)
}
