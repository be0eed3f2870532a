use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use roast_pricing_core::pricing::{self, BeanBatchInput, BeanInput};

use super::{load_input, SettingsArgs};

/// Arguments for bean pricing
#[derive(Args)]
pub struct PriceArgs {
    /// Path to a JSON/YAML batch file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Bean name
    #[arg(long)]
    pub name: Option<String>,

    /// Total purchase price including tax and shipping (JPY)
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Green-bean purchase weight (kg)
    #[arg(long, alias = "kg")]
    pub purchase_weight_kg: Option<Decimal>,

    /// Target retail cost ratio in percent
    #[arg(long, default_value = "30")]
    pub retail_rate: Decimal,

    /// Target wholesale cost ratio in percent
    #[arg(long, default_value = "50")]
    pub wholesale_rate: Decimal,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

pub fn run_price(args: PriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let batch: BeanBatchInput = match load_input(args.input.as_deref(), "price")? {
        Some(batch) => batch,
        None => {
            let (Some(name), Some(price), Some(kg)) =
                (args.name, args.purchase_price, args.purchase_weight_kg)
            else {
                return Err("--input <file>, stdin, or --name, --purchase-price and \
                            --purchase-weight-kg are required for pricing"
                    .into());
            };
            BeanBatchInput {
                beans: vec![BeanInput::new(
                    name,
                    price,
                    kg,
                    args.retail_rate,
                    args.wholesale_rate,
                )],
                settings: args.settings.to_settings(),
            }
        }
    };

    info!(slots = batch.beans.len(), "pricing beans");
    let result = pricing::price_beans(&batch)?;
    let totals = &result.result.totals;
    if totals.bean_count > 0 && totals.total_expected_profit < 0 {
        info!(
            profit = totals.total_expected_profit,
            "batch is loss-making at the recommended prices"
        );
    }
    Ok(serde_json::to_value(result)?)
}
