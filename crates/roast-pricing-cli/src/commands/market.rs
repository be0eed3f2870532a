use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use roast_pricing_core::market::{self, MarketReferenceInput};

use super::load_input;

/// Arguments for competitor price comparison
#[derive(Args)]
pub struct MarketArgs {
    /// Path to a JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Our recommended retail price (JPY)
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Competitor prices, comma separated (e.g. 1200,1350,980)
    #[arg(long, value_delimiter = ',')]
    pub competitors: Vec<Decimal>,
}

pub fn run_market(args: MarketArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let market_input: MarketReferenceInput = match load_input(args.input.as_deref(), "market")? {
        Some(market_input) => market_input,
        None => MarketReferenceInput {
            recommended_price: args
                .price
                .ok_or("--input <file>, stdin, or --price is required for market comparison")?,
            competitor_prices: args.competitors,
        },
    };
    let result = market::market_reference(&market_input)?;
    Ok(serde_json::to_value(result)?)
}
