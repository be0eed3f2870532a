use clap::Args;
use serde_json::Value;

use roast_pricing_core::blend::{self, BlendInput};

use super::load_input;

/// Arguments for blend recipe pricing
#[derive(Args)]
pub struct BlendArgs {
    /// Path to a JSON/YAML blend recipe file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_blend(args: BlendArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let blend_input: BlendInput = load_input(args.input.as_deref(), "blend")?
        .ok_or("--input <file> or stdin required for blend pricing")?;
    let result = blend::price_blend(&blend_input)?;
    Ok(serde_json::to_value(result)?)
}
