use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::info;

use roast_pricing_core::discount::{self, DiscountInput};
use roast_pricing_core::pricing::BeanInput;

use super::{load_input, SettingsArgs};

/// Arguments for the bulk-bag discount simulator
#[derive(Args)]
pub struct DiscountArgs {
    /// Path to a JSON/YAML discount input file (overrides individual flags)
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

    /// Bulk bag size in grams
    #[arg(long, default_value = "200")]
    pub big_bag_g: Decimal,

    /// Discount off the scaled price, in percent
    #[arg(long, default_value = "0")]
    pub discount: Decimal,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

pub fn run_discount(args: DiscountArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input: DiscountInput = match load_input(args.input.as_deref(), "discount")? {
        Some(sim_input) => sim_input,
        None => {
            let (Some(name), Some(price), Some(kg)) =
                (args.name, args.purchase_price, args.purchase_weight_kg)
            else {
                return Err("--input <file>, stdin, or --name, --purchase-price and \
                            --purchase-weight-kg are required for the discount simulator"
                    .into());
            };
            DiscountInput {
                bean: BeanInput::new(name, price, kg, args.retail_rate, args.wholesale_rate),
                settings: args.settings.to_settings(),
                big_bag_g: args.big_bag_g,
                discount_rate_pct: args.discount,
            }
        }
    };

    info!(
        bean = %sim_input.bean.name,
        big_bag_g = %sim_input.big_bag_g,
        discount = %sim_input.discount_rate_pct,
        "simulating discount"
    );
    let result = discount::simulate_discount(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::display_value;
    use roast_pricing_core::pricing::PricingSettings;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rendered_summary_and_points_are_whole_yen() {
        let sim_input = DiscountInput {
            bean: BeanInput::new("Kenya", dec!(10000), dec!(0.9), dec!(30), dec!(50)),
            settings: PricingSettings::default(),
            big_bag_g: dec!(250),
            discount_rate_pct: dec!(7),
        };
        let value = serde_json::to_value(discount::simulate_discount(&sim_input).unwrap()).unwrap();
        let summary = &value["result"]["summary"];

        assert_eq!(display_value(&summary["bag_cost"]), "3,571");
        assert_eq!(display_value(&summary["profit"]), "6,418");
        for point in value["result"]["points"].as_array().unwrap() {
            assert!(point["profit"].is_i64());
            assert!(point["final_price"].is_i64());
        }
    }
}
