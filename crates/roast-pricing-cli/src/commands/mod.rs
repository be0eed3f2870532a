pub mod blend;
pub mod discount;
pub mod fees;
pub mod market;
pub mod pricing;

use clap::Args;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

use roast_pricing_core::fees::FeeModel;
use roast_pricing_core::pricing::PricingSettings;

use crate::input;

/// Process-wide settings shared by every pricing command
#[derive(Args, Default)]
pub struct SettingsArgs {
    /// Roasting weight loss (e.g. 0.20 for 20%)
    #[arg(long)]
    pub loss_rate: Option<Decimal>,

    /// Additional hand-picking loss after roasting
    #[arg(long)]
    pub handpick_loss_rate: Option<Decimal>,

    /// Grams per retail bag
    #[arg(long, alias = "unit")]
    pub sales_unit_g: Option<Decimal>,

    /// Flat platform commission (e.g. 0.10 for 10%, 0 for direct sales)
    #[arg(long, alias = "fee")]
    pub platform_fee_rate: Option<Decimal>,

    /// Consumption tax rate included in shelf prices
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Utility cost per roast batch (JPY)
    #[arg(long)]
    pub utility_cost: Option<Decimal>,

    /// Packaging cost per bag (JPY)
    #[arg(long)]
    pub packaging_cost: Option<Decimal>,
}

impl SettingsArgs {
    /// Defaults overridden by whichever flags were given.
    pub fn to_settings(&self) -> PricingSettings {
        let mut settings = PricingSettings::default();
        if let Some(v) = self.loss_rate {
            settings.loss_rate = v;
        }
        if let Some(v) = self.handpick_loss_rate {
            settings.handpick_loss_rate = v;
        }
        if let Some(v) = self.sales_unit_g {
            settings.sales_unit_g = v;
        }
        if let Some(v) = self.platform_fee_rate {
            settings.fees = FeeModel::flat(v);
        }
        if let Some(v) = self.tax_rate {
            settings.tax_rate = v;
        }
        if let Some(v) = self.utility_cost {
            settings.utility_cost_per_roast = v;
        }
        if let Some(v) = self.packaging_cost {
            settings.packaging_cost_per_bag = v;
        }
        settings
    }
}

/// Load a typed input from `--input <file>` or piped stdin. `None` when neither is present.
pub fn load_input<T: DeserializeOwned>(
    path: Option<&str>,
    command: &str,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(input::file::read_input(path)?));
    }
    if let Some(data) = input::stdin::read_stdin(command)? {
        return Ok(Some(serde_json::from_value(data)?));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_no_flags_gives_default_settings() {
        assert_eq!(SettingsArgs::default().to_settings(), PricingSettings::default());
    }

    #[test]
    fn test_fee_flag_selects_flat_model() {
        let args = SettingsArgs {
            platform_fee_rate: Some(dec!(0)),
            sales_unit_g: Some(dec!(200)),
            ..SettingsArgs::default()
        };
        let settings = args.to_settings();
        assert_eq!(settings.fees, FeeModel::flat(dec!(0)));
        assert_eq!(settings.sales_unit_g, dec!(200));
    }
}
