use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RoastPricingError;
use crate::fees::FeeModel;
use crate::limits::{check_amount, check_range, MAX_BAG_G, MIN_SALES_UNIT_G};
use crate::types::{Grams, Money, Rate};
use crate::RoastPricingResult;

/// Weight lost in roasting.
pub const DEFAULT_LOSS_RATE: Rate = dec!(0.20);

/// Grams per retail bag.
pub const DEFAULT_SALES_UNIT_G: Grams = dec!(100);

/// Reduced consumption tax rate applied to coffee beans.
pub const DEFAULT_TAX_RATE: Rate = dec!(0.08);

fn default_loss_rate() -> Rate {
    DEFAULT_LOSS_RATE
}

fn default_sales_unit_g() -> Grams {
    DEFAULT_SALES_UNIT_G
}

fn default_tax_rate() -> Rate {
    DEFAULT_TAX_RATE
}

/// Process-wide constants shared by every bean in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Roasting weight loss (0.20 = 20%)
    #[serde(default = "default_loss_rate")]
    pub loss_rate: Rate,
    /// Additional loss from hand-picking defects after roasting
    #[serde(default)]
    pub handpick_loss_rate: Rate,
    /// Bag size in grams
    #[serde(default = "default_sales_unit_g")]
    pub sales_unit_g: Grams,
    /// Consumption tax included in shelf prices
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Rate,
    /// Gas / electricity per roast batch
    #[serde(default)]
    pub utility_cost_per_roast: Money,
    /// Bag, valve and label cost per bag
    #[serde(default)]
    pub packaging_cost_per_bag: Money,
    /// Platform commission and shipping model
    #[serde(default)]
    pub fees: FeeModel,
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            loss_rate: DEFAULT_LOSS_RATE,
            handpick_loss_rate: Decimal::ZERO,
            sales_unit_g: DEFAULT_SALES_UNIT_G,
            tax_rate: DEFAULT_TAX_RATE,
            utility_cost_per_roast: Decimal::ZERO,
            packaging_cost_per_bag: Decimal::ZERO,
            fees: FeeModel::default(),
        }
    }
}

impl PricingSettings {
    /// Settings with a flat platform commission and everything else at defaults.
    pub fn with_platform_fee_rate(rate: Rate) -> Self {
        PricingSettings {
            fees: FeeModel::flat(rate),
            ..PricingSettings::default()
        }
    }

    pub fn validate(&self) -> RoastPricingResult<()> {
        for (field, rate) in [
            ("loss_rate", self.loss_rate),
            ("handpick_loss_rate", self.handpick_loss_rate),
        ] {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                return Err(RoastPricingError::InvalidInput {
                    field: field.into(),
                    reason: format!("Loss rate must be in [0, 1), got {rate}"),
                });
            }
        }

        check_range("sales_unit_g", self.sales_unit_g, MIN_SALES_UNIT_G, MAX_BAG_G)?;
        check_range("tax_rate", self.tax_rate, Decimal::ZERO, Decimal::ONE)?;
        check_amount("utility_cost_per_roast", self.utility_cost_per_roast)?;
        check_amount("packaging_cost_per_bag", self.packaging_cost_per_bag)?;

        self.fees.validate()
    }
}
