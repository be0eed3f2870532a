use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RoastPricingError;
use crate::limits::check_amount;
use crate::rounding::floor_yen;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::RoastPricingResult;

/// Marketplace commission used when no fee model is given.
pub const DEFAULT_PLATFORM_FEE_RATE: Rate = dec!(0.10);

/// Rate applied to `Custom` plans and payment methods unless overridden.
pub const DEFAULT_CUSTOM_RATE: Rate = dec!(0.0324);

// ---------------------------------------------------------------------------
// Fee schedules
// ---------------------------------------------------------------------------

/// Online shop platform plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnlinePlatform {
    BaseStandard,
    BaseGrowth,
    StoresFree,
    StoresStandard,
    ShopifyBasic,
    ShopifyStandard,
    ShopifyAdvanced,
    Custom,
}

impl OnlinePlatform {
    pub const ALL: [OnlinePlatform; 8] = [
        OnlinePlatform::BaseStandard,
        OnlinePlatform::BaseGrowth,
        OnlinePlatform::StoresFree,
        OnlinePlatform::StoresStandard,
        OnlinePlatform::ShopifyBasic,
        OnlinePlatform::ShopifyStandard,
        OnlinePlatform::ShopifyAdvanced,
        OnlinePlatform::Custom,
    ];

    /// (percentage rate, fixed charge per order). `None` for custom plans.
    fn schedule(self) -> Option<(Rate, Money)> {
        match self {
            OnlinePlatform::BaseStandard => Some((dec!(0.066), dec!(40))),
            OnlinePlatform::BaseGrowth => Some((dec!(0.029), Decimal::ZERO)),
            OnlinePlatform::StoresFree => Some((dec!(0.05), Decimal::ZERO)),
            OnlinePlatform::StoresStandard => Some((dec!(0.036), Decimal::ZERO)),
            OnlinePlatform::ShopifyBasic => Some((dec!(0.034), Decimal::ZERO)),
            OnlinePlatform::ShopifyStandard => Some((dec!(0.033), Decimal::ZERO)),
            OnlinePlatform::ShopifyAdvanced => Some((dec!(0.032), Decimal::ZERO)),
            OnlinePlatform::Custom => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OnlinePlatform::BaseStandard => "BASE Standard",
            OnlinePlatform::BaseGrowth => "BASE Growth",
            OnlinePlatform::StoresFree => "STORES Free",
            OnlinePlatform::StoresStandard => "STORES Standard",
            OnlinePlatform::ShopifyBasic => "Shopify Basic",
            OnlinePlatform::ShopifyStandard => "Shopify",
            OnlinePlatform::ShopifyAdvanced => "Shopify Advanced",
            OnlinePlatform::Custom => "Custom",
        }
    }
}

/// In-store payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    #[serde(rename = "paypay")]
    PayPay,
    #[serde(rename = "quicpay")]
    QuicPay,
    TransportIc,
    Custom,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        PaymentMethod::Cash,
        PaymentMethod::CreditCard,
        PaymentMethod::PayPay,
        PaymentMethod::QuicPay,
        PaymentMethod::TransportIc,
        PaymentMethod::Custom,
    ];

    fn rate(self) -> Option<Rate> {
        match self {
            PaymentMethod::Cash => Some(Decimal::ZERO),
            PaymentMethod::PayPay => Some(dec!(0.0198)),
            // Square / AirPay card-present rate
            PaymentMethod::CreditCard | PaymentMethod::QuicPay | PaymentMethod::TransportIc => {
                Some(dec!(0.0324))
            }
            PaymentMethod::Custom => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::CreditCard => "Credit card",
            PaymentMethod::PayPay => "PayPay",
            PaymentMethod::QuicPay => "QUICPay",
            PaymentMethod::TransportIc => "Transport IC",
            PaymentMethod::Custom => "Custom",
        }
    }
}

fn default_custom_rate() -> Rate {
    DEFAULT_CUSTOM_RATE
}

/// How a sale is charged before the money reaches the roaster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeeModel {
    /// A single commission rate on the shelf price, unrounded.
    Flat { rate: Rate },
    /// Online shop: platform commission floored to yen, plus shipping per bag.
    Online {
        platform: OnlinePlatform,
        #[serde(default)]
        shipping_cost: Money,
        #[serde(default = "default_custom_rate")]
        custom_rate: Rate,
    },
    /// Over-the-counter sale: payment processing fee floored to yen.
    InStore {
        payment_method: PaymentMethod,
        #[serde(default = "default_custom_rate")]
        custom_rate: Rate,
    },
}

impl Default for FeeModel {
    fn default() -> Self {
        FeeModel::Flat {
            rate: DEFAULT_PLATFORM_FEE_RATE,
        }
    }
}

impl FeeModel {
    pub fn flat(rate: Rate) -> Self {
        FeeModel::Flat { rate }
    }

    pub fn validate(&self) -> RoastPricingResult<()> {
        match self {
            FeeModel::Flat { rate } => check_rate("fees.rate", *rate),
            FeeModel::Online {
                shipping_cost,
                custom_rate,
                ..
            } => {
                check_amount("fees.shipping_cost", *shipping_cost)?;
                check_rate("fees.custom_rate", *custom_rate)
            }
            FeeModel::InStore { custom_rate, .. } => check_rate("fees.custom_rate", *custom_rate),
        }
    }

    /// Commission charged on a sale at `price`.
    pub fn fee(&self, price: Money) -> Money {
        match self {
            FeeModel::Flat { rate } => price * rate,
            FeeModel::Online {
                platform,
                custom_rate,
                ..
            } => {
                let (rate, fixed) = platform.schedule().unwrap_or((*custom_rate, Decimal::ZERO));
                floor_yen(price * rate + fixed)
            }
            FeeModel::InStore {
                payment_method,
                custom_rate,
            } => floor_yen(price * payment_method.rate().unwrap_or(*custom_rate)),
        }
    }

    /// Shipping borne by the seller per bag. Only online sales ship.
    pub fn shipping(&self) -> Money {
        match self {
            FeeModel::Online { shipping_cost, .. } => *shipping_cost,
            _ => Decimal::ZERO,
        }
    }

    pub fn label(&self) -> String {
        match self {
            FeeModel::Flat { rate } => format!("Flat {}%", (rate * dec!(100)).normalize()),
            FeeModel::Online { platform, .. } => platform.label().to_string(),
            FeeModel::InStore { payment_method, .. } => payment_method.label().to_string(),
        }
    }
}

fn check_rate(field: &str, rate: Rate) -> RoastPricingResult<()> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(RoastPricingError::InvalidInput {
            field: field.into(),
            reason: format!("Rate must be between 0 and 1, got {rate}"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Fee comparison
// ---------------------------------------------------------------------------

/// Input for quoting one shelf price across every sales channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeComparisonInput {
    /// Shelf price of one bag
    pub price: Money,
    /// Shipping charged on online orders
    #[serde(default)]
    pub shipping_cost: Money,
    /// Rate used for the custom plan / payment method
    #[serde(default = "default_custom_rate")]
    pub custom_rate: Rate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleChannel {
    Online,
    InStore,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeQuote {
    pub channel: SaleChannel,
    pub plan: String,
    pub fee: Money,
    pub shipping: Money,
    /// price - fee - shipping
    pub net_revenue: Money,
    /// (fee + shipping) / price
    pub effective_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeComparisonOutput {
    pub price: Money,
    pub quotes: Vec<FeeQuote>,
    pub cheapest_online: String,
    pub cheapest_in_store: String,
}

/// Quote the fee on one price for every online plan and in-store payment method.
pub fn compare_fees(
    input: &FeeComparisonInput,
) -> RoastPricingResult<ComputationOutput<FeeComparisonOutput>> {
    let start = Instant::now();

    if input.price <= Decimal::ZERO {
        return Err(RoastPricingError::InvalidInput {
            field: "price".into(),
            reason: "Price must be positive".into(),
        });
    }
    check_amount("price", input.price)?;

    let online = OnlinePlatform::ALL.iter().map(|platform| FeeModel::Online {
        platform: *platform,
        shipping_cost: input.shipping_cost,
        custom_rate: input.custom_rate,
    });
    let in_store = PaymentMethod::ALL.iter().map(|method| FeeModel::InStore {
        payment_method: *method,
        custom_rate: input.custom_rate,
    });

    let mut quotes = Vec::with_capacity(OnlinePlatform::ALL.len() + PaymentMethod::ALL.len());
    for model in online.chain(in_store) {
        model.validate()?;
        let fee = model.fee(input.price);
        let shipping = model.shipping();
        let channel = match model {
            FeeModel::InStore { .. } => SaleChannel::InStore,
            _ => SaleChannel::Online,
        };
        quotes.push(FeeQuote {
            channel,
            plan: model.label(),
            fee,
            shipping,
            net_revenue: input.price - fee - shipping,
            effective_rate: (fee + shipping) / input.price,
        });
    }

    let cheapest = |channel: SaleChannel| {
        quotes
            .iter()
            .filter(|q| q.channel == channel)
            .min_by_key(|q| q.fee)
            .map(|q| q.plan.clone())
            .unwrap_or_default()
    };
    let cheapest_online = cheapest(SaleChannel::Online);
    let cheapest_in_store = cheapest(SaleChannel::InStore);

    let output = FeeComparisonOutput {
        price: input.price,
        quotes,
        cheapest_online,
        cheapest_in_store,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Sales channel fee comparison (platform commission, payment processing, shipping)",
        input,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_fee_is_unrounded() {
        let model = FeeModel::flat(dec!(0.10));
        assert_eq!(model.fee(dec!(4175)), dec!(417.5));
        assert_eq!(model.shipping(), Decimal::ZERO);
    }

    #[test]
    fn test_base_standard_adds_fixed_charge() {
        let model = FeeModel::Online {
            platform: OnlinePlatform::BaseStandard,
            shipping_cost: dec!(185),
            custom_rate: DEFAULT_CUSTOM_RATE,
        };
        // 2000 * 6.6% + 40 = 172
        assert_eq!(model.fee(dec!(2000)), dec!(172));
        assert_eq!(model.shipping(), dec!(185));
    }

    #[test]
    fn test_in_store_fee_floors_to_yen() {
        let model = FeeModel::InStore {
            payment_method: PaymentMethod::PayPay,
            custom_rate: DEFAULT_CUSTOM_RATE,
        };
        // 1980 * 1.98% = 39.204 -> 39
        assert_eq!(model.fee(dec!(1980)), dec!(39));
    }

    #[test]
    fn test_custom_method_uses_custom_rate() {
        let model = FeeModel::InStore {
            payment_method: PaymentMethod::Custom,
            custom_rate: dec!(0.05),
        };
        assert_eq!(model.fee(dec!(1000)), dec!(50));
    }

    #[test]
    fn test_cash_has_no_fee() {
        let model = FeeModel::InStore {
            payment_method: PaymentMethod::Cash,
            custom_rate: DEFAULT_CUSTOM_RATE,
        };
        assert_eq!(model.fee(dec!(1500)), Decimal::ZERO);
    }

    #[test]
    fn test_validate_rejects_rate_above_one() {
        assert!(FeeModel::flat(dec!(1.5)).validate().is_err());
        assert!(FeeModel::flat(dec!(1.0)).validate().is_ok());
    }

    #[test]
    fn test_fee_model_deserializes_tagged() {
        let model: FeeModel =
            serde_json::from_str(r#"{"kind":"in_store","payment_method":"paypay"}"#).unwrap();
        assert_eq!(
            model,
            FeeModel::InStore {
                payment_method: PaymentMethod::PayPay,
                custom_rate: DEFAULT_CUSTOM_RATE,
            }
        );
    }

    #[test]
    fn test_compare_fees_finds_cheapest() {
        let input = FeeComparisonInput {
            price: dec!(2000),
            shipping_cost: Decimal::ZERO,
            custom_rate: dec!(0.10),
        };
        let out = compare_fees(&input).unwrap();
        assert_eq!(out.result.quotes.len(), 14);
        assert_eq!(out.result.cheapest_online, "BASE Growth");
        assert_eq!(out.result.cheapest_in_store, "Cash");
    }

    #[test]
    fn test_compare_fees_rejects_oversized_amounts() {
        let input = FeeComparisonInput {
            price: Decimal::MAX,
            shipping_cost: Decimal::ZERO,
            custom_rate: DEFAULT_CUSTOM_RATE,
        };
        assert!(compare_fees(&input).is_err());

        let input = FeeComparisonInput {
            price: dec!(1000),
            shipping_cost: Decimal::MAX,
            custom_rate: DEFAULT_CUSTOM_RATE,
        };
        assert!(compare_fees(&input).is_err());
    }
}
