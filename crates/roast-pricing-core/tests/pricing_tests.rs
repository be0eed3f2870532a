use pretty_assertions::assert_eq;
use roast_pricing_core::fees::{FeeModel, OnlinePlatform, DEFAULT_CUSTOM_RATE};
use roast_pricing_core::pricing::{
    price_bean, price_beans, BeanBatchInput, BeanInput, BeanRow, PricingSettings, Totals,
    BREAKEVEN_UNREACHABLE,
};
use roast_pricing_core::limits::{MAX_AMOUNT, MAX_WEIGHT_KG};
use roast_pricing_core::RoastPricingError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn ethiopia() -> BeanInput {
    BeanInput::new("Ethiopia Yirgacheffe", dec!(10000), dec!(1.0), dec!(30), dec!(50))
}

fn brazil() -> BeanInput {
    BeanInput::new("Brazil Santos", dec!(6000), dec!(0.5), dec!(25), dec!(45))
}

fn blank() -> BeanInput {
    BeanInput::new("", Decimal::ZERO, Decimal::ZERO, dec!(30), dec!(50))
}

// ===========================================================================
// Per-bean pipeline
// ===========================================================================

#[test]
fn test_known_answer_single_bean() {
    // 1kg * 1000 * 0.8 = 800g -> 8 bags; 10000 / 8 = 1250 per bag
    // 1250 / 0.30 = 4166.67 -> 4170; 1250 / 0.50 = 2500
    let p = price_bean(&ethiopia(), &PricingSettings::default())
        .unwrap()
        .unwrap();
    assert_eq!(p.roasted_weight_g, dec!(800));
    assert_eq!(p.sellable_units, 8);
    assert_eq!(p.cost_per_bag, dec!(1250));
    assert!((p.price_retail_raw - dec!(4166.67)).abs() < dec!(0.01));
    assert_eq!(p.price_retail, dec!(4170));
    assert_eq!(p.price_wholesale, dec!(2500));
}

#[test]
fn test_known_answer_profit_and_breakeven() {
    // revenue per bag = 4170 * 0.9 = 3753
    // break-even = ceil(10000 / 3753) = 3
    // profit = 4170 * 8 * 0.9 - 10000 = 20024
    let p = price_bean(&ethiopia(), &PricingSettings::default())
        .unwrap()
        .unwrap();
    assert_eq!(p.revenue_per_bag, dec!(3753));
    assert_eq!(p.breakeven_units, 3);
    assert!(p.breakeven_reachable);
    assert_eq!(p.expected_profit, dec!(20024));
    assert!(p.is_profitable);
}

#[test]
fn test_tax_amount_contained_in_retail_price() {
    // 4170 * 0.08 / 1.08 = 308.89
    let p = price_bean(&ethiopia(), &PricingSettings::default())
        .unwrap()
        .unwrap();
    assert!((p.tax_amount_retail - dec!(308.89)).abs() < dec!(0.01));
}

#[test]
fn test_sellable_units_is_floor_of_roasted_over_unit() {
    let cases = [
        (dec!(0.25), dec!(100), 2u64), // 200g
        (dec!(0.33), dec!(100), 2),    // 264g
        (dec!(2.5), dec!(100), 20),    // 2000g
        (dec!(1.0), dec!(150), 5),     // 800 / 150 = 5.33
        (dec!(1.0), dec!(200), 4),
    ];
    for (kg, unit, expected) in cases {
        let settings = PricingSettings {
            sales_unit_g: unit,
            ..PricingSettings::default()
        };
        let bean = BeanInput::new("Kenya", dec!(5000), kg, dec!(30), dec!(50));
        let p = price_bean(&bean, &settings).unwrap().unwrap();
        assert_eq!(p.sellable_units, expected, "{kg} kg in {unit} g bags");
    }
}

#[test]
fn test_prices_are_ceiling_multiples_of_ten() {
    let prices = [dec!(1234), dec!(5000), dec!(9999), dec!(17777)];
    let weights = [dec!(0.3), dec!(1.0), dec!(2.7)];
    let rates = [dec!(1), dec!(27), dec!(33), dec!(100)];
    for price in prices {
        for kg in weights {
            for rate in rates {
                let bean = BeanInput::new("Guatemala", price, kg, rate, rate);
                let p = price_bean(&bean, &PricingSettings::default())
                    .unwrap()
                    .unwrap();
                assert_eq!(p.price_retail % dec!(10), Decimal::ZERO);
                assert!(p.price_retail >= p.cost_per_bag / (rate / dec!(100)));
                assert!(p.price_retail - p.price_retail_raw < dec!(10));
                assert_eq!(p.price_wholesale % dec!(10), Decimal::ZERO);
            }
        }
    }
}

#[test]
fn test_expected_profit_strictly_decreases_with_fee_rate() {
    let rates = [dec!(0), dec!(0.05), dec!(0.10), dec!(0.5), dec!(1.0)];
    let profits: Vec<Decimal> = rates
        .iter()
        .map(|r| {
            price_bean(&ethiopia(), &PricingSettings::with_platform_fee_rate(*r))
                .unwrap()
                .unwrap()
                .expected_profit
        })
        .collect();
    for pair in profits.windows(2) {
        assert!(pair[1] < pair[0], "profits not decreasing: {profits:?}");
    }
    // No commission: 4170 * 8 - 10000
    assert_eq!(profits[0], dec!(23360));
}

#[test]
fn test_full_commission_returns_breakeven_sentinel() {
    let p = price_bean(&ethiopia(), &PricingSettings::with_platform_fee_rate(dec!(1.0)))
        .unwrap()
        .unwrap();
    assert_eq!(p.revenue_per_bag, Decimal::ZERO);
    assert_eq!(p.breakeven_units, BREAKEVEN_UNREACHABLE);
    assert!(!p.breakeven_reachable);
    assert_eq!(p.expected_profit, dec!(-10000));
}

#[test]
fn test_insufficient_yield_is_excluded() {
    // 0.1kg -> 80g, not one 100g bag
    let bean = BeanInput::new("Sample lot", dec!(1500), dec!(0.1), dec!(30), dec!(50));
    assert!(price_bean(&bean, &PricingSettings::default())
        .unwrap()
        .is_none());
}

#[test]
fn test_online_fee_schedule_and_shipping() {
    // fee = floor(4170 * 0.029) = 120; revenue = 4170 - 120 - 200 = 3850
    let settings = PricingSettings {
        fees: FeeModel::Online {
            platform: OnlinePlatform::BaseGrowth,
            shipping_cost: dec!(200),
            custom_rate: DEFAULT_CUSTOM_RATE,
        },
        ..PricingSettings::default()
    };
    let p = price_bean(&ethiopia(), &settings).unwrap().unwrap();
    assert_eq!(p.fee_per_bag, dec!(120));
    assert_eq!(p.shipping_per_bag, dec!(200));
    assert_eq!(p.revenue_per_bag, dec!(3850));
    assert_eq!(p.expected_profit, dec!(20800));
}

#[test]
fn test_utility_and_packaging_costs() {
    // investment = 10000 + 800; cost/bag = 10800 / 8 + 50 = 1400
    // retail = 1400 / 0.3 = 4666.67 -> 4670; contribution = 4670 - 467 - 50 = 4153
    // break-even = ceil(10800 / 4153) = 3; profit = 4153 * 8 - 10800 = 22424
    let settings = PricingSettings {
        utility_cost_per_roast: dec!(800),
        packaging_cost_per_bag: dec!(50),
        ..PricingSettings::default()
    };
    let p = price_bean(&ethiopia(), &settings).unwrap().unwrap();
    assert_eq!(p.cost_per_bag, dec!(1400));
    assert_eq!(p.price_retail, dec!(4670));
    assert_eq!(p.contribution_per_bag, dec!(4153));
    assert_eq!(p.breakeven_units, 3);
    assert_eq!(p.expected_profit, dec!(22424));
}

#[test]
fn test_invalid_target_rate_rejected() {
    let bean = BeanInput::new("Panama", dec!(20000), dec!(1), dec!(0), dec!(50));
    let err = price_bean(&bean, &PricingSettings::default()).unwrap_err();
    assert!(matches!(err, RoastPricingError::InvalidInput { .. }));
}

#[test]
fn test_invalid_settings_rejected() {
    let settings = PricingSettings {
        sales_unit_g: Decimal::ZERO,
        ..PricingSettings::default()
    };
    assert!(price_bean(&ethiopia(), &settings).is_err());

    let settings = PricingSettings {
        loss_rate: dec!(1),
        ..PricingSettings::default()
    };
    assert!(price_bean(&ethiopia(), &settings).is_err());
}

#[test]
fn test_huge_purchase_weight_rejected_without_overflow() {
    let bulk = BeanInput::new("Bulk", dec!(10000), Decimal::MAX / dec!(10), dec!(30), dec!(50));
    let err = price_bean(&bulk, &PricingSettings::default()).unwrap_err();
    assert!(matches!(err, RoastPricingError::InvalidInput { .. }));

    let pricey = BeanInput::new("Pricey", Decimal::MAX, dec!(1), dec!(30), dec!(50));
    assert!(price_bean(&pricey, &PricingSettings::default()).is_err());
}

#[test]
fn test_largest_accepted_inputs_price_without_overflow() {
    let bean = BeanInput::new("Bulk", MAX_AMOUNT, MAX_WEIGHT_KG, dec!(1), dec!(1));
    let settings = PricingSettings {
        sales_unit_g: dec!(1),
        utility_cost_per_roast: MAX_AMOUNT,
        packaging_cost_per_bag: MAX_AMOUNT,
        ..PricingSettings::default()
    };
    assert!(price_bean(&bean, &settings).unwrap().is_some());
}

#[test]
fn test_sub_gram_sales_unit_rejected() {
    let settings = PricingSettings {
        sales_unit_g: dec!(0.0000001),
        ..PricingSettings::default()
    };
    assert!(price_bean(&ethiopia(), &settings).is_err());
}

#[test]
fn test_vanishing_contribution_returns_breakeven_sentinel() {
    let settings = PricingSettings::with_platform_fee_rate(dec!(0.9999999999999999999999999));
    let p = price_bean(&ethiopia(), &settings).unwrap().unwrap();
    assert_eq!(p.breakeven_units, BREAKEVEN_UNREACHABLE);
    assert!(!p.breakeven_reachable);
    assert!(!p.is_profitable);
}

// ===========================================================================
// Batch
// ===========================================================================

#[test]
fn test_batch_display_rows_and_totals() {
    let input = BeanBatchInput {
        beans: vec![ethiopia(), brazil()],
        settings: PricingSettings::default(),
    };
    let out = price_beans(&input).unwrap();

    // Brazil: 400g -> 4 bags at 1500; 1500 / 0.25 = 6000
    // profit = 6000 * 4 * 0.9 - 6000 = 15600
    assert_eq!(
        out.result.rows[0],
        BeanRow {
            slot: 1,
            name: "Ethiopia Yirgacheffe".into(),
            purchase_price: 10000,
            purchase_weight_kg: dec!(1.0),
            roasted_weight_g: 800,
            sellable_units: 8,
            cost_per_bag: 1250,
            price_retail: 4170,
            price_wholesale: 2500,
            breakeven_units: 3,
            breakeven_rate_pct: dec!(30.0),
            expected_profit: 20024,
            tax_amount_retail: 309,
            is_profitable: true,
        }
    );
    assert_eq!(out.result.rows[1].price_retail, 6000);
    assert_eq!(out.result.rows[1].expected_profit, 15600);
    assert_eq!(
        out.result.totals,
        Totals {
            bean_count: 2,
            total_sellable_units: 12,
            total_purchase_price: 16000,
            total_expected_profit: 35624,
        }
    );
    assert!(out.warnings.is_empty());
}

#[test]
fn test_purchase_price_and_totals_truncate() {
    // 10000.3 / 8 = 1250.04 -> retail 4170
    // profit = 4170 * 8 * 0.9 - 10000.3 = 20023.7
    let bean = BeanInput::new("Ethiopia", dec!(10000.3), dec!(1.0), dec!(30), dec!(50));
    let input = BeanBatchInput {
        beans: vec![bean],
        settings: PricingSettings::default(),
    };
    let out = price_beans(&input).unwrap();

    assert_eq!(out.result.beans[0].pricing.expected_profit, dec!(20023.7));
    assert_eq!(out.result.rows[0].purchase_price, 10000);
    assert_eq!(out.result.rows[0].expected_profit, 20024);
    assert_eq!(out.result.totals.total_purchase_price, 10000);
    assert_eq!(out.result.totals.total_expected_profit, 20023);
}

#[test]
fn test_batch_excludes_insufficient_yield() {
    let tiny = BeanInput::new("Geisha sample", dec!(3000), dec!(0.1), dec!(30), dec!(50));
    let input = BeanBatchInput {
        beans: vec![tiny, ethiopia()],
        settings: PricingSettings::default(),
    };
    let out = price_beans(&input).unwrap();

    assert_eq!(out.result.beans.len(), 1);
    assert_eq!(out.result.rows.len(), 1);
    assert_eq!(out.result.rows[0].slot, 2);
    assert!(out.result.rows.iter().all(|r| r.name != "Geisha sample"));
    assert_eq!(out.result.excluded.len(), 1);
    assert_eq!(out.result.excluded[0].slot, 1);
    assert_eq!(out.result.totals.total_purchase_price, 10000);
    assert!(out.warnings.iter().any(|w| w.contains("Geisha sample")));
}

#[test]
fn test_batch_skips_blank_slots_silently() {
    let input = BeanBatchInput {
        beans: vec![ethiopia(), blank(), blank(), blank(), blank()],
        settings: PricingSettings::default(),
    };
    let out = price_beans(&input).unwrap();
    assert_eq!(out.result.rows.len(), 1);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_batch_warns_on_partially_filled_slot() {
    let mut partial = blank();
    partial.name = "Colombia".into();
    let input = BeanBatchInput {
        beans: vec![ethiopia(), partial],
        settings: PricingSettings::default(),
    };
    let out = price_beans(&input).unwrap();
    assert_eq!(out.result.rows.len(), 1);
    assert!(out.warnings.iter().any(|w| w.contains("Slot 2")));
}

#[test]
fn test_batch_rejects_more_than_five_beans() {
    let input = BeanBatchInput {
        beans: vec![ethiopia(); 6],
        settings: PricingSettings::default(),
    };
    assert!(matches!(
        price_beans(&input),
        Err(RoastPricingError::InvalidInput { .. })
    ));
}

#[test]
fn test_batch_with_nothing_to_price_warns() {
    let input = BeanBatchInput {
        beans: vec![blank()],
        settings: PricingSettings::default(),
    };
    let out = price_beans(&input).unwrap();
    assert!(out.result.rows.is_empty());
    assert_eq!(out.result.totals.bean_count, 0);
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_batch_deserializes_with_default_settings() {
    let json = r#"{
        "beans": [
            { "name": "Ethiopia", "purchase_price": "10000", "purchase_weight_kg": 1.0 }
        ]
    }"#;
    let input: BeanBatchInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.settings, PricingSettings::default());
    assert_eq!(input.beans[0].target_rate_retail_pct, dec!(30));

    let out = price_beans(&input).unwrap();
    assert_eq!(out.result.rows[0].price_retail, 4170);
}
