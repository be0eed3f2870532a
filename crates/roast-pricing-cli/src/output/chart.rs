use colored::Colorize;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use super::display_decimal;

const BAR_WIDTH: usize = 40;

fn decimal_field(point: &Value, key: &str) -> Option<Decimal> {
    match point.get(key)? {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// Horizontal bar per discount step, scaled to the largest absolute profit.
pub fn print_profit_chart(curve: &[Value]) {
    let points: Vec<(Decimal, Decimal)> = curve
        .iter()
        .filter_map(|p| Some((decimal_field(p, "discount_pct")?, decimal_field(p, "profit")?)))
        .collect();
    if points.is_empty() {
        return;
    }

    let max_abs = points
        .iter()
        .map(|(_, profit)| profit.abs())
        .max()
        .unwrap_or(Decimal::ZERO);

    println!("Profit by discount:");
    for (discount, profit) in &points {
        println!("{}", chart_line(*discount, *profit, max_abs));
    }
}

fn chart_line(discount: Decimal, profit: Decimal, max_abs: Decimal) -> String {
    format!(
        "  {:>4}% {} {}",
        display_decimal(discount),
        bar(profit, max_abs),
        display_decimal(profit)
    )
}

fn bar(profit: Decimal, max_abs: Decimal) -> String {
    if max_abs.is_zero() {
        return String::new();
    }
    let len = (profit.abs() / max_abs * Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0)
        .max(1);
    let body = "█".repeat(len);
    if profit > Decimal::ZERO {
        body.green().to_string()
    } else {
        body.red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bar_scales_to_width() {
        colored::control::set_override(false);
        assert_eq!(bar(dec!(5006), dec!(5006)).chars().count(), BAR_WIDTH);
        assert_eq!(bar(dec!(2503), dec!(5006)).chars().count(), BAR_WIDTH / 2);
        assert_eq!(bar(dec!(1), dec!(5006)).chars().count(), 1);
        assert!(bar(dec!(0), dec!(0)).is_empty());
    }

    #[test]
    fn test_decimal_field_reads_strings_and_numbers() {
        let point = serde_json::json!({"discount_pct": "5", "profit": 120});
        assert_eq!(decimal_field(&point, "discount_pct"), Some(dec!(5)));
        assert_eq!(decimal_field(&point, "profit"), Some(dec!(120)));
        assert_eq!(decimal_field(&point, "missing"), None);
    }

    #[test]
    fn test_chart_line_shows_whole_yen_profit() {
        colored::control::set_override(false);
        let point = serde_json::json!({"discount_pct": "0", "profit": 7165});
        let profit = decimal_field(&point, "profit").unwrap();
        let line = chart_line(dec!(0), profit, profit);
        assert!(line.ends_with(" 7,165"));
        assert!(!line.contains('.'));
    }
}
