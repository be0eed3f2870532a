use colored::Colorize;
use serde_json::Value;

use super::{chart, display_value};

/// One card per priced bean, blend or discount quote, for reading at a glance.
pub fn print_cards(value: &Value) {
    let Some(result) = value.get("result").filter(|r| r.is_object()) else {
        super::table::print_table(value);
        return;
    };

    if let Some(Value::Array(rows)) = result.get("rows") {
        for row in rows {
            print_bean_card(row);
        }
        if let Some(Value::Array(excluded)) = result.get("excluded") {
            for bean in excluded {
                println!(
                    "{} {} ({})",
                    "excluded".yellow().bold(),
                    field(bean, "name"),
                    field(bean, "reason")
                );
            }
        }
        if let Some(totals) = result.get("totals") {
            println!(
                "{}  beans {}  bags {}  purchase ¥{}  profit ¥{}",
                "TOTAL".bold(),
                field(totals, "bean_count"),
                field(totals, "total_sellable_units"),
                field(totals, "total_purchase_price"),
                field(totals, "total_expected_profit")
            );
        }
    } else if let Some(row) = result.get("row").filter(|r| r.is_object()) {
        println!("{} {}", "Blend".bold(), field(result, "name"));
        print_bean_card(row);
    } else if let Some(summary) = result.get("summary") {
        print_discount_card(summary, result.get("points"));
    } else {
        super::table::print_table(value);
        return;
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        for w in warnings {
            if let Value::String(s) = w {
                println!("{} {}", "warning:".yellow(), s);
            }
        }
    }
}

fn field(value: &Value, key: &str) -> String {
    value.get(key).map(display_value).unwrap_or_default()
}

fn print_bean_card(row: &Value) {
    let profitable = row
        .get("is_profitable")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let profit = format!("¥{}", field(row, "expected_profit"));

    println!("┌─ {} ", field(row, "name").bold());
    println!(
        "│ {}kg green -> {}g roasted, {} bags",
        field(row, "purchase_weight_kg"),
        field(row, "roasted_weight_g"),
        field(row, "sellable_units")
    );
    println!("│ cost/bag    ¥{}", field(row, "cost_per_bag"));
    println!(
        "│ retail      ¥{}  (tax incl. ¥{})",
        field(row, "price_retail").cyan().bold(),
        field(row, "tax_amount_retail")
    );
    println!("│ wholesale   ¥{}", field(row, "price_wholesale"));
    println!(
        "│ break-even  {} bags ({}%)",
        field(row, "breakeven_units"),
        field(row, "breakeven_rate_pct")
    );
    println!(
        "└ profit      {}",
        if profitable {
            profit.green().bold()
        } else {
            profit.red().bold()
        }
    );
}

fn print_discount_card(summary: &Value, points: Option<&Value>) {
    let status = summary.get("status").and_then(Value::as_str).unwrap_or("");
    let badge = match status {
        "safe" => "SAFE".green().bold(),
        "warning" => "WARNING".yellow().bold(),
        _ => "DANGER".red().bold(),
    };

    println!(
        "┌─ {} {}g bag  [{}]",
        field(summary, "bean_name").bold(),
        field(summary, "big_bag_g"),
        badge
    );
    println!(
        "│ list ¥{} -> {}% off -> ¥{}",
        field(summary, "scaled_price"),
        field(summary, "discount_pct"),
        field(summary, "final_price").cyan().bold()
    );
    println!(
        "│ cost ¥{}  fee ¥{} ({})  shipping ¥{}",
        field(summary, "bag_cost"),
        field(summary, "fee"),
        field(summary, "fee_label"),
        field(summary, "shipping")
    );
    println!(
        "│ cost ratio {}% (wholesale target {}%)",
        field(summary, "cost_ratio_pct"),
        field(summary, "wholesale_target_pct")
    );
    println!("└ profit ¥{}", field(summary, "profit").bold());

    if let Some(Value::Array(points)) = points {
        println!();
        chart::print_profit_chart(points);
    }
}
