use serde_json::Value;

use super::plain_value;

/// Dotted paths to the headline figure of each command, in priority order.
const PRIORITY_PATHS: [&str; 6] = [
    "totals.total_expected_profit",
    "summary.profit",
    "row.price_retail",
    "median_price",
    "cheapest_online",
    "premium_pct",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for path in PRIORITY_PATHS {
        if let Some(val) = lookup(result_obj, path) {
            if !val.is_null() {
                println!("{}", plain_value(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, plain_value(val));
            return;
        }
    }

    println!("{}", plain_value(result_obj));
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_follows_dotted_path() {
        let v = json!({"totals": {"total_expected_profit": 35624}});
        assert_eq!(lookup(&v, "totals.total_expected_profit"), Some(&json!(35624)));
        assert_eq!(lookup(&v, "summary.profit"), None);
    }
}
