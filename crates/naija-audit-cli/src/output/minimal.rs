use serde_json::Value;

use super::scalar;

/// Headline fields, most specific first. Searched in the result object and
/// then one level down (e.g. `result.risk.risk_level`).
const HEADLINE_KEYS: [&str; 9] = [
    "blended_score",
    "sample_size",
    "risk_level",
    "tier",
    "aggregate_score",
    "expected_cit_rate",
    "current_ratio",
    "imbalance",
    "overall_score",
];

/// Print just the key answer from the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Array(items) = result {
        // Rule listings: one id per line.
        for item in items {
            match item.get("id") {
                Some(id) => println!("{}", scalar(id, "null")),
                None => println!("{}", scalar(item, "null")),
            }
        }
        return;
    }

    if let Some((key, val)) = headline(result) {
        println!("{}: {}", key, scalar(val, "null"));
        return;
    }

    if let Some((key, val)) = result.as_object().and_then(|m| m.iter().next()) {
        println!("{}: {}", key, scalar(val, "null"));
        return;
    }

    println!("{}", scalar(result, "null"));
}

fn headline(result: &Value) -> Option<(&'static str, &Value)> {
    let map = result.as_object()?;
    let nested = || map.values().filter_map(Value::as_object);
    for key in HEADLINE_KEYS {
        if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
            return Some((key, val));
        }
        if let Some(val) = nested().find_map(|m| m.get(key).filter(|v| !v.is_null())) {
            return Some((key, val));
        }
    }
    None
}
