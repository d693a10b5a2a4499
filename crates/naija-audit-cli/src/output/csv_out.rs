use serde_json::Value;
use std::io;

use super::scalar;

/// Write output as CSV to stdout.
///
/// Envelopes flatten their `result` into `field,value` rows with dotted
/// paths (`risk.component_scores.liquidity`, `lines.0.amount`); a bare
/// array of objects (the rule listing) becomes one row per object.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let target = map.get("result").unwrap_or(value);
            let _ = wtr.write_record(["field", "value"]);
            let mut rows = Vec::new();
            flatten("", target, &mut rows);
            for (path, val) in rows {
                let _ = wtr.write_record([path.as_str(), val.as_str()]);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&scalar(value, "")]);
        }
    }

    let _ = wtr.flush();
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                flatten(&join(key), val, rows);
            }
        }
        Value::Array(items) if items.iter().any(|v| v.is_object() || v.is_array()) => {
            for (i, val) in items.iter().enumerate() {
                flatten(&join(&i.to_string()), val, rows);
            }
        }
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(|v| scalar(v, "")).collect();
            rows.push((prefix.to_string(), joined.join("; ")));
        }
        _ => rows.push((prefix.to_string(), scalar(value, ""))),
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(|v| scalar(v, "")).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&scalar(item, "")]);
        }
    }
}
