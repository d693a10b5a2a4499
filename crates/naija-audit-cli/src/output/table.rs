use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::scalar;

/// Format output as tables using the tabled crate. Nested objects in the
/// result get their own titled table; arrays of objects become row tables.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_notes(map);
            } else {
                print_object("", map);
            }
        }
        Value::Array(arr) => print_rows("", arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    let Value::Object(res_map) = result else {
        println!("{}", scalar(result, "null"));
        return;
    };

    let mut scalars = Map::new();
    let mut sections = Vec::new();
    for (key, val) in res_map {
        match val {
            Value::Object(_) | Value::Array(_) if !is_scalar_list(val) => sections.push((key, val)),
            _ => {
                scalars.insert(key.clone(), val.clone());
            }
        }
    }

    if !scalars.is_empty() {
        print_object("", &scalars);
    }
    for (title, val) in sections {
        match val {
            Value::Object(inner) => print_object(title, inner),
            Value::Array(rows) => print_rows(title, rows),
            _ => {}
        }
    }
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(title: &str, map: &Map<String, Value>) {
    if !title.is_empty() {
        println!("\n{}", title);
    }
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_rows(title: &str, arr: &[Value]) {
    if !title.is_empty() {
        println!("\n{}", title);
    }
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Headers from the first object
    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn is_scalar_list(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.iter().all(|v| !v.is_object() && !v.is_array()))
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        _ => scalar(value, "null"),
    }
}
