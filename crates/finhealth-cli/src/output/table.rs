use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as tables using the tabled crate.
///
/// Assessment output nests list sections (metric comparisons, forecast
/// points, products, cost savings) inside the result object; each such
/// section is rendered as its own row table under a heading, after the
/// scalar summary table.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result(result);
                print_envelope_trailer(map);
            } else {
                print_scalar_table(value);
            }
        }
        Value::Array(arr) => print_rows(arr),
        _ => println!("{}", value),
    }
}

fn print_result(result: &Value) {
    let Value::Object(map) = result else {
        println!("{}", result);
        return;
    };

    // Scalar summary first.
    print_scalar_table(result);

    // Then one table per list-of-records section, and one per nested
    // object section (e.g. sub_scores, weights).
    for (key, val) in map {
        match val {
            Value::Array(arr) if arr.iter().any(|v| v.is_object()) => {
                println!("\n{}:", key);
                print_rows(arr);
            }
            Value::Object(_) => {
                println!("\n{}:", key);
                print_scalar_table(val);
            }
            _ => {}
        }
    }
}

/// Two-column table of the scalar and string-list fields of an object.
fn print_scalar_table(value: &Value) {
    let Value::Object(map) = value else {
        return;
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        match val {
            Value::Object(_) => continue,
            Value::Array(arr) if arr.iter().any(|v| v.is_object()) => continue,
            _ => builder.push_record([key.as_str(), &render(val)]),
        }
    }
    println!("{}", Table::from(builder));
}

fn print_rows(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            println!("{}", render(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(render).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_trailer(envelope: &serde_json::Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {}", methodology);
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => arr.iter().map(render).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
