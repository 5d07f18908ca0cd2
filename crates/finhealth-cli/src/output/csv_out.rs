use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// A result object with a dominant list section (forecast points, metric
/// comparisons, cost savings) emits that section as rows; otherwise the
/// scalar fields are written as field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            if let Some(rows) = dominant_rows(map) {
                write_rows(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    if !val.is_object() {
                        let _ = wtr.write_record([key.as_str(), &render_cell(val)]);
                    }
                }
            }
        }
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&render_cell(result)]);
        }
    }

    let _ = wtr.flush();
}

/// The largest array-of-records field, if any.
fn dominant_rows(map: &serde_json::Map<String, Value>) -> Option<&Vec<Value>> {
    map.values()
        .filter_map(|v| match v {
            Value::Array(arr) if arr.iter().any(|item| item.is_object()) => Some(arr),
            _ => None,
        })
        .max_by_key(|arr| arr.len())
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&render_cell(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(render_cell).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn render_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
