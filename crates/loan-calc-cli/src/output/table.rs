use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_scalar, result_of};

/// Print the result as tables: scalar fields first, then one table per
/// nested object (summary, budget, sweet spot) and per list of records
/// (schedule rows, projection points, scenarios).
pub fn print_table(value: &Value) {
    match result_of(value) {
        Value::Object(map) => print_sections(None, map),
        Value::Array(items) => print_records(None, items),
        Value::Null => println!("(no result)"),
        other => println!("{}", format_scalar(other)),
    }

    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_sections(title: Option<&str>, map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        if !val.is_object() && !is_record_list(val) {
            builder.push_record([key.as_str(), &format_scalar(val)]);
        }
    }
    print_titled(title, Table::from(builder));

    for (key, val) in map {
        match val {
            Value::Object(nested) => print_sections(Some(key.as_str()), nested),
            Value::Array(items) if is_record_list(val) => print_records(Some(key.as_str()), items),
            _ => {}
        }
    }
}

fn print_records(title: Option<&str>, items: &[Value]) {
    if items.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = items.first() else {
        for item in items {
            println!("{}", format_scalar(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in items {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    print_titled(title, Table::from(builder));
}

fn print_titled(title: Option<&str>, table: Table) {
    if let Some(t) = title {
        println!("\n{}", t);
    }
    println!("{}", table);
}

fn is_record_list(value: &Value) -> bool {
    matches!(value, Value::Array(items) if items.first().is_some_and(Value::is_object))
}
