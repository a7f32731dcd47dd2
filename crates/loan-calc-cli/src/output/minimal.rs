use serde_json::Value;

use super::{format_scalar, result_of};

/// Headline figure of each computation, in priority order.
const HEADLINE_KEYS: [&str; 7] = [
    "installment",
    "max_principal",
    "duration_months",
    "feasible",
    "base_installment",
    "over_budget",
    "equilibrium",
];

/// Print just the key answer from the output.
pub fn print_minimal(value: &Value) {
    if let Some(line) = headline(value) {
        println!("{line}");
    }
}

fn headline(value: &Value) -> Option<String> {
    let result = result_of(value);

    let Value::Object(map) = result else {
        return Some(format_scalar(result));
    };

    for key in HEADLINE_KEYS {
        match map.get(key) {
            Some(Value::Object(eq)) => {
                if let Some(months) = eq.get("duration_months") {
                    return Some(format_scalar(months));
                }
            }
            Some(val) if !val.is_null() => return Some(format_scalar(val)),
            _ => {}
        }
    }

    map.iter()
        .next()
        .map(|(key, val)| format!("{}: {}", key, format_scalar(val)))
}
