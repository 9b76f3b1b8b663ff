use serde_json::Value;

/// Print just the headline figure of the output.
///
/// Looks for the quoted rate first, then the payment, then the emissions
/// figures, then falls back to the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "final_rate_percent",
        "monthly_payment",
        "total_payment",
        "emissions_kg",
        "savings_kg",
        "potential_penalty_eur",
        "annual_savings_eur",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Profile listings: one tier per line
    if let Value::Array(items) = result_obj {
        for item in items {
            match item.get("tier") {
                Some(tier) => println!("{}", format_minimal(tier)),
                None => println!("{}", format_minimal(item)),
            }
        }
        return;
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
