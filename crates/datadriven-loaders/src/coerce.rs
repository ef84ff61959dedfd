use serde_json::{Number, Value};

/// Convert a raw CSV cell into a typed value.
///
/// Tried in order: the literals `true` and `false`, a whole-string integer,
/// a whole-string finite float. Anything else stays the original string, so
/// coercion never fails. No trimming is done. Integers outside the `i64` and
/// `u64` ranges stay strings rather than becoming lossy floats.
pub fn coerce_cell(cell: &str) -> Value {
    match cell {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => parse_number(cell).unwrap_or_else(|| Value::String(cell.to_string())),
    }
}

fn parse_number(cell: &str) -> Option<Value> {
    if let Ok(n) = cell.parse::<i64>() {
        return Some(Value::from(n));
    }
    if let Ok(n) = cell.parse::<u64>() {
        return Some(Value::from(n));
    }
    if is_integer_literal(cell) {
        return None;
    }
    // `f64::from_str` accepts "inf" and "NaN"; JSON numbers cannot hold them.
    cell.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
}

fn is_integer_literal(cell: &str) -> bool {
    let digits = cell.strip_prefix(['+', '-']).unwrap_or(cell);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
