use serde_json::Value;
use std::sync::OnceLock;

/// Upper bound for `{:?}` output of arguments printed by `arg_context!`
pub static DEBUG_PRINT_LIMIT: OnceLock<usize> = OnceLock::new();

pub fn clip_string(mut string: String, ending: &str, length: usize) -> String {
    if length == 0 {
        string = String::default();
    } else if string.chars().count() > length {
        string = format!(
            "{}{}",
            string
                .chars()
                .take(length.saturating_sub(ending.chars().count()))
                .collect::<String>(),
            ending
        );
    }

    string
}

fn number_to_string(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }

    match number.as_f64() {
        // 2.0 is "2" in a form field, not "2.0"
        Some(float) if float.fract() == 0.0 && float.abs() < 1e21 => format!("{:.0}", float),
        Some(float) => float.to_string(),
        None => number.to_string(),
    }
}

/// String identity of a record field, the way a native `<select>` would see it.
/// `None` stands for a missing field.
pub fn coerce_to_string(value: Option<&Value>) -> String {
    match value {
        None => String::from("undefined"),
        Some(Value::Null) => String::from("null"),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number_to_string(number),
        Some(Value::String(string)) => string.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::default(),
                item => coerce_to_string(Some(item)),
            })
            .collect::<Vec<_>>()
            .join(","),
        Some(Value::Object(_)) => String::from("[object Object]"),
    }
}

pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number
            .as_f64()
            .is_some_and(|float| float != 0.0 && !float.is_nan()),
        Some(Value::String(string)) => !string.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}
