//! Pure validation of a single entered value against its field's declared
//! rules. Failures are data, not errors: the first applicable violation is
//! returned as a human-readable message and the remaining checks are skipped.

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use super::schema::{FieldSchema, FieldType};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn validate_field(value: &Value, field: &FieldSchema) -> Option<String> {
    if field.required && is_empty(value) {
        return Some(format!("{} is required", field.label));
    }

    // Constraints only apply once a value is present; a falsy optional value
    // passes even when a bundle is configured.
    if is_falsy(value) {
        return None;
    }

    let rules = field.validation.as_ref()?;

    if field.kind.is_text_like() {
        if let Some(message) = check_text(value, rules) {
            return Some(message);
        }
    } else if field.kind == FieldType::Number {
        if let Some(message) = check_number(value, rules) {
            return Some(message);
        }
    } else if field.kind == FieldType::Date {
        if let Some(message) = check_date(value, rules) {
            return Some(message);
        }
    }

    // Cardinality bounds apply to any array-valued entry regardless of the
    // declared type.
    if let Value::Array(items) = value {
        if let Some(min) = rules.min_selected {
            if items.len() < min {
                return Some(format!("Select at least {min} options"));
            }
        }
        if let Some(max) = rules.max_selected {
            if items.len() > max {
                return Some(format!("Select at most {max} options"));
            }
        }
    }

    None
}

/// Absent or empty for the purposes of the `required` rule: null, an empty
/// string, or an empty selection.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// The short-circuit set: empty string, zero, false, absent. Arrays are never
/// falsy; an empty selection still reaches the cardinality checks.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::String(text) => text.is_empty(),
        Value::Number(num) => num.as_f64() == Some(0.0),
        _ => false,
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(num) => num.to_string(),
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

fn check_text(value: &Value, rules: &super::ValidationRules) -> Option<String> {
    let text = as_text(value);
    let length = text.chars().count();
    if let Some(min) = rules.min {
        if (length as f64) < min {
            return Some(format!("Minimum {min} characters required"));
        }
    }
    if let Some(max) = rules.max {
        if (length as f64) > max {
            return Some(format!("Maximum {max} characters allowed"));
        }
    }
    if let Some(pattern) = rules.regex.as_deref() {
        match Regex::new(pattern) {
            Ok(regex) => {
                if !regex.is_match(&text) {
                    return Some("Invalid format".to_string());
                }
            }
            Err(error) => {
                // A builder-side typo in the pattern must not fail every entry.
                tracing::warn!(%pattern, %error, "skipping unparsable regex rule");
            }
        }
    }
    None
}

fn check_number(value: &Value, rules: &super::ValidationRules) -> Option<String> {
    let parsed = match value {
        Value::Number(num) => num.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    let Some(number) = parsed else {
        // Unparsable entries must not slip past configured bounds.
        if rules.min.is_some() || rules.max.is_some() {
            return Some("Must be a number".to_string());
        }
        return None;
    };
    if let Some(min) = rules.min {
        if number < min {
            return Some(format!("Minimum value is {min}"));
        }
    }
    if let Some(max) = rules.max {
        if number > max {
            return Some(format!("Maximum value is {max}"));
        }
    }
    None
}

fn check_date(value: &Value, rules: &super::ValidationRules) -> Option<String> {
    let bound = rules.min_date.as_deref()?;
    let Ok(min_date) = NaiveDate::parse_from_str(bound, DATE_FORMAT) else {
        tracing::warn!(%bound, "skipping unparsable minDate rule");
        return None;
    };
    let text = as_text(value);
    let Ok(entered) = NaiveDate::parse_from_str(&text, DATE_FORMAT) else {
        return Some("Invalid date".to_string());
    };
    if entered < min_date {
        return Some(format!("Date must be after {bound}"));
    }
    None
}
