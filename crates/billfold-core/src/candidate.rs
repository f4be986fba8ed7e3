//! Extraction result validation and normalization
//!
//! The extraction service's answer is free-form text expected to contain
//! one JSON object. This module turns that untyped payload into a typed
//! `ExpenseCandidate` or a named `ValidationError` - nothing from the
//! service is trusted directly.

use std::str::FromStr;

use serde_json::Value;
use tracing::debug;

use crate::error::ValidationError;
use crate::models::{Category, ExpenseCandidate};

/// Placeholder used when the service returns an empty description
///
/// Description is advisory, not load-bearing for budget math, so a
/// blank one is defaulted rather than failed.
const DEFAULT_DESCRIPTION: &str = "Receipt purchase";

/// Validate raw extraction text into an expense candidate
///
/// Rules apply in order and short-circuit on the first failure:
/// 1. parseable as a JSON object, after stripping code fences
/// 2. `amount`, `category`, `description` keys all present
/// 3. `amount` coercible to a positive number
/// 4. `category` a case-insensitive member of the closed set
/// 5. `description` non-empty after trimming, else a placeholder
pub fn normalize(raw_text: &str) -> Result<ExpenseCandidate, ValidationError> {
    let payload = extract_json_object(raw_text).ok_or(ValidationError::MalformedPayload)?;

    let object: Value =
        serde_json::from_str(&payload).map_err(|_| ValidationError::MalformedPayload)?;
    let object = object.as_object().ok_or(ValidationError::MalformedPayload)?;

    for field in ["amount", "category", "description"] {
        if !object.contains_key(field) {
            debug!(field, "Extraction output missing required field");
            return Err(ValidationError::MissingField(field));
        }
    }

    let amount_value = &object["amount"];
    let amount = coerce_amount(amount_value)
        .ok_or_else(|| ValidationError::InvalidAmount(amount_value.to_string()))?;

    let category_value = &object["category"];
    let category_str = category_value
        .as_str()
        .ok_or_else(|| ValidationError::UnknownCategory(category_value.to_string()))?;
    let category = Category::from_str(category_str)
        .map_err(|_| ValidationError::UnknownCategory(category_str.to_string()))?;

    let description = object["description"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_DESCRIPTION)
        .to_string();

    Ok(ExpenseCandidate {
        amount,
        category,
        description,
    })
}

/// Locate the JSON object within the raw answer
///
/// Models often wrap their answer in ```json fences or add prose around
/// it; everything outside the outermost braces is dropped.
fn extract_json_object(raw: &str) -> Option<String> {
    let stripped = raw.replace("```json", "").replace("```", "");
    let stripped = stripped.trim();

    let start = stripped.find('{')?;
    let end = stripped.rfind('}')?;
    if start < end {
        Some(stripped[start..=end].to_string())
    } else {
        None
    }
}

/// Coerce a JSON value into a positive amount
///
/// Accepts numbers and numeric strings (models sometimes quote the
/// amount); anything non-positive or non-numeric is rejected.
fn coerce_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if amount.is_finite() && amount > 0.0 {
        Some(amount)
    } else {
        None
    }
}
