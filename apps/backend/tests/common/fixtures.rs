//! Test fixtures and factory functions for request bodies.

use serde_json::{json, Value};

/// Body for POST /api/memorization/memorize.
pub fn memorize_request(unit: Option<u32>) -> Value {
    match unit {
        Some(unit) => json!({ "unit": unit }),
        None => json!({}),
    }
}

/// Body for POST /api/memorization/review.
pub fn review_request(unit: u32, quality: &str) -> Value {
    json!({ "unit": unit, "quality": quality })
}

/// Body for PUT /api/settings.
pub fn settings_request(new_target: Option<i64>, review_target: Option<i64>) -> Value {
    let mut body = json!({});
    if let Some(target) = new_target {
        body["daily_new_units_target"] = json!(target);
    }
    if let Some(target) = review_target {
        body["daily_review_units_target"] = json!(target);
    }
    body
}

/// Assessment answers with `correct` right out of `total`.
pub fn assessment_request(correct: usize, total: usize) -> Value {
    let answers: Vec<bool> = (0..total).map(|i| i < correct).collect();
    json!({ "answers": answers })
}
