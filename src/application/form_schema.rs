// Form schema trait - one generic controller, two prediction domains
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Client-side range hint for a single numeric field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FieldRule {
    pub const fn range(field: &'static str, min: f64, max: f64) -> Self {
        Self {
            field,
            min: Some(min),
            max: Some(max),
        }
    }

    pub const fn at_least(field: &'static str, min: f64) -> Self {
        Self {
            field,
            min: Some(min),
            max: None,
        }
    }
}

/// Everything that distinguishes one prediction domain from the other:
/// field set, defaults, validation hints, endpoint, response label, and
/// result formatting. The controller is generic over this.
pub trait FormSchema: Send + Sync + 'static {
    type Form: Serialize + DeserializeOwned + Clone + Send + Sync + 'static;

    /// Endpoint path on the prediction API, e.g. `/predict_time_delay`.
    const ENDPOINT: &'static str;
    /// Response key holding the single-element prediction batch.
    const RESPONSE_LABEL: &'static str;
    /// Shown when the backend gives no structured detail.
    const FALLBACK_ERROR: &'static str;

    fn defaults() -> Self::Form;
    fn rules() -> &'static [FieldRule];
    fn format_result(value: f64) -> String;
}

/// A per-field validation failure, reported inline next to the field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Checks the flattened form against the schema's rules: strings must be
/// non-empty, numeric fields must sit inside their declared range.
/// Purely client-side; the backend remains the source of truth.
pub fn validate(fields: &Map<String, Value>, rules: &[FieldRule]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for (name, value) in fields {
        match value {
            Value::String(text) if text.trim().is_empty() => {
                errors.push(FieldError {
                    field: name.clone(),
                    message: "is required".to_string(),
                });
            }
            Value::Number(number) => {
                let Some(v) = number.as_f64() else { continue };
                let Some(rule) = rules.iter().find(|r| r.field == name) else {
                    continue;
                };
                let too_small = rule.min.is_some_and(|min| v < min);
                let too_large = rule.max.is_some_and(|max| v > max);
                if too_small || too_large {
                    errors.push(FieldError {
                        field: name.clone(),
                        message: range_message(rule),
                    });
                }
            }
            _ => {}
        }
    }
    errors
}

fn range_message(rule: &FieldRule) -> String {
    match (rule.min, rule.max) {
        (Some(min), Some(max)) => format!("must be between {min} and {max}"),
        (Some(min), None) => format!("must be at least {min}"),
        (None, Some(max)) => format!("must be at most {max}"),
        (None, None) => "is out of range".to_string(),
    }
}
