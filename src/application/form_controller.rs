// Form controller - single-flight submission state machine per domain
use crate::application::form_schema::{FieldError, FormSchema, validate};
use crate::application::prediction_gateway::{GatewayHandle, PredictionRequest};
use crate::infrastructure::wire::to_wire_query;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::Mutex;

/// Observable controller states. Validation runs synchronously inside
/// `submit`, so a distinct validating state is never visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    Idle,
    Submitting,
    Success,
    Failed,
}

/// Point-in-time view of a controller, as handed to the presentation
/// layer. `fields` is the flat form in wire field names.
#[derive(Debug, Clone, Serialize)]
pub struct FormSnapshot {
    pub phase: FormPhase,
    pub fields: Value,
    pub result: Option<f64>,
    pub result_display: Option<String>,
    pub error: Option<String>,
    pub field_errors: Vec<FieldError>,
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error(transparent)]
    Internal(#[from] serde_json::Error),
}

struct Inner<F> {
    form: F,
    phase: FormPhase,
    result: Option<f64>,
    error: Option<String>,
    field_errors: Vec<FieldError>,
    // Bumped on reset; an in-flight response whose generation no longer
    // matches is dropped on arrival.
    generation: u64,
}

/// One controller per prediction domain. Owns its form record
/// exclusively; the only shared resource is the gateway handle.
pub struct FormController<S: FormSchema> {
    gateway: GatewayHandle,
    inner: Mutex<Inner<S::Form>>,
}

impl<S: FormSchema> FormController<S> {
    pub fn new(gateway: GatewayHandle) -> Self {
        Self {
            gateway,
            inner: Mutex::new(Inner {
                form: S::defaults(),
                phase: FormPhase::Idle,
                result: None,
                error: None,
                field_errors: Vec::new(),
                generation: 0,
            }),
        }
    }

    pub async fn snapshot(&self) -> Result<FormSnapshot, serde_json::Error> {
        let inner = self.inner.lock().await;
        Self::snapshot_of(&inner)
    }

    /// Merges a partial field patch (wire field names) into the form.
    /// Unknown fields and type mismatches are rejected without touching
    /// state. An edit re-enters idle unless a submission is in flight.
    pub async fn edit(&self, patch: Map<String, Value>) -> Result<FormSnapshot, EditError> {
        let mut inner = self.inner.lock().await;
        let mut flat = flatten(&inner.form)?;
        for (field, value) in patch {
            if !flat.contains_key(&field) {
                return Err(EditError::UnknownField(field));
            }
            flat.insert(field, value);
        }
        inner.form = serde_json::from_value(Value::Object(flat))
            .map_err(|e| EditError::InvalidValue(e.to_string()))?;
        if inner.phase != FormPhase::Submitting {
            inner.phase = FormPhase::Idle;
        }
        inner.field_errors.clear();
        Ok(Self::snapshot_of(&inner)?)
    }

    /// Validates, maps to the wire shape, and awaits one prediction
    /// round trip. Submitting while already in flight is a no-op.
    pub async fn submit(&self) -> Result<FormSnapshot, serde_json::Error> {
        let (body, generation) = {
            let mut inner = self.inner.lock().await;
            if inner.phase == FormPhase::Submitting {
                return Self::snapshot_of(&inner);
            }
            let flat = flatten(&inner.form)?;
            let field_errors = validate(&flat, S::rules());
            if !field_errors.is_empty() {
                inner.phase = FormPhase::Idle;
                inner.field_errors = field_errors;
                return Self::snapshot_of(&inner);
            }
            inner.field_errors.clear();
            let body = to_wire_query(&inner.form)?;
            inner.phase = FormPhase::Submitting;
            (body, inner.generation)
        };

        // Sole suspension point; the lock is not held across it so a
        // reset stays possible while the request is in flight.
        let gateway = self.gateway.current().await;
        let outcome = gateway
            .predict(PredictionRequest {
                endpoint: S::ENDPOINT,
                response_label: S::RESPONSE_LABEL,
                fallback_error: S::FALLBACK_ERROR,
                body,
            })
            .await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            // Controller was reset while this call was in flight.
            return Self::snapshot_of(&inner);
        }
        match outcome {
            Ok(value) => {
                inner.phase = FormPhase::Success;
                inner.result = Some(value);
                inner.error = None;
            }
            Err(e) => {
                inner.phase = FormPhase::Failed;
                inner.error = Some(e.to_string());
                inner.result = None;
            }
        }
        Self::snapshot_of(&inner)
    }

    /// Restores default field values and clears result and error.
    /// Available from any state.
    pub async fn reset(&self) -> Result<FormSnapshot, serde_json::Error> {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.form = S::defaults();
        inner.phase = FormPhase::Idle;
        inner.result = None;
        inner.error = None;
        inner.field_errors.clear();
        Self::snapshot_of(&inner)
    }

    fn snapshot_of(inner: &Inner<S::Form>) -> Result<FormSnapshot, serde_json::Error> {
        Ok(FormSnapshot {
            phase: inner.phase,
            fields: serde_json::to_value(&inner.form)?,
            result: inner.result,
            result_display: inner.result.map(S::format_result),
            error: inner.error.clone(),
            field_errors: inner.field_errors.clone(),
        })
    }
}

fn flatten<F: Serialize>(form: &F) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(form)? {
        Value::Object(map) => Ok(map),
        _ => Err(serde::ser::Error::custom("form must be a flat record")),
    }
}
