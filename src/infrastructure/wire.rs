// Wire query mapping for the prediction API
//
// The API consumes batches, so every scalar field travels as a
// one-element array. This client only ever sends batches of size 1.
use serde::Serialize;
use serde_json::{Map, Value};

/// The JSON object actually posted to a predict endpoint: same keys as
/// the flat form, same order, each value wrapped as `[v]`.
pub type WireQuery = Map<String, Value>;

/// Wraps every field of an already-flattened record. Key set and key
/// order pass through unchanged.
pub fn wrap_fields(fields: Map<String, Value>) -> WireQuery {
    fields
        .into_iter()
        .map(|(name, value)| (name, Value::Array(vec![value])))
        .collect()
}

/// Maps a flat form record to its wire shape. Total and pure; intended
/// to run exactly once per submission (re-wrapping an already wrapped
/// query changes its shape).
pub fn to_wire_query<T: Serialize>(form: &T) -> Result<WireQuery, serde_json::Error> {
    match serde_json::to_value(form)? {
        Value::Object(fields) => Ok(wrap_fields(fields)),
        _ => Err(serde::ser::Error::custom("form must be a flat record")),
    }
}
