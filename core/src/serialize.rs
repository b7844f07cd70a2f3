//! Projection of leftover call input into a query string or a JSON body.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::ApiError;

/// Encodes flat key/value input as `application/x-www-form-urlencoded`.
///
/// `null` values are skipped, scalars are stringified and arrays of scalars
/// repeat the key. Returns `None` when nothing is left to encode.
pub fn query_string(fields: &Map<String, Value>) -> Result<Option<String>, ApiError> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut pairs = 0usize;

    for (key, value) in fields {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar(key, item)? {
                        serializer.append_pair(key, &text);
                        pairs += 1;
                    }
                }
            }
            other => {
                if let Some(text) = scalar(key, other)? {
                    serializer.append_pair(key, &text);
                    pairs += 1;
                }
            }
        }
    }

    Ok((pairs > 0).then(|| serializer.finish()))
}

/// Serializes leftover input as the JSON request body, verbatim.
pub fn json_body(fields: Map<String, Value>) -> Result<String, ApiError> {
    serde_json::to_string(&Value::Object(fields)).map_err(|e| ApiError::Serialization(e.to_string()))
}

fn scalar(key: &str, value: &Value) -> Result<Option<String>, ApiError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Array(_) | Value::Object(_) => Err(ApiError::InvalidInput(format!(
            "query parameter `{key}` must be flat"
        ))),
    }
}
