//! Classification of a raw `HttpResponse` into an `Outcome` or an `ApiError`.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::descriptor::RequestDescriptor;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse};

/// Result of a successful call before conversion to the caller's type.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 2xx with a JSON body, possibly enriched with a created id.
    Payload(Value),
    /// 2xx without a body.
    Empty,
    /// 404 reported as absence because the descriptor suppresses it.
    NotFound,
}

impl Outcome {
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Payload(value) => value,
            Outcome::Empty | Outcome::NotFound => Value::Null,
        }
    }

    /// Converts into the caller's type. `Empty` and `NotFound` become JSON
    /// `null`, which deserializes into `()` and `Option::None`.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.into_value()).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

/// Maps `response` according to `descriptor`. `template` is the full path
/// template of the call and only used for diagnostics.
pub fn interpret(
    descriptor: &RequestDescriptor,
    template: &str,
    response: HttpResponse,
) -> Result<Outcome, ApiError> {
    if !response.is_success() {
        if response.status == 404 && descriptor.catch_not_found {
            tracing::debug!(method = %descriptor.method, path = template, "not found, reporting absence");
            return Ok(Outcome::NotFound);
        }
        return Err(ApiError::Remote {
            status: response.status,
            method: descriptor.method,
            path: template.to_string(),
            body: error_body(&response.body),
        });
    }

    let payload = parse_body(&response.body);

    if let (HttpMethod::Post, Some(created)) = (descriptor.method, descriptor.created_id) {
        match response.header("location").and_then(created_id) {
            Some(id) => {
                let mut fields = match payload {
                    Ok(Some(Value::Object(map))) => map,
                    Ok(_) => Map::new(),
                    Err(err) => {
                        tracing::debug!(path = template, %err, "ignoring unparseable body of created resource");
                        Map::new()
                    }
                };
                fields.insert(created.field.to_string(), Value::String(id));
                return Ok(Outcome::Payload(Value::Object(fields)));
            }
            None => {
                tracing::warn!(path = template, "created resource without a usable Location header");
            }
        }
    }

    Ok(payload?.map_or(Outcome::Empty, Outcome::Payload))
}

fn parse_body(body: &str) -> Result<Option<Value>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(body)
        .map(Some)
        .map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Last non-empty path segment of a `Location` header, percent-decoded.
pub fn created_id(location: &str) -> Option<String> {
    let path = match url::Url::parse(location) {
        Ok(url) => url.path().to_string(),
        Err(_) => location.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    if segment.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(segment).ok()?;
    Some(decoded.into_owned())
}

fn error_body(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}
