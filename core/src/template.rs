//! `{name}` placeholder substitution for path templates.

use serde_json::{Map, Value};

use crate::error::ApiError;

/// Substitutes every `{name}` placeholder in `template` with the matching
/// entry of `params`, percent-encoded as a single path segment.
pub fn resolve(template: &str, params: &Map<String, Value>) -> Result<String, ApiError> {
    let mut resolved = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        let literal = &rest[..start];
        if literal.contains('}') {
            return Err(invalid(template, "unmatched `}`"));
        }
        resolved.push_str(literal);

        let after = &rest[start + 1..];
        let end = after
            .find('}')
            .ok_or_else(|| invalid(template, "unterminated placeholder"))?;
        let name = &after[..end];
        if name.trim().is_empty() || name.contains('{') {
            return Err(invalid(template, "empty placeholder"));
        }

        let value = param_value(template, name, params)?;
        resolved.push_str(&urlencoding::encode(&value));
        rest = &after[end + 1..];
    }

    if rest.contains('}') {
        return Err(invalid(template, "unmatched `}`"));
    }
    resolved.push_str(rest);
    Ok(resolved)
}

/// Looks up one URL parameter, rejecting absent, null and blank values.
pub fn param_value(
    template: &str,
    name: &str,
    params: &Map<String, Value>,
) -> Result<String, ApiError> {
    let missing = || ApiError::MissingParameter {
        name: name.to_string(),
        template: template.to_string(),
    };
    match params.get(name) {
        None | Some(Value::Null) => Err(missing()),
        Some(Value::String(s)) if s.trim().is_empty() => Err(missing()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => Err(ApiError::InvalidInput(format!(
            "URL parameter `{name}` must be a string, number or boolean"
        ))),
    }
}

fn invalid(template: &str, reason: &str) -> ApiError {
    ApiError::InvalidTemplate {
        template: template.to_string(),
        reason: reason.to_string(),
    }
}
