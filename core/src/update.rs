//! Replace-semantics updates.
//!
//! The admin API replaces the whole representation on `PUT`; fields missing
//! from the body are reset server-side. An update therefore fetches the
//! current representation, merges the caller's fields on top and submits the
//! merged object. The two requests are not atomic: a concurrent change made
//! between the `GET` and the `PUT` is overwritten.

use serde_json::{Map, Value};

use crate::descriptor::RequestDescriptor;
use crate::error::ApiError;
use crate::executor::{Executor, PreparedCall};
use crate::interpret::Outcome;

pub(crate) async fn coordinate(
    executor: &Executor<'_>,
    descriptor: &RequestDescriptor,
    call: PreparedCall,
) -> Result<Outcome, ApiError> {
    let fetch = descriptor.prior_fetch();
    let request = executor.request(fetch.method, &call.path, Map::new())?;

    let current = match executor.dispatch(&fetch, &call.template, request).await {
        Ok(Outcome::Payload(Value::Object(current))) => current,
        Ok(_) => {
            return Err(fetch_failed(ApiError::Deserialization(
                "current representation is not a JSON object".to_string(),
            )))
        }
        Err(err) => {
            tracing::warn!(path = %call.template, error = %err, "prior fetch failed, update not sent");
            return Err(fetch_failed(err));
        }
    };

    let merged = merge(current, call.leftover);
    let request = executor.request(descriptor.method, &call.path, merged)?;
    executor.dispatch(descriptor, &call.template, request).await
}

/// Shallow merge, `update` wins. `null` fields in `update` are treated as
/// absent and keep the current value.
pub fn merge(mut current: Map<String, Value>, update: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in update {
        if !value.is_null() {
            current.insert(key, value);
        }
    }
    current
}

fn fetch_failed(source: ApiError) -> ApiError {
    ApiError::UpdateFetchFailed {
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn caller_fields_win_and_others_are_kept() {
        let merged = merge(object(json!({"a": 1, "b": 2, "c": 3})), object(json!({"b": 20})));
        assert_eq!(Value::Object(merged), json!({"a": 1, "b": 20, "c": 3}));
    }

    #[test]
    fn merging_twice_equals_merging_once() {
        let current = object(json!({"clientId": "x", "description": "old", "enabled": true}));
        let update = object(json!({"description": "new"}));
        let once = merge(current.clone(), update.clone());
        let twice = merge(once.clone(), update);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_is_shallow() {
        let merged = merge(
            object(json!({"attributes": {"a": "1", "b": "2"}})),
            object(json!({"attributes": {"a": "9"}})),
        );
        assert_eq!(Value::Object(merged), json!({"attributes": {"a": "9"}}));
    }

    #[test]
    fn null_update_fields_keep_current_value() {
        let merged = merge(object(json!({"description": "kept"})), object(json!({"description": null})));
        assert_eq!(Value::Object(merged), json!({"description": "kept"}));
    }
}
