//! Turns a `RequestDescriptor` plus call input into one admin API call.
//!
//! # Design
//! An `Executor` borrows the transport and the ambient context from the
//! `AdminClient` and is bound to one resource prefix such as
//! `/admin/realms/{realm}/clients`. Request building is split from dispatch
//! the same way requests and responses are plain data: `build_request` is a
//! pure function of descriptor, context and input, while `execute` adds the
//! single transport round-trip and response interpretation. Each call is
//! independent; the executor holds no per-call state.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::context::AmbientContext;
use crate::descriptor::RequestDescriptor;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::interpret::{interpret, Outcome};
use crate::serialize;
use crate::template;
use crate::transport::Transport;
use crate::update;

#[derive(Clone, Copy)]
pub struct Executor<'a> {
    transport: &'a dyn Transport,
    context: &'a AmbientContext,
    prefix: &'static str,
}

/// Input partitioned and resolved for one call.
#[derive(Debug)]
pub(crate) struct PreparedCall {
    /// Full path template, kept for diagnostics.
    pub template: String,
    pub path: String,
    /// Input fields that are not URL parameters.
    pub leftover: Map<String, Value>,
}

impl<'a> Executor<'a> {
    pub fn new(transport: &'a dyn Transport, context: &'a AmbientContext, prefix: &'static str) -> Self {
        Self {
            transport,
            context,
            prefix,
        }
    }

    pub fn context(&self) -> &AmbientContext {
        self.context
    }

    /// Resource prefix joined with the descriptor's path.
    pub fn template(&self, descriptor: &RequestDescriptor) -> String {
        join_path(self.prefix, descriptor.path)
    }

    /// Builds the wire request for `input` without sending it.
    pub fn build_request(&self, descriptor: &RequestDescriptor, input: Value) -> Result<HttpRequest, ApiError> {
        let call = self.prepare(descriptor, input)?;
        self.request(descriptor.method, &call.path, call.leftover)
    }

    /// Runs `descriptor` with `input` serialized to a JSON object, returning
    /// the response converted to `O`.
    pub async fn execute<I, O>(&self, descriptor: &RequestDescriptor, input: &I) -> Result<O, ApiError>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let input = serde_json::to_value(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.execute_value(descriptor, input).await?.into_typed()
    }

    /// Runs `descriptor` with URL parameters and payload supplied separately.
    /// `params` wins over same-named payload fields.
    pub async fn execute_with<P, B, O>(
        &self,
        descriptor: &RequestDescriptor,
        params: &P,
        payload: &B,
    ) -> Result<O, ApiError>
    where
        P: Serialize + ?Sized,
        B: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let mut input = to_object(payload)?;
        input.extend(to_object(params)?);
        self.execute_value(descriptor, Value::Object(input)).await?.into_typed()
    }

    pub async fn execute_value(&self, descriptor: &RequestDescriptor, input: Value) -> Result<Outcome, ApiError> {
        let call = self.prepare(descriptor, input)?;
        if descriptor.requires_prior_fetch {
            return update::coordinate(self, descriptor, call).await;
        }
        let request = self.request(descriptor.method, &call.path, call.leftover)?;
        self.dispatch(descriptor, &call.template, request).await
    }

    /// Splits URL parameters out of `input` and resolves the path. Fails
    /// before any I/O when a placeholder or declared parameter is missing.
    pub(crate) fn prepare(&self, descriptor: &RequestDescriptor, input: Value) -> Result<PreparedCall, ApiError> {
        let mut fields = match input {
            Value::Object(fields) => fields,
            Value::Null => Map::new(),
            other => {
                return Err(ApiError::InvalidInput(format!(
                    "expected a JSON object, got {}",
                    kind(&other)
                )))
            }
        };

        let template = self.template(descriptor);
        let mut params = self.context.url_params();
        for name in descriptor.url_params {
            if let Some(value) = fields.remove(*name) {
                params.insert((*name).to_string(), value);
            }
            template::param_value(&template, name, &params)?;
        }
        let path = template::resolve(&template, &params)?;

        Ok(PreparedCall {
            template,
            path,
            leftover: fields,
        })
    }

    pub(crate) fn request(
        &self,
        method: HttpMethod,
        path: &str,
        leftover: Map<String, Value>,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = format!("{}{}", self.context.base_url(), path);
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if let Some(token) = self.context.access_token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }

        let body = if method.sends_body() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
            Some(serialize::json_body(leftover)?)
        } else {
            if let Some(query) = serialize::query_string(&leftover)? {
                url.push(if url.contains('?') { '&' } else { '?' });
                url.push_str(&query);
            }
            None
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    pub(crate) async fn dispatch(
        &self,
        descriptor: &RequestDescriptor,
        template: &str,
        request: HttpRequest,
    ) -> Result<Outcome, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending admin request");
        let response = self.transport.send(request).await?;
        tracing::debug!(status = response.status, path = template, "admin response received");
        interpret(descriptor, template, response)
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    match path {
        "" | "/" => prefix.to_string(),
        p if p.starts_with('/') => format!("{prefix}{p}"),
        p => format!("{prefix}/{p}"),
    }
}

fn to_object<T: Serialize + ?Sized>(value: &T) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))? {
        Value::Object(fields) => Ok(fields),
        Value::Null => Ok(Map::new()),
        other => Err(ApiError::InvalidInput(format!("expected a JSON object, got {}", kind(&other)))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
