//! Ambient context and client configuration.
//!
//! # Design
//! The base URL, realm and bearer token are not passed per call. They live in
//! an `AmbientContext` owned by the `AdminClient` and handed to the executor
//! by reference, so two clients with different realms can be used
//! concurrently in one process. `ClientConfig` is the serde-friendly
//! configuration that produces a context.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_REALM: &str = "master";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, PartialEq, Eq)]
pub struct AmbientContext {
    base_url: String,
    realm: String,
    access_token: Option<String>,
}

impl AmbientContext {
    pub fn new(base_url: &str, realm: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            realm: realm.to_string(),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_realm(&mut self, realm: &str) {
        self.realm = realm.to_string();
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    /// Named values available to URL templates on every call.
    pub fn url_params(&self) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("realm".to_string(), Value::String(self.realm.clone()));
        params
    }
}

impl Default for AmbientContext {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_REALM)
    }
}

impl std::fmt::Debug for AmbientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbientContext")
            .field("base_url", &self.base_url)
            .field("realm", &self.realm)
            .field("access_token", &redacted(self.access_token.as_deref()))
            .finish()
    }
}

/// Client settings, deserializable from any serde source or read from the
/// environment with [`ClientConfig::from_env`].
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub base_url: String,
    pub realm_name: String,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            realm_name: DEFAULT_REALM.to_string(),
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Reads `KEYCLOAK_BASE_URL`, `KEYCLOAK_REALM`, `KEYCLOAK_ACCESS_TOKEN`
    /// and `KEYCLOAK_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            base_url: non_empty("KEYCLOAK_BASE_URL").unwrap_or(defaults.base_url),
            realm_name: non_empty("KEYCLOAK_REALM").unwrap_or(defaults.realm_name),
            access_token: non_empty("KEYCLOAK_ACCESS_TOKEN"),
            timeout_secs: non_empty("KEYCLOAK_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn context(&self) -> AmbientContext {
        let context = AmbientContext::new(&self.base_url, &self.realm_name);
        match &self.access_token {
            Some(token) => context.with_access_token(token.clone()),
            None => context,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("realm_name", &self.realm_name)
            .field("access_token", &redacted(self.access_token.as_deref()))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn redacted(token: Option<&str>) -> Option<&'static str> {
    token.map(|_| "<redacted>")
}
