//! Top-level admin client.
//!
//! # Design
//! `AdminClient` owns the transport and the ambient context and hands both
//! to a per-resource `Executor` on demand. Reconfiguration (`set_realm`,
//! `set_access_token`) needs `&mut self`, so it can never happen while a call
//! borrowed from the same client is in flight. `with_realm` clones the client
//! with an independent context that shares the transport.

use std::sync::Arc;

use crate::context::AmbientContext;
use crate::executor::Executor;
use crate::resources::{clients, users, Clients, Users};
use crate::transport::Transport;

#[derive(Clone)]
pub struct AdminClient {
    transport: Arc<dyn Transport>,
    context: AmbientContext,
}

impl AdminClient {
    pub fn new(transport: Arc<dyn Transport>, context: AmbientContext) -> Self {
        Self { transport, context }
    }

    /// Builds a client with a reqwest transport using the configured timeout.
    #[cfg(feature = "reqwest")]
    pub fn from_config(config: &crate::context::ClientConfig) -> Result<Self, crate::error::ApiError> {
        let transport = crate::transport::ReqwestTransport::with_timeout(config.timeout())?;
        Ok(Self::new(Arc::new(transport), config.context()))
    }

    pub fn context(&self) -> &AmbientContext {
        &self.context
    }

    pub fn set_realm(&mut self, realm: &str) {
        self.context.set_realm(realm);
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.context.set_access_token(token);
    }

    pub fn with_realm(&self, realm: &str) -> Self {
        let mut client = self.clone();
        client.set_realm(realm);
        client
    }

    /// Executor for a custom resource prefix, for operations without a
    /// typed facade.
    pub fn executor(&self, prefix: &'static str) -> Executor<'_> {
        Executor::new(self.transport.as_ref(), &self.context, prefix)
    }

    pub fn clients(&self) -> Clients<'_> {
        Clients::new(self.executor(clients::PREFIX))
    }

    pub fn users(&self) -> Users<'_> {
        Users::new(self.executor(users::PREFIX))
    }
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.context.base_url())
            .field("realm", &self.context.realm())
            .finish_non_exhaustive()
    }
}
