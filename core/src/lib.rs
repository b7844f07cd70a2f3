//! Typed client engine for a realm-scoped admin REST API.
//!
//! # Overview
//! Every admin operation is a `RequestDescriptor`: verb, path template, the
//! input fields that fill URL placeholders, and response-handling flags. The
//! `Executor` turns a descriptor and caller input into an `HttpRequest`,
//! sends it through an injectable `Transport` and interprets the
//! `HttpResponse` into a typed result.
//!
//! # Design
//! - Descriptors are `const` data; resource modules are tables of them plus a
//!   thin typed facade (`resources::clients`, `resources::users`).
//! - Base URL, realm and bearer token live in an `AmbientContext` passed by
//!   reference into each call, never in global state.
//! - Requests and responses are plain data, so request building and
//!   response interpretation are testable without a network.
//! - Finders that suppress not-found return `Option<T>`; every other failure
//!   surfaces as an `ApiError`.
//! - Updates fetch, merge and replace, because the API's `PUT` replaces the
//!   whole representation.

pub mod client;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod http;
pub mod interpret;
pub mod representations;
pub mod resources;
pub mod serialize;
pub mod template;
pub mod transport;
pub mod update;

pub use client::AdminClient;
pub use context::{AmbientContext, ClientConfig};
pub use descriptor::{CreatedIdLocation, RequestDescriptor};
pub use error::ApiError;
pub use executor::Executor;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interpret::Outcome;
pub use transport::Transport;
#[cfg(feature = "reqwest")]
pub use transport::ReqwestTransport;
