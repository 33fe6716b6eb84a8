//! Typed remote-call layer for the Allure admin API.
//!
//! # Overview
//! A `Transport` turns a path plus a `RequestConfig` into an `HttpRequest`,
//! runs it through an `HttpExecutor`, and unwraps the server's
//! `{ data, message?, statusCode? }` envelope into the caller's type.
//! `to_query_fetcher` and `to_mutation_fetcher` pair an operation with a
//! stable key so an external cache/invocation runtime can drive it. The `api`
//! module declares every backend operation this way, grouped per domain and
//! owned by one `AllureApi` context.
//!
//! # Design
//! - The transport is stateless apart from its fixed configuration; it never
//!   retries, caches or swallows errors.
//! - Request building and response parsing are pure, so the I/O boundary is
//!   explicit and hosts can plug in their own executor.
//! - Credentials come from an injected `CredentialStore`, not a global.
//! - Envelope decoding is strict: a body without `data` is an error.

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod executor;
pub mod fetcher;
pub mod http;
pub mod key;
pub mod multipart;
pub mod request;
pub mod session;
pub mod transport;
pub mod types;

pub use api::AllureApi;
pub use config::{ClientConfig, ConfigError};
pub use envelope::{decode_envelope, ServerEnvelope};
pub use error::{ApiError, ErrorBody, ErrorMessage};
pub use executor::{HttpExecutor, UreqExecutor};
pub use fetcher::{
    to_mutation_fetcher, to_query_fetcher, BoxFetch, BoxedMutation, BoxedQuery, Descriptor, Mutation,
    MutationFetcher, Query, QueryFetcher,
};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use key::QueryKey;
pub use multipart::MultipartForm;
pub use request::{RequestBody, RequestConfig};
pub use session::{Anonymous, CredentialStore, Session};
pub use transport::{Access, Transport};
pub use types::{ListQuery, Paginated};
