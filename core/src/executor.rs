//! The component that performs the HTTP round-trip.
//!
//! # Design
//! Executors report every status code as data. Interpreting a 404 or a 500
//! is the transport's job; an executor only fails when no response came
//! back at all, and then always with `ApiError::Network`.

use async_trait::async_trait;
use ureq::typestate::WithBody;
use ureq::{Agent, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

#[async_trait]
pub trait HttpExecutor: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking `ureq` agent driven from tokio's blocking pool.
#[derive(Debug, Clone)]
pub struct UreqExecutor {
    agent: Agent,
}

impl UreqExecutor {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout())
            .build()
            .new_agent();
        Self { agent }
    }

    /// Run one request on the calling thread.
    pub fn execute_blocking(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&url), &headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(&url), &headers), body),
            HttpMethod::Patch => send(with_headers(self.agent.patch(&url), &headers), body),
        };
        let mut response = result.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let bytes = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl HttpExecutor for UreqExecutor {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let executor = self.clone();
        tokio::task::spawn_blocking(move || executor.execute_blocking(request))
            .await
            .map_err(|e| ApiError::Network(format!("request task aborted: {e}")))?
    }
}

/// Requests ureq refused to form never left the process.
fn classify(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Http(e) => ApiError::InvalidRequest(e.to_string()),
        ureq::Error::BadUri(uri) => ApiError::InvalidRequest(format!("bad uri {uri:?}")),
        other => ApiError::Network(other.to_string()),
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &[(String, String)]) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: RequestBuilder<WithBody>,
    body: Option<Vec<u8>>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(bytes) => builder.send(&bytes[..]),
        None => builder.send_empty(),
    }
}
