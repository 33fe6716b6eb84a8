//! Envelope-unwrapping HTTP transport for the Allure API.
//!
//! # Design
//! `Transport` holds the fixed configuration, an executor and a credential
//! source, and carries no mutable state between calls. Every call is split
//! into `build_request` (pure, produces an `HttpRequest`) and
//! `parse_response` (pure, consumes an `HttpResponse`); `private_request` and
//! `public_request` glue the two together around the executor. Failures are
//! classified and returned, never retried or swallowed.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::envelope::decode_envelope;
use crate::error::{ApiError, ErrorBody};
use crate::executor::{HttpExecutor, UreqExecutor};
use crate::http::{upsert_header, HttpRequest, HttpResponse};
use crate::request::{RequestBody, RequestConfig};
use crate::session::CredentialStore;

const JSON: &str = "application/json";

/// Whether a request carries the caller's credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Private,
}

pub struct Transport {
    config: ClientConfig,
    executor: Arc<dyn HttpExecutor>,
    credentials: Arc<dyn CredentialStore>,
}

impl Transport {
    pub fn new(
        config: ClientConfig,
        executor: Arc<dyn HttpExecutor>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            config,
            executor,
            credentials,
        }
    }

    /// Transport backed by a `ureq` agent built from `config`.
    pub fn with_ureq(config: ClientConfig, credentials: Arc<dyn CredentialStore>) -> Self {
        let executor = Arc::new(UreqExecutor::new(&config));
        Self::new(config, executor, credentials)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Request with the current credentials attached.
    pub async fn private_request<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<T, ApiError> {
        self.request(path, config, Access::Private).await
    }

    /// Request without credentials.
    pub async fn public_request<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
    ) -> Result<T, ApiError> {
        self.request(path, config, Access::Public).await
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        config: RequestConfig,
        access: Access,
    ) -> Result<T, ApiError> {
        let request = self.build_request(path, config, access)?;
        let method = request.method;
        let url = request.url.clone();
        tracing::debug!(%method, %url, ?access, "dispatching request");

        let response = match self.executor.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%method, %url, error = %err, "request did not complete");
                return Err(err);
            }
        };
        if !response.is_success() {
            tracing::warn!(%method, %url, status = response.status, "request rejected");
        }
        self.parse_response(response)
    }

    /// Merge `config` with the base URL, default headers and, for private
    /// access, the bearer token.
    pub fn build_request(
        &self,
        path: &str,
        config: RequestConfig,
        access: Access,
    ) -> Result<HttpRequest, ApiError> {
        let method = config.method();
        let url = self.url_for(path, &config.params)?;

        let mut headers = Vec::new();
        upsert_header(&mut headers, "accept", JSON);
        for (name, value) in self.config.default_headers() {
            upsert_header(&mut headers, name, value);
        }

        let body = match config.data {
            None => None,
            Some(RequestBody::Json(value)) => {
                upsert_header(&mut headers, "content-type", JSON);
                Some(serde_json::to_vec(&value).map_err(|e| ApiError::Serialization(e.to_string()))?)
            }
            Some(RequestBody::Multipart(form)) => {
                upsert_header(&mut headers, "content-type", &form.content_type());
                Some(form.encode())
            }
        };

        for (name, value) in &config.headers {
            if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == ':') {
                return Err(ApiError::InvalidRequest(format!("bad header name {name:?}")));
            }
            upsert_header(&mut headers, name, value);
        }

        if access == Access::Private {
            if let Some(token) = self.credentials.access_token() {
                upsert_header(&mut headers, "authorization", &format!("Bearer {token}"));
            }
        }
        if let Some((name, _)) = headers
            .iter()
            .find(|(_, value)| value.chars().any(|c| c.is_control() && c != '\t'))
        {
            return Err(ApiError::InvalidRequest(format!("bad value for header {name:?}")));
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Check the status and unwrap the envelope's `data`.
    pub fn parse_response<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        let envelope = decode_envelope::<T>(&response.body)?;
        tracing::debug!(
            status = response.status,
            message = ?envelope.message,
            "unwrapped envelope"
        );
        Ok(envelope.data)
    }

    fn url_for(&self, path: &str, params: &[(String, String)]) -> Result<String, ApiError> {
        if path.contains(char::is_whitespace) {
            return Err(ApiError::InvalidRequest(format!("bad path {path:?}")));
        }
        let mut url = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.config.base_url(), path)
        } else {
            format!("{}/{}", self.config.base_url(), path)
        };

        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(name, value)| format!("{}={}", urlencoding::encode(name), urlencoding::encode(value)))
                .collect::<Vec<_>>()
                .join("&");
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }
        Ok(url)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Map non-2xx responses to `ApiError::Transport`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let body = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .filter(|body| body.message.is_some() || body.status_code.is_some() || body.error.is_some());
    Err(ApiError::Transport {
        status: response.status,
        body,
        raw: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::multipart::MultipartForm;
    use crate::session::{Anonymous, Session};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays canned responses and records every request.
    #[derive(Default)]
    struct Scripted {
        responses: Mutex<Vec<Result<HttpResponse, ApiError>>>,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn replying(status: u16, body: &str) -> Arc<Self> {
            let scripted = Self::default();
            scripted.responses.lock().unwrap().push(Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            }));
            Arc::new(scripted)
        }
    }

    #[async_trait]
    impl HttpExecutor for Scripted {
        async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request);
            self.responses.lock().unwrap().remove(0)
        }
    }

    fn transport(executor: Arc<Scripted>, credentials: Arc<dyn CredentialStore>) -> Transport {
        Transport::new(ClientConfig::new("http://localhost:3000/api"), executor, credentials)
    }

    fn offline() -> Transport {
        transport(Arc::new(Scripted::default()), Arc::new(Session::with_token("tok")))
    }

    #[test]
    fn private_get_carries_bearer_and_no_content_type() {
        let req = offline()
            .build_request("/products", RequestConfig::get(), Access::Private)
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/products");
        assert_eq!(
            req.headers,
            vec![
                ("accept".to_string(), "application/json".to_string()),
                ("authorization".to_string(), "Bearer tok".to_string()),
            ]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn public_request_never_carries_credentials() {
        let req = offline()
            .build_request("auth/login", RequestConfig::post().json(&json!({"email": "a@b.c"})).unwrap(), Access::Public)
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/auth/login");
        assert_eq!(req.header("authorization"), None);
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["email"], "a@b.c");
    }

    #[test]
    fn signed_out_private_request_goes_without_authorization() {
        let t = transport(Arc::new(Scripted::default()), Arc::new(Anonymous));
        let req = t.build_request("/auth/me", RequestConfig::get(), Access::Private).unwrap();
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn query_params_are_encoded_in_order() {
        let config = RequestConfig::get().param("search", "red shoes & bags").param("page", 2);
        let req = offline().build_request("/products", config, Access::Private).unwrap();
        assert_eq!(
            req.url,
            "http://localhost:3000/api/products?search=red%20shoes%20%26%20bags&page=2"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        let config = RequestConfig::get().param("v", 1);
        let req = offline()
            .build_request("https://cdn.allure.test/manifest?x=1", config, Access::Public)
            .unwrap();
        assert_eq!(req.url, "https://cdn.allure.test/manifest?x=1&v=1");
    }

    #[test]
    fn caller_headers_override_defaults() {
        let config = RequestConfig::post()
            .json(&json!({}))
            .unwrap()
            .header("Content-Type", "application/merge-patch+json");
        let req = offline().build_request("/brands/1", config, Access::Private).unwrap();
        assert_eq!(req.header("content-type"), Some("application/merge-patch+json"));
        assert_eq!(req.headers.iter().filter(|(k, _)| k == "content-type").count(), 1);
    }

    #[test]
    fn multipart_body_sets_its_own_content_type() {
        let form = MultipartForm::with_boundary("B").file("file", "a.png", "image/png", vec![1, 2]);
        let config = RequestConfig::post().multipart(form.clone());
        let req = offline().build_request("/products/1/images", config, Access::Private).unwrap();
        assert_eq!(req.header("content-type"), Some("multipart/form-data; boundary=B"));
        assert_eq!(req.body, Some(form.encode()));
    }

    #[test]
    fn default_headers_from_config_are_sent() {
        let t = Transport::new(
            ClientConfig::new("http://localhost").with_default_header("X-Client", "admin"),
            Arc::new(Scripted::default()),
            Arc::new(Anonymous),
        );
        let req = t.build_request("/x", RequestConfig::get(), Access::Public).unwrap();
        assert_eq!(req.header("x-client"), Some("admin"));
    }

    #[test]
    fn bad_header_name_is_rejected() {
        let config = RequestConfig::get().header("x bad", "1");
        let err = offline().build_request("/x", config, Access::Public).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn header_value_with_line_break_is_rejected() {
        let config = RequestConfig::get().header("x-note", "a\r\nb");
        let err = offline().build_request("/products", config, Access::Public).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(ref msg) if msg.contains("x-note")));
    }

    #[test]
    fn token_with_line_break_is_rejected_before_dispatch() {
        let t = transport(Arc::new(Scripted::default()), Arc::new(Session::with_token("tok\nx-admin: 1")));
        let err = t.build_request("/auth/me", RequestConfig::get(), Access::Private).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(ref msg) if msg.contains("authorization")));
    }

    #[test]
    fn tab_in_header_value_is_allowed() {
        let config = RequestConfig::get().header("x-note", "a\tb");
        let req = offline().build_request("/products", config, Access::Public).unwrap();
        assert_eq!(req.header("x-note"), Some("a\tb"));
    }

    #[test]
    fn parse_unwraps_exactly_one_level() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"data":{"data":[1,2]},"message":"OK"}"#.to_string(),
        };
        let value: serde_json::Value = offline().parse_response(response).unwrap();
        assert_eq!(value, json!({"data": [1, 2]}));
    }

    #[test]
    fn parse_non_2xx_keeps_server_body() {
        let response = HttpResponse {
            status: 409,
            headers: Vec::new(),
            body: r#"{"message":"Voucher code already exists","statusCode":409}"#.to_string(),
        };
        let err = offline().parse_response::<serde_json::Value>(response).unwrap_err();
        let body = err.error_body().unwrap();
        assert_eq!(body.status_code, Some(409));
        assert_eq!(err.to_string(), "HTTP 409: Voucher code already exists");
    }

    #[test]
    fn parse_non_json_failure_has_raw_body_only() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "upstream exploded".to_string(),
        };
        let err = offline().parse_response::<()>(response).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport { status: 500, body: None, ref raw } if raw == "upstream exploded"
        ));
    }

    #[tokio::test]
    async fn private_request_resolves_to_payload() {
        let executor = Scripted::replying(200, r#"{"data":[{"id":"1"}],"statusCode":200}"#);
        let t = transport(executor.clone(), Arc::new(Session::with_token("tok")));
        let items: serde_json::Value = t.private_request("/products", RequestConfig::get()).await.unwrap();
        assert_eq!(items, json!([{"id": "1"}]));
        assert_eq!(executor.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn network_failures_propagate_unchanged() {
        let executor = Arc::new(Scripted::default());
        executor
            .responses
            .lock()
            .unwrap()
            .push(Err(ApiError::Network("connection reset".to_string())));
        let t = transport(executor, Arc::new(Anonymous));
        let err = t.public_request::<()>("/health", RequestConfig::get()).await.unwrap_err();
        assert_eq!(err.to_string(), "network failure: connection reset");
    }
}
