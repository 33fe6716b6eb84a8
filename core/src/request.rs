//! Per-call request configuration.
//!
//! A `RequestConfig` is built for one call and consumed by the transport. It
//! carries no identity; the transport merges it with the base URL and the
//! default headers before dispatch.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{upsert_header, HttpMethod};
use crate::key::to_record;
use crate::multipart::MultipartForm;

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartForm),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestConfig {
    /// Defaults to GET when unset.
    pub method: Option<HttpMethod>,
    pub headers: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
    pub data: Option<RequestBody>,
}

impl RequestConfig {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self::with_method(HttpMethod::Post)
    }

    pub fn put() -> Self {
        Self::with_method(HttpMethod::Put)
    }

    pub fn patch() -> Self {
        Self::with_method(HttpMethod::Patch)
    }

    pub fn delete() -> Self {
        Self::with_method(HttpMethod::Delete)
    }

    pub fn with_method(method: HttpMethod) -> Self {
        Self {
            method: Some(method),
            ..Self::default()
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method.unwrap_or_default()
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        upsert_header(&mut self.headers, name, value);
        self
    }

    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    /// Append every non-null field of `query` as a query parameter.
    ///
    /// Sequences repeat the key once per element.
    pub fn params<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self, ApiError> {
        for (name, value) in to_record(query)? {
            match value {
                Value::Array(items) => {
                    for item in items.iter().filter(|v| !v.is_null()) {
                        self.params.push((name.clone(), scalar_to_string(item)));
                    }
                }
                other => self.params.push((name, scalar_to_string(&other))),
            }
        }
        Ok(self)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.data = Some(RequestBody::Json(value));
        Ok(self)
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.data = Some(RequestBody::Multipart(form));
        self
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Filter {
        page: u32,
        brand_id: Option<String>,
        search: Option<String>,
        statuses: Vec<&'static str>,
    }

    #[test]
    fn method_defaults_to_get() {
        assert_eq!(RequestConfig::default().method(), HttpMethod::Get);
        assert_eq!(RequestConfig::patch().method(), HttpMethod::Patch);
    }

    #[test]
    fn params_skip_nulls_and_expand_sequences() {
        let config = RequestConfig::get()
            .params(&Filter {
                page: 1,
                brand_id: Some("b-1".to_string()),
                search: None,
                statuses: vec!["active", "draft"],
            })
            .unwrap();
        assert_eq!(
            config.params,
            vec![
                ("brandId".to_string(), "b-1".to_string()),
                ("page".to_string(), "1".to_string()),
                ("statuses".to_string(), "active".to_string()),
                ("statuses".to_string(), "draft".to_string()),
            ]
        );
    }

    #[test]
    fn json_body_is_stored_as_value() {
        let config = RequestConfig::post().json(&json!({"name": "Lumi"})).unwrap();
        assert_eq!(config.data, Some(RequestBody::Json(json!({"name": "Lumi"}))));
    }

    #[test]
    fn header_overrides_are_case_insensitive() {
        let config = RequestConfig::get().header("X-Locale", "en").header("x-locale", "vi");
        assert_eq!(config.headers, vec![("x-locale".to_string(), "vi".to_string())]);
    }
}
