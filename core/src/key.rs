//! Structured cache keys.
//!
//! A `QueryKey` is the descriptor's operation name plus the call's
//! parameters normalized into a sorted record. Two calls with the same
//! logical parameters produce equal keys regardless of field order, and
//! absent optional fields never split the cache.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryKey {
    operation: String,
    params: BTreeMap<String, Value>,
}

impl QueryKey {
    /// Key with no parameters.
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Key for `operation` called with `params`.
    pub fn for_params<P: Serialize + ?Sized>(operation: &str, params: &P) -> Result<Self, ApiError> {
        Ok(Self {
            operation: operation.to_string(),
            params: to_record(params)?,
        })
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn params(&self) -> &BTreeMap<String, Value> {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            return f.write_str(&self.operation);
        }
        let params = serde_json::to_string(&self.params).map_err(|_| fmt::Error)?;
        write!(f, "{}{}", self.operation, params)
    }
}

/// Flatten a serializable value into a sorted record.
///
/// Objects map field to value with nulls dropped, arrays and tuples map
/// index to value, a bare scalar lands under `"value"`, and unit or `None`
/// yields an empty record.
pub(crate) fn to_record<P: Serialize + ?Sized>(params: &P) -> Result<BTreeMap<String, Value>, ApiError> {
    let value = serde_json::to_value(params).map_err(|e| ApiError::Serialization(e.to_string()))?;
    let record = match value {
        Value::Null => BTreeMap::new(),
        Value::Object(map) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, v)| !v.is_null())
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        scalar => BTreeMap::from([("value".to_string(), scalar)]),
    };
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Filter {
        search: Option<String>,
        page: u32,
    }

    #[test]
    fn nulls_are_dropped() {
        let key = QueryKey::for_params(
            "getProductsApi",
            &Filter {
                search: None,
                page: 2,
            },
        )
        .unwrap();
        assert_eq!(key.params().len(), 1);
        assert_eq!(key.to_string(), r#"getProductsApi{"page":2}"#);
    }

    #[test]
    fn field_order_does_not_matter() {
        let a = QueryKey::for_params("op", &json!({"b": 1, "a": 2})).unwrap();
        let b = QueryKey::for_params("op", &json!({"a": 2, "b": 1})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn scalar_params_use_value_slot() {
        let key = QueryKey::for_params("getProductApi", "p-1").unwrap();
        assert_eq!(key.params()["value"], json!("p-1"));
    }

    #[test]
    fn tuple_params_are_indexed() {
        let key = QueryKey::for_params("updateBrandApi", &("b-1", json!({"name": "Lumi"}))).unwrap();
        assert_eq!(key.params()["0"], json!("b-1"));
        assert_eq!(key.params()["1"]["name"], json!("Lumi"));
    }

    #[test]
    fn unit_params_give_bare_operation() {
        let key = QueryKey::for_params("getProfileApi", &()).unwrap();
        assert_eq!(key, QueryKey::new("getProfileApi"));
        assert_eq!(key.to_string(), "getProfileApi");
    }

    #[test]
    fn different_operations_never_collide() {
        let a = QueryKey::for_params("getBrandApi", "1").unwrap();
        let b = QueryKey::for_params("getProductApi", "1").unwrap();
        assert_ne!(a, b);
    }
}
