//! Wire types shared by several API modules.
//!
//! # Design
//! Field names are camelCase on the wire. List endpoints all accept the same
//! paging and search parameters and answer with the same page shape, so
//! module-specific filters embed `ListQuery` with `#[serde(flatten)]`.

use serde::{Deserialize, Serialize};

/// Paging and free-text search accepted by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
            search: None,
        }
    }

    pub fn search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
        self
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Paginated<T> {
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_omits_unset_fields() {
        let json = serde_json::to_value(ListQuery::page(2, 20)).unwrap();
        assert_eq!(json, serde_json::json!({"page": 2, "limit": 20}));
    }

    #[test]
    fn paginated_deserializes_camel_case() {
        let page: Paginated<String> =
            serde_json::from_str(r#"{"items":["a","b"],"total":41,"page":1,"limit":20}"#).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn zero_limit_has_no_pages() {
        let page: Paginated<String> = Paginated {
            items: Vec::new(),
            total: 5,
            page: 1,
            limit: 0,
        };
        assert_eq!(page.total_pages(), 0);
    }
}
