//! Customer pre-orders for products not yet in stock.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{bind, item_path};
use crate::error::ApiError;
use crate::fetcher::{to_mutation_fetcher, to_query_fetcher, BoxedMutation, BoxedQuery};
use crate::request::RequestConfig;
use crate::transport::Transport;
use crate::types::{ListQuery, Paginated};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreOrderStatus {
    Pending,
    Confirmed,
    Fulfilled,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreOrder {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub quantity: u32,
    pub deposit: f64,
    pub status: PreOrderStatus,
    #[serde(default)]
    pub expected_at: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreOrderFilter {
    #[serde(flatten)]
    pub list: ListQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PreOrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

#[derive(Serialize)]
struct StatusChange {
    status: PreOrderStatus,
}

#[derive(Debug)]
pub struct PreOrdersApi {
    pub get_pre_orders: BoxedQuery<PreOrderFilter, Paginated<PreOrder>>,
    pub get_pre_order: BoxedQuery<String, PreOrder>,
    pub update_pre_order_status: BoxedMutation<(String, PreOrderStatus), PreOrder>,
}

impl PreOrdersApi {
    pub(crate) fn new(transport: &Arc<Transport>) -> Self {
        Self {
            get_pre_orders: to_query_fetcher("getPreOrdersApi", bind(transport, get_pre_orders)),
            get_pre_order: to_query_fetcher("getPreOrderApi", bind(transport, get_pre_order)),
            update_pre_order_status: to_mutation_fetcher(
                "updatePreOrderStatusApi",
                bind(transport, update_pre_order_status),
            )
            .invalidates(&["getPreOrdersApi", "getPreOrderApi"]),
        }
    }

    pub fn query_keys(&self) -> Vec<&str> {
        vec![
            self.get_pre_orders.query_key(),
            self.get_pre_order.query_key(),
            self.update_pre_order_status.query_key(),
        ]
    }
}

async fn get_pre_orders(transport: Arc<Transport>, filter: PreOrderFilter) -> Result<Paginated<PreOrder>, ApiError> {
    transport
        .private_request("/pre-orders", RequestConfig::get().params(&filter)?)
        .await
}

async fn get_pre_order(transport: Arc<Transport>, id: String) -> Result<PreOrder, ApiError> {
    transport
        .private_request(&item_path("/pre-orders", &id), RequestConfig::get())
        .await
}

async fn update_pre_order_status(
    transport: Arc<Transport>,
    (id, status): (String, PreOrderStatus),
) -> Result<PreOrder, ApiError> {
    let path = format!("{}/status", item_path("/pre-orders", &id));
    transport
        .private_request(&path, RequestConfig::patch().json(&StatusChange { status })?)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{self, json_body, Recorder, BASE_URL};
    use crate::http::HttpMethod;
    use serde_json::json;

    #[test]
    fn expected_at_is_optional() {
        let order: PreOrder = serde_json::from_str(
            r#"{"id":"po1","productId":"p1","productName":"Cushion","customerName":"Lan",
                "customerPhone":"0911","quantity":2,"deposit":50000,"status":"confirmed",
                "createdAt":"2024-04-01T08:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(order.expected_at, None);
        assert_eq!(order.status, PreOrderStatus::Confirmed);
    }

    #[tokio::test]
    async fn list_filters_by_product_and_status() {
        let recorder = Recorder::replying(r#"{"data":null}"#);
        let filter = PreOrderFilter {
            status: Some(PreOrderStatus::Pending),
            product_id: Some("p-1".to_string()),
            ..PreOrderFilter::default()
        };
        let _ = testing::api(&recorder).pre_orders.get_pre_orders.call(filter).await;

        let req = recorder.last();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, format!("{BASE_URL}/pre-orders?productId=p-1&status=pending"));
    }

    #[tokio::test]
    async fn status_change_patches_the_status_route() {
        let recorder = Recorder::replying(r#"{"data":null}"#);
        let _ = testing::api(&recorder)
            .pre_orders
            .update_pre_order_status
            .call(("po-1".to_string(), PreOrderStatus::Fulfilled))
            .await;

        let req = recorder.last();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, format!("{BASE_URL}/pre-orders/po-1/status"));
        assert_eq!(json_body(&req), json!({"status": "fulfilled"}));
    }
}
