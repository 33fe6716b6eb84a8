//! Time-boxed flash sales and their discounted items.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{bind, item_path};
use crate::error::ApiError;
use crate::fetcher::{to_mutation_fetcher, to_query_fetcher, BoxedMutation, BoxedQuery};
use crate::request::RequestConfig;
use crate::transport::Transport;
use crate::types::{ListQuery, Paginated};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashSaleStatus {
    Scheduled,
    Running,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashSale {
    pub id: String,
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: FlashSaleStatus,
    #[serde(default)]
    pub items: Vec<FlashSaleItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashSaleItem {
    pub product_id: String,
    pub sale_price: f64,
    pub quantity: u32,
    #[serde(default)]
    pub sold: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashSaleInput {
    pub name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub items: Vec<FlashSaleItemInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashSaleItemInput {
    pub product_id: String,
    pub sale_price: f64,
    pub quantity: u32,
}

#[derive(Debug)]
pub struct FlashSalesApi {
    pub get_flash_sales: BoxedQuery<ListQuery, Paginated<FlashSale>>,
    pub get_flash_sale: BoxedQuery<String, FlashSale>,
    pub create_flash_sale: BoxedMutation<FlashSaleInput, FlashSale>,
    pub update_flash_sale: BoxedMutation<(String, FlashSaleInput), FlashSale>,
    pub delete_flash_sale: BoxedMutation<String, ()>,
}

impl FlashSalesApi {
    pub(crate) fn new(transport: &Arc<Transport>) -> Self {
        Self {
            get_flash_sales: to_query_fetcher("getFlashSalesApi", bind(transport, get_flash_sales)),
            get_flash_sale: to_query_fetcher("getFlashSaleApi", bind(transport, get_flash_sale)),
            create_flash_sale: to_mutation_fetcher("createFlashSaleApi", bind(transport, create_flash_sale))
                .invalidates(&["getFlashSalesApi"]),
            update_flash_sale: to_mutation_fetcher("updateFlashSaleApi", bind(transport, update_flash_sale))
                .invalidates(&["getFlashSalesApi", "getFlashSaleApi"]),
            delete_flash_sale: to_mutation_fetcher("deleteFlashSaleApi", bind(transport, delete_flash_sale))
                .invalidates(&["getFlashSalesApi"]),
        }
    }

    pub fn query_keys(&self) -> Vec<&str> {
        vec![
            self.get_flash_sales.query_key(),
            self.get_flash_sale.query_key(),
            self.create_flash_sale.query_key(),
            self.update_flash_sale.query_key(),
            self.delete_flash_sale.query_key(),
        ]
    }
}

async fn get_flash_sales(transport: Arc<Transport>, query: ListQuery) -> Result<Paginated<FlashSale>, ApiError> {
    transport
        .private_request("/flash-sales", RequestConfig::get().params(&query)?)
        .await
}

async fn get_flash_sale(transport: Arc<Transport>, id: String) -> Result<FlashSale, ApiError> {
    transport
        .private_request(&item_path("/flash-sales", &id), RequestConfig::get())
        .await
}

async fn create_flash_sale(transport: Arc<Transport>, input: FlashSaleInput) -> Result<FlashSale, ApiError> {
    transport
        .private_request("/flash-sales", RequestConfig::post().json(&input)?)
        .await
}

async fn update_flash_sale(
    transport: Arc<Transport>,
    (id, input): (String, FlashSaleInput),
) -> Result<FlashSale, ApiError> {
    transport
        .private_request(&item_path("/flash-sales", &id), RequestConfig::put().json(&input)?)
        .await
}

async fn delete_flash_sale(transport: Arc<Transport>, id: String) -> Result<(), ApiError> {
    transport
        .private_request(&item_path("/flash-sales", &id), RequestConfig::delete())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{self, json_body, Recorder, BASE_URL};
    use crate::http::HttpMethod;
    use serde_json::json;

    #[tokio::test]
    async fn create_posts_items() {
        let recorder = Recorder::replying(r#"{"data":null}"#);
        let input = FlashSaleInput {
            name: "Midnight deals".to_string(),
            starts_at: "2024-05-01T00:00:00Z".parse().unwrap(),
            ends_at: "2024-05-01T02:00:00Z".parse().unwrap(),
            items: vec![FlashSaleItemInput {
                product_id: "p-1".to_string(),
                sale_price: 99000.0,
                quantity: 20,
            }],
        };
        let _ = testing::api(&recorder).flash_sales.create_flash_sale.call(input).await;

        let req = recorder.last();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE_URL}/flash-sales"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body = json_body(&req);
        assert_eq!(body["name"], "Midnight deals");
        assert_eq!(body["items"], json!([{"productId": "p-1", "salePrice": 99000.0, "quantity": 20}]));
    }

    #[tokio::test]
    async fn item_routes_use_the_id() {
        let recorder = Recorder::replying(r#"{"data":null}"#);
        let api = testing::api(&recorder);
        let _ = api.flash_sales.get_flash_sale.call("fs-1".to_string()).await;
        api.flash_sales.delete_flash_sale.call("fs-1".to_string()).await.unwrap();

        let seen = recorder.requests();
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].url, format!("{BASE_URL}/flash-sales/fs-1"));
        assert_eq!(seen[1].method, HttpMethod::Delete);
        assert_eq!(seen[1].url, format!("{BASE_URL}/flash-sales/fs-1"));
    }

    #[test]
    fn sold_defaults_to_zero() {
        let sale: FlashSale = serde_json::from_str(
            r#"{"id":"fs1","name":"Midnight deals","startsAt":"2024-05-01T00:00:00Z",
                "endsAt":"2024-05-01T02:00:00Z","status":"scheduled",
                "items":[{"productId":"p1","salePrice":99000,"quantity":20}]}"#,
        )
        .unwrap();
        assert_eq!(sale.status, FlashSaleStatus::Scheduled);
        assert_eq!(sale.items[0].sold, 0);
    }
}
