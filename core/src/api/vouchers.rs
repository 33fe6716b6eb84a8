//! Discount vouchers.

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
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    pub id: String,
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(default)]
    pub min_order_value: Option<f64>,
    #[serde(default)]
    pub max_discount: Option<f64>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherInput {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug)]
pub struct VouchersApi {
    pub get_vouchers: BoxedQuery<ListQuery, Paginated<Voucher>>,
    pub get_voucher: BoxedQuery<String, Voucher>,
    pub create_voucher: BoxedMutation<VoucherInput, Voucher>,
    pub update_voucher: BoxedMutation<(String, VoucherInput), Voucher>,
    pub delete_voucher: BoxedMutation<String, ()>,
}

impl VouchersApi {
    pub(crate) fn new(transport: &Arc<Transport>) -> Self {
        Self {
            get_vouchers: to_query_fetcher("getVouchersApi", bind(transport, get_vouchers)),
            get_voucher: to_query_fetcher("getVoucherApi", bind(transport, get_voucher)),
            create_voucher: to_mutation_fetcher("createVoucherApi", bind(transport, create_voucher))
                .invalidates(&["getVouchersApi"]),
            update_voucher: to_mutation_fetcher("updateVoucherApi", bind(transport, update_voucher))
                .invalidates(&["getVouchersApi", "getVoucherApi"]),
            delete_voucher: to_mutation_fetcher("deleteVoucherApi", bind(transport, delete_voucher))
                .invalidates(&["getVouchersApi"]),
        }
    }

    pub fn query_keys(&self) -> Vec<&str> {
        vec![
            self.get_vouchers.query_key(),
            self.get_voucher.query_key(),
            self.create_voucher.query_key(),
            self.update_voucher.query_key(),
            self.delete_voucher.query_key(),
        ]
    }
}

async fn get_vouchers(transport: Arc<Transport>, query: ListQuery) -> Result<Paginated<Voucher>, ApiError> {
    transport
        .private_request("/vouchers", RequestConfig::get().params(&query)?)
        .await
}

async fn get_voucher(transport: Arc<Transport>, id: String) -> Result<Voucher, ApiError> {
    transport
        .private_request(&item_path("/vouchers", &id), RequestConfig::get())
        .await
}

async fn create_voucher(transport: Arc<Transport>, input: VoucherInput) -> Result<Voucher, ApiError> {
    transport
        .private_request("/vouchers", RequestConfig::post().json(&input)?)
        .await
}

async fn update_voucher(
    transport: Arc<Transport>,
    (id, input): (String, VoucherInput),
) -> Result<Voucher, ApiError> {
    transport
        .private_request(&item_path("/vouchers", &id), RequestConfig::put().json(&input)?)
        .await
}

async fn delete_voucher(transport: Arc<Transport>, id: String) -> Result<(), ApiError> {
    transport
        .private_request(&item_path("/vouchers", &id), RequestConfig::delete())
        .await
}
