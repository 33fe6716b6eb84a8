//! Read-only sales reports.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::bind;
use crate::error::ApiError;
use crate::fetcher::{to_query_fetcher, BoxedQuery};
use crate::request::RequestConfig;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_by: Option<Granularity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub total_revenue: f64,
    pub total_orders: u64,
    #[serde(default)]
    pub points: Vec<RevenuePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    /// Period label as the server formats it, e.g. `2024-03` for months.
    pub period: String,
    pub revenue: f64,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProductsQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub units_sold: u64,
    pub revenue: f64,
}

#[derive(Debug)]
pub struct ReportsApi {
    pub get_revenue_report: BoxedQuery<ReportRange, RevenueReport>,
    pub get_top_products: BoxedQuery<TopProductsQuery, Vec<TopProduct>>,
}

impl ReportsApi {
    pub(crate) fn new(transport: &Arc<Transport>) -> Self {
        Self {
            get_revenue_report: to_query_fetcher("getRevenueReportApi", bind(transport, get_revenue_report)),
            get_top_products: to_query_fetcher("getTopProductsApi", bind(transport, get_top_products)),
        }
    }

    pub fn query_keys(&self) -> Vec<&str> {
        vec![self.get_revenue_report.query_key(), self.get_top_products.query_key()]
    }
}

async fn get_revenue_report(transport: Arc<Transport>, range: ReportRange) -> Result<RevenueReport, ApiError> {
    transport
        .private_request("/reports/revenue", RequestConfig::get().params(&range)?)
        .await
}

async fn get_top_products(transport: Arc<Transport>, query: TopProductsQuery) -> Result<Vec<TopProduct>, ApiError> {
    transport
        .private_request("/reports/top-products", RequestConfig::get().params(&query)?)
        .await
}
