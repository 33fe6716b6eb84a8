//! Brands that products are grouped under.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{bind, item_path};
use crate::error::ApiError;
use crate::fetcher::{to_mutation_fetcher, to_query_fetcher, BoxedMutation, BoxedQuery};
use crate::request::RequestConfig;
use crate::transport::Transport;
use crate::types::{ListQuery, Paginated};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    pub is_active: bool,
}

/// Create and update payload; unset fields are left out of the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug)]
pub struct BrandsApi {
    pub get_brands: BoxedQuery<ListQuery, Paginated<Brand>>,
    pub get_brand: BoxedQuery<String, Brand>,
    pub create_brand: BoxedMutation<BrandInput, Brand>,
    pub update_brand: BoxedMutation<(String, BrandInput), Brand>,
    pub delete_brand: BoxedMutation<String, ()>,
}

impl BrandsApi {
    pub(crate) fn new(transport: &Arc<Transport>) -> Self {
        Self {
            get_brands: to_query_fetcher("getBrandsApi", bind(transport, get_brands)),
            get_brand: to_query_fetcher("getBrandApi", bind(transport, get_brand)),
            create_brand: to_mutation_fetcher("createBrandApi", bind(transport, create_brand))
                .invalidates(&["getBrandsApi"]),
            update_brand: to_mutation_fetcher("updateBrandApi", bind(transport, update_brand))
                .invalidates(&["getBrandsApi", "getBrandApi"]),
            delete_brand: to_mutation_fetcher("deleteBrandApi", bind(transport, delete_brand))
                .invalidates(&["getBrandsApi"]),
        }
    }

    pub fn query_keys(&self) -> Vec<&str> {
        vec![
            self.get_brands.query_key(),
            self.get_brand.query_key(),
            self.create_brand.query_key(),
            self.update_brand.query_key(),
            self.delete_brand.query_key(),
        ]
    }
}

async fn get_brands(transport: Arc<Transport>, query: ListQuery) -> Result<Paginated<Brand>, ApiError> {
    transport
        .private_request("/brands", RequestConfig::get().params(&query)?)
        .await
}

async fn get_brand(transport: Arc<Transport>, id: String) -> Result<Brand, ApiError> {
    transport
        .private_request(&item_path("/brands", &id), RequestConfig::get())
        .await
}

async fn create_brand(transport: Arc<Transport>, input: BrandInput) -> Result<Brand, ApiError> {
    transport
        .private_request("/brands", RequestConfig::post().json(&input)?)
        .await
}

async fn update_brand(transport: Arc<Transport>, (id, input): (String, BrandInput)) -> Result<Brand, ApiError> {
    transport
        .private_request(&item_path("/brands", &id), RequestConfig::patch().json(&input)?)
        .await
}

async fn delete_brand(transport: Arc<Transport>, id: String) -> Result<(), ApiError> {
    transport
        .private_request(&item_path("/brands", &id), RequestConfig::delete())
        .await
}
