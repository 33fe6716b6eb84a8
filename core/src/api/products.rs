//! Product catalog, including image upload.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{bind, item_path};
use crate::error::ApiError;
use crate::fetcher::{to_mutation_fetcher, to_query_fetcher, BoxedMutation, BoxedQuery};
use crate::multipart::MultipartForm;
use crate::request::RequestConfig;
use crate::transport::Transport;
use crate::types::{ListQuery, Paginated};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Active,
    Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub brand_id: String,
    pub price: f64,
    pub stock: u32,
    pub status: ProductStatus,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(flatten)]
    pub list: ListQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    pub sku: String,
    pub brand_id: String,
    pub price: f64,
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update; only the fields present are applied server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub url: String,
}

#[derive(Debug)]
pub struct ProductsApi {
    pub get_products: BoxedQuery<ProductFilter, Paginated<Product>>,
    pub get_product: BoxedQuery<String, Product>,
    pub create_product: BoxedMutation<CreateProduct, Product>,
    pub update_product: BoxedMutation<(String, UpdateProduct), Product>,
    pub delete_product: BoxedMutation<String, ()>,
    pub upload_product_image: BoxedMutation<(String, ImageUpload), UploadedImage>,
}

impl ProductsApi {
    pub(crate) fn new(transport: &Arc<Transport>) -> Self {
        Self {
            get_products: to_query_fetcher("getProductsApi", bind(transport, get_products)),
            get_product: to_query_fetcher("getProductApi", bind(transport, get_product)),
            create_product: to_mutation_fetcher("createProductApi", bind(transport, create_product))
                .invalidates(&["getProductsApi"]),
            update_product: to_mutation_fetcher("updateProductApi", bind(transport, update_product))
                .invalidates(&["getProductsApi", "getProductApi"]),
            delete_product: to_mutation_fetcher("deleteProductApi", bind(transport, delete_product))
                .invalidates(&["getProductsApi"]),
            upload_product_image: to_mutation_fetcher(
                "uploadProductImageApi",
                bind(transport, upload_product_image),
            )
            .invalidates(&["getProductApi"]),
        }
    }

    pub fn query_keys(&self) -> Vec<&str> {
        vec![
            self.get_products.query_key(),
            self.get_product.query_key(),
            self.create_product.query_key(),
            self.update_product.query_key(),
            self.delete_product.query_key(),
            self.upload_product_image.query_key(),
        ]
    }
}

async fn get_products(transport: Arc<Transport>, filter: ProductFilter) -> Result<Paginated<Product>, ApiError> {
    transport
        .private_request("/products", RequestConfig::get().params(&filter)?)
        .await
}

async fn get_product(transport: Arc<Transport>, id: String) -> Result<Product, ApiError> {
    transport
        .private_request(&item_path("/products", &id), RequestConfig::get())
        .await
}

async fn create_product(transport: Arc<Transport>, input: CreateProduct) -> Result<Product, ApiError> {
    transport
        .private_request("/products", RequestConfig::post().json(&input)?)
        .await
}

async fn update_product(
    transport: Arc<Transport>,
    (id, input): (String, UpdateProduct),
) -> Result<Product, ApiError> {
    transport
        .private_request(&item_path("/products", &id), RequestConfig::patch().json(&input)?)
        .await
}

async fn delete_product(transport: Arc<Transport>, id: String) -> Result<(), ApiError> {
    transport
        .private_request(&item_path("/products", &id), RequestConfig::delete())
        .await
}

async fn upload_product_image(
    transport: Arc<Transport>,
    (id, image): (String, ImageUpload),
) -> Result<UploadedImage, ApiError> {
    let form = MultipartForm::new().file("file", &image.file_name, &image.content_type, image.bytes);
    let path = format!("{}/images", item_path("/products", &id));
    transport
        .private_request(&path, RequestConfig::post().multipart(form))
        .await
}
