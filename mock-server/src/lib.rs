//! In-memory stand-in for the Allure admin backend.
//!
//! Speaks the same wire protocol as the real server: every success is a
//! `{ data, message, statusCode }` envelope, every failure a non-2xx status
//! with `{ message, statusCode, error }`. All routes except login require
//! `Authorization: Bearer <ACCESS_TOKEN>`.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@allure.test";
pub const ADMIN_PASSWORD: &str = "allure-admin";
pub const ACCESS_TOKEN: &str = "mock-admin-token";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub data: T,
    pub message: String,
    pub status_code: u16,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub permissions: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub brand_id: String,
    pub price: f64,
    pub stock: u32,
    pub status: String,
    pub description: Option<String>,
    pub images: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrand {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    pub sku: String,
    pub brand_id: String,
    pub price: f64,
    pub stock: u32,
    pub status: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<u32>,
    pub status: Option<String>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub brand_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub brands: Vec<Brand>,
    pub products: Vec<Product>,
}

pub type Db = Arc<RwLock<Store>>;

/// A failed request, rendered as the backend's error payload.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    message: serde_json::Value,
}

impl Failure {
    fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: json!(message),
        }
    }

    fn validation(messages: Vec<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: json!(messages),
        }
    }

    fn not_found(what: &str, id: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, &format!("{what} {id} not found"))
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = json!({
            "message": self.message,
            "statusCode": self.status.as_u16(),
            "error": self.status.canonical_reason().unwrap_or("Error"),
        });
        (self.status, Json(body)).into_response()
    }
}

type Reply<T> = Result<(StatusCode, Json<Envelope<T>>), Failure>;

fn reply<T>(status: StatusCode, message: &str, data: T) -> Reply<T> {
    Ok((
        status,
        Json(Envelope {
            data,
            message: message.to_string(),
            status_code: status.as_u16(),
        }),
    ))
}

fn authorize(headers: &HeaderMap) -> Result<(), Failure> {
    let expected = format!("Bearer {ACCESS_TOKEN}");
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        Some(_) => Err(Failure::new(StatusCode::UNAUTHORIZED, "Invalid token")),
        None => Err(Failure::new(StatusCode::UNAUTHORIZED, "Missing bearer token")),
    }
}

fn admin_profile() -> Profile {
    Profile {
        id: "u-admin".to_string(),
        email: ADMIN_EMAIL.to_string(),
        full_name: "Allure Admin".to_string(),
        role: "admin".to_string(),
        permissions: vec!["products:write".to_string(), "brands:write".to_string()],
    }
}

fn seeded() -> Store {
    let brand = |id: &str, name: &str| Brand {
        id: id.to_string(),
        name: name.to_string(),
        slug: slugify(name),
        description: None,
        logo_url: None,
        is_active: true,
    };
    Store {
        brands: vec![brand("b-lumiere", "Lumiere"), brand("b-sakura", "Sakura Skin")],
        products: Vec::new(),
    }
}

fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

fn paginate<T: Clone>(items: &[T], page: Option<u32>, limit: Option<u32>) -> Page<T> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(20).clamp(1, 100);
    let start = ((page - 1) * limit) as usize;
    Page {
        items: items.iter().skip(start).take(limit as usize).cloned().collect(),
        total: items.len() as u64,
        page,
        limit,
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(seeded()));
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/brands", get(list_brands).post(create_brand))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/products/{id}/images", post(upload_image))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn login(Json(input): Json<Login>) -> Reply<serde_json::Value> {
    if input.email != ADMIN_EMAIL || input.password != ADMIN_PASSWORD {
        tracing::info!(email = %input.email, "rejected login");
        return Err(Failure::new(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }
    reply(
        StatusCode::OK,
        "Login successful",
        json!({ "accessToken": ACCESS_TOKEN, "user": admin_profile() }),
    )
}

async fn me(headers: HeaderMap) -> Reply<Profile> {
    authorize(&headers)?;
    reply(StatusCode::OK, "OK", admin_profile())
}

async fn list_brands(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Reply<Page<Brand>> {
    authorize(&headers)?;
    let store = db.read().await;
    let needle = params.search.as_deref().map(str::to_lowercase);
    let matching: Vec<Brand> = store
        .brands
        .iter()
        .filter(|b| needle.as_ref().map_or(true, |n| b.name.to_lowercase().contains(n)))
        .cloned()
        .collect();
    reply(StatusCode::OK, "OK", paginate(&matching, params.page, params.limit))
}

async fn create_brand(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateBrand>,
) -> Reply<Brand> {
    authorize(&headers)?;
    let name = input.name.filter(|n| !n.trim().is_empty());
    let Some(name) = name else {
        return Err(Failure::validation(vec!["name should not be empty".to_string()]));
    };
    let brand = Brand {
        id: Uuid::new_v4().to_string(),
        slug: slugify(&name),
        name,
        description: input.description,
        logo_url: input.logo_url,
        is_active: input.is_active.unwrap_or(true),
    };
    db.write().await.brands.push(brand.clone());
    tracing::info!(id = %brand.id, "created brand");
    reply(StatusCode::CREATED, "Created", brand)
}

async fn list_products(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Reply<Page<Product>> {
    authorize(&headers)?;
    let store = db.read().await;
    let needle = params.search.as_deref().map(str::to_lowercase);
    let matching: Vec<Product> = store
        .products
        .iter()
        .filter(|p| needle.as_ref().map_or(true, |n| p.name.to_lowercase().contains(n)))
        .filter(|p| params.brand_id.as_ref().map_or(true, |b| &p.brand_id == b))
        .filter(|p| params.status.as_ref().map_or(true, |s| &p.status == s))
        .cloned()
        .collect();
    reply(StatusCode::OK, "OK", paginate(&matching, params.page, params.limit))
}

async fn create_product(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateProduct>,
) -> Reply<Product> {
    authorize(&headers)?;
    let mut store = db.write().await;

    let mut problems = Vec::new();
    if input.name.trim().is_empty() {
        problems.push("name should not be empty".to_string());
    }
    if input.price < 0.0 {
        problems.push("price must not be negative".to_string());
    }
    if !store.brands.iter().any(|b| b.id == input.brand_id) {
        problems.push(format!("brandId {} does not exist", input.brand_id));
    }
    if !problems.is_empty() {
        return Err(Failure::validation(problems));
    }
    if store.products.iter().any(|p| p.sku == input.sku) {
        return Err(Failure::new(StatusCode::CONFLICT, &format!("SKU {} already exists", input.sku)));
    }

    let product = Product {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        sku: input.sku,
        brand_id: input.brand_id,
        price: input.price,
        stock: input.stock,
        status: input.status.unwrap_or_else(|| "draft".to_string()),
        description: input.description,
        images: Vec::new(),
    };
    store.products.push(product.clone());
    tracing::info!(id = %product.id, "created product");
    reply(StatusCode::CREATED, "Created", product)
}

async fn get_product(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply<Product> {
    authorize(&headers)?;
    let store = db.read().await;
    let product = store
        .products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| Failure::not_found("Product", &id))?;
    reply(StatusCode::OK, "OK", product)
}

async fn update_product(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<UpdateProduct>,
) -> Reply<Product> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let product = store
        .products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| Failure::not_found("Product", &id))?;
    if let Some(name) = input.name {
        product.name = name;
    }
    if let Some(price) = input.price {
        product.price = price;
    }
    if let Some(stock) = input.stock {
        product.stock = stock;
    }
    if let Some(status) = input.status {
        product.status = status;
    }
    if let Some(description) = input.description {
        product.description = Some(description);
    }
    reply(StatusCode::OK, "Updated", product.clone())
}

async fn delete_product(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply<()> {
    authorize(&headers)?;
    let mut store = db.write().await;
    let before = store.products.len();
    store.products.retain(|p| p.id != id);
    if store.products.len() == before {
        return Err(Failure::not_found("Product", &id));
    }
    reply(StatusCode::OK, "Deleted", ())
}

async fn upload_image(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Reply<serde_json::Value> {
    authorize(&headers)?;

    let mut file_name = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Failure::new(StatusCode::BAD_REQUEST, &e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload.bin").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Failure::new(StatusCode::BAD_REQUEST, &e.to_string()))?;
        if bytes.is_empty() {
            return Err(Failure::validation(vec!["file must not be empty".to_string()]));
        }
        file_name = Some(name);
    }
    let file_name = file_name.ok_or_else(|| Failure::validation(vec!["file is required".to_string()]))?;

    let mut store = db.write().await;
    let product = store
        .products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| Failure::not_found("Product", &id))?;
    let url = format!("/uploads/products/{id}/{file_name}");
    product.images.push(url.clone());
    reply(StatusCode::CREATED, "Uploaded", json!({ "url": url }))
}
