//! Descriptors for every backend operation the dashboard uses.
//!
//! Each submodule owns its DTOs and a struct of descriptors built once from a
//! shared `Transport`. `AllureApi` is the context object that owns them all;
//! build one per backend and pass it down to whatever needs it.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;

use crate::error::ApiError;
use crate::fetcher::BoxFetch;
use crate::transport::Transport;

pub mod auth;
pub mod bookings;
pub mod brands;
pub mod flash_sales;
pub mod pre_orders;
pub mod products;
pub mod reports;
pub mod users;
pub mod vouchers;

use auth::AuthApi;
use bookings::BookingsApi;
use brands::BrandsApi;
use flash_sales::FlashSalesApi;
use pre_orders::PreOrdersApi;
use products::ProductsApi;
use reports::ReportsApi;
use users::UsersApi;
use vouchers::VouchersApi;

#[derive(Debug)]
pub struct AllureApi {
    transport: Arc<Transport>,
    pub auth: AuthApi,
    pub brands: BrandsApi,
    pub products: ProductsApi,
    pub bookings: BookingsApi,
    pub vouchers: VouchersApi,
    pub flash_sales: FlashSalesApi,
    pub pre_orders: PreOrdersApi,
    pub reports: ReportsApi,
    pub users: UsersApi,
}

impl AllureApi {
    pub fn new(transport: Transport) -> Self {
        let transport = Arc::new(transport);
        Self {
            auth: AuthApi::new(&transport),
            brands: BrandsApi::new(&transport),
            products: ProductsApi::new(&transport),
            bookings: BookingsApi::new(&transport),
            vouchers: VouchersApi::new(&transport),
            flash_sales: FlashSalesApi::new(&transport),
            pre_orders: PreOrdersApi::new(&transport),
            reports: ReportsApi::new(&transport),
            users: UsersApi::new(&transport),
            transport,
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Every descriptor key, in module order.
    pub fn query_keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        keys.extend(self.auth.query_keys());
        keys.extend(self.brands.query_keys());
        keys.extend(self.products.query_keys());
        keys.extend(self.bookings.query_keys());
        keys.extend(self.vouchers.query_keys());
        keys.extend(self.flash_sales.query_keys());
        keys.extend(self.pre_orders.query_keys());
        keys.extend(self.reports.query_keys());
        keys.extend(self.users.query_keys());
        keys
    }
}

/// Close `op` over the shared transport, producing a boxed fetch function.
pub(crate) fn bind<P, R, F, Fut>(transport: &Arc<Transport>, op: F) -> BoxFetch<P, R>
where
    P: Send + 'static,
    R: 'static,
    F: Fn(Arc<Transport>, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
{
    let transport = Arc::clone(transport);
    Box::new(move |params| op(Arc::clone(&transport), params).boxed())
}

/// `/collection/{id}` with the id percent-encoded.
pub(crate) fn item_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", urlencoding::encode(id))
}
