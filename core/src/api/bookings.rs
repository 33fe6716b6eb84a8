//! Salon bookings and their status workflow.

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
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub code: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub service_name: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingFilter {
    #[serde(flatten)]
    pub list: ListQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

#[derive(Serialize)]
struct StatusChange {
    status: BookingStatus,
}

#[derive(Serialize)]
struct Cancellation {
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

#[derive(Debug)]
pub struct BookingsApi {
    pub get_bookings: BoxedQuery<BookingFilter, Paginated<Booking>>,
    pub get_booking: BoxedQuery<String, Booking>,
    pub update_booking_status: BoxedMutation<(String, BookingStatus), Booking>,
    /// Booking id and an optional reason shown to the customer.
    pub cancel_booking: BoxedMutation<(String, Option<String>), Booking>,
}

impl BookingsApi {
    pub(crate) fn new(transport: &Arc<Transport>) -> Self {
        Self {
            get_bookings: to_query_fetcher("getBookingsApi", bind(transport, get_bookings)),
            get_booking: to_query_fetcher("getBookingApi", bind(transport, get_booking)),
            update_booking_status: to_mutation_fetcher(
                "updateBookingStatusApi",
                bind(transport, update_booking_status),
            )
            .invalidates(&["getBookingsApi", "getBookingApi"]),
            cancel_booking: to_mutation_fetcher("cancelBookingApi", bind(transport, cancel_booking))
                .invalidates(&["getBookingsApi", "getBookingApi"]),
        }
    }

    pub fn query_keys(&self) -> Vec<&str> {
        vec![
            self.get_bookings.query_key(),
            self.get_booking.query_key(),
            self.update_booking_status.query_key(),
            self.cancel_booking.query_key(),
        ]
    }
}

async fn get_bookings(transport: Arc<Transport>, filter: BookingFilter) -> Result<Paginated<Booking>, ApiError> {
    transport
        .private_request("/bookings", RequestConfig::get().params(&filter)?)
        .await
}

async fn get_booking(transport: Arc<Transport>, id: String) -> Result<Booking, ApiError> {
    transport
        .private_request(&item_path("/bookings", &id), RequestConfig::get())
        .await
}

async fn update_booking_status(
    transport: Arc<Transport>,
    (id, status): (String, BookingStatus),
) -> Result<Booking, ApiError> {
    let path = format!("{}/status", item_path("/bookings", &id));
    transport
        .private_request(&path, RequestConfig::patch().json(&StatusChange { status })?)
        .await
}

async fn cancel_booking(
    transport: Arc<Transport>,
    (id, reason): (String, Option<String>),
) -> Result<Booking, ApiError> {
    let path = format!("{}/cancel", item_path("/bookings", &id));
    transport
        .private_request(&path, RequestConfig::post().json(&Cancellation { reason })?)
        .await
}
