//! Booking models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_NEW: &str = "new";
pub const STATUS_CONFIRMED: &str = "confirmed";
pub const STATUS_DONE: &str = "done";
pub const STATUS_CANCELED: &str = "canceled";

/// Statuses staff may set from the back-office
pub const BOOKING_STATUSES: &[&str] =
    &[STATUS_NEW, STATUS_CONFIRMED, STATUS_DONE, STATUS_CANCELED];

/// Booking from the `bookings` table.
///
/// `selected_options` is the immutable snapshot of resolved option lines
/// written once at submission; `status` is the only field staff mutate.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BookingRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service_id: Option<i64>,
    pub service_name: Option<String>,
    pub base_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub selected_options: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Values for one booking INSERT, fully assembled before the write
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service_id: Option<i64>,
    pub service_name: Option<String>,
    pub base_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub notes: Option<String>,
    pub selected_options: serde_json::Value,
}
