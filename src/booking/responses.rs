//! Response DTOs for the booking API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::payload::SelectedOption;

/// One breakdown line of a quote (zero modifiers are never emitted)
#[derive(Debug, Serialize)]
pub struct QuoteLineResponse {
    pub label: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Response for a price quote over the current selection state
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub state: &'static str,
    pub service_id: i64,
    pub service_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    pub lines: Vec<QuoteLineResponse>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
    /// Names of required options still waiting for a selection
    pub missing_required: Vec<String>,
    /// Names of required options with no configured choices (back-office
    /// data defect; submission stays blocked until fixed)
    pub misconfigured: Vec<String>,
}

/// Response for a created booking
#[derive(Debug, Serialize)]
pub struct BookingCreatedResponse {
    pub id: Uuid,
    pub status: String,
    pub service_name: Option<String>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub base_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    pub total_price: Option<Decimal>,
    pub selected_options: Vec<SelectedOption>,
    pub created_at: DateTime<Utc>,
}

/// Error payload for booking API failures
#[derive(Debug, Serialize)]
pub struct BookingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
