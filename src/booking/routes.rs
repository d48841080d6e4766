//! Booking API route handlers.
//!
//! The storefront configurator calls `quote` on every selection change and
//! `create_booking` on submit. Blocking conditions are part of the quote
//! body (state + missing/misconfigured lists) so the client can render them
//! inline; only submission itself turns them into error responses.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use crate::catalog;
use crate::error::ApiResult;
use crate::AppState;

use super::payload;
use super::pricing;
use super::requests::{parse_selections, QuoteRequest, SubmitBookingRequest};
use super::responses::{
    BookingCreatedResponse, BookingErrorResponse, QuoteLineResponse, QuoteResponse,
};
use super::services::{self, BookingError};
use super::session::ConfigSession;

/// Booking API router, nested under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/services/:slug/quote", post(quote))
        .route("/bookings", post(create_booking))
}

impl BookingError {
    fn status(&self) -> StatusCode {
        match self {
            BookingError::MissingContact => StatusCode::BAD_REQUEST,
            BookingError::ServiceNotFound { .. } => StatusCode::NOT_FOUND,
            BookingError::ValidationBlocked { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::ConfigurationInconsistency { .. } => StatusCode::CONFLICT,
            BookingError::SubmissionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            BookingError::MissingContact => "missing_contact",
            BookingError::ServiceNotFound { .. } => "service_not_found",
            BookingError::ValidationBlocked { .. } => "validation_blocked",
            BookingError::ConfigurationInconsistency { .. } => "configuration_inconsistency",
            BookingError::SubmissionFailed { .. } => "submission_failed",
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BookingError::ValidationBlocked { missing } => {
                Some(serde_json::json!({ "missing_required": missing }))
            }
            BookingError::ConfigurationInconsistency { options } => {
                Some(serde_json::json!({ "misconfigured": options }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        if matches!(self, BookingError::SubmissionFailed { .. }) {
            tracing::error!("Booking submission failed: {}", self);
        }
        let body = BookingErrorResponse {
            error_type: self.error_type().to_string(),
            message: self.to_string(),
            details: self.details(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Price the current selection state of one configurable service
async fn quote(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<QuoteRequest>,
) -> ApiResult<Json<QuoteResponse>> {
    let catalog = catalog::load_catalog(&state.db, &state.cache, &slug).await?;

    let mut session = ConfigSession::begin();
    session.catalog_loaded(Arc::clone(&catalog));
    for (option_id, choice_id) in parse_selections(&request.selections).iter() {
        session.select(option_id, choice_id);
    }

    let lines = pricing::price_breakdown(&catalog.options, session.selections())
        .into_iter()
        .map(|line| QuoteLineResponse {
            label: line.label,
            amount: line.amount,
        })
        .collect();

    let missing_required = payload::missing_required(&catalog.options, session.selections())
        .iter()
        .map(|o| o.name().to_string())
        .collect();
    let misconfigured = payload::misconfigured_required(&catalog.options)
        .iter()
        .map(|o| o.name().to_string())
        .collect();

    Ok(Json(QuoteResponse {
        state: session.state().as_str(),
        service_id: catalog.service.id,
        service_name: catalog.service.name.clone(),
        base_price: catalog.base_price(),
        lines,
        total_price: session.total(),
        missing_required,
        misconfigured,
    }))
}

/// Submit a booking
async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<SubmitBookingRequest>,
) -> Result<(StatusCode, Json<BookingCreatedResponse>), BookingError> {
    let row = services::submit_booking(&state.db, &state.cache, &request).await?;

    let selected_options =
        serde_json::from_value(row.selected_options.clone()).unwrap_or_default();

    tracing::info!("Booking {} created for '{}'", row.id, row.name);

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            id: row.id,
            status: row.status,
            service_name: row.service_name,
            base_price: row.base_price,
            total_price: row.total_price,
            selected_options,
            created_at: row.created_at,
        }),
    ))
}
