//! NetClair web application.
//!
//! Storefront with online booking for a cleaning-services business, plus
//! the JSON back-office API that manages its content. Pricing is the only
//! computational core: configurable service options carry signed price
//! modifiers, and a booking snapshots the resolved selection with its
//! derived total.

pub mod booking;
pub mod cache;
pub mod catalog;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;

use sqlx::PgPool;

use crate::cache::AppCache;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
}
