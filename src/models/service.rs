//! Service catalog models.
//!
//! These models use sqlx's FromRow derive for direct database deserialization.
//! A `ServiceCatalog` is the assembled, display-ordered view of one service
//! with its configurable options and their choices.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// Option rendered as a dropdown
pub const OPTION_KIND_SELECT: &str = "select";
/// Option rendered as a radio group
pub const OPTION_KIND_RADIO: &str = "radio";

/// Service from the `services` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub page_title: Option<String>,
    pub description: Option<String>,
    /// Flat price label for services without configurable options ("dès 80 CHF", "sur devis")
    pub price: Option<String>,
    /// Base price for configurable services; option modifiers apply on top
    pub base_price: Option<Decimal>,
    pub image_url: Option<String>,
    pub has_options: bool,
    pub created_at: DateTime<Utc>,
}

/// Configurable option from the `service_options` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceOptionRow {
    pub id: i64,
    pub service_id: i64,
    pub name: String,
    /// "select" or "radio"
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub is_required: bool,
    pub display_order: i32,
}

/// Choice from the `service_option_choices` table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OptionChoiceRow {
    pub id: i64,
    pub option_id: i64,
    pub label: String,
    /// Signed adjustment added to the base price when selected
    pub price_modifier: Option<Decimal>,
    pub display_order: i32,
}

impl OptionChoiceRow {
    /// Modifier with NULL treated as a zero contribution
    pub fn modifier(&self) -> Decimal {
        self.price_modifier.unwrap_or(Decimal::ZERO)
    }
}

/// An option together with its display-ordered choices
#[derive(Debug, Clone, Serialize)]
pub struct ServiceOption {
    #[serde(flatten)]
    pub option: ServiceOptionRow,
    pub choices: Vec<OptionChoiceRow>,
}

impl ServiceOption {
    pub fn id(&self) -> i64 {
        self.option.id
    }

    pub fn name(&self) -> &str {
        &self.option.name
    }

    pub fn is_required(&self) -> bool {
        self.option.is_required
    }

    pub fn find_choice(&self, choice_id: i64) -> Option<&OptionChoiceRow> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}

/// A service with its assembled option catalog
#[derive(Debug, Clone, Serialize)]
pub struct ServiceCatalog {
    pub service: ServiceRow,
    pub options: Vec<ServiceOption>,
}

impl ServiceCatalog {
    pub fn find_option(&self, option_id: i64) -> Option<&ServiceOption> {
        self.options.iter().find(|o| o.id() == option_id)
    }

    /// Base price with NULL treated as zero
    pub fn base_price(&self) -> Decimal {
        self.service.base_price.unwrap_or(Decimal::ZERO)
    }
}
