//! Booking flow for configurable services.
//!
//! Selection state, price derivation and payload assembly are pure
//! functions over the loaded catalog; `services` adds the database-backed
//! submission path and `routes` exposes the JSON API consumed by the
//! storefront.

pub mod payload;
pub mod pricing;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod selection;
pub mod services;
pub mod session;

// Re-export commonly used items
pub use payload::{build_payload, can_submit, SelectedOption};
pub use pricing::{compute_total, format_money, round_money};
pub use routes::router;
pub use selection::Selections;
pub use services::BookingError;
pub use session::{ConfigSession, SessionState};

#[cfg(test)]
pub(crate) mod test_fixtures {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    use crate::models::{
        OptionChoiceRow, ServiceCatalog, ServiceOption, ServiceOptionRow, ServiceRow,
    };

    pub fn choice(id: i64, label: &str, modifier: &str) -> OptionChoiceRow {
        OptionChoiceRow {
            id,
            option_id: 0,
            label: label.to_string(),
            price_modifier: Some(Decimal::from_str(modifier).unwrap()),
            display_order: 0,
        }
    }

    pub fn unpriced_choice(id: i64, label: &str) -> OptionChoiceRow {
        OptionChoiceRow {
            id,
            option_id: 0,
            label: label.to_string(),
            price_modifier: None,
            display_order: 0,
        }
    }

    pub fn option(
        id: i64,
        name: &str,
        is_required: bool,
        mut choices: Vec<OptionChoiceRow>,
    ) -> ServiceOption {
        for c in &mut choices {
            c.option_id = id;
        }
        ServiceOption {
            option: ServiceOptionRow {
                id,
                service_id: 1,
                name: name.to_string(),
                kind: "select".to_string(),
                is_required,
                display_order: 0,
            },
            choices,
        }
    }

    pub fn service_row(base_price: Option<&str>) -> ServiceRow {
        ServiceRow {
            id: 1,
            name: "Nettoyage auto".to_string(),
            slug: "nettoyage-auto".to_string(),
            page_title: None,
            description: None,
            price: None,
            base_price: base_price.map(|p| Decimal::from_str(p).unwrap()),
            image_url: None,
            has_options: true,
            created_at: Utc::now(),
        }
    }

    pub fn catalog(base_price: &str, options: Vec<ServiceOption>) -> ServiceCatalog {
        ServiceCatalog {
            service: service_row(Some(base_price)),
            options,
        }
    }
}
