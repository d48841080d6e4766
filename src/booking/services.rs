//! Booking submission with database access.
//!
//! The eligibility gate runs here, synchronously, immediately before the
//! INSERT: the client's gate result is never trusted, and a visitor editing
//! selections mid-submit cannot slip a stale payload through. Option lines
//! and the total are re-derived server-side from the current catalog.

use sqlx::PgPool;

use crate::cache::AppCache;
use crate::catalog;
use crate::error::AppError;
use crate::models::{BookingRow, NewBooking};

use super::payload;
use super::pricing;
use super::queries;
use super::requests::{parse_selections, SubmitBookingRequest};

/// Booking submission error types
#[derive(Debug, Clone)]
pub enum BookingError {
    MissingContact,
    ServiceNotFound {
        reference: String,
    },
    /// Required options without a selection; recoverable by the visitor
    ValidationBlocked {
        missing: Vec<String>,
    },
    /// Required options with zero configured choices; a back-office data
    /// defect the visitor cannot fix
    ConfigurationInconsistency {
        options: Vec<String>,
    },
    /// The write (or a read it depends on) failed; the client keeps its
    /// assembled request and may retry as-is
    SubmissionFailed {
        message: String,
    },
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingError::MissingContact => {
                write!(f, "Name and email are required")
            }
            BookingError::ServiceNotFound { reference } => {
                write!(f, "No service found for '{}'", reference)
            }
            BookingError::ValidationBlocked { missing } => {
                write!(f, "Required options not selected: {}", missing.join(", "))
            }
            BookingError::ConfigurationInconsistency { options } => {
                write!(
                    f,
                    "Required options have no configured choices: {}",
                    options.join(", ")
                )
            }
            BookingError::SubmissionFailed { message } => {
                write!(f, "Booking could not be saved: {}", message)
            }
        }
    }
}

impl std::error::Error for BookingError {}

/// Validate, assemble and persist one booking.
///
/// For a configured service the flow is: fresh catalog read, configuration
/// checks, gate, then payload + total derivation, then a single INSERT.
/// Bookings without a configured service insert with empty pricing fields.
pub async fn submit_booking(
    pool: &PgPool,
    cache: &AppCache,
    request: &SubmitBookingRequest,
) -> Result<BookingRow, BookingError> {
    if request.name.trim().is_empty() || request.email.trim().is_empty() {
        return Err(BookingError::MissingContact);
    }

    let configured = match service_reference(request) {
        Some(reference) => {
            let catalog = resolve_catalog(pool, cache, request).await.map_err(|e| {
                match e {
                    AppError::NotFound => BookingError::ServiceNotFound { reference },
                    other => BookingError::SubmissionFailed {
                        message: other.to_string(),
                    },
                }
            })?;

            let selections = parse_selections(&request.selections);

            let broken = payload::misconfigured_required(&catalog.options);
            if !broken.is_empty() {
                return Err(BookingError::ConfigurationInconsistency {
                    options: broken.iter().map(|o| o.name().to_string()).collect(),
                });
            }

            if !payload::can_submit(&catalog.options, &selections) {
                let missing = payload::missing_required(&catalog.options, &selections)
                    .iter()
                    .map(|o| o.name().to_string())
                    .collect();
                return Err(BookingError::ValidationBlocked { missing });
            }

            let lines = payload::build_payload(&catalog.options, &selections);
            let total =
                pricing::compute_total(catalog.service.base_price, &catalog.options, &selections);
            Some((catalog, lines, total))
        }
        None => None,
    };

    let booking = match configured {
        Some((catalog, lines, total)) => {
            let notes = enrich_notes(
                Some(&catalog.service.name),
                &lines
                    .iter()
                    .map(|l| format!("{}: {}", l.option_name, l.choice_label))
                    .collect::<Vec<_>>(),
                request.notes.as_deref(),
            );
            let selected_options =
                serde_json::to_value(&lines).map_err(|e| BookingError::SubmissionFailed {
                    message: e.to_string(),
                })?;

            NewBooking {
                name: request.name.clone(),
                email: request.email.clone(),
                phone: request.phone.clone(),
                service_id: Some(catalog.service.id),
                service_name: Some(catalog.service.name.clone()),
                base_price: catalog.service.base_price,
                total_price: Some(total),
                city: request.city.clone(),
                address: request.address.clone(),
                date: request.date,
                time: request.time.clone(),
                notes,
                selected_options,
            }
        }
        None => NewBooking {
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            service_id: None,
            service_name: None,
            base_price: None,
            total_price: None,
            city: request.city.clone(),
            address: request.address.clone(),
            date: request.date,
            time: request.time.clone(),
            notes: enrich_notes(None, &[], request.notes.as_deref()),
            selected_options: serde_json::json!([]),
        },
    };

    queries::insert_booking(pool, &booking)
        .await
        .map_err(|e| BookingError::SubmissionFailed {
            message: e.to_string(),
        })
}

/// How the request referenced a configured service, if it did
fn service_reference(request: &SubmitBookingRequest) -> Option<String> {
    match (&request.service_slug, request.service_id) {
        (Some(slug), _) if !slug.trim().is_empty() => Some(slug.clone()),
        (_, Some(id)) => Some(id.to_string()),
        _ => None,
    }
}

/// Load the referenced catalog, by slug or by id
async fn resolve_catalog(
    pool: &PgPool,
    cache: &AppCache,
    request: &SubmitBookingRequest,
) -> Result<std::sync::Arc<crate::models::ServiceCatalog>, AppError> {
    match &request.service_slug {
        Some(slug) if !slug.trim().is_empty() => catalog::load_catalog(pool, cache, slug).await,
        _ => {
            let id = request.service_id.ok_or(AppError::NotFound)?;
            let service = catalog::queries::service_by_id(pool, id).await?;
            catalog::load_catalog(pool, cache, &service.slug).await
        }
    }
}

/// Staff-facing notes line: requested service, option summary, then the
/// visitor's own notes, separated by " | "
fn enrich_notes(
    service_name: Option<&str>,
    option_summaries: &[String],
    visitor_notes: Option<&str>,
) -> Option<String> {
    let mut parts = Vec::new();

    if let Some(name) = service_name {
        parts.push(format!("Service demandé: {name}"));
    }
    if !option_summaries.is_empty() {
        parts.push(format!("Options: {}", option_summaries.join(" | ")));
    }
    if let Some(notes) = visitor_notes {
        if !notes.trim().is_empty() {
            parts.push(notes.trim().to_string());
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_error_display() {
        let err = BookingError::ServiceNotFound {
            reference: "nettoyage-auto".to_string(),
        };
        assert!(err.to_string().contains("nettoyage-auto"));

        let err = BookingError::ValidationBlocked {
            missing: vec!["Type de véhicule".to_string()],
        };
        assert!(err.to_string().contains("Type de véhicule"));

        let err = BookingError::ConfigurationInconsistency {
            options: vec!["Surface".to_string()],
        };
        assert!(err.to_string().contains("Surface"));
    }

    #[test]
    fn test_enrich_notes_composition() {
        let notes = enrich_notes(
            Some("Nettoyage auto"),
            &["Type de véhicule: SUV".to_string()],
            Some("Accès par la cour"),
        );
        assert_eq!(
            notes.as_deref(),
            Some("Service demandé: Nettoyage auto | Options: Type de véhicule: SUV | Accès par la cour")
        );
    }

    #[test]
    fn test_enrich_notes_empty_inputs() {
        assert_eq!(enrich_notes(None, &[], None), None);
        assert_eq!(enrich_notes(None, &[], Some("  ")), None);
        assert_eq!(
            enrich_notes(None, &[], Some("Juste un devis")).as_deref(),
            Some("Juste un devis")
        );
    }
}
