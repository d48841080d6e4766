//! Request DTOs for the booking API endpoints.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use super::selection::Selections;

/// Selection entries as they arrive on the wire: JSON object keys are
/// strings, so option ids come in as strings. Non-numeric keys are dropped
/// during coercion instead of failing the request.
pub type RawSelections = HashMap<String, i64>;

/// Coerce wire-format selections into the typed selection state
pub fn parse_selections(raw: &RawSelections) -> Selections {
    raw.iter()
        .filter_map(|(option_id, &choice_id)| {
            option_id.parse::<i64>().ok().map(|id| (id, choice_id))
        })
        .collect()
}

/// Request to price a configured service
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub selections: RawSelections,
}

/// Request to submit a booking.
///
/// The configured service may be referenced by slug (storefront
/// configurator) or by id (the historical booking contract); both are
/// optional because the booking form also accepts free-form requests with
/// no configured service attached.
#[derive(Debug, Deserialize)]
pub struct SubmitBookingRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub service_slug: Option<String>,
    #[serde(default)]
    pub service_id: Option<i64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub selections: RawSelections,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selections_ignores_non_numeric_keys() {
        let mut raw = RawSelections::new();
        raw.insert("1".to_string(), 10);
        raw.insert("abc".to_string(), 20);
        raw.insert("3".to_string(), 30);

        let selections = parse_selections(&raw);

        assert_eq!(selections.len(), 2);
        assert_eq!(selections.get(1), Some(10));
        assert_eq!(selections.get(3), Some(30));
    }
}
