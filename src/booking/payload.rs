//! Eligibility gate and booking payload assembly.
//!
//! `can_submit` decides whether a configuration is complete; `build_payload`
//! snapshots the resolved selections into the immutable option lines stored
//! on the booking row.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::ServiceOption;

use super::selection::Selections;

/// Resolved snapshot of one selected option, written once into
/// `bookings.selected_options` and never mutated afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub option_id: i64,
    pub option_name: String,
    pub choice_id: i64,
    pub choice_label: String,
    pub price_modifier: Decimal,
}

/// True iff every required option has a selection entry. Optional options
/// never block submission.
pub fn can_submit(options: &[ServiceOption], selections: &Selections) -> bool {
    options
        .iter()
        .filter(|o| o.is_required())
        .all(|o| selections.contains(o.id()))
}

/// Required options still waiting for a selection (names for the inline
/// "please select" message)
pub fn missing_required<'a>(
    options: &'a [ServiceOption],
    selections: &Selections,
) -> Vec<&'a ServiceOption> {
    options
        .iter()
        .filter(|o| o.is_required() && !selections.contains(o.id()))
        .collect()
}

/// Required options with an empty choice list. These make submission
/// permanently impossible until the back-office adds choices - a data-entry
/// defect on the admin side, surfaced separately from a missing selection.
pub fn misconfigured_required(options: &[ServiceOption]) -> Vec<&ServiceOption> {
    options
        .iter()
        .filter(|o| o.is_required() && o.choices.is_empty())
        .collect()
}

/// Resolve every selection entry into an option line. Entries whose option
/// or choice no longer exists in the catalog are dropped whole - never
/// emitted with null fields.
pub fn build_payload(options: &[ServiceOption], selections: &Selections) -> Vec<SelectedOption> {
    let mut lines = Vec::new();

    for (option_id, choice_id) in selections.iter() {
        let Some(option) = options.iter().find(|o| o.id() == option_id) else {
            continue;
        };
        let Some(choice) = option.find_choice(choice_id) else {
            continue;
        };
        lines.push(SelectedOption {
            option_id,
            option_name: option.name().to_string(),
            choice_id,
            choice_label: choice.label.clone(),
            price_modifier: choice.modifier(),
        });
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::test_fixtures::{choice, option};
    use rust_decimal_macros::dec;

    #[test]
    fn test_can_submit_false_until_required_selected() {
        // base 59.00 service, one required option, nothing picked
        let options = vec![option(
            1,
            "Fréquence",
            true,
            vec![choice(10, "Ponctuel", "0"), choice(11, "Hebdomadaire", "-5")],
        )];
        let mut state = Selections::new();

        assert!(!can_submit(&options, &state));
        assert_eq!(missing_required(&options, &state).len(), 1);

        state.set(1, 11);
        assert!(can_submit(&options, &state));
        assert!(missing_required(&options, &state).is_empty());
    }

    #[test]
    fn test_optional_options_never_block() {
        let options = vec![
            option(1, "Fréquence", true, vec![choice(10, "Ponctuel", "0")]),
            option(2, "Parfum", false, vec![choice(20, "Citron", "0")]),
        ];
        let state = Selections::seeded(&options);

        assert!(can_submit(&options, &state));
    }

    #[test]
    fn test_required_option_without_choices_blocks_permanently() {
        let options = vec![option(1, "Surface", true, vec![])];
        let state = Selections::seeded(&options);

        assert!(!can_submit(&options, &state));
        let broken = misconfigured_required(&options);
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].name(), "Surface");
    }

    #[test]
    fn test_build_payload_resolves_labels_and_modifiers() {
        let options = vec![option(
            1,
            "Type de véhicule",
            true,
            vec![choice(10, "Berline", "0"), choice(11, "SUV", "15")],
        )];
        let mut state = Selections::seeded(&options);
        state.set(1, 11);

        let lines = build_payload(&options, &state);

        assert_eq!(
            lines,
            vec![SelectedOption {
                option_id: 1,
                option_name: "Type de véhicule".to_string(),
                choice_id: 11,
                choice_label: "SUV".to_string(),
                price_modifier: dec!(15),
            }]
        );
    }

    #[test]
    fn test_build_payload_drops_stale_entries() {
        let options = vec![option(1, "Formule", true, vec![choice(10, "Éco", "-5")])];
        let mut state = Selections::new();
        state.set(1, 10);
        state.set(1, 10);
        state.set(99, 3); // option no longer in the catalog
        let mut with_stale_choice = state.clone();
        with_stale_choice.set(1, 999); // choice no longer in the catalog

        assert_eq!(build_payload(&options, &state).len(), 1);
        assert!(build_payload(&options, &with_stale_choice).is_empty());
    }
}
