//! Price derivation for configured services.
//!
//! Pure functions only - no database access, no shared state. The total is
//! always recomputed from the catalog and the current selection; it is never
//! cached anywhere it could drift from its inputs.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::ServiceOption;

use super::selection::Selections;

/// Round to specified decimal places using banker's rounding
/// (ROUND_HALF_EVEN). Applied at presentation time only; internal
/// accumulation stays exact.
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Derive the total price: base price plus the signed modifier of each
/// selected choice.
///
/// Missing base prices and modifiers count as zero. Selection entries whose
/// option or choice no longer exists in the catalog contribute nothing: the
/// catalog is only eventually consistent with back-office edits, and a
/// stale selection must never fail the computation.
pub fn compute_total(
    base_price: Option<Decimal>,
    options: &[ServiceOption],
    selections: &Selections,
) -> Decimal {
    let mut total = base_price.unwrap_or(Decimal::ZERO);

    for (option_id, choice_id) in selections.iter() {
        let Some(option) = options.iter().find(|o| o.id() == option_id) else {
            continue;
        };
        if let Some(choice) = option.find_choice(choice_id) {
            total += choice.modifier();
        }
    }

    total
}

/// One line of a price breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceLine {
    /// "Option name: choice label"
    pub label: String,
    pub amount: Decimal,
}

/// Breakdown lines for the currently selected choices, in option iteration
/// order. Choices with a zero modifier are not shown as adjustments; stale
/// entries are skipped.
pub fn price_breakdown(options: &[ServiceOption], selections: &Selections) -> Vec<PriceLine> {
    let mut lines = Vec::new();

    for (option_id, choice_id) in selections.iter() {
        let Some(option) = options.iter().find(|o| o.id() == option_id) else {
            continue;
        };
        let Some(choice) = option.find_choice(choice_id) else {
            continue;
        };
        let modifier = choice.modifier();
        if modifier != Decimal::ZERO {
            lines.push(PriceLine {
                label: format!("{}: {}", option.name(), choice.label),
                amount: modifier,
            });
        }
    }

    lines
}

/// Two-decimal display form of an amount ("39.00")
pub fn format_money(amount: Decimal) -> String {
    format!("{:.2}", round_money(amount, 2))
}

/// "+15.00" / "-5.00" style label for a signed modifier
pub fn signed_amount(amount: Decimal) -> String {
    let rounded = round_money(amount, 2);
    if rounded > Decimal::ZERO {
        format!("+{rounded:.2}")
    } else {
        format!("{rounded:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::test_fixtures::{choice, option, unpriced_choice};
    use rust_decimal_macros::dec;

    // ==================== compute_total tests ====================

    #[test]
    fn test_default_selection_keeps_base_price() {
        // base 39.00, required "Type de véhicule" seeded with Berline (+0)
        let options = vec![option(
            1,
            "Type de véhicule",
            true,
            vec![choice(10, "Berline", "0"), choice(11, "SUV", "15")],
        )];
        let state = Selections::seeded(&options);

        assert_eq!(compute_total(Some(dec!(39.00)), &options, &state), dec!(39.00));
    }

    #[test]
    fn test_selecting_and_reverting_is_drift_free() {
        let options = vec![option(
            1,
            "Type de véhicule",
            true,
            vec![choice(10, "Berline", "0"), choice(11, "SUV", "15")],
        )];
        let mut state = Selections::seeded(&options);

        state.set(1, 11);
        assert_eq!(compute_total(Some(dec!(39.00)), &options, &state), dec!(54.00));

        state.set(1, 10);
        assert_eq!(compute_total(Some(dec!(39.00)), &options, &state), dec!(39.00));
    }

    #[test]
    fn test_negative_and_positive_modifiers_combine() {
        let options = vec![
            option(1, "Formule", true, vec![choice(10, "Éco", "-5.00")]),
            option(2, "Supplément", true, vec![choice(20, "Vitres", "10.00")]),
        ];
        let mut state = Selections::new();
        state.set(1, 10);
        state.set(2, 20);

        assert_eq!(compute_total(Some(dec!(50.00)), &options, &state), dec!(55.00));
    }

    #[test]
    fn test_missing_base_price_counts_as_zero() {
        let options = vec![option(1, "Formule", true, vec![choice(10, "Standard", "12.50")])];
        let mut state = Selections::new();
        state.set(1, 10);

        assert_eq!(compute_total(None, &options, &state), dec!(12.50));
    }

    #[test]
    fn test_null_modifier_counts_as_zero() {
        let options = vec![option(1, "Formule", true, vec![unpriced_choice(10, "Standard")])];
        let mut state = Selections::new();
        state.set(1, 10);

        assert_eq!(compute_total(Some(dec!(80.00)), &options, &state), dec!(80.00));
    }

    #[test]
    fn test_stale_entries_are_ignored() {
        let options = vec![option(
            1,
            "Type de véhicule",
            true,
            vec![choice(10, "Berline", "0")],
        )];
        let mut state = Selections::new();
        state.set(1, 999); // choice removed from the catalog
        state.set(42, 7); // option removed from the catalog

        assert_eq!(compute_total(Some(dec!(39.00)), &options, &state), dec!(39.00));
    }

    #[test]
    fn test_total_is_idempotent() {
        let options = vec![option(
            1,
            "Type de véhicule",
            true,
            vec![choice(10, "Berline", "0"), choice(11, "SUV", "15")],
        )];
        let mut state = Selections::seeded(&options);
        state.set(1, 11);

        let first = compute_total(Some(dec!(39.00)), &options, &state);
        let second = compute_total(Some(dec!(39.00)), &options, &state);
        assert_eq!(first, second);
    }

    #[test]
    fn test_total_is_independent_of_entry_order() {
        let options = vec![
            option(1, "Formule", true, vec![choice(10, "Éco", "-5.00")]),
            option(2, "Supplément", true, vec![choice(20, "Vitres", "10.00")]),
            option(3, "Fréquence", true, vec![choice(30, "Hebdo", "3.25")]),
        ];

        let forward: Selections = [(1, 10), (2, 20), (3, 30)].into_iter().collect();
        let backward: Selections = [(3, 30), (2, 20), (1, 10)].into_iter().collect();

        assert_eq!(
            compute_total(Some(dec!(50.00)), &options, &forward),
            compute_total(Some(dec!(50.00)), &options, &backward),
        );
    }

    // ==================== price_breakdown tests ====================

    #[test]
    fn test_breakdown_skips_zero_modifiers() {
        let options = vec![option(
            1,
            "Type de véhicule",
            true,
            vec![choice(10, "Berline", "0"), choice(11, "SUV", "15")],
        )];
        let seeded = Selections::seeded(&options);
        assert!(price_breakdown(&options, &seeded).is_empty());

        let mut upgraded = seeded.clone();
        upgraded.set(1, 11);
        let lines = price_breakdown(&options, &upgraded);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].label, "Type de véhicule: SUV");
        assert_eq!(lines[0].amount, dec!(15));
    }

    #[test]
    fn test_breakdown_drops_stale_entries() {
        let options = vec![option(1, "Formule", true, vec![choice(10, "Éco", "-5.00")])];
        let mut state = Selections::new();
        state.set(1, 10);
        state.set(99, 1); // stale option

        let lines = price_breakdown(&options, &state);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].amount, dec!(-5.00));
    }

    // ==================== rounding tests ====================

    #[test]
    fn test_round_money_bankers_rounding() {
        assert_eq!(round_money(dec!(2.345), 2), dec!(2.34));
        assert_eq!(round_money(dec!(2.355), 2), dec!(2.36));
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(-1.236), 2), dec!(-1.24));
    }

    #[test]
    fn test_signed_amount_formatting() {
        assert_eq!(signed_amount(dec!(15)), "+15.00");
        assert_eq!(signed_amount(dec!(-5)), "-5.00");
        assert_eq!(signed_amount(dec!(0)), "0.00");
    }

    #[test]
    fn test_format_money_pads_to_two_decimals() {
        assert_eq!(format_money(dec!(39)), "39.00");
        assert_eq!(format_money(dec!(54.5)), "54.50");
    }
}
