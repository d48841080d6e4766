//! Per-session selection state for a configurable service.
//!
//! One entry per option the visitor has chosen a value for. The state lives
//! only for the duration of one configuration flow; it is never persisted
//! and is always passed explicitly into the pure pricing functions.

use std::collections::BTreeMap;

use crate::models::ServiceOption;

/// Mapping from option id to the chosen choice id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    chosen: BTreeMap<i64, i64>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial state for a freshly loaded catalog: every required option
    /// with at least one choice gets its first choice (by display order).
    /// Non-required options start unset, as does a required option whose
    /// choice list is empty (that case blocks submission elsewhere).
    pub fn seeded(options: &[ServiceOption]) -> Self {
        let mut state = Self::new();
        for option in options {
            if option.is_required() {
                if let Some(first) = option.choices.first() {
                    state.chosen.insert(option.id(), first.id);
                }
            }
        }
        state
    }

    /// Overwrite the entry for exactly one option
    pub fn set(&mut self, option_id: i64, choice_id: i64) {
        self.chosen.insert(option_id, choice_id);
    }

    /// Unset one option (the "none" choice of a non-required dropdown)
    pub fn clear(&mut self, option_id: i64) {
        self.chosen.remove(&option_id);
    }

    pub fn get(&self, option_id: i64) -> Option<i64> {
        self.chosen.get(&option_id).copied()
    }

    pub fn contains(&self, option_id: i64) -> bool {
        self.chosen.contains_key(&option_id)
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    /// Entries as (option_id, choice_id) pairs
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.chosen.iter().map(|(&option_id, &choice_id)| (option_id, choice_id))
    }
}

impl FromIterator<(i64, i64)> for Selections {
    fn from_iter<T: IntoIterator<Item = (i64, i64)>>(iter: T) -> Self {
        Self {
            chosen: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::test_fixtures::{choice, option};

    #[test]
    fn test_seeded_picks_first_choice_of_required_options() {
        let options = vec![
            option(1, "Type de véhicule", true, vec![choice(10, "Berline", "0"), choice(11, "SUV", "15")]),
            option(2, "Parfum", false, vec![choice(20, "Citron", "0")]),
        ];

        let state = Selections::seeded(&options);

        assert_eq!(state.get(1), Some(10));
        assert_eq!(state.get(2), None);
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_seeded_skips_required_option_without_choices() {
        let options = vec![option(1, "Surface", true, vec![])];

        let state = Selections::seeded(&options);

        assert!(state.is_empty());
        assert!(!state.contains(1));
    }

    #[test]
    fn test_set_overwrites_single_entry_without_side_effects() {
        let options = vec![
            option(1, "Type de véhicule", true, vec![choice(10, "Berline", "0"), choice(11, "SUV", "15")]),
            option(2, "Finition", true, vec![choice(20, "Standard", "0")]),
        ];
        let mut state = Selections::seeded(&options);

        state.set(1, 11);

        assert_eq!(state.get(1), Some(11));
        assert_eq!(state.get(2), Some(20));
    }

    #[test]
    fn test_clear_unsets_one_option() {
        let mut state = Selections::new();
        state.set(1, 10);
        state.set(2, 20);

        state.clear(1);

        assert_eq!(state.get(1), None);
        assert_eq!(state.get(2), Some(20));
    }
}
