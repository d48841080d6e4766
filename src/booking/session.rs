//! Configuration session state machine.
//!
//! One session tracks a visitor configuring a single service, from catalog
//! load to submission. The session is an explicit value object threaded
//! through handlers; every mutation re-derives eligibility synchronously,
//! so the submit gate can never be observed stale within a session.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::models::ServiceCatalog;

use super::payload::{self, SelectedOption};
use super::pricing;
use super::selection::Selections;

/// Session lifecycle.
///
/// `Ready` is the freshly seeded state and already implies eligibility; a
/// catalog whose required options cannot be satisfied starts out `Blocked`
/// instead. Any selection change passes through `Configuring` and settles
/// on `Submittable` or `Blocked`. `NotFound` and `Submitted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Loading,
    NotFound,
    Ready,
    Configuring,
    Submittable,
    Blocked,
    Submitted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Loading => "loading",
            SessionState::NotFound => "not_found",
            SessionState::Ready => "ready",
            SessionState::Configuring => "configuring",
            SessionState::Submittable => "submittable",
            SessionState::Blocked => "blocked",
            SessionState::Submitted => "submitted",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, SessionState::NotFound | SessionState::Submitted)
    }
}

/// One visitor's configuration flow for one service
#[derive(Debug, Clone)]
pub struct ConfigSession {
    state: SessionState,
    catalog: Option<Arc<ServiceCatalog>>,
    selections: Selections,
}

impl ConfigSession {
    /// New session waiting for its catalog
    pub fn begin() -> Self {
        Self {
            state: SessionState::Loading,
            catalog: None,
            selections: Selections::new(),
        }
    }

    /// Catalog fetch found no service; terminal for this session
    pub fn not_found(&mut self) {
        if self.state == SessionState::Loading {
            self.state = SessionState::NotFound;
        }
    }

    /// Catalog arrived: seed required defaults and derive the initial state
    pub fn catalog_loaded(&mut self, catalog: Arc<ServiceCatalog>) {
        if self.state != SessionState::Loading {
            return;
        }
        self.selections = Selections::seeded(&catalog.options);
        self.catalog = Some(catalog);
        self.state = if self.eligible() {
            SessionState::Ready
        } else {
            SessionState::Blocked
        };
    }

    /// Select one choice; other options are untouched
    pub fn select(&mut self, option_id: i64, choice_id: i64) {
        if self.state.is_terminal() || self.catalog.is_none() {
            return;
        }
        self.selections.set(option_id, choice_id);
        self.reevaluate();
    }

    /// Unset one option (the "none" entry of a non-required dropdown)
    pub fn unselect(&mut self, option_id: i64) {
        if self.state.is_terminal() || self.catalog.is_none() {
            return;
        }
        self.selections.clear(option_id);
        self.reevaluate();
    }

    fn reevaluate(&mut self) {
        self.state = SessionState::Configuring;
        self.state = if self.eligible() {
            SessionState::Submittable
        } else {
            SessionState::Blocked
        };
    }

    fn eligible(&self) -> bool {
        match &self.catalog {
            Some(catalog) => payload::can_submit(&catalog.options, &self.selections),
            None => false,
        }
    }

    /// The remote write succeeded; the session is finished
    pub fn submit_succeeded(&mut self) {
        if self.can_submit() {
            self.state = SessionState::Submitted;
        }
    }

    /// The remote write failed; selections and state are preserved so the
    /// visitor can retry without reconfiguring
    pub fn submit_failed(&mut self) {}

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.state, SessionState::Ready | SessionState::Submittable)
    }

    pub fn catalog(&self) -> Option<&ServiceCatalog> {
        self.catalog.as_deref()
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    /// Current derived total, recomputed from scratch
    pub fn total(&self) -> Decimal {
        match &self.catalog {
            Some(catalog) => pricing::compute_total(
                catalog.service.base_price,
                &catalog.options,
                &self.selections,
            ),
            None => Decimal::ZERO,
        }
    }

    /// Resolved option lines for the booking payload
    pub fn payload(&self) -> Vec<SelectedOption> {
        match &self.catalog {
            Some(catalog) => payload::build_payload(&catalog.options, &self.selections),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::test_fixtures::{catalog, choice, option};
    use rust_decimal_macros::dec;

    fn vehicle_catalog() -> Arc<ServiceCatalog> {
        Arc::new(catalog(
            "39.00",
            vec![option(
                1,
                "Type de véhicule",
                true,
                vec![choice(10, "Berline", "0"), choice(11, "SUV", "15")],
            )],
        ))
    }

    #[test]
    fn test_not_found_is_terminal() {
        let mut session = ConfigSession::begin();
        session.not_found();

        assert_eq!(session.state(), SessionState::NotFound);

        session.select(1, 10);
        assert_eq!(session.state(), SessionState::NotFound);
    }

    #[test]
    fn test_loaded_catalog_is_ready_and_submittable() {
        let mut session = ConfigSession::begin();
        session.catalog_loaded(vehicle_catalog());

        assert_eq!(session.state(), SessionState::Ready);
        assert!(session.can_submit());
        assert_eq!(session.total(), dec!(39.00));
    }

    #[test]
    fn test_selection_change_reevaluates_total_and_state() {
        let mut session = ConfigSession::begin();
        session.catalog_loaded(vehicle_catalog());

        session.select(1, 11);
        assert_eq!(session.state(), SessionState::Submittable);
        assert_eq!(session.total(), dec!(54.00));

        session.select(1, 10);
        assert_eq!(session.total(), dec!(39.00));
    }

    #[test]
    fn test_unselecting_required_option_blocks() {
        let mut session = ConfigSession::begin();
        session.catalog_loaded(vehicle_catalog());

        session.unselect(1);
        assert_eq!(session.state(), SessionState::Blocked);
        assert!(!session.can_submit());

        session.select(1, 10);
        assert_eq!(session.state(), SessionState::Submittable);
    }

    #[test]
    fn test_required_option_without_choices_starts_blocked() {
        let mut session = ConfigSession::begin();
        session.catalog_loaded(Arc::new(catalog(
            "59.00",
            vec![option(1, "Surface", true, vec![])],
        )));

        assert_eq!(session.state(), SessionState::Blocked);
        assert!(!session.can_submit());
    }

    #[test]
    fn test_submit_lifecycle() {
        let mut session = ConfigSession::begin();
        session.catalog_loaded(vehicle_catalog());
        session.select(1, 11);

        session.submit_failed();
        assert_eq!(session.state(), SessionState::Submittable);
        assert_eq!(session.payload().len(), 1);

        session.submit_succeeded();
        assert_eq!(session.state(), SessionState::Submitted);

        // terminal: further edits are ignored
        session.select(1, 10);
        assert_eq!(session.state(), SessionState::Submitted);
    }

    #[test]
    fn test_blocked_session_cannot_submit() {
        let mut session = ConfigSession::begin();
        session.catalog_loaded(vehicle_catalog());
        session.unselect(1);

        session.submit_succeeded();
        assert_eq!(session.state(), SessionState::Blocked);
    }
}
