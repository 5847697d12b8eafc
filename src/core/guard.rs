//! Table-driven guard for status transitions.
//!
//! The guard is stateless: it answers questions about one entity kind's
//! transition table and never mutates anything. One implementation serves
//! every entity kind; callers supply the table.

use super::error::{list_states, InvalidStateTransition};
use super::request::TransitionRequest;
use super::state::State;
use super::table::TransitionTable;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Non-throwing verdict for a proposed transition, for UI hints and
/// diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDescription {
    pub valid: bool,
    pub message: String,
}

/// Validates status changes for one entity kind against its table.
///
/// A guard built from an empty table, or with [`TransitionGuard::unconfigured`],
/// rejects every transition.
///
/// # Example
///
/// ```rust
/// use stategate::core::{TransitionGuard, TransitionTable};
///
/// let s = |label: &str| label.to_string();
/// let guard = TransitionGuard::new(
///     TransitionTable::new()
///         .allow(s("PENDIENTE"), [s("APROBADA"), s("RECHAZADA")])
///         .allow(s("APROBADA"), [s("CONVERTIDA"), s("RECHAZADA")]),
/// );
///
/// assert!(guard.is_transition_allowed(&s("PENDIENTE"), &s("APROBADA")));
/// assert!(!guard.is_transition_allowed(&s("PENDIENTE"), &s("CONVERTIDA")));
///
/// let err = guard
///     .assert_transition_allowed(&s("PENDIENTE"), &s("CONVERTIDA"), "Proforma", 123)
///     .unwrap_err();
/// assert_eq!(err.entity_id, "123");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionGuard<S: State> {
    table: TransitionTable<S>,
}

impl<S: State> TransitionGuard<S> {
    pub fn new(table: TransitionTable<S>) -> Self {
        Self { table }
    }

    /// Guard for an entity kind with no table configured. Fails closed.
    pub fn unconfigured() -> Self {
        Self {
            table: TransitionTable::new(),
        }
    }

    pub fn table(&self) -> &TransitionTable<S> {
        &self.table
    }

    /// Configured successors of `from`; empty when `from` is unknown.
    pub fn allowed_next_states(&self, from: &S) -> &[S] {
        self.table.successors(from)
    }

    /// Self-transitions are only legal when listed explicitly.
    pub fn is_transition_allowed(&self, from: &S, to: &S) -> bool {
        self.allowed_next_states(from).contains(to)
    }

    /// Fail with [`InvalidStateTransition`] unless `from -> to` is listed.
    pub fn assert_transition_allowed(
        &self,
        from: &S,
        to: &S,
        entity_kind: &str,
        entity_id: impl Display,
    ) -> Result<(), InvalidStateTransition> {
        if self.is_transition_allowed(from, to) {
            return Ok(());
        }

        Err(InvalidStateTransition {
            entity_kind: entity_kind.to_string(),
            entity_id: entity_id.to_string(),
            from: from.name().to_string(),
            to: to.name().to_string(),
            allowed: self.allowed_names(from),
        })
    }

    /// Describe the verdict without failing.
    pub fn describe_transition(&self, from: &S, to: &S, entity_kind: &str) -> TransitionDescription {
        if self.is_transition_allowed(from, to) {
            return TransitionDescription {
                valid: true,
                message: format!(
                    "{entity_kind} puede pasar de {} a {}",
                    from.name(),
                    to.name()
                ),
            };
        }

        TransitionDescription {
            valid: false,
            message: format!(
                "{entity_kind} no puede pasar de {} a {}. Estados permitidos: {}",
                from.name(),
                to.name(),
                list_states(&self.allowed_names(from))
            ),
        }
    }

    /// [`Self::assert_transition_allowed`] for a prepared request.
    pub fn check(&self, request: &TransitionRequest<S>) -> Result<(), InvalidStateTransition> {
        self.assert_transition_allowed(
            &request.from,
            &request.to,
            &request.entity_kind,
            &request.entity_id,
        )
    }

    /// [`Self::describe_transition`] for a prepared request.
    pub fn describe(&self, request: &TransitionRequest<S>) -> TransitionDescription {
        self.describe_transition(&request.from, &request.to, &request.entity_kind)
    }

    fn allowed_names(&self, from: &S) -> Vec<String> {
        self.allowed_next_states(from)
            .iter()
            .map(|state| state.name().to_string())
            .collect()
    }
}

impl<S: State> From<TransitionTable<S>> for TransitionGuard<S> {
    fn from(table: TransitionTable<S>) -> Self {
        Self::new(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum ProformaState {
        Pendiente,
        Aprobada,
        Convertida,
        Rechazada,
    }

    impl State for ProformaState {
        fn name(&self) -> &str {
            match self {
                Self::Pendiente => "PENDIENTE",
                Self::Aprobada => "APROBADA",
                Self::Convertida => "CONVERTIDA",
                Self::Rechazada => "RECHAZADA",
            }
        }
    }

    use ProformaState::*;

    fn guard() -> TransitionGuard<ProformaState> {
        TransitionGuard::new(
            TransitionTable::new()
                .allow(Pendiente, [Aprobada, Rechazada])
                .allow(Aprobada, [Convertida, Rechazada])
                .allow(Convertida, [])
                .allow(Rechazada, []),
        )
    }

    #[test]
    fn listed_transition_is_allowed() {
        assert!(guard().is_transition_allowed(&Pendiente, &Aprobada));
    }

    #[test]
    fn unlisted_transition_is_rejected() {
        assert!(!guard().is_transition_allowed(&Pendiente, &Convertida));
    }

    #[test]
    fn self_transition_requires_listing() {
        let guard = guard();
        assert!(!guard.is_transition_allowed(&Pendiente, &Pendiente));

        let looping = TransitionGuard::new(TransitionTable::new().allow(Pendiente, [Pendiente]));
        assert!(looping.is_transition_allowed(&Pendiente, &Pendiente));
    }

    #[test]
    fn terminal_state_allows_nothing() {
        let guard = guard();
        assert!(guard.allowed_next_states(&Convertida).is_empty());
        assert!(!guard.is_transition_allowed(&Convertida, &Pendiente));
    }

    #[test]
    fn unconfigured_guard_fails_closed() {
        let guard = TransitionGuard::<ProformaState>::unconfigured();
        for from in [Pendiente, Aprobada, Convertida, Rechazada] {
            for to in [Pendiente, Aprobada, Convertida, Rechazada] {
                assert!(!guard.is_transition_allowed(&from, &to));
            }
        }
    }

    #[test]
    fn assert_reports_entity_and_states() {
        let err = guard()
            .assert_transition_allowed(&Pendiente, &Convertida, "Proforma", 123)
            .unwrap_err();

        assert_eq!(err.entity_kind, "Proforma");
        assert_eq!(err.entity_id, "123");
        assert_eq!(err.from, "PENDIENTE");
        assert_eq!(err.to, "CONVERTIDA");
        assert_eq!(err.allowed, vec!["APROBADA", "RECHAZADA"]);
    }

    #[test]
    fn assert_passes_for_legal_transition() {
        assert!(guard()
            .assert_transition_allowed(&Aprobada, &Convertida, "Proforma", 1)
            .is_ok());
    }

    #[test]
    fn describe_invalid_lists_alternatives() {
        let description = guard().describe_transition(&Aprobada, &Pendiente, "Proforma");

        assert!(!description.valid);
        assert_eq!(
            description.message,
            "Proforma no puede pasar de APROBADA a PENDIENTE. Estados permitidos: CONVERTIDA, RECHAZADA"
        );
    }

    #[test]
    fn describe_terminal_says_none() {
        let description = guard().describe_transition(&Rechazada, &Aprobada, "Proforma");

        assert!(!description.valid);
        assert!(description.message.ends_with("Estados permitidos: ninguno"));
    }

    #[test]
    fn describe_valid_transition() {
        let description = guard().describe_transition(&Pendiente, &Aprobada, "Proforma");

        assert!(description.valid);
        assert_eq!(description.message, "Proforma puede pasar de PENDIENTE a APROBADA");
    }

    #[test]
    fn describe_is_deterministic() {
        let guard = guard();
        let first = guard.describe_transition(&Aprobada, &Pendiente, "Proforma");
        let second = guard.describe_transition(&Aprobada, &Pendiente, "Proforma");

        assert_eq!(first, second);
    }

    #[test]
    fn request_helpers_match_direct_calls() {
        let guard = guard();
        let request = TransitionRequest::new("Proforma", 9, Aprobada, Pendiente);

        assert_eq!(
            guard.check(&request),
            guard.assert_transition_allowed(&Aprobada, &Pendiente, "Proforma", 9)
        );
        assert_eq!(
            guard.describe(&request),
            guard.describe_transition(&Aprobada, &Pendiente, "Proforma")
        );
    }
}
