//! Transition rejection error.

use thiserror::Error;

/// A status change that the entity kind's transition table does not permit.
///
/// Carries everything a caller needs to tell the user what went wrong,
/// including the destinations that would have been legal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{entity_kind} {entity_id} no puede pasar de {from} a {to}. Estados permitidos: {}", list_states(.allowed))]
pub struct InvalidStateTransition {
    pub entity_kind: String,
    pub entity_id: String,
    pub from: String,
    pub to: String,
    pub allowed: Vec<String>,
}

/// Comma separated state names, or `ninguno` when there are none.
pub(crate) fn list_states(states: &[String]) -> String {
    if states.is_empty() {
        "ninguno".to_string()
    } else {
        states.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_names_entity_and_alternatives() {
        let err = InvalidStateTransition {
            entity_kind: "Proforma".to_string(),
            entity_id: "123".to_string(),
            from: "PENDIENTE".to_string(),
            to: "CONVERTIDA".to_string(),
            allowed: vec!["APROBADA".to_string(), "RECHAZADA".to_string()],
        };

        assert_eq!(
            err.to_string(),
            "Proforma 123 no puede pasar de PENDIENTE a CONVERTIDA. Estados permitidos: APROBADA, RECHAZADA"
        );
    }

    #[test]
    fn empty_alternatives_read_as_none() {
        let err = InvalidStateTransition {
            entity_kind: "Ruta".to_string(),
            entity_id: "7".to_string(),
            from: "FINALIZADA".to_string(),
            to: "EN_CURSO".to_string(),
            allowed: Vec::new(),
        };

        assert!(err.to_string().ends_with("Estados permitidos: ninguno"));
    }
}
