//! Batch validation of transition requests.
//!
//! Bulk operations (approving a page of quotes, dispatching every delivery
//! on a route) want to know about ALL rejected requests, not just the first.
//! [`enforce_all`] accumulates every violation with Stillwater's
//! `Validation` instead of failing fast.
//!
//! # Example
//!
//! ```rust
//! use stategate::core::{TransitionGuard, TransitionRequest, TransitionTable};
//! use stategate::enforcement::{enforce_all, violations};
//!
//! let s = |label: &str| label.to_string();
//! let guard = TransitionGuard::new(
//!     TransitionTable::new().allow(s("PENDIENTE"), [s("APROBADA")]),
//! );
//! let requests = vec![
//!     TransitionRequest::new("Proforma", 1, s("PENDIENTE"), s("APROBADA")),
//!     TransitionRequest::new("Proforma", 2, s("APROBADA"), s("PENDIENTE")),
//!     TransitionRequest::new("Proforma", 3, s("RECHAZADA"), s("APROBADA")),
//! ];
//!
//! let result = enforce_all(&guard, &requests);
//! assert!(result.is_failure());
//! assert_eq!(violations(&result).len(), 2);
//! ```

use crate::core::{InvalidStateTransition, State, TransitionGuard, TransitionRequest};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Accumulated outcome of a batch check.
pub type BatchValidation = Validation<(), NonEmptyVec<InvalidStateTransition>>;

/// Check every request, accumulating ALL rejections.
/// An empty batch succeeds.
pub fn enforce_all<'r, S, I>(guard: &TransitionGuard<S>, requests: I) -> BatchValidation
where
    S: State + 'r,
    I: IntoIterator<Item = &'r TransitionRequest<S>>,
{
    let checks: Vec<BatchValidation> = requests
        .into_iter()
        .map(|request| match guard.check(request) {
            Ok(()) => Validation::success(()),
            Err(rejection) => Validation::fail(rejection),
        })
        .collect();

    Validation::all_vec(checks).map(|_| ())
}

/// Rejections carried by a batch result, in request order.
pub fn violations(result: &BatchValidation) -> Vec<InvalidStateTransition> {
    match result {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}

/// Collapse a batch result into a fail-fast `Result` carrying the first
/// rejection.
pub fn first_violation(result: &BatchValidation) -> Result<(), InvalidStateTransition> {
    match result {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => match errors.iter().next() {
            Some(rejection) => Err(rejection.clone()),
            None => Ok(()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_enum;
    use crate::transition_table;

    state_enum! {
        enum DeliveryState {
            Programada = "PROGRAMADA",
            EnRuta = "EN_RUTA",
            Entregada = "ENTREGADA",
            Devuelta = "DEVUELTA",
        }
    }

    use DeliveryState::*;

    fn guard() -> TransitionGuard<DeliveryState> {
        TransitionGuard::new(transition_table! {
            Programada => [EnRuta],
            EnRuta => [Entregada, Devuelta],
            Entregada => [],
            Devuelta => [Programada],
        })
    }

    #[test]
    fn all_legal_requests_succeed() {
        let requests = vec![
            TransitionRequest::new("Entrega", 1, Programada, EnRuta),
            TransitionRequest::new("Entrega", 2, EnRuta, Entregada),
        ];

        assert!(enforce_all(&guard(), &requests).is_success());
    }

    #[test]
    fn every_violation_is_reported() {
        let requests = vec![
            TransitionRequest::new("Entrega", 1, Programada, Entregada),
            TransitionRequest::new("Entrega", 2, EnRuta, Entregada),
            TransitionRequest::new("Entrega", 3, Entregada, EnRuta),
        ];

        let result = enforce_all(&guard(), &requests);
        assert!(result.is_failure());

        let rejected = violations(&result);
        let ids: Vec<_> = rejected.iter().map(|v| v.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(rejected[1].allowed, Vec::<String>::new());
    }

    #[test]
    fn first_violation_is_the_earliest_rejected_request() {
        let requests = vec![
            TransitionRequest::new("Entrega", 1, Programada, EnRuta),
            TransitionRequest::new("Entrega", 2, Devuelta, Entregada),
            TransitionRequest::new("Entrega", 3, Entregada, Programada),
        ];

        let rejection = first_violation(&enforce_all(&guard(), &requests)).unwrap_err();
        assert_eq!(rejection.entity_id, "2");
        assert_eq!(rejection.allowed, vec!["PROGRAMADA".to_string()]);
    }

    #[test]
    fn empty_batch_succeeds() {
        let requests: Vec<TransitionRequest<DeliveryState>> = Vec::new();
        let result = enforce_all(&guard(), &requests);

        assert!(result.is_success());
        assert!(violations(&result).is_empty());
        assert!(first_violation(&result).is_ok());
    }

    #[test]
    fn unconfigured_guard_rejects_whole_batch() {
        let requests = vec![
            TransitionRequest::new("Entrega", 1, Programada, EnRuta),
            TransitionRequest::new("Entrega", 2, Devuelta, Programada),
        ];

        let result = enforce_all(&TransitionGuard::unconfigured(), &requests);
        assert_eq!(violations(&result).len(), 2);
    }
}
