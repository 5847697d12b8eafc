//! Guarded, atomic status changes.
//!
//! [`StatusService`] is the composition every stateful business operation
//! repeats: check the transition against the entity kind's table, persist
//! the change inside a unit of work, report the outcome. The executor and
//! the guard stay independent; the service only wires them together.

use crate::core::{InvalidStateTransition, State, TransitionGuard, TransitionRequest};
use crate::report::{OutcomeContext, OutcomeReporter};
use crate::unit_of_work::{Executor, Session};

const COMPONENT: &str = "stategate";

/// Executor, guard and reporter for one entity kind.
///
/// # Example
///
/// ```rust
/// use stategate::core::{TransitionGuard, TransitionRequest, TransitionTable};
/// use stategate::service::StatusService;
/// use stategate::unit_of_work::{Executor, MemorySession};
///
/// let s = |label: &str| label.to_string();
/// let executor = Executor::default();
/// let guard = TransitionGuard::new(
///     TransitionTable::new().allow(s("ABIERTA"), [s("CERRADA")]),
/// );
/// let service = StatusService::new(&executor, &guard, ());
///
/// let mut session = MemorySession::new();
/// let request = TransitionRequest::new("Caja", 1, s("ABIERTA"), s("CERRADA"));
/// let result: Result<(), stategate::Error> =
///     service.change_status(&mut session, &request, |session, to| {
///         session.put("caja:1", to.as_str());
///         Ok(())
///     });
///
/// assert!(result.is_ok());
/// assert_eq!(session.committed("caja:1"), Some("CERRADA"));
/// ```
pub struct StatusService<'a, S: State, R: OutcomeReporter> {
    executor: &'a Executor,
    guard: &'a TransitionGuard<S>,
    reporter: R,
    caller: Option<String>,
}

impl<'a, S: State, R: OutcomeReporter> StatusService<'a, S, R> {
    pub fn new(executor: &'a Executor, guard: &'a TransitionGuard<S>, reporter: R) -> Self {
        Self {
            executor,
            guard,
            reporter,
            caller: None,
        }
    }

    /// Identity recorded in every reported outcome.
    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    pub fn guard(&self) -> &TransitionGuard<S> {
        self.guard
    }

    /// Validate `request`, then run `apply` inside a unit of work.
    ///
    /// The guard runs before the unit of work opens, so a rejected
    /// transition is reported as a warning and never retried. `apply`
    /// receives the session and the target state.
    pub fn change_status<Sess, T, E, F>(
        &self,
        session: &mut Sess,
        request: &TransitionRequest<S>,
        mut apply: F,
    ) -> Result<T, E>
    where
        Sess: Session,
        E: From<Sess::Error> + From<InvalidStateTransition> + std::error::Error + 'static,
        F: FnMut(&mut Sess, &S) -> Result<T, E>,
    {
        let context = self.context_for(request);

        if let Err(rejection) = self.guard.check(request) {
            self.reporter.log_warning(&rejection.to_string(), &context);
            return Err(rejection.into());
        }

        match self
            .executor
            .run(session, |session| apply(session, &request.to))
        {
            Ok(value) => {
                self.reporter.log_success(
                    &format!(
                        "{} {} pasó de {} a {}",
                        request.entity_kind,
                        request.entity_id,
                        request.from.name(),
                        request.to.name()
                    ),
                    &context,
                );
                Ok(value)
            }
            Err(err) => {
                self.reporter.log_error(
                    &format!(
                        "{} {} no pudo pasar de {} a {}",
                        request.entity_kind,
                        request.entity_id,
                        request.from.name(),
                        request.to.name()
                    ),
                    &context,
                    Some(&err),
                );
                Err(err)
            }
        }
    }

    fn context_for(&self, request: &TransitionRequest<S>) -> OutcomeContext {
        let context = OutcomeContext::new()
            .with("entity_kind", request.entity_kind.as_str())
            .with("entity_id", request.entity_id.as_str())
            .with("from", request.from.name())
            .with("to", request.to.name())
            .with_component(COMPONENT)
            .with_timestamp();

        match &self.caller {
            Some(caller) => context.with_caller(caller.as_str()),
            None => context,
        }
    }
}
