//! Unit-of-work executor with savepoint nesting and blind retry.

use super::config::{ConfigError, ExecutorConfig};
use super::savepoint::SavepointName;
use super::session::Session;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Runs blocks of work atomically on a [`Session`].
///
/// At depth 0 a call owns a full transaction: begin, work, commit, with a
/// rollback on any failure. Inside an open transaction it opens a savepoint
/// instead, so a failing nested block only undoes its own writes before the
/// error reaches the caller.
///
/// Every failure is retried up to the attempt limit, with a random pause
/// between attempts. The error of the last attempt is returned as is.
///
/// A panic inside `work` is not retried. The scope it opened is rolled back
/// before the panic continues to unwind, so the session is left at the depth
/// it had on entry.
///
/// # Example
///
/// ```rust
/// use stategate::unit_of_work::{Executor, MemorySession, StorageError};
///
/// let executor = Executor::default();
/// let mut session = MemorySession::new();
///
/// let result: Result<(), StorageError> = executor.run(&mut session, |session| {
///     session.put("pedido:7", "DESPACHADO");
///     let inner: Result<(), StorageError> = executor.run(session, |session| {
///         session.put("ruta:3", "EN_CURSO");
///         Err(StorageError::fatal("vehicle unavailable"))
///     });
///     assert!(inner.is_err());
///     Ok(())
/// });
///
/// assert!(result.is_ok());
/// assert_eq!(session.committed("pedido:7"), Some("DESPACHADO"));
/// assert_eq!(session.committed("ruta:3"), None);
/// ```
#[derive(Clone)]
pub struct Executor {
    config: ExecutorConfig,
    sleeper: Sleeper,
}

impl Executor {
    pub fn new(config: ExecutorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            sleeper: Arc::new(std::thread::sleep),
        })
    }

    /// Replace the function used to pause between attempts.
    pub fn with_sleeper<F>(mut self, sleeper: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.sleeper = Arc::new(sleeper);
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run `work` with the configured attempt limit.
    pub fn run<S, T, E, F>(&self, session: &mut S, work: F) -> Result<T, E>
    where
        S: Session,
        E: From<S::Error>,
        F: FnMut(&mut S) -> Result<T, E>,
    {
        self.run_with_attempts(session, self.config.max_attempts, work)
    }

    /// Run `work` up to `max_attempts` times (0 counts as 1).
    pub fn run_with_attempts<S, T, E, F>(
        &self,
        session: &mut S,
        max_attempts: usize,
        mut work: F,
    ) -> Result<T, E>
    where
        S: Session,
        E: From<S::Error>,
        F: FnMut(&mut S) -> Result<T, E>,
    {
        let max_attempts = max_attempts.max(1);
        let depth = session.depth();
        let token = Uuid::new_v4();
        let mut attempt = 1;

        loop {
            tracing::debug!(attempt, max_attempts, depth, "running unit of work");

            let outcome = if depth == 0 {
                self.attempt_transaction(session, &mut work)
            } else {
                let name = SavepointName::new(token, attempt);
                self.attempt_savepoint(session, &name, &mut work)
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= max_attempts => {
                    if max_attempts > 1 {
                        tracing::warn!(attempt, depth, "unit of work failed on final attempt");
                    }
                    return Err(err);
                }
                Err(_) => {
                    let pause = self.config.jitter();
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        depth,
                        pause_ms = pause.as_millis() as u64,
                        "unit of work failed, retrying"
                    );
                    (self.sleeper)(pause);
                    attempt += 1;
                }
            }
        }
    }

    /// Run `work` with no transactional wrapping.
    ///
    /// The session is only lent immutably, so nothing inside can open a
    /// transaction or savepoint.
    pub fn run_read_only<S, T, F>(&self, session: &S, work: F) -> T
    where
        S: Session,
        F: FnOnce(&S) -> T,
    {
        work(session)
    }

    fn attempt_transaction<S, T, E, F>(&self, session: &mut S, work: &mut F) -> Result<T, E>
    where
        S: Session,
        E: From<S::Error>,
        F: FnMut(&mut S) -> Result<T, E>,
    {
        session.begin()?;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(session)));
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(payload) => {
                tracing::error!("unit of work panicked, rolling back");
                rollback_quietly(session);
                panic::resume_unwind(payload);
            }
        };

        match outcome {
            Ok(value) => match session.commit() {
                Ok(()) => Ok(value),
                Err(err) => {
                    tracing::warn!(error = %err, "commit failed");
                    rollback_quietly(session);
                    Err(err.into())
                }
            },
            Err(err) => {
                rollback_quietly(session);
                Err(err)
            }
        }
    }

    fn attempt_savepoint<S, T, E, F>(
        &self,
        session: &mut S,
        name: &SavepointName,
        work: &mut F,
    ) -> Result<T, E>
    where
        S: Session,
        E: From<S::Error>,
        F: FnMut(&mut S) -> Result<T, E>,
    {
        session.savepoint(name)?;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| work(session)));
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(payload) => {
                tracing::error!(savepoint = %name, "unit of work panicked, rolling back to savepoint");
                rollback_to_quietly(session, name);
                panic::resume_unwind(payload);
            }
        };

        match outcome {
            Ok(value) => match session.release_savepoint(name) {
                Ok(()) => Ok(value),
                Err(err) => {
                    tracing::warn!(savepoint = %name, error = %err, "release failed");
                    rollback_to_quietly(session, name);
                    Err(err.into())
                }
            },
            Err(err) => {
                rollback_to_quietly(session, name);
                Err(err)
            }
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self {
            config: ExecutorConfig::default(),
            sleeper: Arc::new(std::thread::sleep),
        }
    }
}

impl fmt::Debug for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Executor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// The work error wins over a failed rollback; the rollback failure is only logged.
fn rollback_quietly<S: Session>(session: &mut S) {
    if let Err(err) = session.rollback() {
        tracing::error!(error = %err, "rollback failed");
    }
}

fn rollback_to_quietly<S: Session>(session: &mut S, name: &SavepointName) {
    if let Err(err) = session.rollback_to_savepoint(name) {
        tracing::error!(savepoint = %name, error = %err, "rollback to savepoint failed");
    }
}
