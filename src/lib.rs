//! Stategate: atomic, guarded status changes for business entities.
//!
//! Two independent primitives that callers compose:
//!
//! - **Unit of work** ([`unit_of_work`]): runs a block of work atomically on
//!   a storage session, nesting through savepoints when a transaction is
//!   already open and retrying failed attempts with a random pause.
//! - **Transition guard** ([`core`]): validates a status change against a
//!   declarative transition table. Pure, stateless and fail-closed.
//!
//! [`service::StatusService`] wires both together with an
//! [`report::OutcomeReporter`], and [`enforcement`] checks whole batches of
//! requests at once.
//!
//! # Example
//!
//! ```rust
//! use stategate::core::{TransitionGuard, TransitionRequest};
//! use stategate::unit_of_work::{Executor, MemorySession};
//! use stategate::{state_enum, transition_table, Error};
//!
//! state_enum! {
//!     pub enum ProformaState {
//!         Pendiente = "PENDIENTE",
//!         Aprobada = "APROBADA",
//!         Convertida = "CONVERTIDA",
//!         Rechazada = "RECHAZADA",
//!     }
//! }
//!
//! use ProformaState::*;
//!
//! let guard = TransitionGuard::new(transition_table! {
//!     Pendiente => [Aprobada, Rechazada],
//!     Aprobada => [Convertida, Rechazada],
//!     Convertida => [],
//!     Rechazada => [],
//! });
//!
//! let executor = Executor::default();
//! let mut session = MemorySession::new();
//!
//! let approved: Result<(), Error> = executor.run(&mut session, |session| {
//!     guard.assert_transition_allowed(&Pendiente, &Aprobada, "Proforma", 123)?;
//!     session.put("proforma:123", "APROBADA");
//!     Ok(())
//! });
//! assert!(approved.is_ok());
//!
//! let hint = guard.describe_transition(&Aprobada, &Pendiente, "Proforma");
//! assert_eq!(
//!     hint.message,
//!     "Proforma no puede pasar de APROBADA a PENDIENTE. Estados permitidos: CONVERTIDA, RECHAZADA"
//! );
//! ```

pub mod builder;
pub mod core;
pub mod enforcement;
pub mod error;
pub mod report;
pub mod service;
pub mod unit_of_work;

// Re-export commonly used types
pub use crate::core::{
    InvalidStateTransition, State, TransitionDescription, TransitionGuard, TransitionRequest,
    TransitionTable,
};
pub use error::{Error, Result};
pub use unit_of_work::{Executor, ExecutorConfig, MemorySession, Session, StorageError};
