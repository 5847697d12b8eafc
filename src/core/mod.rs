//! Status labels, transition tables and the transition guard.
//!
//! Everything in this module is pure: lookups over read-only configuration
//! with no side effects and no locking.

mod error;
mod guard;
mod request;
mod state;
mod table;

pub use error::InvalidStateTransition;
pub use guard::{TransitionDescription, TransitionGuard};
pub use request::TransitionRequest;
pub use state::State;
pub use table::TransitionTable;
