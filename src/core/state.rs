//! Core State trait for entity status labels.
//!
//! A state is an opaque, comparable label. The guard never looks inside it;
//! it only hashes, compares and prints it.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for entity status labels.
///
/// All methods are pure - no side effects. States are plain values shared by
/// every instance of an entity kind.
///
/// # Required Traits
///
/// - `Clone`: states are copied into requests and error values
/// - `Eq` + `Hash`: states are keys of a transition table
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: tables are shipped as configuration
///
/// # Example
///
/// ```rust
/// use stategate::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum CashSessionState {
///     Abierta,
///     Cerrada,
/// }
///
/// impl State for CashSessionState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Abierta => "ABIERTA",
///             Self::Cerrada => "CERRADA",
///         }
///     }
/// }
///
/// assert_eq!(CashSessionState::Cerrada.name(), "CERRADA");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Label used in messages and log events.
    fn name(&self) -> &str;
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}
