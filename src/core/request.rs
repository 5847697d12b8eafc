//! Proposed status changes.

use super::state::State;
use std::fmt::Display;

/// One proposed status change, built right before validation.
///
/// `entity_kind` and `entity_id` only feed messages and log events; the id
/// is never dereferenced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionRequest<S: State> {
    pub entity_kind: String,
    pub entity_id: String,
    pub from: S,
    pub to: S,
}

impl<S: State> TransitionRequest<S> {
    pub fn new(entity_kind: impl Into<String>, entity_id: impl Display, from: S, to: S) -> Self {
        Self {
            entity_kind: entity_kind.into(),
            entity_id: entity_id.to_string(),
            from,
            to,
        }
    }
}
