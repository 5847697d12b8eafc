//! Crate-level error type.

use crate::core::InvalidStateTransition;
use crate::unit_of_work::{ConfigError, StorageError};
use thiserror::Error;

/// Ready-made error for business operations run through the executor.
///
/// Work closures that return `Result<T, Error>` can use `?` on storage calls
/// and guard checks alike.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidStateTransition),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Any other failure raised by business code.
    #[error("{0}")]
    Unhandled(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub fn unhandled(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Unhandled(error.into())
    }

    /// Whether the storage engine flagged the failure as transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Storage(err) if err.is_transient())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_keep_transience() {
        let err: Error = StorageError::transient("deadlock").into();
        assert!(err.is_transient());

        let err: Error = StorageError::fatal("disk full").into();
        assert!(!err.is_transient());
    }

    #[test]
    fn unhandled_exposes_its_cause() {
        use std::error::Error as _;

        let err = Error::unhandled(std::io::Error::new(
            std::io::ErrorKind::Other,
            "impresora fiscal desconectada",
        ));

        let cause = err.source().unwrap();
        assert_eq!(cause.to_string(), "impresora fiscal desconectada");
    }

    #[test]
    fn unhandled_wraps_any_message() {
        let err = Error::unhandled("saldo insuficiente");
        assert_eq!(err.to_string(), "saldo insuficiente");
        assert!(!err.is_transient());
    }

    #[test]
    fn transitions_display_transparently() {
        let rejection = InvalidStateTransition {
            entity_kind: "Caja".to_string(),
            entity_id: "4".to_string(),
            from: "CERRADA".to_string(),
            to: "CERRADA".to_string(),
            allowed: Vec::new(),
        };
        let err: Error = rejection.clone().into();
        assert_eq!(err.to_string(), rejection.to_string());
    }
}
