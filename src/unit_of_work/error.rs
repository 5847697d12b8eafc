//! Storage error types.

use thiserror::Error;

/// Errors raised by a storage session while controlling transactions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Serialization conflict, deadlock or similar. Worth another attempt.
    #[error("transient storage failure: {message}")]
    Transient { message: String },

    /// Anything else the engine reports.
    #[error("storage failure: {message}")]
    Fatal { message: String },

    /// A transaction was started while one is already open.
    #[error("transaction already active")]
    AlreadyActive,

    /// Commit, rollback or savepoint issued with no open transaction.
    #[error("no transaction is active")]
    NoActiveTransaction,

    /// Release or rollback named a savepoint that is not the innermost open one.
    #[error("savepoint not found: {name}")]
    SavepointNotFound { name: String },
}

impl StorageError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    pub fn savepoint_not_found(name: impl Into<String>) -> Self {
        Self::SavepointNotFound { name: name.into() }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}
