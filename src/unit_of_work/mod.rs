//! Atomic execution of business operations on a storage session.
//!
//! # Key Concepts
//!
//! - **Session**: the storage connection, which knows its nesting depth
//! - **Executor**: runs work in a transaction, or in a savepoint when one is
//!   already open, retrying failed attempts
//! - **MemorySession**: in-memory engine for tests and demos
//!
//! Work closures receive the session, so nested operations compose by
//! calling the executor again with the session they were given.

mod config;
mod error;
mod executor;
mod memory;
mod savepoint;
mod session;

pub use config::{ConfigError, ExecutorConfig};
pub use error::StorageError;
pub use executor::Executor;
pub use memory::MemorySession;
pub use savepoint::SavepointName;
pub use session::{Session, StatementExecutor, StatementSession, TransactionStatement};
