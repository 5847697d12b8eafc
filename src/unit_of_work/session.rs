//! Storage session abstraction.
//!
//! The executor never talks to a database directly. It drives a [`Session`],
//! which knows its own nesting depth and how to issue transaction-control
//! statements.

use super::savepoint::SavepointName;
use std::fmt;

/// Transaction primitives of one storage connection.
///
/// `depth()` is 0 when no transaction is open, 1 inside a top-level
/// transaction and one more for every open savepoint.
pub trait Session {
    type Error: std::error::Error + Send + Sync + 'static;

    fn depth(&self) -> usize;

    fn begin(&mut self) -> Result<(), Self::Error>;

    fn commit(&mut self) -> Result<(), Self::Error>;

    fn rollback(&mut self) -> Result<(), Self::Error>;

    fn savepoint(&mut self, name: &SavepointName) -> Result<(), Self::Error>;

    fn release_savepoint(&mut self, name: &SavepointName) -> Result<(), Self::Error>;

    fn rollback_to_savepoint(&mut self, name: &SavepointName) -> Result<(), Self::Error>;
}

/// A transaction-control statement, rendered as SQL by `Display`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionStatement {
    Begin,
    Commit,
    Rollback,
    Savepoint(SavepointName),
    ReleaseSavepoint(SavepointName),
    RollbackToSavepoint(SavepointName),
}

impl fmt::Display for TransactionStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Begin => f.write_str("BEGIN"),
            Self::Commit => f.write_str("COMMIT"),
            Self::Rollback => f.write_str("ROLLBACK"),
            Self::Savepoint(name) => write!(f, "SAVEPOINT {name}"),
            Self::ReleaseSavepoint(name) => write!(f, "RELEASE SAVEPOINT {name}"),
            Self::RollbackToSavepoint(name) => write!(f, "ROLLBACK TO SAVEPOINT {name}"),
        }
    }
}

/// Anything that can execute a raw SQL statement.
pub trait StatementExecutor {
    type Error: std::error::Error + Send + Sync + 'static;

    fn execute(&mut self, sql: &str) -> Result<(), Self::Error>;
}

/// [`Session`] over a plain SQL connection.
///
/// Depth is tracked locally from the statements issued through this
/// session. Rollbacks always close their scope, even when the statement
/// itself fails, so a broken connection is never mistaken for an open
/// transaction.
#[derive(Debug)]
pub struct StatementSession<C> {
    connection: C,
    depth: usize,
}

impl<C: StatementExecutor> StatementSession<C> {
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            depth: 0,
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    pub fn into_inner(self) -> C {
        self.connection
    }

    fn issue(&mut self, statement: TransactionStatement) -> Result<(), C::Error> {
        self.connection.execute(&statement.to_string())
    }
}

impl<C: StatementExecutor> Session for StatementSession<C> {
    type Error = C::Error;

    fn depth(&self) -> usize {
        self.depth
    }

    fn begin(&mut self) -> Result<(), Self::Error> {
        self.issue(TransactionStatement::Begin)?;
        self.depth = 1;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        self.issue(TransactionStatement::Commit)?;
        self.depth = 0;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), Self::Error> {
        let result = self.issue(TransactionStatement::Rollback);
        self.depth = 0;
        result
    }

    fn savepoint(&mut self, name: &SavepointName) -> Result<(), Self::Error> {
        self.issue(TransactionStatement::Savepoint(name.clone()))?;
        self.depth += 1;
        Ok(())
    }

    fn release_savepoint(&mut self, name: &SavepointName) -> Result<(), Self::Error> {
        self.issue(TransactionStatement::ReleaseSavepoint(name.clone()))?;
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    fn rollback_to_savepoint(&mut self, name: &SavepointName) -> Result<(), Self::Error> {
        let result = self.issue(TransactionStatement::RollbackToSavepoint(name.clone()));
        self.depth = self.depth.saturating_sub(1);
        result
    }
}
