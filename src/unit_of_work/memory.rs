//! In-memory storage session.
//!
//! Rows are string key/value pairs. Every open scope (the transaction itself
//! and each savepoint) keeps a snapshot of the rows as they were when it
//! opened, so rolling a scope back is a snapshot restore. Every
//! transaction-control call is journaled.

use super::error::StorageError;
use super::savepoint::SavepointName;
use super::session::{Session, TransactionStatement};
use std::collections::{BTreeMap, VecDeque};

type Rows = BTreeMap<String, String>;

#[derive(Clone, Debug)]
struct Frame {
    savepoint: Option<SavepointName>,
    snapshot: Rows,
}

/// Single-connection in-memory engine with savepoint support.
///
/// Writes made outside a transaction are committed immediately. Failures can
/// be queued with [`MemorySession::fail_next_commit`],
/// [`MemorySession::fail_next_release`] and
/// [`MemorySession::fail_next_rollback`] to simulate a misbehaving engine.
#[derive(Clone, Debug, Default)]
pub struct MemorySession {
    committed: Rows,
    working: Rows,
    frames: Vec<Frame>,
    journal: Vec<TransactionStatement>,
    commit_failures: VecDeque<StorageError>,
    release_failures: VecDeque<StorageError>,
    rollback_failures: VecDeque<StorageError>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a row in the current scope.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        if self.frames.is_empty() {
            self.committed.insert(key.clone(), value.clone());
        }
        self.working.insert(key, value);
    }

    /// Delete a row in the current scope.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        if self.frames.is_empty() {
            self.committed.remove(key);
        }
        self.working.remove(key)
    }

    /// Read a row as seen from inside the current scope.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.working.get(key).map(String::as_str)
    }

    /// Read a row as seen by other connections (committed data only).
    pub fn committed(&self, key: &str) -> Option<&str> {
        self.committed.get(key).map(String::as_str)
    }

    /// Transaction-control calls issued so far, in order.
    pub fn journal(&self) -> &[TransactionStatement] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    /// Make the next commit fail with `error`. Queued failures are consumed
    /// in order, one per commit.
    pub fn fail_next_commit(&mut self, error: StorageError) {
        self.commit_failures.push_back(error);
    }

    /// Make the next savepoint release fail with `error`. The savepoint
    /// stays open.
    pub fn fail_next_release(&mut self, error: StorageError) {
        self.release_failures.push_back(error);
    }

    /// Make the next rollback fail with `error`, whether it targets the
    /// transaction or a savepoint. Nothing is undone.
    pub fn fail_next_rollback(&mut self, error: StorageError) {
        self.rollback_failures.push_back(error);
    }

    fn injected(queue: &mut VecDeque<StorageError>) -> Result<(), StorageError> {
        match queue.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn require_transaction(&self) -> Result<(), StorageError> {
        if self.frames.is_empty() {
            return Err(StorageError::NoActiveTransaction);
        }
        Ok(())
    }

    fn innermost_savepoint(&self, name: &SavepointName) -> Result<usize, StorageError> {
        self.require_transaction()?;
        let index = self.frames.len() - 1;
        match &self.frames[index].savepoint {
            Some(open) if open == name => Ok(index),
            _ => Err(StorageError::savepoint_not_found(name.as_str())),
        }
    }
}

impl Session for MemorySession {
    type Error = StorageError;

    fn depth(&self) -> usize {
        self.frames.len()
    }

    fn begin(&mut self) -> Result<(), StorageError> {
        self.journal.push(TransactionStatement::Begin);
        if !self.frames.is_empty() {
            return Err(StorageError::AlreadyActive);
        }

        self.frames.push(Frame {
            savepoint: None,
            snapshot: self.working.clone(),
        });
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        self.journal.push(TransactionStatement::Commit);
        self.require_transaction()?;
        Self::injected(&mut self.commit_failures)?;

        self.committed = self.working.clone();
        self.frames.clear();
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StorageError> {
        self.journal.push(TransactionStatement::Rollback);
        self.require_transaction()?;
        Self::injected(&mut self.rollback_failures)?;

        self.working = self.frames[0].snapshot.clone();
        self.frames.clear();
        Ok(())
    }

    fn savepoint(&mut self, name: &SavepointName) -> Result<(), StorageError> {
        self.journal.push(TransactionStatement::Savepoint(name.clone()));
        self.require_transaction()?;

        self.frames.push(Frame {
            savepoint: Some(name.clone()),
            snapshot: self.working.clone(),
        });
        Ok(())
    }

    fn release_savepoint(&mut self, name: &SavepointName) -> Result<(), StorageError> {
        self.journal.push(TransactionStatement::ReleaseSavepoint(name.clone()));
        let index = self.innermost_savepoint(name)?;
        Self::injected(&mut self.release_failures)?;

        self.frames.truncate(index);
        Ok(())
    }

    fn rollback_to_savepoint(&mut self, name: &SavepointName) -> Result<(), StorageError> {
        self.journal.push(TransactionStatement::RollbackToSavepoint(name.clone()));
        let index = self.innermost_savepoint(name)?;
        Self::injected(&mut self.rollback_failures)?;

        self.working = self.frames[index].snapshot.clone();
        self.frames.truncate(index);
        Ok(())
    }
}
