//! Cash register sessions
//!
//! This demo loads a transition table from JSON configuration, drives a
//! register through open/close cycles and shows the executor retrying a
//! commit that hits a serialization conflict.
//!
//! Key concepts:
//! - String-labelled states loaded as configuration
//! - Executor settings from JSON
//! - Retry with jitter on transient failures
//! - SQL emitted through `StatementSession`
//!
//! Run with: RUST_LOG=stategate=debug cargo run --example cash_register

use stategate::core::{TransitionGuard, TransitionRequest, TransitionTable};
use stategate::unit_of_work::{
    Executor, ExecutorConfig, MemorySession, StatementExecutor, StatementSession, StorageError,
};
use stategate::Error;
use tracing_subscriber::EnvFilter;

const REGISTER_TABLE: &str = r#"{
    "CERRADA": ["ABIERTA"],
    "ABIERTA": ["EN_ARQUEO", "CERRADA"],
    "EN_ARQUEO": ["CERRADA", "ABIERTA"]
}"#;

const EXECUTOR_CONFIG: &str = r#"{ "max_attempts": 4, "jitter_min_ms": 1, "jitter_max_ms": 5 }"#;

struct PrintingConnection;

impl StatementExecutor for PrintingConnection {
    type Error = StorageError;

    fn execute(&mut self, sql: &str) -> Result<(), StorageError> {
        println!("  SQL> {sql}");
        Ok(())
    }
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let table: TransitionTable<String> = serde_json::from_str(REGISTER_TABLE)
        .map_err(Error::unhandled)?;
    let guard = TransitionGuard::new(table);
    let executor = Executor::new(ExecutorConfig::from_json(EXECUTOR_CONFIG)?)?;

    println!("=== Cash Register ===\n");

    let s = |label: &str| label.to_string();
    for (from, to) in [("CERRADA", "ABIERTA"), ("CERRADA", "EN_ARQUEO"), ("EN_ARQUEO", "CERRADA")] {
        let description = guard.describe_transition(&s(from), &s(to), "Caja");
        let mark = if description.valid { "ok " } else { "no " };
        println!("{mark} {}", description.message);
    }

    println!("\nClosing register 4 with two serialization conflicts:");
    let mut session = MemorySession::new();
    session.put("caja:4", "ABIERTA");
    session.fail_next_commit(StorageError::transient("could not serialize access"));
    session.fail_next_commit(StorageError::transient("could not serialize access"));

    let close = TransitionRequest::new("Caja", 4, s("ABIERTA"), s("CERRADA"));
    let mut attempts = 0;
    executor.run(&mut session, |session| {
        attempts += 1;
        guard.check(&close)?;
        session.put("caja:4", close.to.as_str());
        Ok::<_, Error>(())
    })?;
    println!("Closed after {attempts} attempts: {:?}", session.committed("caja:4"));

    println!("\nSame unit of work against a SQL connection:");
    let mut sql = StatementSession::new(PrintingConnection);
    executor.run(&mut sql, |sql| {
        executor.run(sql, |_| Ok::<_, Error>(()))?;
        let counted: Result<(), Error> = executor.run_with_attempts(sql, 1, |_| {
            Err(Error::unhandled("arqueo con diferencias"))
        });
        println!("  nested count failed: {}", counted.is_err());
        Ok::<_, Error>(())
    })?;

    let balance = executor.run_read_only(&session, |session| session.committed("caja:4").map(str::to_string));
    println!("\nRead-only check: {balance:?}");

    Ok(())
}
