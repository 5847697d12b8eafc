//! Quote (proforma) approval workflow
//!
//! This demo walks a quote through its lifecycle and registers a payment in
//! a nested unit of work.
//!
//! Key concepts:
//! - Declaring a status enum and its transition table
//! - Guarded status changes through `StatusService`
//! - Savepoint isolation: a failed nested step leaves the outer work intact
//! - Outcome events as `tracing` output
//!
//! Run with: RUST_LOG=debug cargo run --example proforma_workflow

use stategate::core::{TransitionGuard, TransitionRequest};
use stategate::report::TracingReporter;
use stategate::service::StatusService;
use stategate::unit_of_work::{Executor, ExecutorConfig, MemorySession};
use stategate::{state_enum, transition_table, Error, State};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum ProformaState {
        Pendiente = "PENDIENTE",
        Aprobada = "APROBADA",
        Convertida = "CONVERTIDA",
        Rechazada = "RECHAZADA",
    }
}

use ProformaState::*;

fn register_payment(
    executor: &Executor,
    session: &mut MemorySession,
    amount: u64,
) -> Result<(), Error> {
    executor.run(session, |session| {
        if amount == 0 {
            return Err(Error::unhandled("el monto del pago debe ser mayor a cero"));
        }
        session.put("pago:123", amount.to_string());
        Ok(())
    })
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let executor = Executor::new(ExecutorConfig::default().with_max_attempts(3))?;
    let guard = TransitionGuard::new(transition_table! {
        Pendiente => [Aprobada, Rechazada],
        Aprobada => [Convertida, Rechazada],
        Convertida => [],
        Rechazada => [],
    });
    let service = StatusService::new(&executor, &guard, TracingReporter).with_caller("vendedor:7");

    let mut session = MemorySession::new();
    session.put("proforma:123", Pendiente.name());

    println!("=== Quote Workflow ===\n");

    for from in [Pendiente, Aprobada] {
        let hints: Vec<&str> = guard
            .allowed_next_states(&from)
            .iter()
            .map(|state| state.name())
            .collect();
        println!("From {} the quote may move to: {}", from.name(), hints.join(", "));
    }

    let approve = TransitionRequest::new("Proforma", 123, Pendiente, Aprobada);
    service.change_status(&mut session, &approve, |session, to| {
        session.put("proforma:123", to.name());
        Ok::<_, Error>(())
    })?;
    println!("\nApproved: {:?}", session.committed("proforma:123"));

    let skip = TransitionRequest::new("Proforma", 123, Pendiente, Convertida);
    println!("Hint: {}", guard.describe(&skip).message);

    let convert = TransitionRequest::new("Proforma", 123, Aprobada, Convertida);
    service.change_status(&mut session, &convert, |session, to| {
        session.put("proforma:123", to.name());
        session.put("pedido:123", "PENDIENTE");

        if let Err(err) = register_payment(&executor, session, 0) {
            println!("Payment skipped: {err}");
        }
        register_payment(&executor, session, 1500)
    })?;

    println!("\nFinal state: {:?}", session.committed("proforma:123"));
    println!("Order created: {:?}", session.committed("pedido:123"));
    println!("Payment: {:?}", session.committed("pago:123"));

    let reopen = TransitionRequest::new("Proforma", 123, Convertida, Pendiente);
    match service.change_status(&mut session, &reopen, |_, _| Ok::<_, Error>(())) {
        Ok(()) => println!("\nUnexpectedly reopened"),
        Err(err) => println!("\nRejected: {err}"),
    }

    println!("\nTransaction statements issued:");
    for statement in session.journal() {
        println!("  {statement}");
    }

    Ok(())
}
