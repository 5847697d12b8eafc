//! Outcome reporting.
//!
//! Reporters record what happened to a business operation. The executor and
//! guard never report on their own; callers (see [`crate::service`]) decide
//! what to report and with which context.

mod context;

pub use context::OutcomeContext;

use std::error::Error;

/// Sink for success, warning and error events.
pub trait OutcomeReporter {
    fn log_success(&self, message: &str, context: &OutcomeContext);

    fn log_warning(&self, message: &str, context: &OutcomeContext);

    fn log_error(
        &self,
        message: &str,
        context: &OutcomeContext,
        cause: Option<&(dyn Error + 'static)>,
    );
}

/// Discards every event.
impl OutcomeReporter for () {
    fn log_success(&self, _message: &str, _context: &OutcomeContext) {}

    fn log_warning(&self, _message: &str, _context: &OutcomeContext) {}

    fn log_error(
        &self,
        _message: &str,
        _context: &OutcomeContext,
        _cause: Option<&(dyn Error + 'static)>,
    ) {
    }
}

impl<R: OutcomeReporter + ?Sized> OutcomeReporter for &R {
    fn log_success(&self, message: &str, context: &OutcomeContext) {
        (**self).log_success(message, context)
    }

    fn log_warning(&self, message: &str, context: &OutcomeContext) {
        (**self).log_warning(message, context)
    }

    fn log_error(
        &self,
        message: &str,
        context: &OutcomeContext,
        cause: Option<&(dyn Error + 'static)>,
    ) {
        (**self).log_error(message, context, cause)
    }
}

/// Reporter that emits `tracing` events under the `stategate::outcome` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl OutcomeReporter for TracingReporter {
    fn log_success(&self, message: &str, context: &OutcomeContext) {
        tracing::info!(target: "stategate::outcome", context = %context, "{message}");
    }

    fn log_warning(&self, message: &str, context: &OutcomeContext) {
        tracing::warn!(target: "stategate::outcome", context = %context, "{message}");
    }

    fn log_error(
        &self,
        message: &str,
        context: &OutcomeContext,
        cause: Option<&(dyn Error + 'static)>,
    ) {
        match cause {
            Some(cause) => tracing::error!(
                target: "stategate::outcome",
                context = %context,
                cause = %cause,
                "{message}"
            ),
            None => tracing::error!(target: "stategate::outcome", context = %context, "{message}"),
        }
    }
}
