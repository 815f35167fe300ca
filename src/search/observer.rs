use log::{debug, info, warn};

use crate::error::Error;
use crate::search::controller::SearchOutcome;

/// Log target for search progress.
pub const LOG_TARGET: &str = "dipole_match::search";

/// Summary of one completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// Zero-based step index.
    pub step: usize,
    pub invocations: usize,
    /// Non-empty results this step.
    pub successes: usize,
    pub cumulative_successes: usize,
    pub matched_candidates: usize,
}

/// Telemetry handle passed to the search. Every method defaults to a no-op.
pub trait SearchObserver {
    fn step_started(&self, _step: usize, _invocations: usize) {}

    fn step_finished(&self, _report: &StepReport) {}

    fn step_failed(&self, _step: usize, _error: &Error) {}

    fn search_finished(&self, _outcome: &SearchOutcome) {}
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl SearchObserver for Silent {}

/// Forwards events to the `log` facade, tagged with the model label.
#[derive(Debug, Clone)]
pub struct LogObserver {
    label: String,
}

impl LogObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl SearchObserver for LogObserver {
    fn step_started(&self, step: usize, invocations: usize) {
        debug!(target: LOG_TARGET, "[{}] starting step {step} with {invocations} invocations", self.label);
    }

    fn step_finished(&self, report: &StepReport) {
        info!(
            target: LOG_TARGET,
            "[{}] step {} finished: {} of {} invocations matched ({} candidates)",
            self.label, report.step, report.successes, report.invocations, report.matched_candidates
        );
        debug!(
            target: LOG_TARGET,
            "[{}] current running successes: {}", self.label, report.cumulative_successes
        );
    }

    fn step_failed(&self, step: usize, error: &Error) {
        warn!(target: LOG_TARGET, "[{}] step {step} aborted: {error}", self.label);
    }

    fn search_finished(&self, outcome: &SearchOutcome) {
        info!(
            target: LOG_TARGET,
            "[{}] search done after {} step(s): {} successful invocations, {} matched of {} drawn (rate {:.3e})",
            self.label,
            outcome.steps_taken,
            outcome.successes,
            outcome.matched_candidates(),
            outcome.candidates_drawn,
            outcome.acceptance_rate()
        );
    }
}
