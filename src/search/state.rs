use crate::config::SearchConfig;
use crate::data::model::MatchSet;

// ---------------------------------------------------------------------------
// Stopping budget
// ---------------------------------------------------------------------------

/// Step budget and success target for the adaptive loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBudget {
    /// Filter invocations (fresh seeds) per step.
    pub cycles_per_step: usize,
    pub max_steps: usize,
    /// Steps continue while cumulative successes are `<=` this value, so the
    /// loop ends only once the target has been exceeded.
    pub success_target: usize,
}

impl From<&SearchConfig> for SearchBudget {
    fn from(config: &SearchConfig) -> Self {
        Self {
            cycles_per_step: config.cycles_per_step,
            max_steps: config.max_steps,
            success_target: config.success_target,
        }
    }
}

// ---------------------------------------------------------------------------
// Search state
// ---------------------------------------------------------------------------

/// Running state of the adaptive loop, independent of how steps are executed.
#[derive(Debug, Default)]
pub struct SearchState {
    pub steps_taken: usize,
    pub cumulative_successes: usize,
    /// One entry per step that produced at least one match set.
    pub accumulated: Vec<Vec<MatchSet>>,
}

impl SearchState {
    /// Whether another step should be dispatched.
    pub fn should_continue(&self, budget: &SearchBudget) -> bool {
        self.steps_taken < budget.max_steps && self.cumulative_successes <= budget.success_target
    }

    /// Fold a finished step into the running totals. Returns the number of
    /// successes the step contributed.
    pub fn record_step(&mut self, results: Vec<MatchSet>) -> usize {
        let successes = results.len();
        if successes > 0 {
            self.accumulated.push(results);
        }
        self.cumulative_successes += successes;
        self.steps_taken += 1;
        successes
    }
}
