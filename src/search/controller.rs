use std::sync::Arc;

use crate::data::model::MatchSet;
use crate::error::Result;
use crate::search::filter::FilterJob;
use crate::search::observer::{SearchObserver, StepReport};
use crate::search::pool::CyclePool;
use crate::search::seed::SeedSequence;
use crate::search::state::{SearchBudget, SearchState};

/// Everything the adaptive loop accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    /// Per-step match sets; steps without any match are omitted.
    pub steps: Vec<Vec<MatchSet>>,
    pub steps_taken: usize,
    /// Total non-empty filter invocations.
    pub successes: usize,
    pub candidates_drawn: u64,
}

impl SearchOutcome {
    pub fn match_sets(&self) -> impl Iterator<Item = &MatchSet> {
        self.steps.iter().flatten()
    }

    /// Surviving candidates across all match sets.
    pub fn matched_candidates(&self) -> usize {
        self.match_sets().map(MatchSet::len).sum()
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.candidates_drawn == 0 {
            0.0
        } else {
            self.matched_candidates() as f64 / self.candidates_drawn as f64
        }
    }
}

/// Run steps of parallel filtering until the step budget runs out or the
/// cumulative success count exceeds the target.
///
/// Steps are strictly sequential: each step draws `cycles_per_step` fresh
/// seeds from `seeds`, waits for the whole cycle, and folds its successes in
/// before the stopping rule is checked again. Any cycle failure aborts the
/// search.
pub fn search(
    pool: &CyclePool,
    job: &Arc<FilterJob>,
    seeds: &mut SeedSequence,
    budget: &SearchBudget,
    observer: &dyn SearchObserver,
) -> Result<SearchOutcome> {
    let mut state = SearchState::default();

    while state.should_continue(budget) {
        let step = state.steps_taken;
        let step_seeds = seeds.spawn(budget.cycles_per_step);
        observer.step_started(step, step_seeds.len());

        let results = match pool.run_cycle(job, &step_seeds) {
            Ok(results) => results,
            Err(err) => {
                observer.step_failed(step, &err);
                return Err(err);
            }
        };
        let matched_candidates: usize = results.iter().map(MatchSet::len).sum();
        let successes = state.record_step(results);

        observer.step_finished(&StepReport {
            step,
            invocations: step_seeds.len(),
            successes,
            cumulative_successes: state.cumulative_successes,
            matched_candidates,
        });
    }

    let candidates_drawn =
        (job.batch_size as u64) * (budget.cycles_per_step as u64) * (state.steps_taken as u64);
    let outcome = SearchOutcome {
        steps: state.accumulated,
        steps_taken: state.steps_taken,
        successes: state.cumulative_successes,
        candidates_drawn,
    };
    observer.search_finished(&outcome);
    Ok(outcome)
}
