//! Monte Carlo rejection search.
//!
//! Architecture:
//! ```text
//!   SeedSequence ──spawn(cycles_per_step)──┐
//!                                          ▼
//!   ┌────────────┐   seeds    ┌──────────────┐   one task per seed
//!   │ controller │ ─────────▶ │  CyclePool   │ ─────────────────────┐
//!   └────────────┘ ◀───────── └──────────────┘                      ▼
//!        │        Vec<MatchSet>        ▲               ┌──────────────────┐
//!        │                             └───────────────│ filter_batch ×N  │
//!        ▼                               non-empty     └──────────────────┘
//!   SearchState  (steps, successes, accumulated)
//! ```

pub mod controller;
pub mod filter;
pub mod observer;
pub mod pool;
pub mod seed;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{search, SearchOutcome};
pub use filter::{filter_batch, FilterJob};
pub use observer::{LogObserver, SearchObserver, Silent, StepReport};
pub use pool::{default_workers, CyclePool};
pub use seed::{Seed, SeedSequence};
pub use state::{SearchBudget, SearchState};
