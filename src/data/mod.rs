//! Data layer: core types, input loading, and match output.
//!
//! Architecture:
//! ```text
//!  measurements.csv      frequency_inputs.txt
//!        │                      │
//!        ▼                      ▼
//!   ┌──────────────────────────────┐
//!   │  loader                      │  parse + validate → Vec<Measurement>
//!   └──────────────────────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  search   │  (crate::search) → SearchOutcome { Vec<Vec<MatchSet>> }
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  output   │  one flattened line per surviving candidate
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod output;
