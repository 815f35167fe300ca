//! Monte Carlo rejection search for random dipole ensembles that reproduce
//! measured noise bounds at a fixed sensor position.

pub mod config;
pub mod data;
pub mod ensemble;
pub mod error;
pub mod search;

pub use error::{Error, Result};
