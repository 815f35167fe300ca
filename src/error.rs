use std::path::PathBuf;

use crate::search::seed::Seed;

/// Failures that abort a search run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input file had a missing or non-numeric field.
    #[error("{}:{line}: {reason}", .path.display())]
    MalformedInput {
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        reason: String,
    },

    /// Bounds are inverted, equal, or not finite.
    #[error("measurement {index}: invalid bounds ({lower}, {upper})")]
    InvalidMeasurement { index: usize, lower: f64, upper: f64 },

    /// A filter invocation panicked inside the worker pool.
    #[error("filter invocation for seed {seed} failed: {message}")]
    WorkerFailure { seed: Seed, message: String },

    /// The worker pool could not be brought up or lost its workers.
    #[error("worker pool unavailable: {0}")]
    ResourceExhaustion(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
