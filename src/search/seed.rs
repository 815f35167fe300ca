//! Seed sequence handing out disjoint random streams.
//!
//! Every [`Seed`] names a ChaCha stream under a shared root key. Stream ids
//! are issued from a monotonically increasing counter, so no two seeds drawn
//! from the same [`SeedSequence`] ever share a stream, across steps included.

use std::fmt;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Identifier of an independent random stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Seed {
    root: u64,
    stream: u64,
}

impl Seed {
    pub fn new(root: u64, stream: u64) -> Self {
        Self { root, stream }
    }

    pub fn root(&self) -> u64 {
        self.root
    }

    pub fn stream(&self) -> u64 {
        self.stream
    }

    /// Fresh generator for this seed. Same seed, same sequence.
    pub fn rng(&self) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.root);
        rng.set_stream(self.stream);
        rng
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.root, self.stream)
    }
}

/// Top-level source of seeds for a run.
#[derive(Debug, Clone)]
pub struct SeedSequence {
    root: u64,
    next_stream: u64,
}

impl SeedSequence {
    pub fn new(root: u64) -> Self {
        Self {
            root,
            next_stream: 0,
        }
    }

    /// Issue `n` seeds that have never been issued before.
    pub fn spawn(&mut self, n: usize) -> Vec<Seed> {
        let start = self.next_stream;
        self.next_stream += n as u64;
        (start..self.next_stream)
            .map(|stream| Seed::new(self.root, stream))
            .collect()
    }

    /// Number of seeds issued so far.
    pub fn issued(&self) -> u64 {
        self.next_stream
    }
}
