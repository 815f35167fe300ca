//! Fixed-size worker pool running filter invocations for one cycle at a time.
//!
//! Tasks travel over a shared crossbeam queue; each cycle gets its own reply
//! channel, and the caller blocks until every dispatched task has answered.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::data::model::{DipoleConfiguration, MatchSet};
use crate::error::{Error, Result};
use crate::search::filter::FilterJob;
use crate::search::seed::Seed;

/// Available hardware parallelism minus one, never below one.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

struct Task {
    job: Arc<FilterJob>,
    seed: Seed,
    reply: Sender<TaskOutcome>,
}

struct TaskOutcome {
    seed: Seed,
    result: std::result::Result<Vec<DipoleConfiguration>, String>,
}

pub struct CyclePool {
    workers: usize,
    sender: Option<Sender<Task>>,
    handles: Vec<JoinHandle<()>>,
}

impl CyclePool {
    /// Spawn `workers` threads (at least one).
    pub fn new(workers: usize) -> Result<Self> {
        let workers = workers.max(1);
        let (sender, receiver) = unbounded::<Task>();
        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let rx = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("filter-{idx}"))
                .spawn(move || worker_loop(rx))
                .map_err(|err| Error::ResourceExhaustion(format!("spawning worker {idx}: {err}")))?;
            handles.push(handle);
        }
        Ok(Self {
            workers,
            sender: Some(sender),
            handles,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Run one filter invocation per seed and return the non-empty results in
    /// arrival order.
    ///
    /// All invocations run to completion even when one fails; the first
    /// failure to arrive is then reported with its seed.
    pub fn run_cycle(&self, job: &Arc<FilterJob>, seeds: &[Seed]) -> Result<Vec<MatchSet>> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| Error::ResourceExhaustion("pool is shut down".into()))?;
        let (reply_tx, reply_rx) = unbounded::<TaskOutcome>();

        for &seed in seeds {
            let task = Task {
                job: Arc::clone(job),
                seed,
                reply: reply_tx.clone(),
            };
            sender
                .send(task)
                .map_err(|_| Error::ResourceExhaustion("all workers have exited".into()))?;
        }
        drop(reply_tx);

        let mut matches = Vec::new();
        let mut failure: Option<(Seed, String)> = None;
        for _ in 0..seeds.len() {
            let outcome = reply_rx.recv().map_err(|_| {
                Error::ResourceExhaustion("workers exited before finishing the cycle".into())
            })?;
            match outcome.result {
                Ok(survivors) => matches.extend(MatchSet::new(outcome.seed, survivors)),
                Err(message) => {
                    failure.get_or_insert((outcome.seed, message));
                }
            }
        }

        match failure {
            Some((seed, message)) => Err(Error::WorkerFailure { seed, message }),
            None => Ok(matches),
        }
    }
}

impl Drop for CyclePool {
    fn drop(&mut self) {
        // Closing the queue ends every worker loop.
        self.sender.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

fn worker_loop(rx: Receiver<Task>) {
    while let Ok(task) = rx.recv() {
        let Task { job, seed, reply } = task;
        let result = panic::catch_unwind(AssertUnwindSafe(|| job.run(seed))).map_err(panic_message);
        let _ = reply.send(TaskOutcome { seed, result });
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}
