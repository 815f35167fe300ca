//! Stub ensemble and forward models with known values for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rand::RngCore;

use crate::data::model::{Dipole, DipoleConfiguration, Measurement};
use crate::ensemble::{DipoleModel, ForwardModel};
use crate::search::filter::FilterJob;

/// Candidate whose identity is carried in its single dipole's rate.
pub fn tagged(id: usize) -> DipoleConfiguration {
    DipoleConfiguration::new(vec![Dipole {
        moment: [0.0, 0.0, 1.0],
        position: [0.0, 0.0, 1.0],
        rate: id as f64,
    }])
}

pub fn tag_of(candidate: &DipoleConfiguration) -> usize {
    candidate.dipoles[0].rate as usize
}

pub fn measurement(frequency: f64, lower: f64, upper: f64) -> Measurement {
    Measurement {
        frequency,
        sensor_position: [0.0; 3],
        lower_bound: lower,
        upper_bound: upper,
    }
}

/// Emits candidates tagged `0..count`, ignoring the generator.
#[derive(Debug, Default)]
pub struct SequentialModel {
    pub calls: AtomicUsize,
}

impl DipoleModel for SequentialModel {
    fn generate(&self, count: usize, _rng: &mut dyn RngCore) -> Vec<DipoleConfiguration> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (0..count).map(tagged).collect()
    }

    fn label(&self) -> String {
        "sequential".into()
    }
}

/// Tags each candidate with a draw from the generator, so batches differ
/// across seeds.
#[derive(Debug, Default)]
pub struct RandomTagModel;

impl DipoleModel for RandomTagModel {
    fn generate(&self, count: usize, rng: &mut dyn RngCore) -> Vec<DipoleConfiguration> {
        (0..count)
            .map(|_| tagged((rng.next_u32() % 1000) as usize))
            .collect()
    }

    fn label(&self) -> String {
        "random-tag".into()
    }
}

/// Always panics; used to exercise worker failure reporting.
#[derive(Debug, Default)]
pub struct PanickingModel;

impl DipoleModel for PanickingModel {
    fn generate(&self, _count: usize, _rng: &mut dyn RngCore) -> Vec<DipoleConfiguration> {
        panic!("ensemble exploded");
    }

    fn label(&self) -> String {
        "panicking".into()
    }
}

/// `rows[tag][measurement_index]` lookup, where the measurement index is
/// `frequency as usize - 1`. Records the survivor count of every call.
#[derive(Debug)]
pub struct TableForward {
    rows: Vec<Vec<f64>>,
    pub calls: Mutex<Vec<(f64, usize)>>,
}

impl TableForward {
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self {
            rows,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<(f64, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

impl ForwardModel for TableForward {
    fn predict(&self, measurement: &Measurement, candidates: &[DipoleConfiguration]) -> Vec<f64> {
        self.calls
            .lock()
            .unwrap()
            .push((measurement.frequency, candidates.len()));
        let column = measurement.frequency as usize - 1;
        candidates
            .iter()
            .map(|c| self.rows[tag_of(c)][column])
            .collect()
    }
}

/// Predicts the candidate's tag, whatever the measurement.
#[derive(Debug, Default)]
pub struct TagForward;

impl ForwardModel for TagForward {
    fn predict(&self, _measurement: &Measurement, candidates: &[DipoleConfiguration]) -> Vec<f64> {
        candidates.iter().map(|c| tag_of(c) as f64).collect()
    }
}

/// Job over [`SequentialModel`] + [`TagForward`]: every invocation keeps
/// exactly the candidates tagged inside `(lower, upper)`.
pub fn sequential_job(batch_size: usize, lower: f64, upper: f64) -> Arc<FilterJob> {
    Arc::new(FilterJob::new(
        Arc::new(SequentialModel::default()),
        Arc::new(TagForward),
        vec![measurement(1.0, lower, upper)],
        batch_size,
    ))
}
