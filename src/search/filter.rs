use std::sync::Arc;

use crate::data::model::{DipoleConfiguration, Measurement};
use crate::ensemble::{DipoleModel, ForwardModel};
use crate::search::seed::Seed;

// ---------------------------------------------------------------------------
// Sample filter: one batch, narrowed measurement by measurement
// ---------------------------------------------------------------------------

/// Draw `batch_size` candidates from `model` using `seed` and keep those whose
/// predicted value lies strictly inside every measurement's bounds.
///
/// Measurements are applied in order. Survivors keep their batch order, and
/// once nothing survives the remaining measurements are not evaluated.
pub fn filter_batch(
    model: &dyn DipoleModel,
    forward: &dyn ForwardModel,
    measurements: &[Measurement],
    batch_size: usize,
    seed: Seed,
) -> Vec<DipoleConfiguration> {
    let mut rng = seed.rng();
    let mut survivors = model.generate(batch_size, &mut rng);

    for measurement in measurements {
        if survivors.is_empty() {
            break;
        }
        let values = forward.predict(measurement, &survivors);
        debug_assert_eq!(values.len(), survivors.len());
        survivors = survivors
            .into_iter()
            .zip(values)
            .filter(|(_, v)| measurement.admits(*v))
            .map(|(c, _)| c)
            .collect();
    }
    survivors
}

/// Everything a filter invocation needs apart from its seed. Shared read-only
/// by all workers of a cycle.
pub struct FilterJob {
    pub model: Arc<dyn DipoleModel>,
    pub forward: Arc<dyn ForwardModel>,
    pub measurements: Arc<[Measurement]>,
    pub batch_size: usize,
}

impl FilterJob {
    pub fn new(
        model: Arc<dyn DipoleModel>,
        forward: Arc<dyn ForwardModel>,
        measurements: impl Into<Arc<[Measurement]>>,
        batch_size: usize,
    ) -> Self {
        Self {
            model,
            forward,
            measurements: measurements.into(),
            batch_size,
        }
    }

    pub fn run(&self, seed: Seed) -> Vec<DipoleConfiguration> {
        filter_batch(
            self.model.as_ref(),
            self.forward.as_ref(),
            &self.measurements,
            self.batch_size,
            seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelConfig;
    use crate::ensemble::{self, LorentzianForwardModel};
    use crate::search::testing::{measurement, tag_of, SequentialModel, TableForward};

    #[test]
    fn two_measurement_scenario_keeps_single_candidate() {
        // Candidate 0 predicts 3.0 then 5.5; candidate 1 predicts 8.0 then 9.0.
        let forward = TableForward::new(vec![vec![3.0, 5.5], vec![8.0, 9.0]]);
        let measurements = [measurement(1.0, 0.0, 10.0), measurement(2.0, 5.0, 6.0)];

        let survivors = filter_batch(
            &SequentialModel::default(),
            &forward,
            &measurements,
            2,
            Seed::new(0, 0),
        );
        assert_eq!(survivors.len(), 1);
        assert_eq!(tag_of(&survivors[0]), 0);
        assert_eq!(forward.recorded(), vec![(1.0, 2), (2.0, 2)]);
    }

    #[test]
    fn values_on_a_bound_are_rejected() {
        let forward = TableForward::new(vec![vec![1.0], vec![2.0], vec![1.5]]);
        let survivors = filter_batch(
            &SequentialModel::default(),
            &forward,
            &[measurement(1.0, 1.0, 2.0)],
            3,
            Seed::new(0, 0),
        );
        let tags: Vec<usize> = survivors.iter().map(tag_of).collect();
        assert_eq!(tags, vec![2]);
    }

    #[test]
    fn empty_subset_short_circuits_remaining_measurements() {
        let forward = TableForward::new(vec![vec![50.0, 0.5, 0.5, 0.5]; 4]);
        let measurements = [
            measurement(1.0, 0.0, 1.0),
            measurement(2.0, 0.0, 1.0),
            measurement(3.0, 0.0, 1.0),
            measurement(4.0, 0.0, 1.0),
        ];
        let survivors = filter_batch(
            &SequentialModel::default(),
            &forward,
            &measurements,
            4,
            Seed::new(0, 0),
        );
        assert!(survivors.is_empty());
        assert_eq!(forward.recorded(), vec![(1.0, 4)]);
    }

    #[test]
    fn survivor_counts_never_grow() {
        // Each row i passes measurement k only while k < i, so survivors
        // shrink by one per step.
        let rows = (0..6)
            .map(|i| (0..5).map(|k| if k < i { 0.5 } else { 2.0 }).collect())
            .collect();
        let forward = TableForward::new(rows);
        let measurements: Vec<_> = (1..=5).map(|f| measurement(f as f64, 0.0, 1.0)).collect();

        filter_batch(
            &SequentialModel::default(),
            &forward,
            &measurements,
            6,
            Seed::new(0, 0),
        );
        let counts: Vec<usize> = forward.recorded().iter().map(|&(_, n)| n).collect();
        assert_eq!(counts, vec![6, 5, 4, 3, 2]);
        assert!(counts.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn same_seed_gives_identical_survivors() {
        let mut config = ModelConfig::default();
        config.total_slots = 4;
        config.filled_slots = 2;
        let model = ensemble::build(&config);

        // Accept roughly the lower half of the value distribution so the
        // survivor set is neither empty nor the whole batch.
        let probe = filter_batch(model.as_ref(), &LorentzianForwardModel, &[], 200, Seed::new(9, 1));
        let mut values: Vec<f64> = probe
            .iter()
            .map(|c| LorentzianForwardModel::value([0.0; 3], 10.0, c))
            .collect();
        values.sort_by(f64::total_cmp);
        let cut = values[values.len() / 2];
        let measurements = [measurement(10.0, -1.0, cut)];

        let a = filter_batch(model.as_ref(), &LorentzianForwardModel, &measurements, 200, Seed::new(9, 1));
        let b = filter_batch(model.as_ref(), &LorentzianForwardModel, &measurements, 200, Seed::new(9, 1));
        assert!(!a.is_empty() && a.len() < 200);
        assert_eq!(a, b);

        let other = filter_batch(model.as_ref(), &LorentzianForwardModel, &measurements, 200, Seed::new(9, 2));
        assert_ne!(a, other);
    }
}
