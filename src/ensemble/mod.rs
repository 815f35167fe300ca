//! Random dipole ensembles and the forward model that scores them.
//!
//! A [`DipoleModel`] only knows how to draw candidates; a [`ForwardModel`]
//! turns a candidate and a measurement into a predicted value. The search
//! engine depends on both through these traits, so tests can substitute
//! stubs with known values.

pub mod fixed;
pub mod forward;
pub mod free;

use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

use rand::{Rng, RngCore};

use crate::config::{ModelConfig, ModelKind};
use crate::data::model::{Dipole, DipoleConfiguration, Measurement, Vec3};

pub use fixed::FixedOrientationModel;
pub use forward::LorentzianForwardModel;
pub use free::FreeOrientationModel;

/// Generative model of candidate dipole configurations.
pub trait DipoleModel: Send + Sync {
    /// Draw `count` independent configurations using `rng` as the only
    /// source of randomness.
    fn generate(&self, count: usize, rng: &mut dyn RngCore) -> Vec<DipoleConfiguration>;

    /// Human-readable name used in logs.
    fn label(&self) -> String;
}

/// Maps (measurement, candidates) to one predicted value per candidate.
pub trait ForwardModel: Send + Sync {
    fn predict(&self, measurement: &Measurement, candidates: &[DipoleConfiguration]) -> Vec<f64>;
}

/// Build the configured ensemble variant.
pub fn build(config: &ModelConfig) -> Arc<dyn DipoleModel> {
    let slots = SlotSampler::from_config(config);
    match config.kind {
        ModelKind::FreeOrientation => Arc::new(FreeOrientationModel::new(slots)),
        ModelKind::ZAligned => Arc::new(FixedOrientationModel::new(slots, 0.0, 0.0)),
        ModelKind::XAligned => Arc::new(FixedOrientationModel::new(slots, FRAC_PI_2, 0.0)),
    }
}

// ---------------------------------------------------------------------------
// SlotSampler – geometry shared by every orientation rule
// ---------------------------------------------------------------------------

/// Draws slot occupancy, position, and rate. The orientation rule supplies
/// the unit direction of the moment.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotSampler {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub z_range: (f64, f64),
    pub rate_exponent_range: (f64, f64),
    pub moment_exponent: f64,
    pub filled_slots: usize,
    pub total_slots: usize,
}

impl SlotSampler {
    pub fn from_config(config: &ModelConfig) -> Self {
        Self {
            x_range: config.x_range,
            y_range: config.y_range,
            z_range: config.z_range,
            rate_exponent_range: config.rate_exponent_range,
            moment_exponent: config.moment_exponent,
            filled_slots: config.filled_slots,
            total_slots: config.total_slots,
        }
    }

    pub fn magnitude(&self) -> f64 {
        10f64.powf(self.moment_exponent)
    }

    pub fn occupancy(&self) -> f64 {
        self.filled_slots as f64 / self.total_slots as f64
    }

    /// `connors_geom-<orientation>-pfixexp_<e>-dipole_count_<filled>-<total>`
    pub fn label(&self, orientation: &str) -> String {
        format!(
            "connors_geom-{orientation}-pfixexp_{}-dipole_count_{}-{}",
            self.moment_exponent, self.filled_slots, self.total_slots
        )
    }

    /// Draw a full configuration, asking `direction` for each slot's unit
    /// moment direction.
    pub(crate) fn configuration<F>(
        &self,
        rng: &mut dyn RngCore,
        mut direction: F,
    ) -> DipoleConfiguration
    where
        F: FnMut(&mut dyn RngCore) -> Vec3,
    {
        let magnitude = self.magnitude();
        let occupancy = self.occupancy();
        let dipoles = (0..self.total_slots)
            .map(|_| {
                let occupied = rng.gen::<f64>() < occupancy;
                let position = [
                    uniform(rng, self.x_range),
                    uniform(rng, self.y_range),
                    uniform(rng, self.z_range),
                ];
                let rate = 10f64.powf(uniform(rng, self.rate_exponent_range));
                let unit = direction(&mut *rng);
                let scale = if occupied { magnitude } else { 0.0 };
                Dipole {
                    moment: [unit[0] * scale, unit[1] * scale, unit[2] * scale],
                    position,
                    rate,
                }
            })
            .collect();
        DipoleConfiguration::new(dipoles)
    }
}

fn uniform(rng: &mut dyn RngCore, (lo, hi): (f64, f64)) -> f64 {
    rng.gen_range(lo..=hi)
}
