use std::f64::consts::TAU;

use rand::{Rng, RngCore};

use super::{DipoleModel, SlotSampler};
use crate::data::model::{DipoleConfiguration, Vec3};

/// Fixed-magnitude dipoles pointing in a uniformly random direction.
#[derive(Debug, Clone)]
pub struct FreeOrientationModel {
    slots: SlotSampler,
}

impl FreeOrientationModel {
    pub fn new(slots: SlotSampler) -> Self {
        Self { slots }
    }
}

/// Uniform point on the unit sphere.
fn random_direction(rng: &mut dyn RngCore) -> Vec3 {
    let cos_theta: f64 = rng.gen_range(-1.0..=1.0);
    let phi: f64 = rng.gen_range(0.0..TAU);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    [sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta]
}

impl DipoleModel for FreeOrientationModel {
    fn generate(&self, count: usize, rng: &mut dyn RngCore) -> Vec<DipoleConfiguration> {
        (0..count)
            .map(|_| self.slots.configuration(rng, random_direction))
            .collect()
    }

    fn label(&self) -> String {
        self.slots.label("free_orientation")
    }
}
