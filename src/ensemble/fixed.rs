use std::f64::consts::FRAC_PI_2;

use rand::RngCore;

use super::{DipoleModel, SlotSampler};
use crate::data::model::{DipoleConfiguration, Vec3};

/// Fixed-magnitude dipoles sharing one orientation given by polar angle
/// `theta` and azimuth `phi`.
#[derive(Debug, Clone)]
pub struct FixedOrientationModel {
    slots: SlotSampler,
    theta: f64,
    phi: f64,
    direction: Vec3,
}

impl FixedOrientationModel {
    pub fn new(slots: SlotSampler, theta: f64, phi: f64) -> Self {
        let direction = [
            theta.sin() * phi.cos(),
            theta.sin() * phi.sin(),
            theta.cos(),
        ];
        Self {
            slots,
            theta,
            phi,
            direction,
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    fn orientation(&self) -> String {
        if self.theta == 0.0 {
            "z_aligned".to_string()
        } else if self.theta == FRAC_PI_2 && self.phi == 0.0 {
            "x_aligned".to_string()
        } else {
            format!("theta_{}-phi_{}", self.theta, self.phi)
        }
    }
}

impl DipoleModel for FixedOrientationModel {
    fn generate(&self, count: usize, rng: &mut dyn RngCore) -> Vec<DipoleConfiguration> {
        let direction = self.direction;
        (0..count)
            .map(|_| self.slots.configuration(rng, |_| direction))
            .collect()
    }

    fn label(&self) -> String {
        self.slots.label(&self.orientation())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::config::ModelConfig;

    fn full_slots() -> SlotSampler {
        let mut config = ModelConfig::default();
        config.filled_slots = config.total_slots;
        SlotSampler::from_config(&config)
    }

    #[test]
    fn z_aligned_moments_point_along_z() {
        let slots = full_slots();
        let magnitude = slots.magnitude();
        let model = FixedOrientationModel::new(slots, 0.0, 0.0);
        let batch = model.generate(3, &mut ChaCha8Rng::seed_from_u64(5));
        for d in batch.iter().flat_map(|c| &c.dipoles) {
            assert_eq!(d.moment[0], 0.0);
            assert_eq!(d.moment[1], 0.0);
            assert_eq!(d.moment[2], magnitude);
        }
    }

    #[test]
    fn x_aligned_moments_point_along_x() {
        let slots = full_slots();
        let magnitude = slots.magnitude();
        let model = FixedOrientationModel::new(slots, FRAC_PI_2, 0.0);
        assert!(model.label().contains("x_aligned"));
        let batch = model.generate(3, &mut ChaCha8Rng::seed_from_u64(5));
        for d in batch.iter().flat_map(|c| &c.dipoles) {
            assert!((d.moment[0] - magnitude).abs() / magnitude < 1e-12);
            assert!(d.moment[2].abs() / magnitude < 1e-12);
        }
    }
}
