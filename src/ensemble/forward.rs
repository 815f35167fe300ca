use std::f64::consts::PI;

use super::ForwardModel;
use crate::data::model::{Dipole, DipoleConfiguration, Measurement, Vec3};

/// Telegraph-noise forward model.
///
/// Each dipole contributes `(p·d / |d|³)² · w / (π (f² + w²))`, where
/// `d = r - s` is the sensor offset from the dipole. A candidate's value is
/// the sum over its dipoles; unoccupied slots contribute nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LorentzianForwardModel;

impl LorentzianForwardModel {
    pub fn value(sensor: Vec3, frequency: f64, candidate: &DipoleConfiguration) -> f64 {
        candidate
            .dipoles
            .iter()
            .map(|d| contribution(sensor, frequency, d))
            .sum()
    }
}

fn contribution(sensor: Vec3, frequency: f64, dipole: &Dipole) -> f64 {
    if !dipole.is_occupied() {
        return 0.0;
    }
    let d = [
        sensor[0] - dipole.position[0],
        sensor[1] - dipole.position[1],
        sensor[2] - dipole.position[2],
    ];
    let norm = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
    let alpha = (dipole.moment[0] * d[0] + dipole.moment[1] * d[1] + dipole.moment[2] * d[2])
        / norm.powi(3);
    let w = dipole.rate;
    let lorentzian = w / (PI * (frequency * frequency + w * w));
    alpha * alpha * lorentzian
}

impl ForwardModel for LorentzianForwardModel {
    fn predict(&self, measurement: &Measurement, candidates: &[DipoleConfiguration]) -> Vec<f64> {
        candidates
            .iter()
            .map(|c| Self::value(measurement.sensor_position, measurement.frequency, c))
            .collect()
    }
}
