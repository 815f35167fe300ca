use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::search::seed::Seed;

/// Cartesian 3-vector in the geometry's length unit (10 nm).
pub type Vec3 = [f64; 3];

// ---------------------------------------------------------------------------
// Measurement – one (frequency, sensor position) bound pair
// ---------------------------------------------------------------------------

/// A measured noise bound at a single frequency and sensor position.
///
/// Order of a measurement list is the order filters are applied in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub frequency: f64,
    pub sensor_position: Vec3,
    /// Exclusive lower bound.
    pub lower_bound: f64,
    /// Exclusive upper bound.
    pub upper_bound: f64,
}

impl Measurement {
    /// Whether `value` lies strictly inside the bounds. NaN never does.
    #[inline]
    pub fn admits(&self, value: f64) -> bool {
        value > self.lower_bound && value < self.upper_bound
    }

    /// Reject inverted, degenerate, or non-finite bounds.
    ///
    /// `index` is the position in the measurement list and is only used for
    /// the error report.
    pub fn validate(&self, index: usize) -> Result<()> {
        let finite = self.lower_bound.is_finite() && self.upper_bound.is_finite();
        if !finite || self.lower_bound >= self.upper_bound {
            return Err(Error::InvalidMeasurement {
                index,
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dipole / DipoleConfiguration – candidates produced by a DipoleModel
// ---------------------------------------------------------------------------

/// Number of scalars a single dipole flattens to.
pub const DIPOLE_WIDTH: usize = 7;

/// A single fluctuating point dipole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dipole {
    /// Dipole moment. Zero for an unoccupied slot.
    pub moment: Vec3,
    pub position: Vec3,
    /// Switching rate `w`.
    pub rate: f64,
}

impl Dipole {
    pub fn is_occupied(&self) -> bool {
        self.moment.iter().any(|&c| c != 0.0)
    }
}

/// One candidate: a fixed number of dipole slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DipoleConfiguration {
    pub dipoles: Vec<Dipole>,
}

impl DipoleConfiguration {
    pub fn new(dipoles: Vec<Dipole>) -> Self {
        Self { dipoles }
    }

    /// Number of slots with a non-zero moment.
    pub fn occupied(&self) -> usize {
        self.dipoles.iter().filter(|d| d.is_occupied()).count()
    }

    /// Row-major flattening: `px,py,pz,sx,sy,sz,w` per dipole.
    pub fn to_flat(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.dipoles.len() * DIPOLE_WIDTH);
        for d in &self.dipoles {
            out.extend_from_slice(&d.moment);
            out.extend_from_slice(&d.position);
            out.push(d.rate);
        }
        out
    }

    /// Inverse of [`to_flat`](Self::to_flat). `None` if the length is not a
    /// multiple of [`DIPOLE_WIDTH`].
    pub fn from_flat(values: &[f64]) -> Option<Self> {
        if values.len() % DIPOLE_WIDTH != 0 {
            return None;
        }
        let dipoles = values
            .chunks_exact(DIPOLE_WIDTH)
            .map(|c| Dipole {
                moment: [c[0], c[1], c[2]],
                position: [c[3], c[4], c[5]],
                rate: c[6],
            })
            .collect();
        Some(Self { dipoles })
    }
}

// ---------------------------------------------------------------------------
// MatchSet – surviving candidates of one filter invocation
// ---------------------------------------------------------------------------

/// Non-empty survivors of one filter invocation, tagged with the seed that
/// produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSet {
    seed: Seed,
    survivors: Vec<DipoleConfiguration>,
}

impl MatchSet {
    /// Returns `None` for an empty survivor list.
    pub fn new(seed: Seed, survivors: Vec<DipoleConfiguration>) -> Option<Self> {
        if survivors.is_empty() {
            None
        } else {
            Some(Self { seed, survivors })
        }
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn survivors(&self) -> &[DipoleConfiguration] {
        &self.survivors
    }

    pub fn len(&self) -> usize {
        self.survivors.len()
    }

    /// Always `false`; provided for API symmetry with [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        self.survivors.is_empty()
    }
}

impl fmt::Display for MatchSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} match(es) from seed {}", self.survivors.len(), self.seed)
    }
}
