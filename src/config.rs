use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::Vec3;
use crate::error::{Error, Result};

/// Config file looked up in the working directory at startup.
pub const CONFIG_FILE: &str = "dipole-match.json";

// ---------------------------------------------------------------------------
// RunConfig – everything a single search run needs
// ---------------------------------------------------------------------------

/// Top-level run configuration. Every field has a default, so a partial JSON
/// file only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Four-column measurement CSV.
    pub measurements_path: PathBuf,
    /// One frequency per line.
    pub frequencies_path: PathBuf,
    /// Sensor (dot) position shared by every measurement row.
    pub dot_position: Vec3,
    pub model: ModelConfig,
    pub search: SearchConfig,
    /// Directory the timestamped output file is written to.
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            measurements_path: PathBuf::from("../processedNicholData.csv"),
            frequencies_path: PathBuf::from("../frequency_inputs.txt"),
            dot_position: [0.0, 0.0, 0.0],
            model: ModelConfig::default(),
            search: SearchConfig::default(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl RunConfig {
    /// Load from a JSON file and validate.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: RunConfig = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load [`CONFIG_FILE`] from `dir` if it exists, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<(Self, Option<PathBuf>)> {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            Ok((Self::from_path(&candidate)?, Some(candidate)))
        } else {
            Ok((Self::default(), None))
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.search.validate()?;
        if self.dot_position.iter().any(|c| !c.is_finite()) {
            return Err(Error::InvalidConfig("dot_position must be finite".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ModelConfig – dipole ensemble geometry
// ---------------------------------------------------------------------------

/// Which orientation rule the ensemble uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    FreeOrientation,
    ZAligned,
    XAligned,
}

/// Distance units are 10 nm; the defaults encode the device geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    pub kind: ModelKind,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub z_range: (f64, f64),
    /// Switching rate is `10^u` with `u` uniform in this range.
    pub rate_exponent_range: (f64, f64),
    /// Dipole magnitude is `10^moment_exponent`.
    pub moment_exponent: f64,
    pub filled_slots: usize,
    pub total_slots: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            kind: ModelKind::ZAligned,
            x_range: (-10.0, 10.0),
            y_range: (-17.5, 17.5),
            z_range: (5.0, 7.5),
            rate_exponent_range: (-5.0, 6.5),
            moment_exponent: 3.5,
            filled_slots: 31,
            total_slots: 40,
        }
    }
}

impl ModelConfig {
    /// Probability that any single slot holds a dipole.
    pub fn fill_fraction(&self) -> f64 {
        self.filled_slots as f64 / self.total_slots as f64
    }

    pub fn validate(&self) -> Result<()> {
        let ranges = [
            ("x_range", self.x_range),
            ("y_range", self.y_range),
            ("z_range", self.z_range),
            ("rate_exponent_range", self.rate_exponent_range),
        ];
        for (name, (lo, hi)) in ranges {
            if !(lo.is_finite() && hi.is_finite()) || lo > hi {
                return Err(Error::InvalidConfig(format!(
                    "model.{name} must be finite and ordered, got ({lo}, {hi})"
                )));
            }
        }
        if !self.moment_exponent.is_finite() {
            return Err(Error::InvalidConfig("model.moment_exponent must be finite".into()));
        }
        if self.total_slots == 0 {
            return Err(Error::InvalidConfig("model.total_slots must be positive".into()));
        }
        if self.filled_slots > self.total_slots {
            return Err(Error::InvalidConfig(format!(
                "model.filled_slots ({}) exceeds total_slots ({})",
                self.filled_slots, self.total_slots
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SearchConfig – Monte Carlo budget and stopping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Candidates drawn per filter invocation.
    pub batch_size: usize,
    /// Filter invocations per step.
    pub cycles_per_step: usize,
    pub max_steps: usize,
    /// Searching continues while cumulative successes `<=` this value.
    pub success_target: usize,
    /// Root of the seed sequence.
    pub seed: u64,
    /// Worker pool size; defaults to available parallelism minus one.
    pub workers: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            batch_size: 5000,
            cycles_per_step: 2750,
            max_steps: 20,
            success_target: 10,
            seed: 42,
            workers: None,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("search.batch_size must be positive".into()));
        }
        if self.cycles_per_step == 0 {
            return Err(Error::InvalidConfig("search.cycles_per_step must be positive".into()));
        }
        if self.workers == Some(0) {
            return Err(Error::InvalidConfig("search.workers must be positive".into()));
        }
        Ok(())
    }
}
