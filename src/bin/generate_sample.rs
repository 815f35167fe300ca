//! Writes a synthetic measurement set that a known dipole configuration
//! satisfies, so the search can be exercised without lab data.
//!
//! Produces `frequency_inputs.txt` and `processedNicholData.csv` in the
//! working directory.

use std::fs::File;
use std::io::{BufWriter, Write};

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use dipole_match::config::ModelConfig;
use dipole_match::ensemble::{self, LorentzianForwardModel};

const FREQUENCY_FILE: &str = "frequency_inputs.txt";
const MEASUREMENT_FILE: &str = "processedNicholData.csv";

/// Multiplicative half-width of each synthetic bound.
const BAND: f64 = 3.0;

/// Log-spaced grid from 10^lo to 10^hi inclusive.
fn log_grid(lo: f64, hi: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 10f64.powf(lo + (hi - lo) * i as f64 / (n - 1) as f64))
        .collect()
}

fn main() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let dot = [0.0, 0.0, 0.0];

    let frequencies = log_grid(-1.0, 4.0, 21);
    let mut freq_out = BufWriter::new(File::create(FREQUENCY_FILE).context("creating frequency file")?);
    for f in &frequencies {
        writeln!(freq_out, "{f}")?;
    }
    freq_out.flush()?;

    let model = ensemble::build(&ModelConfig::default());
    let truth = model
        .generate(1, &mut rng)
        .pop()
        .context("model produced no configuration")?;

    // Every other grid point is "measured".
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(MEASUREMENT_FILE)
        .context("creating measurement file")?;
    let mut rows = 0;
    for &f in frequencies.iter().step_by(2) {
        let value = LorentzianForwardModel::value(dot, f, &truth);
        if !(value.is_finite() && value > 0.0) {
            continue;
        }
        let mean = value * rng.gen_range(0.9..1.1);
        writer.write_record(&[
            f.to_string(),
            mean.to_string(),
            (value / BAND).to_string(),
            (value * BAND).to_string(),
        ])?;
        rows += 1;
    }
    writer.flush()?;

    println!(
        "Wrote {} frequencies to {FREQUENCY_FILE} and {rows} measurements to {MEASUREMENT_FILE}",
        frequencies.len()
    );
    println!("Ground truth ({}, {} occupied slots):", model.label(), truth.occupied());
    for d in truth.dipoles.iter().filter(|d| d.is_occupied()) {
        println!("  p={:?} s={:?} w={:.4e}", d.moment, d.position, d.rate);
    }
    Ok(())
}
