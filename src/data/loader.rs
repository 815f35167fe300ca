use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use super::model::{Measurement, Vec3};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Measurement CSV
// ---------------------------------------------------------------------------

/// Load range measurements from a headerless four-column CSV:
///
/// ```text
/// frequency, mean_value (ignored), lower_bound, upper_bound
/// ```
///
/// Every row is taken at the same `dot_position`. Row order is preserved and
/// each row is validated; any bad row aborts the whole load.
pub fn read_measurements(path: &Path, dot_position: Vec3) -> Result<Vec<Measurement>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let mut measurements = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map_or(0, |p| p.line() as usize);
        let measurement = parse_row(&record, dot_position)
            .map_err(|reason| Error::MalformedInput {
                path: path.to_path_buf(),
                line,
                reason,
            })?;
        measurement.validate(measurements.len())?;
        measurements.push(measurement);
    }
    Ok(measurements)
}

fn parse_row(record: &StringRecord, dot_position: Vec3) -> std::result::Result<Measurement, String> {
    if record.len() != 4 {
        return Err(format!("expected 4 columns, found {}", record.len()));
    }
    let field = |idx: usize, name: &str| -> std::result::Result<f64, String> {
        let raw = &record[idx];
        raw.parse::<f64>()
            .map_err(|_| format!("{name} '{raw}' is not a number"))
    };
    let frequency = field(0, "frequency")?;
    field(1, "value")?;
    Ok(Measurement {
        frequency,
        sensor_position: dot_position,
        lower_bound: field(2, "lower_bound")?,
        upper_bound: field(3, "upper_bound")?,
    })
}

fn csv_error(path: &Path, err: csv::Error) -> Error {
    let line = err.position().map_or(0, |p| p.line() as usize);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => Error::io(path, source),
        other => Error::MalformedInput {
            path: path.to_path_buf(),
            line,
            reason: format!("{other:?}"),
        },
    }
}

// ---------------------------------------------------------------------------
// Frequency list
// ---------------------------------------------------------------------------

/// Load the evaluation frequency grid: one float per line, blank lines
/// ignored.
pub fn read_frequencies(path: &Path) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    text.lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| {
            let tok = l.trim();
            tok.parse::<f64>().map_err(|_| Error::MalformedInput {
                path: path.to_path_buf(),
                line: i + 1,
                reason: format!("frequency '{tok}' is not a number"),
            })
        })
        .collect()
}

/// Measurement frequencies that do not appear in `grid` (relative tolerance
/// 1e-9), in measurement order.
pub fn frequencies_off_grid(measurements: &[Measurement], grid: &[f64]) -> Vec<f64> {
    measurements
        .iter()
        .map(|m| m.frequency)
        .filter(|f| {
            !grid
                .iter()
                .any(|g| (g - f).abs() <= 1e-9 * f.abs().max(g.abs()))
        })
        .collect()
}
