use std::fmt::Write as _;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tempfile::NamedTempFile;

use super::model::DipoleConfiguration;
use crate::error::{Error, Result};
use crate::search::SearchOutcome;

/// `output-<YYYYMMDD-HHMMSS>.txt`
pub fn output_file_name(at: DateTime<Local>) -> String {
    format!("output-{}.txt", at.format("%Y%m%d-%H%M%S"))
}

/// One comma-separated line per candidate, no brackets or embedded newlines.
pub fn format_match_line(candidate: &DipoleConfiguration) -> String {
    let mut line = String::new();
    for (i, v) in candidate.to_flat().iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        let _ = write!(line, "{v}");
    }
    line
}

/// Parse a line written by [`format_match_line`] back into its values.
pub fn read_match_line(line: &str) -> std::result::Result<Vec<f64>, std::num::ParseFloatError> {
    line.trim()
        .split(',')
        .map(|tok| tok.trim().parse::<f64>())
        .collect()
}

/// Write every surviving candidate of `outcome` to a timestamped file in
/// `dir`, returning its path.
///
/// Lines go to a temporary file in the same directory that is renamed into
/// place once complete, so a failed write leaves no partial output.
pub fn write_matches(dir: &Path, outcome: &SearchOutcome, at: DateTime<Local>) -> Result<PathBuf> {
    let path = dir.join(output_file_name(at));
    let tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;

    let mut writer = BufWriter::new(tmp);
    for set in outcome.match_sets() {
        for candidate in set.survivors() {
            writeln!(writer, "{}", format_match_line(candidate)).map_err(|e| Error::io(&path, e))?;
        }
    }
    let tmp = writer
        .into_inner()
        .map_err(|e| Error::io(&path, e.into_error()))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(&path, e))?;
    tmp.persist(&path).map_err(|e| Error::io(&path, e.error))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::data::model::{Dipole, MatchSet};
    use crate::search::Seed;

    fn candidate(scale: f64) -> DipoleConfiguration {
        DipoleConfiguration::new(vec![
            Dipole {
                moment: [0.0, 0.0, 3162.2776601683795 * scale],
                position: [-9.25, 17.125, 5.5],
                rate: 1.234e-5,
            },
            Dipole {
                moment: [0.0; 3],
                position: [0.1, 0.2, 0.3],
                rate: 6.5e6,
            },
        ])
    }

    #[test]
    fn file_name_uses_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(output_file_name(at), "output-20240309-070501.txt");
    }

    #[test]
    fn line_round_trips() {
        let c = candidate(1.0);
        let line = format_match_line(&c);
        assert!(!line.contains('\n'));
        assert!(!line.contains('['));
        let values = read_match_line(&line).unwrap();
        let original = c.to_flat();
        assert_eq!(values.len(), original.len());
        for (a, b) in values.iter().zip(&original) {
            assert!((a - b).abs() <= 1e-12 * b.abs().max(1.0));
        }
    }

    #[test]
    fn writes_one_line_per_survivor() {
        let dir = tempfile::tempdir().unwrap();
        let sets = vec![
            MatchSet::new(Seed::new(1, 0), vec![candidate(1.0), candidate(2.0)]).unwrap(),
            MatchSet::new(Seed::new(1, 4), vec![candidate(3.0)]).unwrap(),
        ];
        let outcome = SearchOutcome {
            steps: vec![sets],
            steps_taken: 1,
            successes: 2,
            candidates_drawn: 30,
        };
        let at = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let path = write_matches(dir.path(), &outcome, at).unwrap();

        assert_eq!(path.file_name().unwrap(), "output-20240102-030405.txt");
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        let third = DipoleConfiguration::from_flat(&read_match_line(lines[2]).unwrap()).unwrap();
        assert_eq!(third, candidate(3.0));

        // Only the renamed output remains in the directory.
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
