//! Whitespace text loader and writer for labeled points.
//!
//! ## Purpose
//!
//! This module provides the input and output collaborators of the engine
//! for plain text files: one `x y` record per line on input, one
//! `x y label` record per line on output.
//!
//! ## Design notes
//!
//! * **Streaming**: Both sides work on `BufRead` / `Write`, so files, sockets
//!   and in-memory buffers are handled alike.
//! * **Strict records**: A malformed line is an error that names the line;
//!   it is never skipped silently.
//!
//! ## Invariants
//!
//! * Records are read and written in input order.
//! * Output label `0` denotes noise.
//!
//! ## Non-goals
//!
//! * This module does not detect duplicate points.

use num_traits::Float;
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

use crate::evaluation::partition::DbscanResult;

/// Errors raised by the text loader and writer.
#[derive(Debug, Error)]
pub enum TextError {
    /// Underlying reader or writer failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be parsed.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong with the record.
        message: String,
    },
}

/// Read whitespace-separated `x y` records. Blank lines are skipped.
pub fn read_points<T, R>(reader: R) -> Result<Vec<[T; 2]>, TextError>
where
    T: Float + FromStr,
    <T as FromStr>::Err: Display,
    R: BufRead,
{
    let mut points = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let number = idx + 1;
        let mut fields = line.split_whitespace();

        let Some(first) = fields.next() else {
            continue;
        };
        let x = parse_coordinate::<T>(first, number)?;
        let y = match fields.next() {
            Some(field) => parse_coordinate::<T>(field, number)?,
            None => {
                return Err(TextError::Parse {
                    line: number,
                    message: "expected two coordinates, found one".to_string(),
                });
            }
        };
        if fields.next().is_some() {
            return Err(TextError::Parse {
                line: number,
                message: "expected two coordinates, found more".to_string(),
            });
        }

        points.push([x, y]);
    }

    Ok(points)
}

fn parse_coordinate<T>(field: &str, line: usize) -> Result<T, TextError>
where
    T: Float + FromStr,
    <T as FromStr>::Err: Display,
{
    let value: T = field.parse().map_err(|e| TextError::Parse {
        line,
        message: format!("invalid coordinate {:?}: {}", field, e),
    })?;
    if !value.is_finite() {
        return Err(TextError::Parse {
            line,
            message: format!("non-finite coordinate {:?}", field),
        });
    }
    Ok(value)
}

/// Write one `x y label` line per point, in input order. Returns the number of records.
pub fn write_labeled<T, W>(mut writer: W, result: &DbscanResult<T>) -> Result<usize, TextError>
where
    T: Float + Display,
    W: Write,
{
    let mut written = 0;
    for (x, y, label) in result.triples() {
        writeln!(writer, "{} {} {}", x, y, label)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::partition::RunDiagnostics;
    use std::io::Cursor;

    #[test]
    fn reads_records_and_skips_blank_lines() {
        let input = "1.5 2.0\n\n  -3 4e1  \n0 0\n";
        let points: Vec<[f64; 2]> = read_points(Cursor::new(input)).unwrap();
        assert_eq!(points, vec![[1.5, 2.0], [-3.0, 40.0], [0.0, 0.0]]);
    }

    #[test]
    fn malformed_lines_are_reported_with_line_numbers() {
        let err = read_points::<f64, _>(Cursor::new("1 2\n3\n")).unwrap_err();
        assert!(matches!(err, TextError::Parse { line: 2, .. }));

        let err = read_points::<f64, _>(Cursor::new("1 2 3\n")).unwrap_err();
        assert!(matches!(err, TextError::Parse { line: 1, .. }));

        let err = read_points::<f64, _>(Cursor::new("1 two\n")).unwrap_err();
        assert!(matches!(err, TextError::Parse { line: 1, .. }));

        let err = read_points::<f64, _>(Cursor::new("inf 1\n")).unwrap_err();
        assert!(matches!(err, TextError::Parse { line: 1, .. }));
    }

    #[test]
    fn writes_one_line_per_point() {
        let result = DbscanResult {
            points: vec![[1.0, 2.0], [3.5, 4.0]],
            labels: vec![1, 0],
            core: vec![true, false],
            n_clusters: 1,
            n_noise: 1,
            diagnostics: RunDiagnostics::default(),
        };

        let mut out = Vec::new();
        let written = write_labeled(&mut out, &result).unwrap();

        assert_eq!(written, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "1 2 1\n3.5 4 0\n");
    }
}
