//! CSV table parsing
//!
//! Simulation output files share one layout:
//!
//! ```text
//! ,0,1,2          <- header: entity indices, only its width matters
//! 0,5.0,3.0,4.0   <- timestep, then one value per entity
//! 1,4.0,3.5,4.5
//! ```

use crate::loader::LoadError;
use crate::models::grid::{Grid, MetricGrid};
use std::path::Path;

/// One parsed CSV file: its timestep column and its value grid
#[derive(Debug, Clone, PartialEq)]
pub struct MetricTable {
    pub timesteps: Vec<f64>,
    pub grid: MetricGrid,
}

/// Read and parse one simulation output file
pub fn read_table(path: &Path) -> Result<MetricTable, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(path, &bytes)
}

/// Parse the bytes of a simulation output file
///
/// `path` is only used to label errors.
///
/// # Errors
///
/// `LoadError::Parse` (naming the 1-based line) when:
/// - the file is empty or its header names no entity column
/// - there are no data rows
/// - a row's column count differs from the header's
/// - a token is not a finite number
/// - timesteps do not strictly increase
pub fn parse_table(path: &Path, bytes: &[u8]) -> Result<MetricTable, LoadError> {
    let parse_error = |line: u64, message: String| LoadError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let width = reader
        .headers()
        .map_err(|e| parse_error(csv_line(&e), e.to_string()))?
        .len();
    match width {
        0 => return Err(parse_error(1, "empty file".to_string())),
        1 => {
            return Err(parse_error(
                1,
                "header names no entity columns".to_string(),
            ))
        }
        _ => {}
    }

    let mut timesteps: Vec<f64> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for result in reader.records() {
        let record = result.map_err(|e| parse_error(csv_line(&e), e.to_string()))?;
        let line = record.position().map_or(0, |p| p.line());

        if record.len() != width {
            return Err(parse_error(
                line,
                format!("expected {} columns, found {}", width, record.len()),
            ));
        }

        let timestep = parse_number(&record[0]).map_err(|message| parse_error(line, message))?;

        if let Some(&previous) = timesteps.last() {
            if timestep <= previous {
                return Err(parse_error(
                    line,
                    format!("timestep {timestep} does not follow {previous}"),
                ));
            }
        }

        let values = record
            .iter()
            .skip(1)
            .map(parse_number)
            .collect::<Result<Vec<f64>, String>>()
            .map_err(|message| parse_error(line, message))?;

        timesteps.push(timestep);
        rows.push(values);
    }

    if rows.is_empty() {
        return Err(parse_error(2, "no data rows".to_string()));
    }

    let grid = Grid::from_rows(rows).map_err(|e| parse_error(e.row as u64 + 2, e.to_string()))?;

    Ok(MetricTable { timesteps, grid })
}

fn parse_number(token: &str) -> Result<f64, String> {
    let value: f64 = token
        .parse()
        .map_err(|_| format!("invalid number '{token}'"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("non-finite number '{token}'"))
    }
}

fn csv_line(error: &csv::Error) -> u64 {
    error.position().map_or(0, |p| p.line())
}
