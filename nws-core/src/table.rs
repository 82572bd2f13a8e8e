//! County reference table loaded from a comma-delimited file.
//!
//! The file layout is fixed by column position, not by header name:
//!
//! | index | field            |
//! |-------|------------------|
//! | 0     | state            |
//! | 3     | county FIPS code |
//! | 5     | county name      |
//! | 7     | longitude        |
//! | 8     | latitude         |
//!
//! Rows that do not fit this layout are skipped with a warning; only a file
//! that cannot be opened or read fails the load.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{SkipReason, TableError};

pub const DELIMITER: char = ',';

/// Rows with fewer columns than this are never considered.
pub const MIN_COLUMNS: usize = 4;

pub mod columns {
    pub const STATE: usize = 0;
    pub const COUNTY_FIPS: usize = 3;
    pub const COUNTY: usize = 5;
    pub const LONGITUDE: usize = 7;
    pub const LATITUDE: usize = 8;
}

/// One accepted row of the county table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyRecord {
    pub county: String,
    /// May be empty.
    pub state: String,
    /// May be empty.
    pub county_fips: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CountyRecord {
    /// NWS county zone identifier, e.g. `CAC059`.
    pub fn zone_code(&self) -> Option<String> {
        if self.state.is_empty() || self.county_fips.is_empty() {
            return None;
        }
        Some(format!("{}C{}", self.state.to_ascii_uppercase(), self.county_fips))
    }
}

/// A row that was read but left out of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source.
    pub line_number: usize,
    pub line: String,
    pub reason: SkipReason,
}

/// Result of a load: accepted records in file order plus every skipped row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub records: Vec<CountyRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl LoadReport {
    /// Parse a table from any buffered source.
    ///
    /// Invalid UTF-8 is replaced rather than rejected, so a single bad byte
    /// only affects the row it sits in.
    pub fn from_reader<R: BufRead>(mut reader: R) -> std::io::Result<Self> {
        let mut report = LoadReport::default();
        let mut buf = Vec::new();
        let mut line_number = 0;
        let mut first_line = true;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;

            let text = String::from_utf8_lossy(&buf);
            let line = text.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                continue;
            }

            let fields = split_line(line, DELIMITER);

            if first_line {
                first_line = false;
                if is_header(&fields) {
                    continue;
                }
            }

            match parse_row(&fields) {
                Ok(record) => report.records.push(record),
                Err(reason) => {
                    warn!(line_number, %reason, line, "skipping county table row");
                    report.skipped.push(SkippedRow {
                        line_number,
                        line: line.to_string(),
                        reason,
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Load the county table, discarding the skip report.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<CountyRecord>, TableError> {
    load_with_report(path).map(|report| report.records)
}

/// Load the county table from `path`.
///
/// The file handle lives only for the duration of this call.
pub fn load_with_report(path: impl AsRef<Path>) -> Result<LoadReport, TableError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| TableError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let report = LoadReport::from_reader(BufReader::new(file)).map_err(|source| {
        TableError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(
        path = %path.display(),
        records = report.records.len(),
        skipped = report.skipped.len(),
        "loaded county table"
    );

    Ok(report)
}

/// Split one line into trimmed fields.
///
/// A `"` toggles quoting and is dropped from the output; the delimiter only
/// ends a field outside quotes.
pub fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// First-line heuristic: data rows start with a digit or a minus sign.
fn is_header(fields: &[String]) -> bool {
    let first = fields.first().map(|f| f.trim()).unwrap_or_default();
    !first.starts_with(|c: char| c.is_ascii_digit() || c == '-')
}

/// Turn split fields into a record, or say why the row does not qualify.
pub fn parse_row(fields: &[String]) -> Result<CountyRecord, SkipReason> {
    if fields.len() < MIN_COLUMNS {
        return Err(SkipReason::TooFewColumns { found: fields.len() });
    }

    let column = |index: usize| {
        fields
            .get(index)
            .map(String::as_str)
            .ok_or(SkipReason::MissingColumn { index })
    };

    let county = column(columns::COUNTY)?;
    let latitude = parse_coordinate(column(columns::LATITUDE)?, columns::LATITUDE)?;
    let longitude = parse_coordinate(column(columns::LONGITUDE)?, columns::LONGITUDE)?;

    if county.is_empty() {
        return Err(SkipReason::EmptyName);
    }

    Ok(CountyRecord {
        county: county.to_string(),
        state: fields[columns::STATE].clone(),
        county_fips: fields[columns::COUNTY_FIPS].clone(),
        latitude,
        longitude,
    })
}

fn parse_coordinate(value: &str, column: usize) -> Result<f64, SkipReason> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(SkipReason::InvalidNumber {
            column,
            value: value.to_string(),
        }),
    }
}
