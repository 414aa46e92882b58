//! Country code registry.
//!
//! Tab-separated rows `statenum  stateabb  countryname  start  end` behind a
//! single header row. A code may appear several times when a country was
//! renamed; each row carries its validity window.

use std::io::Read;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, warn};

use crate::country::normalize_code;
use crate::error::Result;

use super::{LoadReport, RecordProblem, SourceKind};

const CODE: usize = 1;
const NAME: usize = 2;
const START: usize = 3;
const END: usize = 4;
const REQUIRED_FIELDS: usize = END + 1;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One registry row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryRecord {
    pub line: u64,
    pub code: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Parse a single registry row.
pub fn parse_registry_record(
    line: u64,
    record: &StringRecord,
) -> std::result::Result<RegistryRecord, RecordProblem> {
    if record.len() < REQUIRED_FIELDS {
        return Err(RecordProblem::TooFewFields {
            found: record.len(),
            expected: REQUIRED_FIELDS,
        });
    }

    let code = normalize_code(record.get(CODE).unwrap_or_default());
    if code.is_empty() {
        return Err(RecordProblem::EmptyField { field: "code" });
    }
    let name = record.get(NAME).unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return Err(RecordProblem::EmptyField { field: "name" });
    }

    Ok(RegistryRecord {
        line,
        code,
        name,
        start: parse_date(record.get(START).unwrap_or_default())?,
        end: parse_date(record.get(END).unwrap_or_default())?,
    })
}

/// Read every registry row from `reader`. The first row is treated as a
/// header and never parsed.
pub fn read_registry<R: Read>(reader: R, report: &mut LoadReport) -> Result<Vec<RegistryRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        // Row 1 is the header.
        let fallback_line = index as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                let line = err
                    .position()
                    .map(|position| position.line())
                    .unwrap_or(fallback_line);
                warn!(line, error = %err, "skipping unreadable registry row");
                report.record(
                    SourceKind::Registry,
                    line,
                    RecordProblem::Unreadable {
                        message: err.to_string(),
                    },
                );
                continue;
            }
        };

        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or(fallback_line);
        match parse_registry_record(line, &record) {
            Ok(row) => rows.push(row),
            Err(problem) => {
                warn!(line, %problem, "skipping registry row");
                report.record(SourceKind::Registry, line, problem);
            }
        }
    }

    debug!(rows = rows.len(), "parsed registry rows");
    Ok(rows)
}

fn parse_date(value: &str) -> std::result::Result<NaiveDate, RecordProblem> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| RecordProblem::InvalidDate {
        value: value.to_string(),
    })
}
