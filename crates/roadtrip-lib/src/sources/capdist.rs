//! Capital-to-capital distance table.
//!
//! Rows look like `numa,ida,numb,idb,kmdist,midist`; only the two codes and
//! the kilometre column are used. The leading header row is optional.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;
use tracing::{debug, warn};

use crate::country::normalize_code;
use crate::error::Result;

use super::{LoadReport, RecordProblem, SourceKind};

const FROM_CODE: usize = 1;
const TO_CODE: usize = 3;
const DISTANCE_KM: usize = 4;
const REQUIRED_FIELDS: usize = DISTANCE_KM + 1;

/// One capital distance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapitalDistanceRecord {
    pub line: u64,
    pub from: String,
    pub to: String,
    pub distance_km: u32,
}

/// Parse a single CSV record into a capital distance row.
pub fn parse_capital_record(
    line: u64,
    record: &StringRecord,
) -> std::result::Result<CapitalDistanceRecord, RecordProblem> {
    if record.len() < REQUIRED_FIELDS {
        return Err(RecordProblem::TooFewFields {
            found: record.len(),
            expected: REQUIRED_FIELDS,
        });
    }

    let from = required_code(record, FROM_CODE, "first country code")?;
    let to = required_code(record, TO_CODE, "second country code")?;
    let raw_distance = record.get(DISTANCE_KM).unwrap_or_default();
    let distance_km = raw_distance
        .parse::<u32>()
        .map_err(|_| RecordProblem::InvalidDistance {
            value: raw_distance.to_string(),
        })?;

    Ok(CapitalDistanceRecord {
        line,
        from,
        to,
        distance_km,
    })
}

/// Read every capital distance row from `reader`, skipping rows that fail to
/// parse.
pub fn read_capital_distances<R: Read>(
    reader: R,
    report: &mut LoadReport,
) -> Result<Vec<CapitalDistanceRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    let mut row_num: u64 = 0;

    loop {
        row_num += 1;
        match csv_reader.read_record(&mut record) {
            Ok(false) => break,
            Ok(true) => {}
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                let line = err
                    .position()
                    .map(|position| position.line())
                    .unwrap_or(row_num);
                warn!(line, error = %err, "skipping unreadable capital distance row");
                report.record(
                    SourceKind::CapitalDistances,
                    line,
                    RecordProblem::Unreadable {
                        message: err.to_string(),
                    },
                );
                continue;
            }
        }

        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or(row_num);

        if line == 1 && is_header(&record) {
            debug!("skipping capital distance header");
            continue;
        }

        match parse_capital_record(line, &record) {
            Ok(row) => rows.push(row),
            Err(problem) => {
                warn!(line, %problem, "skipping capital distance row");
                report.record(SourceKind::CapitalDistances, line, problem);
            }
        }
    }

    debug!(rows = rows.len(), "parsed capital distance rows");
    Ok(rows)
}

fn required_code(
    record: &StringRecord,
    index: usize,
    field: &'static str,
) -> std::result::Result<String, RecordProblem> {
    let code = normalize_code(record.get(index).unwrap_or_default());
    if code.is_empty() {
        return Err(RecordProblem::EmptyField { field });
    }
    Ok(code)
}

fn is_header(record: &StringRecord) -> bool {
    record
        .get(DISTANCE_KM)
        .map(|value| value.parse::<u32>().is_err())
        .unwrap_or(true)
}
