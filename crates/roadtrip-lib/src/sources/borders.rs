//! Border adjacency lines.
//!
//! Grammar, one record per line:
//!
//! ```text
//! record  := country [ " (" alias ")" ] [ " = " entries ]
//! entries := entry { ";" entry }
//! entry   := neighbour [ distance ] " km"
//! ```
//!
//! Distances may use thousands separators (`2,670 km`). An entry whose
//! distance cannot be read keeps its neighbour with an unknown distance.

use std::io::{BufRead, BufReader, Read};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;

use super::{LoadReport, RecordProblem, SourceKind};

const ENTRY_SEPARATOR: char = ';';
const RECORD_SEPARATOR: &str = " = ";
const DISTANCE_MARKER: &str = " km";

/// One neighbour listed on a border record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorderEntry {
    pub neighbour: String,
    /// Border length in kilometres, `None` when the entry had no usable number.
    pub distance_km: Option<u32>,
}

/// A parsed border line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorderRecord {
    pub line: u64,
    pub country: String,
    pub alias: Option<String>,
    pub entries: Vec<BorderEntry>,
}

/// Parse a single border line. Blank lines yield `Ok(None)`.
pub fn parse_border_record(
    line: u64,
    text: &str,
) -> std::result::Result<Option<BorderRecord>, RecordProblem> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let text = text.trim_end();
    if text.trim_start().starts_with('=') {
        return Err(RecordProblem::MissingCountryName);
    }

    let (country_part, entries_part) = match text.split_once(RECORD_SEPARATOR) {
        Some((country, entries)) => (country, entries),
        None => (text.strip_suffix('=').unwrap_or(text), ""),
    };

    let (country, alias) = split_alias(country_part);
    if country.is_empty() {
        return Err(RecordProblem::MissingCountryName);
    }

    let entries = entries_part
        .split(ENTRY_SEPARATOR)
        .filter_map(parse_entry)
        .collect();

    Ok(Some(BorderRecord {
        line,
        country,
        alias,
        entries,
    }))
}

/// Read every border record from `reader`.
///
/// Lines are decoded lossily so a stray non-UTF-8 byte only affects the name it
/// appears in. Only I/O failures are fatal.
pub fn read_borders<R: Read>(reader: R, report: &mut LoadReport) -> Result<Vec<BorderRecord>> {
    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::new();
    let mut records = Vec::new();
    let mut line: u64 = 0;

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        line += 1;
        let text = String::from_utf8_lossy(&buffer);

        match parse_border_record(line, &text) {
            Ok(Some(record)) => {
                for entry in record.entries.iter().filter(|e| e.distance_km.is_none()) {
                    debug!(line, country = %record.country, neighbour = %entry.neighbour, "border entry without distance");
                    report.record(
                        SourceKind::Borders,
                        line,
                        RecordProblem::MissingDistance {
                            entry: entry.neighbour.clone(),
                        },
                    );
                }
                records.push(record);
            }
            Ok(None) => {}
            Err(problem) => {
                warn!(line, %problem, "skipping border record");
                report.record(SourceKind::Borders, line, problem);
            }
        }
    }

    debug!(records = records.len(), "parsed border records");
    Ok(records)
}

fn split_alias(token: &str) -> (String, Option<String>) {
    let token = token.trim();
    match token.split_once(" (") {
        Some((primary, rest)) => {
            let alias = rest.trim().trim_end_matches(')').trim();
            let alias = (!alias.is_empty()).then(|| alias.to_string());
            (primary.trim().to_string(), alias)
        }
        None => (token.to_string(), None),
    }
}

fn parse_entry(entry: &str) -> Option<BorderEntry> {
    let entry = entry.trim();
    if entry.is_empty() {
        return None;
    }

    let Some(marker) = entry.rfind(DISTANCE_MARKER) else {
        return Some(BorderEntry {
            neighbour: entry.to_string(),
            distance_km: None,
        });
    };

    let head = entry[..marker].trim_end();
    if let Some((name, token)) = head.rsplit_once(char::is_whitespace) {
        let name = name.trim_end();
        if let Some(distance) = parse_kilometres(token) {
            if !name.is_empty() {
                return Some(BorderEntry {
                    neighbour: name.to_string(),
                    distance_km: Some(distance),
                });
            }
        }
    }

    if head.is_empty() {
        return None;
    }
    Some(BorderEntry {
        neighbour: head.to_string(),
        distance_km: None,
    })
}

/// Parse a kilometre figure such as `2,670` or `1.5` (rounded to the nearest km).
fn parse_kilometres(token: &str) -> Option<u32> {
    let digits: String = token.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() {
        return None;
    }
    if let Ok(value) = digits.parse::<u32>() {
        return Some(value);
    }
    let value = digits.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value.round() as u32)
}
