//! Parsers for the three country datasets.
//!
//! Each format has a small explicit grammar:
//! - [`borders`] - `Country (Alias) = Neighbour 123 km; ...` adjacency lines
//! - [`capdist`] - comma-separated capital-to-capital distances keyed by code
//! - [`registry`] - tab-separated country codes, names and validity windows
//!
//! Parsers return structured records. A malformed line never aborts a load; it
//! is turned into a [`RecordError`] and collected in the [`LoadReport`].

pub mod borders;
pub mod capdist;
pub mod registry;

pub use borders::{parse_border_record, read_borders, BorderEntry, BorderRecord};
pub use capdist::{read_capital_distances, CapitalDistanceRecord};
pub use registry::{read_registry, RegistryRecord};

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Identifies which dataset a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Borders,
    CapitalDistances,
    Registry,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SourceKind::Borders => "borders",
            SourceKind::CapitalDistances => "capital distances",
            SourceKind::Registry => "country registry",
        };
        f.write_str(value)
    }
}

/// What was wrong with a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum RecordProblem {
    #[error("record has no country name")]
    MissingCountryName,

    #[error("border entry '{entry}' has no parseable distance")]
    MissingDistance { entry: String },

    #[error("record has {found} fields, expected at least {expected}")]
    TooFewFields { found: usize, expected: usize },

    #[error("{field} field is empty")]
    EmptyField { field: &'static str },

    #[error("distance '{value}' is not a whole number of kilometres")]
    InvalidDistance { value: String },

    #[error("date '{value}' is not in YYYY-MM-DD form")]
    InvalidDate { value: String },

    #[error("record for '{name}' replaces an earlier record")]
    DuplicateCountry { name: String },

    #[error("unreadable record: {message}")]
    Unreadable { message: String },
}

/// Recoverable, per-line parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{source_kind} line {line}: {problem}")]
pub struct RecordError {
    pub source_kind: SourceKind,
    pub line: u64,
    pub problem: RecordProblem,
}

/// Everything that was skipped or patched up while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub issues: Vec<RecordError>,
}

impl LoadReport {
    pub fn record(&mut self, source_kind: SourceKind, line: u64, problem: RecordProblem) {
        self.issues.push(RecordError {
            source_kind,
            line,
            problem,
        });
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues raised by a particular source.
    pub fn count_for(&self, source_kind: SourceKind) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.source_kind == source_kind)
            .count()
    }
}
