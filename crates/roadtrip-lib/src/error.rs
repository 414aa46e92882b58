use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the road trip library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Per-record problems in the source files never surface here; they are
/// collected in a [`crate::LoadReport`] instead.
#[derive(Debug, Error)]
pub enum Error {
    /// A required source file could not be located at the resolved path.
    #[error("{source_kind} source not found at {path}")]
    SourceNotFound {
        source_kind: crate::sources::SourceKind,
        path: PathBuf,
    },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the dataset")]
    ProjectDirsUnavailable,

    /// Raised when a query names a country outside the valid country set.
    #[error("unknown country name: {name}{}", format_suggestions(.suggestions))]
    UnknownCountry {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when an alias override is not of the form `NAME=CANONICAL`.
    #[error("invalid alias override '{value}'; expected NAME=CANONICAL")]
    InvalidAlias { value: String },

    /// Raised when a fallback policy name is not recognised.
    #[error("unknown fallback policy '{value}'")]
    UnknownFallbackPolicy { value: String },

    /// Wrapper for CSV reader errors that are not tied to a single record.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
