use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Failure to read the county table as a whole. Bad rows never end up here,
/// they are reported per row through [`SkipReason`].
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Unable to open CSV file: {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read CSV file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapError {
    #[error("Wrap width cannot be zero")]
    InvalidWidth,
}

/// Why a single row was left out of the table.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    TooFewColumns { found: usize },
    MissingColumn { index: usize },
    EmptyName,
    InvalidNumber { column: usize, value: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewColumns { found } => {
                write!(f, "line has {found} columns, at least 4 required")
            }
            SkipReason::MissingColumn { index } => write!(f, "column {index} is missing"),
            SkipReason::EmptyName => f.write_str("county name is empty"),
            SkipReason::InvalidNumber { column, value } => {
                write!(f, "numeric conversion failed for column {column} ({value:?})")
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to parse JSON from {url}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unexpected JSON structure from {url}: missing {field}")]
    MissingField { url: String, field: &'static str },
}
