use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a report from being produced.
///
/// None of these are retried: the analysis for the offending file is
/// abandoned and the error is handed back to the caller.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("cannot open {}: {source}", .path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed row in {} (line {line}): {reason}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("no data rows in {0}")]
    EmptyInput(String),

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
