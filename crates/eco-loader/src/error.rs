//! Source error types

use opening_core::error::ParseError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Partition {partition} has no '{column}' column")]
    MissingColumn {
        partition: String,
        column: &'static str,
    },

    #[error("Partition {partition}, row {row}: {source}")]
    Parse {
        partition: String,
        row: usize,
        #[source]
        source: ParseError,
    },
}
