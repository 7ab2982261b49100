use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the traffic reporter.
#[derive(Error, Debug)]
pub enum ReportError {
    /// An input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line of an events.db file was not valid JSON.
    ///
    /// The whole run aborts on the first such line; there is no per-line
    /// recovery.
    #[error("{path}:{line}: invalid JSON: {source}")]
    JsonLine {
        path: PathBuf,
        line: u64,
        #[source]
        source: serde_json::Error,
    },

    /// A JSON document (e.g. the alias file) could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A date/time argument did not match any accepted format.
    #[error("\"{0}\" is not a valid date/time")]
    TimestampParse(String),

    /// A relay-close record's timestamp was out of representable range.
    #[error("Invalid event timestamp: {0} ms")]
    InvalidTimestamp(i64),

    /// The granularity is not one of the accepted minute values.
    #[error("{0} is not a valid granularity")]
    InvalidGranularity(String),

    /// The measurement flag is not one of `none`, `dec`, `IEC`.
    #[error("Unknown measurement unit: {0}")]
    InvalidUnit(String),

    /// A relay-close record is missing a field the report needs.
    #[error("Relay record is missing required field \"{0}\"")]
    MissingField(&'static str),

    /// The `--asset` filter value is not a known asset alias.
    #[error("\"{0}\" is not a known asset name")]
    UnknownAsset(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the reporter crates.
pub type Result<T> = std::result::Result<T, ReportError>;
