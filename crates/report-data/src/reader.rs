//! events.db reading and relay-close extraction.
//!
//! Each input file is a sequence of newline-delimited JSON objects. Only
//! relay-session-close lines are kept; everything else is skipped after
//! parsing. A line that is not valid JSON aborts the whole run: the log
//! is machine-written, so a broken line means a broken file.

use std::io::BufRead;
use std::path::{Path, PathBuf};

use report_core::error::{ReportError, Result};
use report_core::models::RelayClose;
use tracing::{debug, trace};

// ── Input resolution ──────────────────────────────────────────────────────────

/// Default events database location:
/// `~/meshcentral-data/meshcentral-events.db`.
pub fn default_events_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("meshcentral-data")
        .join("meshcentral-events.db")
}

/// The files to analyse: the requested list, or the default location when
/// none were given.
pub fn resolve_input_files(requested: Vec<PathBuf>) -> Vec<PathBuf> {
    if requested.is_empty() {
        vec![default_events_file()]
    } else {
        requested
    }
}

// ── Reading ───────────────────────────────────────────────────────────────────

/// Read one events.db file and return its relay-close records in file order.
pub fn read_events(path: &Path) -> Result<Vec<RelayClose>> {
    let file = std::fs::File::open(path).map_err(|source| ReportError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = std::io::BufReader::new(file);

    let mut records = Vec::new();
    let mut line_no = 0u64;

    for line_result in reader.lines() {
        line_no += 1;
        let line = line_result.map_err(|source| ReportError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let value: serde_json::Value =
            serde_json::from_str(&line).map_err(|source| ReportError::JsonLine {
                path: path.to_path_buf(),
                line: line_no,
                source,
            })?;

        if let Some(record) = RelayClose::from_value(&value)? {
            trace!("{}:{}: {:?}", path.display(), line_no, record);
            records.push(record);
        }
    }

    debug!(
        "File {}: {} lines read, {} relay closes",
        path.display(),
        line_no,
        records.len()
    );

    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
