use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::{ReportError, Result};

/// msgid values that mark the end of a relay session.
///
/// MeshCentral logs several message codes for a relay teardown; only these
/// carry the session's byte counters.
pub const RELAY_CLOSE_MSGIDS: [u64; 3] = [9, 10, 12];

/// One relay-session-close record extracted from an events.db line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayClose {
    /// When the session closed (UTC, from the millisecond `time.$$date`).
    pub timestamp: DateTime<Utc>,
    /// Raw username as stored in the log.
    pub username: String,
    /// Raw node id of the remote asset (`ids[2]`).
    pub asset_id: String,
    /// Bytes received by the server during the session.
    pub bytesin: u64,
    /// Bytes sent by the server during the session.
    pub bytesout: u64,
}

impl RelayClose {
    /// Extract a relay-close record from one parsed events.db line.
    ///
    /// Returns `Ok(None)` when the line does not carry the relay-close
    /// signature (most lines do not). A line that matches the signature
    /// but is missing one of the required fields is an error and aborts
    /// the run.
    pub fn from_value(value: &Value) -> Result<Option<Self>> {
        if !is_relay_close(value) {
            return Ok(None);
        }

        let millis = value
            .get("time")
            .and_then(|t| t.get("$$date"))
            .and_then(Value::as_i64)
            .ok_or(ReportError::MissingField("time.$$date"))?;
        let timestamp = DateTime::from_timestamp_millis(millis)
            .ok_or(ReportError::InvalidTimestamp(millis))?;

        let username = value
            .get("username")
            .and_then(Value::as_str)
            .ok_or(ReportError::MissingField("username"))?
            .to_string();

        // The node id sits at a fixed position in the ids array.
        let asset_id = value
            .get("ids")
            .and_then(Value::as_array)
            .and_then(|ids| ids.get(2))
            .and_then(Value::as_str)
            .ok_or(ReportError::MissingField("ids[2]"))?
            .to_string();

        let bytesin = value
            .get("bytesin")
            .and_then(Value::as_u64)
            .ok_or(ReportError::MissingField("bytesin"))?;
        let bytesout = value
            .get("bytesout")
            .and_then(Value::as_u64)
            .ok_or(ReportError::MissingField("bytesout"))?;

        Ok(Some(Self {
            timestamp,
            username,
            asset_id,
            bytesin,
            bytesout,
        }))
    }

    /// Total transfer volume attributed to this session.
    pub fn data_total(&self) -> u64 {
        self.bytesin + self.bytesout
    }
}

/// `true` when the line is a relay event with one of the closing msgids.
pub fn is_relay_close(value: &Value) -> bool {
    let is_relay = value
        .get("etype")
        .and_then(Value::as_str)
        .map(|etype| etype == "relay")
        .unwrap_or(false);
    let is_closing = value
        .get("msgid")
        .and_then(Value::as_u64)
        .map(|id| RELAY_CLOSE_MSGIDS.contains(&id))
        .unwrap_or(false);
    is_relay && is_closing
}
