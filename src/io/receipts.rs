//! Receipt log - writes paid sessions to file
//!
//! Receipts are written in JSONL format (one JSON object per line)
//! to the file specified in config. The log is append-only output; it is
//! never read back.

use crate::domain::session::Session;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info};

/// One line of the receipt log
#[derive(Debug, Serialize)]
struct Receipt<'a> {
    sid: String,
    name: &'a str,
    room: String,
    locker: String,
    plan: &'static str,
    fee: u64,
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    /// Whole minutes between check-in and payment
    stay_min: Option<i64>,
}

impl<'a> From<&'a Session> for Receipt<'a> {
    fn from(session: &'a Session) -> Self {
        Self {
            sid: session.id.to_string(),
            name: &session.customer_name,
            room: session.room_id.to_string(),
            locker: session.locker_id.to_string(),
            plan: session.plan.as_str(),
            fee: session.fee,
            start: session.start_time,
            end: session.end_time,
            stay_min: session.end_time.map(|end| (end - session.start_time).num_minutes()),
        }
    }
}

/// Append-only writer for receipts
pub struct ReceiptLog {
    file_path: String,
}

impl ReceiptLog {
    pub fn new(file_path: &str) -> Self {
        info!(file_path = %file_path, "receipt_log_initialized");
        Self { file_path: file_path.to_string() }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Write a receipt for a session
    /// Returns true if successful, false otherwise
    pub fn write_receipt(&self, session: &Session) -> bool {
        let mut line = match serde_json::to_string(&Receipt::from(session)) {
            Ok(line) => line,
            Err(e) => {
                error!(session = %session.id, error = %e, "receipt_encode_failed");
                return false;
            }
        };
        line.push('\n');

        match self.append_line(&line) {
            Ok(()) => {
                info!(session = %session.id, fee = session.fee, "receipt_written");
                true
            }
            Err(e) => {
                error!(
                    session = %session.id,
                    file = %self.file_path,
                    error = %e,
                    "receipt_write_failed"
                );
                false
            }
        }
    }

    /// Append a newline-terminated line to the receipt file
    ///
    /// The line goes out in a single `write_all` on an `O_APPEND` handle, so
    /// concurrent checkouts cannot interleave within a line.
    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let path = Path::new(&self.file_path);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        file.write_all(line.as_bytes())?;
        debug!(file = %self.file_path, bytes = %line.len(), "receipt_appended");

        Ok(())
    }
}
