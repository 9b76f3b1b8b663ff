//! Activity log for a dashboard session.
//!
//! Records user-visible actions (uploads, report generation, deletions...)
//! newest first, keeping a bounded history. The log is an ordinary value owned
//! by the session that creates it.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CarbonLoanResult;

/// Entries retained before the oldest are dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Upload,
    Processing,
    Report,
    Delete,
    Download,
    Settings,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    #[default]
    Success,
    Error,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub status: LogStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ActivityLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_seq: u64,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log that keeps at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
            next_seq: 0,
        }
    }

    /// Record an action at the front of the log, evicting the oldest entry
    /// when full.
    pub fn record(
        &mut self,
        action: &str,
        description: &str,
        kind: LogKind,
        status: LogStatus,
        details: Option<serde_json::Value>,
    ) -> &LogEntry {
        let timestamp = Utc::now();
        self.next_seq += 1;
        let entry = LogEntry {
            id: format!("log-{}-{}", timestamp.timestamp_millis(), self.next_seq),
            timestamp,
            action: action.to_string(),
            description: description.to_string(),
            kind,
            status,
            details,
        };
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn by_kind(&self, kind: LogKind) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().filter(move |e| e.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pretty-printed JSON array of all entries, newest first.
    pub fn export_json(&self) -> CarbonLoanResult<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}
