//! Audit history derived from patch diffs.
//!
//! Every successful patch produces at most one [`HistoryEntry`]: a
//! human-readable summary plus a field-level diff of the tracked fields
//! (`status` and `progress`). Entries live in a bounded, newest-first log;
//! when the log is full the oldest entry falls off the tail.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{FieldChange, HistoryEntry, WorkflowNode};
use crate::patch::WorkflowUpdatePayload;

/// How many entries the log retains.
pub const HISTORY_CAPACITY: usize = 30;

/// Render a progress fraction as a whole-percent display string.
fn format_percent(progress: f64) -> String {
    format!("{}%", (progress * 100.0).round() as i64)
}

/// Derive a history entry from a patch diff.
///
/// Returns `None` for the no-op case (either side of the diff missing) -
/// a patch that hit nothing leaves no audit trail. An entry is still
/// recorded when no tracked field changed; it just carries an empty diff.
pub fn build_entry(
    payload: &WorkflowUpdatePayload,
    previous: Option<&WorkflowNode>,
    updated: Option<&WorkflowNode>,
    now: DateTime<Utc>,
) -> Option<HistoryEntry> {
    let (previous, updated) = match (previous, updated) {
        (Some(p), Some(u)) => (p, u),
        _ => return None,
    };

    let timestamp = payload.last_updated.unwrap_or(now);
    let summary = match &payload.message {
        Some(message) => message.clone(),
        None if updated.title.is_empty() => format!("Updated {}", payload.node_id),
        None => format!("Updated {}", updated.title),
    };

    let mut changes = Vec::new();
    if previous.status != updated.status {
        changes.push(FieldChange {
            field: "status".to_string(),
            from: previous.status.to_string(),
            to: updated.status.to_string(),
        });
    }
    if previous.progress != updated.progress {
        changes.push(FieldChange {
            field: "progress".to_string(),
            from: format_percent(previous.progress),
            to: format_percent(updated.progress),
        });
    }

    Some(HistoryEntry {
        id: Uuid::new_v4().to_string(),
        node_id: payload.node_id.clone(),
        author: payload
            .author
            .clone()
            .unwrap_or_else(|| "system".to_string()),
        timestamp,
        summary,
        changes,
    })
}

/// Bounded, newest-first audit log.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl HistoryLog {
    /// A log with the standard capacity.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// A log with a custom capacity (configuration hook).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend an entry, evicting from the tail when over capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        tracing::debug!(node_id = %entry.node_id, summary = %entry.summary, "history entry");
        self.entries.push_front(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_back();
        }
    }

    /// Entries newest-first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}
