//! Data models for taskmesh entities.
//!
//! This module defines the core data structures:
//! - `WorkflowNode` - A task/phase/initiative/milestone in the hierarchy
//! - `Assignment` - A person/role allocation attached to a node
//! - `HistoryEntry` - An audit record derived from a patch diff
//! - `Announcement` - A short-lived live-region notification
//! - `EntityState` - The normalized `{by_id, all_ids}` container (see [`entity`])
//!
//! All wire-facing types serialize with camelCase field names because the
//! realtime protocol and the UI surfaces consume them as JSON with those
//! exact names (`nodeId`, `lastUpdatedIso`, ...).

pub mod entity;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::entity::Identified;

/// Node kind in the workflow hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Initiative,
    Phase,
    Task,
    Milestone,
}

impl NodeKind {
    /// Whether nodes of this kind start expanded in tree views.
    ///
    /// Everything except leaf tasks defaults to open.
    pub fn expands_by_default(self) -> bool {
        !matches!(self, NodeKind::Task)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Initiative => "initiative",
            NodeKind::Phase => "phase",
            NodeKind::Task => "task",
            NodeKind::Milestone => "milestone",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for NodeKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "initiative" => Ok(NodeKind::Initiative),
            "phase" => Ok(NodeKind::Phase),
            "task" => Ok(NodeKind::Task),
            "milestone" => Ok(NodeKind::Milestone),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown node kind: {}",
                other
            ))),
        }
    }
}

/// Node status in the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
    #[default]
    Planned,
    InProgress,
    AtRisk,
    Blocked,
    Done,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeStatus::Planned => "planned",
            NodeStatus::InProgress => "in-progress",
            NodeStatus::AtRisk => "at-risk",
            NodeStatus::Blocked => "blocked",
            NodeStatus::Done => "done",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for NodeStatus {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "planned" => Ok(NodeStatus::Planned),
            "in-progress" => Ok(NodeStatus::InProgress),
            "at-risk" => Ok(NodeStatus::AtRisk),
            "blocked" => Ok(NodeStatus::Blocked),
            "done" => Ok(NodeStatus::Done),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown status: {}",
                other
            ))),
        }
    }
}

/// A person/role allocation attached to a workflow node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Identifier of the assignee (user id or handle)
    pub assignee_id: String,

    /// Role on this node (e.g., "lead", "reviewer")
    pub role: String,

    /// Fraction of the assignee's time allocated, in [0, 1]
    pub allocation: f64,
}

/// A task/phase/initiative/milestone record in the workflow hierarchy.
///
/// Nodes are created once from the seed set and are only ever mutated
/// through the patch engine; they are never deleted or re-parented, so the
/// tree stays acyclic by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    /// Unique, stable identifier (e.g., "wf-111")
    pub id: String,

    /// Parent node ID; `None` only for roots
    pub parent_id: Option<String>,

    /// Position of this node in the hierarchy
    pub kind: NodeKind,

    /// Display title
    pub title: String,

    /// Display name of the owner
    pub owner: String,

    /// Scheduled start date
    pub start_date: NaiveDate,

    /// Scheduled end date
    pub end_date: NaiveDate,

    /// Completion fraction in [0, 1]
    pub progress: f64,

    /// Current status
    #[serde(default)]
    pub status: NodeStatus,

    /// IDs of nodes this one depends on (informational only; no scheduling
    /// engine consumes them here)
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Fractional utilization hint for resource views
    #[serde(default)]
    pub resource_load: f64,

    /// Whether this node sits on the critical path
    #[serde(default)]
    pub is_critical: bool,

    /// People allocated to this node
    #[serde(default)]
    pub assignments: Vec<Assignment>,

    /// Forecast end date when it differs from the plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast_end_date: Option<NaiveDate>,

    /// Free-form risk annotation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_note: Option<String>,

    /// Timestamp of the last successful patch
    #[serde(rename = "lastUpdatedIso", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl WorkflowNode {
    /// Create a new node with the given identity and schedule.
    ///
    /// Everything else starts at its default: planned, zero progress, no
    /// owner, no dependencies.
    pub fn new(
        id: impl Into<String>,
        parent_id: Option<&str>,
        kind: NodeKind,
        title: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.map(str::to_string),
            kind,
            title: title.into(),
            owner: String::new(),
            start_date,
            end_date,
            progress: 0.0,
            status: NodeStatus::default(),
            dependencies: Vec::new(),
            resource_load: 0.0,
            is_critical: false,
            assignments: Vec::new(),
            forecast_end_date: None,
            risk_note: None,
            last_updated: None,
        }
    }

    /// Whether this node is a root of the hierarchy.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Derived duration in days between start and end, minimum 1.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days().max(1)
    }
}

impl Identified for WorkflowNode {
    fn id(&self) -> &str {
        &self.id
    }
}

/// One changed field in a history entry, with before/after rendered for
/// display (`progress` as whole percents, `status` as its wire string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Field name ("status" or "progress")
    pub field: String,

    /// Value before the patch
    pub from: String,

    /// Value after the patch
    pub to: String,
}

/// An audit record derived from one successful patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Unique entry identifier
    pub id: String,

    /// Node the patch applied to
    pub node_id: String,

    /// Who made the change
    pub author: String,

    /// When the change was made
    pub timestamp: DateTime<Utc>,

    /// Human-readable one-liner
    pub summary: String,

    /// Field-level diff; empty when the patch changed no tracked field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<FieldChange>,
}

/// A short-lived notification for live-region/UI consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    /// Unique announcement identifier
    pub id: String,

    /// Display text
    pub message: String,

    /// When the announcement was raised
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_wire_strings() {
        let json = serde_json::to_string(&NodeStatus::InProgress).unwrap();
        assert_eq!(json, r#""in-progress""#);
        let json = serde_json::to_string(&NodeStatus::AtRisk).unwrap();
        assert_eq!(json, r#""at-risk""#);

        let parsed: NodeStatus = serde_json::from_str(r#""blocked""#).unwrap();
        assert_eq!(parsed, NodeStatus::Blocked);
    }

    #[test]
    fn test_status_from_str_roundtrip() {
        for s in ["planned", "in-progress", "at-risk", "blocked", "done"] {
            let status: NodeStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
        assert!("paused".parse::<NodeStatus>().is_err());
    }

    #[test]
    fn test_kind_expands_by_default() {
        assert!(NodeKind::Initiative.expands_by_default());
        assert!(NodeKind::Phase.expands_by_default());
        assert!(NodeKind::Milestone.expands_by_default());
        assert!(!NodeKind::Task.expands_by_default());
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let mut node = WorkflowNode::new(
            "wf-1",
            None,
            NodeKind::Phase,
            "Discovery",
            date(2026, 7, 1),
            date(2026, 7, 15),
        );
        node.last_updated = Some(Utc::now());

        let json = serde_json::to_string(&node).unwrap();
        assert!(json.contains(r#""parentId":null"#));
        assert!(json.contains(r#""startDate":"2026-07-01""#));
        assert!(json.contains(r#""isCritical":false"#));
        assert!(json.contains(r#""lastUpdatedIso""#));
        // Optionals stay off the wire until set
        assert!(!json.contains("riskNote"));
        assert!(!json.contains("forecastEndDate"));
    }

    #[test]
    fn test_duration_days_minimum_one() {
        let node = WorkflowNode::new(
            "wf-1",
            None,
            NodeKind::Task,
            "Same-day task",
            date(2026, 7, 1),
            date(2026, 7, 1),
        );
        assert_eq!(node.duration_days(), 1);

        let node = WorkflowNode::new(
            "wf-2",
            None,
            NodeKind::Task,
            "Backwards dates",
            date(2026, 7, 10),
            date(2026, 7, 1),
        );
        assert_eq!(node.duration_days(), 1);
    }

    #[test]
    fn test_duration_days_inclusive_span() {
        let node = WorkflowNode::new(
            "wf-1",
            None,
            NodeKind::Phase,
            "Two weeks",
            date(2026, 7, 1),
            date(2026, 7, 15),
        );
        assert_eq!(node.duration_days(), 14);
    }

    #[test]
    fn test_history_entry_omits_empty_changes() {
        let entry = HistoryEntry {
            id: "h-1".to_string(),
            node_id: "wf-1".to_string(),
            author: "alice".to_string(),
            timestamp: Utc::now(),
            summary: "Updated Discovery".to_string(),
            changes: Vec::new(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains(r#""nodeId":"wf-1""#));
        assert!(!json.contains("changes"));
    }
}
