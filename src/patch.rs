//! The patch engine: sparse, field-wise updates to a single node.
//!
//! [`apply_patch`] is pure and synchronous - no I/O, no clock access (the
//! caller passes `now`), and no failure mode beyond the graceful no-op for
//! an unknown node id. Both the local write path and the inbound realtime
//! path funnel through it, so one function defines the merge semantics for
//! the whole mesh.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{NodeStatus, WorkflowNode};
use crate::tree::WorkflowTree;

/// A sparse patch for one workflow node.
///
/// Absent fields leave the corresponding node field unchanged. This is the
/// `payload` member of the realtime envelope, so the wire names are fixed:
///
/// ```json
/// {"nodeId": "wf-111", "progress": 0.5, "status": "in-progress",
///  "message": "Halfway there", "author": "alice",
///  "lastUpdatedIso": "2026-08-06T09:30:00Z"}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowUpdatePayload {
    /// Target node id
    pub node_id: String,

    /// New completion fraction in [0, 1]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,

    /// New status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,

    /// Free-form note; becomes the history summary when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Who made the change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Timestamp of the change; stamped by the emitting peer and carried
    /// as-is by receivers
    #[serde(rename = "lastUpdatedIso", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl WorkflowUpdatePayload {
    /// An empty patch targeting one node.
    pub fn for_node(node_id: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            ..Self::default()
        }
    }
}

/// Result of applying a patch.
///
/// `previous`/`updated` are both `Some` when the patch landed and both
/// `None` when the node id did not resolve (the no-op case). They share
/// storage with the trees, so diffing allocates nothing.
#[derive(Debug)]
pub struct PatchOutcome {
    /// The tree after the patch (for a no-op, a snapshot sharing every
    /// record with the input tree)
    pub tree: WorkflowTree,

    /// The record as it was before the patch
    pub previous: Option<Arc<WorkflowNode>>,

    /// The record after the patch
    pub updated: Option<Arc<WorkflowNode>>,
}

impl PatchOutcome {
    /// Whether the patch changed anything.
    pub fn applied(&self) -> bool {
        self.updated.is_some()
    }
}

/// Apply a sparse patch to one node of the tree.
///
/// An unknown `node_id` is silently ignored: the returned tree shares every
/// record with the input and `previous`/`updated` stay `None`. Callers that
/// need to distinguish "applied" from "node missing" check
/// [`PatchOutcome::applied`].
///
/// On a hit, `progress` and `status` merge field-wise, `last_updated` takes
/// the payload timestamp (or `now` when the payload carries none), and
/// every other field carries over untouched. Only the target record is
/// copied; siblings stay shared between the two trees.
pub fn apply_patch(
    tree: &WorkflowTree,
    payload: &WorkflowUpdatePayload,
    now: DateTime<Utc>,
) -> PatchOutcome {
    let Some(previous) = tree.nodes().get_arc(&payload.node_id) else {
        tracing::debug!(node_id = %payload.node_id, "patch for unknown node ignored");
        return PatchOutcome {
            tree: tree.clone(),
            previous: None,
            updated: None,
        };
    };

    let mut updated = WorkflowNode::clone(&previous);
    if let Some(progress) = payload.progress {
        updated.progress = progress;
    }
    if let Some(status) = payload.status {
        updated.status = status;
    }
    updated.last_updated = Some(payload.last_updated.unwrap_or(now));

    // The id is present, so the replacement cannot miss.
    let nodes = tree
        .nodes()
        .with_replaced(updated)
        .unwrap_or_else(|| tree.nodes().clone());
    let updated = nodes.get_arc(&payload.node_id);

    PatchOutcome {
        tree: tree.with_nodes(nodes),
        previous: Some(previous),
        updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeKind;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_tree() -> WorkflowTree {
        let mut a = WorkflowNode::new(
            "wf-1",
            None,
            NodeKind::Phase,
            "Discovery",
            date(2026, 7, 1),
            date(2026, 7, 15),
        );
        a.owner = "mara".to_string();
        a.progress = 0.2;
        let b = WorkflowNode::new(
            "wf-2",
            Some("wf-1"),
            NodeKind::Task,
            "Interviews",
            date(2026, 7, 2),
            date(2026, 7, 9),
        );
        WorkflowTree::new(vec![a, b])
    }

    #[test]
    fn test_unknown_node_is_noop() {
        let tree = sample_tree();
        let payload = WorkflowUpdatePayload {
            status: Some(NodeStatus::Done),
            ..WorkflowUpdatePayload::for_node("does-not-exist")
        };
        let outcome = apply_patch(&tree, &payload, Utc::now());

        assert!(!outcome.applied());
        assert!(outcome.previous.is_none());
        // Every record in the returned tree is the same allocation
        for id in ["wf-1", "wf-2"] {
            assert!(Arc::ptr_eq(
                &tree.nodes().get_arc(id).unwrap(),
                &outcome.tree.nodes().get_arc(id).unwrap()
            ));
        }
    }

    #[test]
    fn test_merge_leaves_unpatched_fields() {
        let tree = sample_tree();
        let payload = WorkflowUpdatePayload {
            status: Some(NodeStatus::Done),
            ..WorkflowUpdatePayload::for_node("wf-1")
        };
        let now = Utc::now();
        let outcome = apply_patch(&tree, &payload, now);

        let updated = outcome.updated.unwrap();
        assert_eq!(updated.status, NodeStatus::Done);
        assert_eq!(updated.progress, 0.2);
        assert_eq!(updated.owner, "mara");
        assert_eq!(updated.title, "Discovery");
        assert_eq!(updated.last_updated, Some(now));

        // Input tree is an untouched snapshot
        assert_eq!(tree.get("wf-1").unwrap().status, NodeStatus::Planned);
    }

    #[test]
    fn test_siblings_share_storage_after_patch() {
        let tree = sample_tree();
        let payload = WorkflowUpdatePayload {
            progress: Some(0.9),
            ..WorkflowUpdatePayload::for_node("wf-1")
        };
        let outcome = apply_patch(&tree, &payload, Utc::now());

        assert!(Arc::ptr_eq(
            &tree.nodes().get_arc("wf-2").unwrap(),
            &outcome.tree.nodes().get_arc("wf-2").unwrap()
        ));
        assert!(!Arc::ptr_eq(
            &tree.nodes().get_arc("wf-1").unwrap(),
            &outcome.tree.nodes().get_arc("wf-1").unwrap()
        ));
    }

    #[test]
    fn test_payload_timestamp_wins_over_clock() {
        let tree = sample_tree();
        let stamped = "2026-08-01T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let payload = WorkflowUpdatePayload {
            progress: Some(0.5),
            last_updated: Some(stamped),
            ..WorkflowUpdatePayload::for_node("wf-1")
        };
        let outcome = apply_patch(&tree, &payload, Utc::now());
        assert_eq!(outcome.updated.unwrap().last_updated, Some(stamped));
    }

    #[test]
    fn test_normalization_holds_after_patch() {
        let tree = sample_tree();
        let payload = WorkflowUpdatePayload {
            status: Some(NodeStatus::InProgress),
            ..WorkflowUpdatePayload::for_node("wf-2")
        };
        let outcome = apply_patch(&tree, &payload, Utc::now());
        assert!(outcome.tree.nodes().is_normalized());
        assert_eq!(outcome.tree.len(), tree.len());
    }

    #[test]
    fn test_payload_wire_names() {
        let payload = WorkflowUpdatePayload {
            progress: Some(0.5),
            status: Some(NodeStatus::InProgress),
            author: Some("alice".to_string()),
            ..WorkflowUpdatePayload::for_node("wf-1")
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""nodeId":"wf-1""#));
        assert!(json.contains(r#""status":"in-progress""#));
        assert!(!json.contains("lastUpdatedIso")); // absent when unset

        let parsed: WorkflowUpdatePayload =
            serde_json::from_str(r#"{"nodeId":"wf-9","progress":0.25}"#).unwrap();
        assert_eq!(parsed.node_id, "wf-9");
        assert_eq!(parsed.progress, Some(0.25));
        assert!(parsed.status.is_none());
    }
}
