//! Parent/child semantics and expand/collapse state over the node store.
//!
//! The tree is an arena + index: nodes live in one flat [`EntityState`]
//! keyed by id, parents are plain `parent_id` strings, and child traversal
//! is computed on demand by filtering. No node ever holds a pointer to
//! another node, so the structure cannot form reference cycles.

use std::collections::HashMap;

use crate::models::WorkflowNode;
use crate::models::entity::EntityState;

/// The workflow node hierarchy plus its view state.
#[derive(Debug, Clone, Default)]
pub struct WorkflowTree {
    nodes: EntityState<WorkflowNode>,
    root_ids: Vec<String>,
    expanded: HashMap<String, bool>,
}

impl WorkflowTree {
    /// Build a tree from a node list.
    ///
    /// `root_ids` is computed once here; nodes are never re-parented, so it
    /// never needs recomputation. Non-task nodes start expanded; tasks (and
    /// any id absent from the map) count as collapsed.
    pub fn new(nodes: Vec<WorkflowNode>) -> Self {
        let nodes = EntityState::from_items(nodes);
        let root_ids = nodes
            .iter()
            .filter(|n| n.is_root())
            .map(|n| n.id.clone())
            .collect();
        let expanded = nodes
            .iter()
            .filter(|n| n.kind.expands_by_default())
            .map(|n| (n.id.clone(), true))
            .collect();
        Self {
            nodes,
            root_ids,
            expanded,
        }
    }

    /// The underlying normalized node store.
    pub fn nodes(&self) -> &EntityState<WorkflowNode> {
        &self.nodes
    }

    /// Look up a node by id.
    pub fn get(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.get(id)
    }

    /// Ids of nodes with no parent.
    pub fn root_ids(&self) -> &[String] {
        &self.root_ids
    }

    /// Direct children of a node, in store order.
    pub fn children_of(&self, id: &str) -> Vec<&WorkflowNode> {
        self.nodes
            .iter()
            .filter(|n| n.parent_id.as_deref() == Some(id))
            .collect()
    }

    /// Whether a node is currently expanded. Absent ids count as collapsed.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.get(id).copied().unwrap_or(false)
    }

    /// Flip the expanded flag for one id. Descendants are untouched.
    ///
    /// No existence check is made: toggling an id with no matching node
    /// leaves a stray entry in the map. That matches the view-state
    /// contract, where an id may start resolving later.
    pub fn toggle_expand(&mut self, id: &str) {
        let flag = self.expanded.entry(id.to_string()).or_insert(false);
        *flag = !*flag;
    }

    /// Number of stray or real entries in the expanded map (test hook).
    #[cfg(test)]
    pub(crate) fn expanded_len(&self) -> usize {
        self.expanded.len()
    }

    /// A tree with the node store swapped and the view state carried over.
    ///
    /// This is the patch engine's construction path: the patch never adds,
    /// removes, or re-parents nodes, so `root_ids` and `expanded` transfer
    /// unchanged.
    pub fn with_nodes(&self, nodes: EntityState<WorkflowNode>) -> Self {
        Self {
            nodes,
            root_ids: self.root_ids.clone(),
            expanded: self.expanded.clone(),
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
