//! One peer's workflow store: the tree, the audit log, the notification
//! queue, and the realtime plumbing behind a single facade.
//!
//! Every peer - a tab, a process, a test fixture - owns an independent
//! `WorkflowStore`. All intra-peer mutation is synchronous within one
//! logical turn; peers influence each other only through envelopes on the
//! shared bus, applied in local arrival order (last-applied-wins).
//!
//! The channel lifecycle lives on the store instance rather than in module
//! globals: the bus handle, the subscription, the bound flag, and the
//! runtime identity are all per-store, so any number of peers can coexist
//! in one process.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use uuid::Uuid;

use crate::announce::AnnouncementQueue;
use crate::config::SyncConfig;
use crate::history::{self, HistoryLog};
use crate::models::{Announcement, HistoryEntry, WorkflowNode};
use crate::patch::{WorkflowUpdatePayload, apply_patch};
use crate::realtime::{ConnectionState, ConnectionStatus, RealtimeEnvelope, WorkflowBus};
use crate::seed;
use crate::tree::WorkflowTree;

/// One peer's view of the workflow mesh.
#[derive(Debug)]
pub struct WorkflowStore {
    runtime_id: String,
    config: SyncConfig,
    tree: WorkflowTree,
    history: HistoryLog,
    announcements: AnnouncementQueue,
    status: ConnectionStatus,
    bus: Option<WorkflowBus>,
    inbound: Option<broadcast::Receiver<RealtimeEnvelope>>,
    bound: bool,
}

impl WorkflowStore {
    /// A peer seeded with the standard node set and default configuration.
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    /// A peer seeded with the standard node set.
    pub fn with_config(config: SyncConfig) -> Self {
        Self::with_nodes(seed::seed_nodes(), config)
    }

    /// A peer over an explicit node set (test fixtures, alternate seeds).
    pub fn with_nodes(nodes: Vec<WorkflowNode>, config: SyncConfig) -> Self {
        Self {
            runtime_id: Uuid::new_v4().to_string(),
            tree: WorkflowTree::new(nodes),
            history: HistoryLog::with_capacity(config.history_capacity),
            announcements: AnnouncementQueue::with_capacity(config.announcement_capacity),
            config,
            status: ConnectionStatus::default(),
            bus: None,
            inbound: None,
            bound: false,
        }
    }

    /// This peer's runtime identity, generated once at construction.
    pub fn runtime_id(&self) -> &str {
        &self.runtime_id
    }

    // ------------------------------------------------------------------
    // Read surface
    // ------------------------------------------------------------------

    /// All nodes in store order.
    pub fn list_nodes(&self) -> Vec<&WorkflowNode> {
        self.tree.nodes().iter().collect()
    }

    /// Look up one node.
    pub fn get_node(&self, id: &str) -> Option<&WorkflowNode> {
        self.tree.get(id)
    }

    /// Audit entries, newest-first.
    pub fn list_history(&self) -> Vec<&HistoryEntry> {
        self.history.iter().collect()
    }

    /// Live notifications, oldest-first.
    pub fn list_announcements(&self) -> Vec<&Announcement> {
        self.announcements.iter().collect()
    }

    /// Connection state and last-event timestamp.
    pub fn connection_status(&self) -> ConnectionStatus {
        self.status
    }

    /// The node hierarchy (roots, children, expansion state).
    pub fn tree(&self) -> &WorkflowTree {
        &self.tree
    }

    // ------------------------------------------------------------------
    // Write surface
    // ------------------------------------------------------------------

    /// Flip the expanded flag for one node id (view state only).
    pub fn toggle_expand(&mut self, id: &str) {
        self.tree.toggle_expand(id);
    }

    /// Connect this peer to a broadcast bus.
    ///
    /// Idempotent once connected. `None` means the environment has no bus
    /// (headless/non-interactive): the peer parks in the terminal `error`
    /// state and no retry is attempted. The subscription is bound exactly
    /// once; repeated calls reuse it.
    pub fn init_realtime(&mut self, bus: Option<&WorkflowBus>) {
        if self.status.state == ConnectionState::Connected {
            return;
        }
        self.status.state = ConnectionState::Connecting;

        let Some(bus) = bus else {
            tracing::warn!(peer = %self.runtime_id, "no broadcast bus available; realtime disabled");
            self.status.state = ConnectionState::Error;
            return;
        };

        if self.bus.is_none() {
            self.bus = Some(bus.clone());
        }
        if !self.bound {
            // One subscription per peer, however many times init runs.
            self.inbound = Some(bus.subscribe());
            self.bound = true;
        }
        self.status.state = ConnectionState::Connected;
        tracing::debug!(peer = %self.runtime_id, bus = %bus.name(), "realtime connected");
    }

    /// Apply a local update and broadcast it to the mesh.
    ///
    /// The payload is stamped with the current time, run through the
    /// patch/history/announcement pipeline, and then published tagged with
    /// this peer's identity - even when the local patch was a no-op, so
    /// peers that do know the node still hear about it. Publishing while in
    /// the `error` state (or before any bus exists) quietly drops the
    /// message.
    pub fn emit_workflow_update(&mut self, mut payload: WorkflowUpdatePayload) {
        let now = Utc::now();
        payload.last_updated = Some(now);
        if payload.author.is_none() {
            payload.author = self.config.default_author.clone();
        }

        if let Some(timestamp) = self.apply_update(&payload, now) {
            self.status.state = ConnectionState::Connected;
            self.status.last_event_at = Some(timestamp);
        }

        if self.status.state == ConnectionState::Error {
            tracing::debug!(peer = %self.runtime_id, "in error state; update not published");
            return;
        }
        match &self.bus {
            Some(bus) => bus.publish(RealtimeEnvelope::update(payload, self.runtime_id.clone())),
            None => {
                tracing::debug!(peer = %self.runtime_id, "no bus handle; update stays local");
            }
        }
    }

    /// Process one inbound envelope.
    ///
    /// An envelope carrying this peer's own `source_id` is dropped without
    /// touching any state (echo suppression). Remote envelopes run the same
    /// pipeline as local updates, keeping the sender's timestamp as-is.
    ///
    /// Returns whether the envelope survived echo suppression.
    pub fn handle_envelope(&mut self, envelope: &RealtimeEnvelope) -> bool {
        if envelope.source_id() == self.runtime_id {
            tracing::trace!(peer = %self.runtime_id, "own echo suppressed");
            return false;
        }
        if let Some(timestamp) = self.apply_update(envelope.payload(), Utc::now()) {
            self.status.last_event_at = Some(timestamp);
        }
        true
    }

    /// Drain every envelope waiting on the subscription, without blocking.
    ///
    /// Returns the number of envelopes processed after echo suppression. A
    /// receiver that lagged past the bus capacity has lost the overwritten
    /// messages; that is logged and the drain continues with what remains.
    pub fn pump_inbound(&mut self) -> usize {
        let mut pending = Vec::new();
        if let Some(rx) = self.inbound.as_mut() {
            loop {
                match rx.try_recv() {
                    Ok(envelope) => pending.push(envelope),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Lagged(missed)) => {
                        tracing::warn!(peer = %self.runtime_id, missed, "receiver lagged; updates lost");
                    }
                    Err(TryRecvError::Closed) => break,
                }
            }
        }

        let mut handled = 0;
        for envelope in &pending {
            if self.handle_envelope(envelope) {
                handled += 1;
            }
        }
        handled
    }

    /// The shared patch -> history -> announcement pipeline.
    ///
    /// Returns the entry timestamp when the patch landed, `None` for the
    /// unknown-node no-op (which leaves no trace anywhere).
    fn apply_update(&mut self, payload: &WorkflowUpdatePayload, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let outcome = apply_patch(&self.tree, payload, now);
        self.tree = outcome.tree;

        let entry = history::build_entry(
            payload,
            outcome.previous.as_deref(),
            outcome.updated.as_deref(),
            now,
        )?;
        let timestamp = entry.timestamp;
        self.announcements.push(entry.summary.clone());
        self.history.record(entry);
        Some(timestamp)
    }
}

impl Default for WorkflowStore {
    fn default() -> Self {
        Self::new()
    }
}
