//! The broadcast bus, wire envelope, and connection state machine.
//!
//! Peers exchange [`RealtimeEnvelope`]s over a named [`WorkflowBus`] - a
//! fan-out broadcast channel where every subscriber sees every publish, in
//! publish order, with no acknowledgment and no retry. Each envelope is
//! tagged with the publishing peer's runtime identity so a peer can drop
//! echoes of its own broadcasts.
//!
//! Delivery is at-most-once per peer: a subscriber that falls behind the
//! channel capacity loses the overwritten messages (logged, not surfaced).
//! Only the synchronous half of the channel is used (`send`/`try_recv`);
//! nothing in this module awaits.
//!
//! # Wire format
//!
//! Envelopes are JSON-serializable with a `type` discriminator:
//!
//! ```json
//! {"type": "workflow:update",
//!  "payload": {"nodeId": "wf-111", "status": "done", "lastUpdatedIso": "..."},
//!  "sourceId": "2f0b7c2e-..."}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

use chrono::{DateTime, Utc};

use crate::patch::WorkflowUpdatePayload;

/// Default broadcast capacity; a subscriber more than this many messages
/// behind starts losing the oldest.
pub const DEFAULT_BUS_CAPACITY: usize = 100;

/// The wire-level wrapper published on the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RealtimeEnvelope {
    /// A sparse node patch from one peer.
    #[serde(rename = "workflow:update")]
    WorkflowUpdate {
        /// The patch itself
        payload: WorkflowUpdatePayload,
        /// Runtime identity of the publishing peer, for echo suppression
        #[serde(rename = "sourceId")]
        source_id: String,
    },
}

impl RealtimeEnvelope {
    /// Wrap a payload with the publishing peer's identity.
    pub fn update(payload: WorkflowUpdatePayload, source_id: impl Into<String>) -> Self {
        Self::WorkflowUpdate {
            payload,
            source_id: source_id.into(),
        }
    }

    /// The publishing peer's runtime identity.
    pub fn source_id(&self) -> &str {
        match self {
            Self::WorkflowUpdate { source_id, .. } => source_id,
        }
    }

    /// The carried patch.
    pub fn payload(&self) -> &WorkflowUpdatePayload {
        match self {
            Self::WorkflowUpdate { payload, .. } => payload,
        }
    }
}

/// A named broadcast bus peers connect to.
///
/// Cloning a bus yields another handle to the same channel; peers sharing
/// a handle (or a clone of one) see each other's publishes. Dropping every
/// handle closes the channel.
#[derive(Debug, Clone)]
pub struct WorkflowBus {
    name: String,
    tx: broadcast::Sender<RealtimeEnvelope>,
}

impl WorkflowBus {
    /// A bus with the default capacity.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, DEFAULT_BUS_CAPACITY)
    }

    /// A bus with a custom capacity.
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            name: name.into(),
            tx,
        }
    }

    /// The bus name (mirrors the named-channel the peers rendezvous on).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open a subscription. Each receiver sees publishes made after this
    /// call, in publish order.
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEnvelope> {
        self.tx.subscribe()
    }

    /// Fire-and-forget publish. A publish with no live subscribers is not
    /// an error; the message is simply gone.
    pub fn publish(&self, envelope: RealtimeEnvelope) {
        tracing::debug!(bus = %self.name, source = %envelope.source_id(), "publish");
        let _ = self.tx.send(envelope);
    }

    /// Number of live subscribers (test hook).
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Connection lifecycle of one peer.
///
/// `error` is terminal within this core: there is no automatic
/// reconnection. Callers watch [`ConnectionStatus`] for visibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Connection state plus the timestamp of the last processed update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    /// Where the peer is in the connection lifecycle
    pub state: ConnectionState,

    /// When this peer last applied an update (local or remote)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_event_at: Option<DateTime<Utc>>,
}
