//! Taskmesh - a peer-synchronized workflow tracking core.
//!
//! This library is the synchronization heart of a multi-surface workspace
//! tool: a normalized hierarchical store of workflow nodes that stays
//! consistent across independent peers (tabs, processes, test harnesses)
//! exchanging sparse update patches over a broadcast bus, while keeping a
//! bounded audit history and a bounded live-notification feed.
//!
//! The main pieces:
//! - [`models`] - workflow node records and the normalized `EntityState`
//!   container backing every collection
//! - [`tree`] - parent/child semantics and expand/collapse state on top of
//!   the node store
//! - [`patch`] - the pure patch engine that merges sparse updates
//! - [`history`] - diff-derived audit entries in a bounded, newest-first log
//! - [`announce`] - the bounded FIFO of live-region notifications
//! - [`realtime`] - the broadcast bus, wire envelope, and connection state
//!   machine
//! - [`store`] - one peer's `WorkflowStore`, tying the above together behind
//!   the public read/write surface
//!
//! Peers never coordinate: every peer applies updates in local arrival
//! order (last-applied-wins), suppresses echoes of its own broadcasts by
//! runtime identity, and degrades to silent no-ops rather than erroring on
//! the sync path.

pub mod announce;
pub mod cli;
pub mod commands;
pub mod config;
pub mod history;
pub mod models;
pub mod patch;
pub mod realtime;
pub mod seed;
pub mod sheets;
pub mod store;
pub mod tree;

/// Library-level error type for taskmesh operations.
///
/// The synchronization path itself never returns these: unknown node ids
/// degrade to silent no-ops and a missing transport parks the connection in
/// an error state. `Error` covers the surfaces that do fail - configuration
/// loading, job-sheet lookups, CLI input parsing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for taskmesh operations.
pub type Result<T> = std::result::Result<T, Error>;
