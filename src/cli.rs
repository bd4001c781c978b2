//! CLI argument definitions for taskmesh.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// taskmesh - peer-synchronized workflow tracking.
///
/// Every invocation is one fresh in-memory peer seeded with the standard
/// program; nothing persists between runs. `tm simulate` runs several
/// peers over one bus inside this process.
#[derive(Parser, Debug)]
#[command(name = "tm")]
#[command(author, version, about = "Peer-synchronized workflow tracking for collaborative workspaces", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Path to a config file. Can also be set via TM_CONFIG.
    #[arg(long, global = true, env = "TM_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Workflow node commands
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Show the audit history (newest first)
    History {
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the live-notification queue (oldest first)
    Announcements,

    /// Show peer identity, connection state, and build info
    Status,

    /// Job sheet commands
    Sheet {
        #[command(subcommand)]
        command: SheetCommands,
    },

    /// Run several peers over one bus and report whether they converge
    Simulate {
        /// Number of peers on the bus
        #[arg(long, default_value_t = 2)]
        peers: usize,

        /// Number of updates to emit across the peers
        #[arg(long, default_value_t = 8)]
        updates: usize,
    },
}

/// Workflow node subcommands
#[derive(Subcommand, Debug)]
pub enum NodeCommands {
    /// List all nodes
    List,

    /// Show one node with its children
    Show {
        /// Node ID (e.g., wf-121)
        id: String,
    },

    /// Apply a sparse update to one node and broadcast it
    Update {
        /// Node ID (e.g., wf-121)
        id: String,

        /// New completion fraction in [0, 1]
        #[arg(long)]
        progress: Option<f64>,

        /// New status: planned, in-progress, at-risk, blocked, done
        #[arg(long)]
        status: Option<String>,

        /// Note to use as the history summary
        #[arg(long)]
        message: Option<String>,

        /// Author to record in the history entry
        #[arg(long)]
        author: Option<String>,
    },
}

/// Job sheet subcommands
#[derive(Subcommand, Debug)]
pub enum SheetCommands {
    /// Create a job sheet with the next sequential code
    Create {
        /// Sheet title
        title: String,

        /// Client the sheet is billed to
        #[arg(long)]
        client: Option<String>,
    },

    /// List job sheets (newest first)
    List,
}
