//! Command implementations for the taskmesh CLI.
//!
//! Each command renders both JSON (the default, for tooling) and a
//! human-readable form behind the global `-H` flag. Commands are thin:
//! they drive the library's public surface and format what comes back.

use std::fmt::Write as _;

use crate::config::SyncConfig;
use crate::models::NodeStatus;
use crate::patch::WorkflowUpdatePayload;
use crate::realtime::WorkflowBus;
use crate::sheets::JobSheetStore;
use crate::store::WorkflowStore;

/// A command result carrying both output forms.
pub struct Output {
    json: serde_json::Value,
    human: String,
}

impl Output {
    fn new(json: serde_json::Value, human: String) -> Self {
        Self { json, human }
    }

    /// Render the requested form.
    pub fn render(&self, human: bool) -> String {
        if human {
            self.human.clone()
        } else {
            serde_json::to_string_pretty(&self.json).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// List all workflow nodes.
pub fn node_list(store: &WorkflowStore) -> crate::Result<Output> {
    let nodes = store.list_nodes();
    let json = serde_json::to_value(&nodes)?;

    let mut human = String::new();
    for node in &nodes {
        let _ = writeln!(
            human,
            "{:<8} {:<11} {:<12} {:>4}%  {}",
            node.id,
            node.kind.to_string(),
            node.status.to_string(),
            (node.progress * 100.0).round() as i64,
            node.title
        );
    }
    Ok(Output::new(json, human))
}

/// Show one node and its direct children.
pub fn node_show(store: &WorkflowStore, id: &str) -> crate::Result<Output> {
    let Some(node) = store.get_node(id) else {
        return Err(crate::Error::NotFound(id.to_string()));
    };
    let children = store.tree().children_of(id);

    let json = serde_json::json!({
        "node": node,
        "durationDays": node.duration_days(),
        "expanded": store.tree().is_expanded(id),
        "children": children,
    });

    let mut human = format!(
        "{} [{}] {} - {} ({}%, {} days)\n",
        node.id,
        node.kind,
        node.title,
        node.status,
        (node.progress * 100.0).round() as i64,
        node.duration_days()
    );
    if !node.owner.is_empty() {
        let _ = writeln!(human, "  owner: {}", node.owner);
    }
    if let Some(note) = &node.risk_note {
        let _ = writeln!(human, "  risk: {}", note);
    }
    for child in &children {
        let _ = writeln!(human, "  - {} {} ({})", child.id, child.title, child.status);
    }
    Ok(Output::new(json, human))
}

/// Apply a sparse update to one node and broadcast it on the configured bus.
pub fn node_update(
    store: &mut WorkflowStore,
    bus: &WorkflowBus,
    id: &str,
    progress: Option<f64>,
    status: Option<&str>,
    message: Option<String>,
    author: Option<String>,
) -> crate::Result<Output> {
    if let Some(p) = progress {
        if !(0.0..=1.0).contains(&p) {
            return Err(crate::Error::InvalidInput(format!(
                "progress must be in [0, 1], got {}",
                p
            )));
        }
    }
    let status = status.map(str::parse::<NodeStatus>).transpose()?;

    store.init_realtime(Some(bus));
    store.emit_workflow_update(WorkflowUpdatePayload {
        progress,
        status,
        message,
        author,
        ..WorkflowUpdatePayload::for_node(id)
    });

    // The sync path never errors: an unknown id is a silent no-op. Report
    // which of the two happened.
    let applied = store.get_node(id).is_some();
    let json = serde_json::json!({
        "applied": applied,
        "node": store.get_node(id),
        "latestHistory": store.list_history().first(),
        "announcement": store.list_announcements().last().map(|a| &a.message),
    });
    let human = match store.get_node(id) {
        Some(node) => format!(
            "{} -> {} ({}%)\n",
            node.id,
            node.status,
            (node.progress * 100.0).round() as i64
        ),
        None => format!("no node {}; update ignored\n", id),
    };
    Ok(Output::new(json, human))
}

/// Show the audit history, newest first.
pub fn history(store: &WorkflowStore, limit: Option<usize>) -> crate::Result<Output> {
    let entries = store.list_history();
    let shown = &entries[..limit.unwrap_or(entries.len()).min(entries.len())];
    let json = serde_json::to_value(shown)?;

    let mut human = String::new();
    for entry in shown {
        let _ = writeln!(
            human,
            "{}  {:<10} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.author,
            entry.summary
        );
        for change in &entry.changes {
            let _ = writeln!(human, "    {}: {} -> {}", change.field, change.from, change.to);
        }
    }
    if human.is_empty() {
        human = "no history\n".to_string();
    }
    Ok(Output::new(json, human))
}

/// Show the live-notification queue, oldest first.
pub fn announcements(store: &WorkflowStore) -> crate::Result<Output> {
    let entries = store.list_announcements();
    let json = serde_json::to_value(&entries)?;

    let mut human = String::new();
    for entry in &entries {
        let _ = writeln!(human, "{}", entry.message);
    }
    if human.is_empty() {
        human = "no announcements\n".to_string();
    }
    Ok(Output::new(json, human))
}

/// Show peer identity, connection state, and build info.
pub fn status(store: &WorkflowStore) -> crate::Result<Output> {
    let connection = store.connection_status();
    let json = serde_json::json!({
        "runtimeId": store.runtime_id(),
        "connection": connection,
        "nodeCount": store.list_nodes().len(),
        "version": env!("CARGO_PKG_VERSION"),
        "commit": env!("TM_GIT_COMMIT"),
        "builtAt": env!("TM_BUILD_TIMESTAMP"),
    });
    let human = format!(
        "taskmesh {} ({}, built {})\npeer {} - {} - {} nodes\n",
        env!("CARGO_PKG_VERSION"),
        env!("TM_GIT_COMMIT"),
        env!("TM_BUILD_TIMESTAMP"),
        store.runtime_id(),
        connection.state,
        store.list_nodes().len()
    );
    Ok(Output::new(json, human))
}

/// Create a job sheet.
pub fn sheet_create(
    sheets: &mut JobSheetStore,
    title: String,
    client: Option<String>,
) -> crate::Result<Output> {
    let sheet = sheets.create(title, client);
    let json = serde_json::to_value(&sheet)?;
    let human = format!("{}  {}\n", sheet.id, sheet.title);
    Ok(Output::new(json, human))
}

/// List job sheets, newest first.
pub fn sheet_list(sheets: &JobSheetStore) -> crate::Result<Output> {
    let list = sheets.list();
    let json = serde_json::to_value(&list)?;

    let mut human = String::new();
    for sheet in &list {
        let _ = writeln!(
            human,
            "{}  {:<30} {}",
            sheet.id,
            sheet.title,
            sheet.client.as_deref().unwrap_or("-")
        );
    }
    if human.is_empty() {
        human = "no job sheets\n".to_string();
    }
    Ok(Output::new(json, human))
}

/// Run several peers over one bus, emit a scripted series of updates, and
/// report whether every peer converged to the same node state.
pub fn simulate(config: &SyncConfig, peers: usize, updates: usize) -> crate::Result<Output> {
    if peers < 2 {
        return Err(crate::Error::InvalidInput(
            "simulation needs at least 2 peers".to_string(),
        ));
    }

    let bus = WorkflowBus::with_capacity(&config.channel, config.bus_capacity);
    let mut stores: Vec<WorkflowStore> = (0..peers)
        .map(|_| WorkflowStore::with_config(config.clone()))
        .collect();
    for store in &mut stores {
        store.init_realtime(Some(&bus));
    }

    let targets = ["wf-111", "wf-121", "wf-122", "wf-123", "wf-131"];
    let statuses = [
        NodeStatus::InProgress,
        NodeStatus::AtRisk,
        NodeStatus::Blocked,
        NodeStatus::Done,
    ];

    for i in 0..updates {
        let emitter = i % stores.len();
        stores[emitter].emit_workflow_update(WorkflowUpdatePayload {
            progress: Some((i % 11) as f64 / 10.0),
            status: Some(statuses[i % statuses.len()]),
            message: Some(format!("Simulated update {}", i + 1)),
            author: Some(format!("peer-{}", emitter + 1)),
            ..WorkflowUpdatePayload::for_node(targets[i % targets.len()])
        });
        // Deliver before the next emit: in-order arrival at every peer
        for store in &mut stores {
            store.pump_inbound();
        }
    }

    let signature = |store: &WorkflowStore| -> Vec<String> {
        store
            .list_nodes()
            .iter()
            .map(|n| format!("{}:{}:{:.3}", n.id, n.status, n.progress))
            .collect()
    };
    let reference = signature(&stores[0]);
    let converged = stores.iter().all(|s| signature(s) == reference);

    let peer_reports: Vec<serde_json::Value> = stores
        .iter()
        .map(|s| {
            serde_json::json!({
                "runtimeId": s.runtime_id(),
                "historyLen": s.list_history().len(),
                "latestAnnouncement": s.list_announcements().last().map(|a| &a.message),
            })
        })
        .collect();
    let json = serde_json::json!({
        "peers": peer_reports,
        "updates": updates,
        "converged": converged,
    });
    let human = format!(
        "{} peers, {} updates: {}\n",
        peers,
        updates,
        if converged { "converged" } else { "diverged" }
    );
    Ok(Output::new(json, human))
}
