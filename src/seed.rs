//! The fixed node set every peer boots from.
//!
//! Nodes are created once here and never deleted or re-parented; all later
//! change flows through the patch engine. Every peer seeding from this set
//! starts from the same state, which is what makes last-applied-wins
//! convergence meaningful at all.

use chrono::NaiveDate;

use crate::models::{Assignment, NodeKind, NodeStatus, WorkflowNode};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid seed date")
}

fn assign(assignee_id: &str, role: &str, allocation: f64) -> Assignment {
    Assignment {
        assignee_id: assignee_id.to_string(),
        role: role.to_string(),
        allocation,
    }
}

/// The seed program: one initiative, three phases, their tasks, and the
/// launch milestone.
pub fn seed_nodes() -> Vec<WorkflowNode> {
    let mut nodes = Vec::new();

    let mut initiative = WorkflowNode::new(
        "wf-100",
        None,
        NodeKind::Initiative,
        "Workspace platform launch",
        day(2026, 7, 1),
        day(2026, 10, 30),
    );
    initiative.owner = "Priya Raman".to_string();
    initiative.status = NodeStatus::InProgress;
    initiative.progress = 0.35;
    initiative.is_critical = true;
    initiative.assignments = vec![assign("priya", "lead", 0.5)];
    nodes.push(initiative);

    let mut discovery = WorkflowNode::new(
        "wf-110",
        Some("wf-100"),
        NodeKind::Phase,
        "Discovery",
        day(2026, 7, 1),
        day(2026, 7, 31),
    );
    discovery.owner = "Mara Lindt".to_string();
    discovery.status = NodeStatus::Done;
    discovery.progress = 1.0;
    discovery.resource_load = 0.4;
    nodes.push(discovery);

    let mut interviews = WorkflowNode::new(
        "wf-111",
        Some("wf-110"),
        NodeKind::Task,
        "Customer interviews",
        day(2026, 7, 2),
        day(2026, 7, 18),
    );
    interviews.owner = "Mara Lindt".to_string();
    interviews.status = NodeStatus::Done;
    interviews.progress = 1.0;
    interviews.assignments = vec![assign("mara", "lead", 0.8)];
    nodes.push(interviews);

    let mut audit = WorkflowNode::new(
        "wf-112",
        Some("wf-110"),
        NodeKind::Task,
        "Integration audit",
        day(2026, 7, 10),
        day(2026, 7, 31),
    );
    audit.owner = "Jonas Veld".to_string();
    audit.status = NodeStatus::Done;
    audit.progress = 1.0;
    audit.dependencies = vec!["wf-111".to_string()];
    nodes.push(audit);

    let mut build = WorkflowNode::new(
        "wf-120",
        Some("wf-100"),
        NodeKind::Phase,
        "Build",
        day(2026, 8, 1),
        day(2026, 9, 25),
    );
    build.owner = "Jonas Veld".to_string();
    build.status = NodeStatus::InProgress;
    build.progress = 0.4;
    build.resource_load = 0.9;
    build.is_critical = true;
    nodes.push(build);

    let mut sync_core = WorkflowNode::new(
        "wf-121",
        Some("wf-120"),
        NodeKind::Task,
        "Realtime sync core",
        day(2026, 8, 1),
        day(2026, 8, 28),
    );
    sync_core.owner = "Jonas Veld".to_string();
    sync_core.status = NodeStatus::InProgress;
    sync_core.progress = 0.6;
    sync_core.is_critical = true;
    sync_core.dependencies = vec!["wf-112".to_string()];
    sync_core.assignments = vec![assign("jonas", "lead", 1.0), assign("ines", "reviewer", 0.2)];
    nodes.push(sync_core);

    let mut board_views = WorkflowNode::new(
        "wf-122",
        Some("wf-120"),
        NodeKind::Task,
        "Board and calendar views",
        day(2026, 8, 15),
        day(2026, 9, 12),
    );
    board_views.owner = "Ines Duarte".to_string();
    board_views.status = NodeStatus::AtRisk;
    board_views.progress = 0.25;
    board_views.dependencies = vec!["wf-121".to_string()];
    board_views.risk_note = Some("Design handoff slipped two weeks".to_string());
    board_views.forecast_end_date = Some(day(2026, 9, 22));
    nodes.push(board_views);

    let mut load_tests = WorkflowNode::new(
        "wf-123",
        Some("wf-120"),
        NodeKind::Task,
        "Multi-peer load tests",
        day(2026, 9, 1),
        day(2026, 9, 25),
    );
    load_tests.owner = "Sam Okafor".to_string();
    load_tests.dependencies = vec!["wf-121".to_string()];
    load_tests.resource_load = 0.5;
    nodes.push(load_tests);

    let mut rollout = WorkflowNode::new(
        "wf-130",
        Some("wf-100"),
        NodeKind::Phase,
        "Rollout",
        day(2026, 9, 26),
        day(2026, 10, 30),
    );
    rollout.owner = "Priya Raman".to_string();
    rollout.resource_load = 0.6;
    nodes.push(rollout);

    let mut beta = WorkflowNode::new(
        "wf-131",
        Some("wf-130"),
        NodeKind::Task,
        "Beta cohort onboarding",
        day(2026, 9, 26),
        day(2026, 10, 16),
    );
    beta.owner = "Sam Okafor".to_string();
    beta.dependencies = vec!["wf-122".to_string(), "wf-123".to_string()];
    nodes.push(beta);

    let mut ga = WorkflowNode::new(
        "wf-140",
        Some("wf-100"),
        NodeKind::Milestone,
        "General availability",
        day(2026, 10, 30),
        day(2026, 10, 30),
    );
    ga.owner = "Priya Raman".to_string();
    ga.is_critical = true;
    ga.dependencies = vec!["wf-131".to_string()];
    nodes.push(ga);

    nodes
}
