//! taskmesh CLI - one fresh in-memory peer per invocation.

use clap::Parser;
use std::process;

use taskmesh::cli::{Cli, Commands, NodeCommands, SheetCommands};
use taskmesh::commands::{self, Output};
use taskmesh::config::SyncConfig;
use taskmesh::realtime::WorkflowBus;
use taskmesh::sheets::JobSheetStore;
use taskmesh::store::WorkflowStore;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let human = cli.human_readable;

    match run_command(cli) {
        Ok(output) => print!("{}", ensure_newline(output.render(human))),
        Err(e) => {
            if human {
                eprintln!("Error: {}", e);
            } else {
                eprintln!(r#"{{"error": "{}"}}"#, e);
            }
            process::exit(1);
        }
    }
}

fn ensure_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}

fn run_command(cli: Cli) -> taskmesh::Result<Output> {
    let config = match &cli.config {
        Some(path) => SyncConfig::load_from(path)?,
        None => SyncConfig::load()?,
    };

    match cli.command {
        Commands::Node { command } => {
            let mut store = WorkflowStore::with_config(config.clone());
            match command {
                NodeCommands::List => commands::node_list(&store),
                NodeCommands::Show { id } => commands::node_show(&store, &id),
                NodeCommands::Update {
                    id,
                    progress,
                    status,
                    message,
                    author,
                } => {
                    let bus = WorkflowBus::with_capacity(&config.channel, config.bus_capacity);
                    commands::node_update(
                        &mut store,
                        &bus,
                        &id,
                        progress,
                        status.as_deref(),
                        message,
                        author,
                    )
                }
            }
        }
        Commands::History { limit } => {
            let store = WorkflowStore::with_config(config);
            commands::history(&store, limit)
        }
        Commands::Announcements => {
            let store = WorkflowStore::with_config(config);
            commands::announcements(&store)
        }
        Commands::Status => {
            let store = WorkflowStore::with_config(config);
            commands::status(&store)
        }
        Commands::Sheet { command } => {
            let mut sheets = JobSheetStore::new();
            match command {
                SheetCommands::Create { title, client } => {
                    commands::sheet_create(&mut sheets, title, client)
                }
                SheetCommands::List => commands::sheet_list(&sheets),
            }
        }
        Commands::Simulate { peers, updates } => commands::simulate(&config, peers, updates),
    }
}
