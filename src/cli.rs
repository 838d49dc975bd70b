//! CLI front end: `watch`, `status`, `clear-node-panes`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::{error, info};

use crate::config::PaneherderConfig;
use crate::engine::Engine;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "paneherder")]
#[command(about = "Supervises terminal multiplexer panes running coding-assistant sessions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover panes, assign names, and drive the scheduled cycle loop
    Watch {
        /// Restrict discovery to a single tmux session
        #[arg(long)]
        session: Option<String>,

        /// Overrides the configured steady-state cycle interval
        #[arg(long)]
        interval_secs: Option<u64>,

        /// Stop after this many cycles instead of running indefinitely
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Reserved for launching an assistant process in the active pane
        #[arg(long)]
        start_assistant: bool,
    },

    /// One-shot discovery and classification, printed as a table and exit
    Status {
        /// Restrict discovery to a single tmux session
        #[arg(long)]
        session: Option<String>,

        /// Print machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Out-of-cycle maintenance: clear every pane running Node tooling
    ClearNodePanes {
        /// Restrict discovery to a single tmux session
        #[arg(long)]
        session: Option<String>,
    },
}

#[derive(Tabled)]
struct PaneStatusRow {
    #[tabled(rename = "PANE")]
    pane_id: String,
    #[tabled(rename = "ROLE")]
    role: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "TITLE")]
    title: String,
}

#[derive(serde::Serialize)]
struct PaneStatusJson {
    pane_id: String,
    role: String,
    status: String,
    title: String,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = PaneherderConfig::load().context("loading configuration")?;

    match cli.command {
        Commands::Watch {
            session,
            interval_secs,
            max_cycles,
            start_assistant,
        } => run_watch(config, session, interval_secs, max_cycles, start_assistant).await,
        Commands::Status { session, json } => run_status(config, session, json).await,
        Commands::ClearNodePanes { session } => run_clear_node_panes(config, session).await,
    }
}

async fn run_watch(
    config: PaneherderConfig,
    session: Option<String>,
    interval_secs: Option<u64>,
    max_cycles: Option<u64>,
    start_assistant: bool,
) -> Result<()> {
    let config = config.apply_overrides(interval_secs, max_cycles);
    let mut engine = Engine::new(&config);
    info!(session = ?session, max_cycles = config.max_cycles, "starting watch loop");
    engine.run(session.as_deref(), start_assistant).await.map_err(|err| {
        error!(error = %err, "watch loop exited with an error");
        anyhow::anyhow!(err)
    })
}

async fn run_status(config: PaneherderConfig, session: Option<String>, json: bool) -> Result<()> {
    let mut engine = Engine::new(&config);
    let service = engine
        .status_snapshot(session.as_deref())
        .await
        .map_err(|err| anyhow::anyhow!(err))?;

    let mut panes: Vec<_> = service.get_pane_collection().get_all().collect();
    panes.sort_by_key(|p| p.id().numeric_value());

    if json {
        let rows: Vec<PaneStatusJson> = panes
            .iter()
            .map(|p| PaneStatusJson {
                pane_id: p.id().as_str().to_string(),
                role: p.name().map(|n| n.role().to_string()).unwrap_or_else(|| "-".to_string()),
                status: p.status().kind().to_string(),
                title: p.title().to_string(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let rows: Vec<PaneStatusRow> = panes
        .iter()
        .map(|p| PaneStatusRow {
            pane_id: p.id().as_str().to_string(),
            role: p.name().map(|n| n.role().to_string()).unwrap_or_else(|| "-".to_string()),
            status: p.status().kind().to_string(),
            title: p.title().to_string(),
        })
        .collect();

    if rows.is_empty() {
        println!("No panes found");
        return Ok(());
    }

    let mut table = Table::new(rows);
    table.with(Style::blank());
    println!("{table}");
    Ok(())
}

async fn run_clear_node_panes(config: PaneherderConfig, session: Option<String>) -> Result<()> {
    let mut engine = Engine::new(&config);
    let records = engine
        .clear_node_panes(session.as_deref())
        .await
        .map_err(|err| anyhow::anyhow!(err))?;

    for record in &records {
        info!(pane_id = %record.pane_id, outcome = ?record.outcome, "clear-node-panes result");
    }
    println!("cleared {} pane(s)", records.len());
    Ok(())
}
