//! Orchestrates discovery -> classification/naming -> cycle handoff, and
//! owns the pane collection.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::warn;

use crate::capture::{CaptureAdapter, CaptureHistory};
use crate::domain::{
    map_status, parse_input_field, status_kind_from_title, ActivityStatus, DomainEvent,
    InputFieldStatus, Pane, PaneCollection, PaneId, StatusContext, StatusKind, WorkerStatus,
};
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::monitor::naming;
use crate::multiplexer::{CaptureOptions, SendKey, TmuxClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonitoringStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub unknown: usize,
    pub idle: usize,
    pub working: usize,
    pub blocked: usize,
    pub done: usize,
    pub terminated: usize,
}

pub struct ProcessCaptureResult {
    pub processed_panes: usize,
    pub changed_panes: Vec<PaneId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    Success,
    Failed { reason: String },
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearRecord {
    pub pane_id: PaneId,
    pub outcome: ClearOutcome,
    pub duration: Duration,
}

pub struct MonitoringService {
    collection: PaneCollection,
    tmux: Arc<TmuxClient>,
    capture_adapter: CaptureAdapter,
    capture_history: CaptureHistory,
    dispatcher: Arc<dyn Dispatcher>,
    name_sequence: Vec<String>,
}

impl MonitoringService {
    pub fn new(
        tmux: Arc<TmuxClient>,
        dispatcher: Arc<dyn Dispatcher>,
        name_sequence: Vec<String>,
        history_capacity: usize,
    ) -> Self {
        MonitoringService {
            collection: PaneCollection::new(),
            capture_adapter: CaptureAdapter::new(Arc::clone(&tmux)),
            capture_history: CaptureHistory::new(history_capacity),
            tmux,
            dispatcher,
            name_sequence,
        }
    }

    /// Runs discovery, rebuilds the collection from scratch, then assigns
    /// names. `session_name`/`should_start_assistant` are accepted at this
    /// boundary but the core does not itself launch assistant processes —
    /// that stays deliberately external.
    pub async fn start_monitoring(
        &mut self,
        _session_name: Option<&str>,
        _should_start_assistant: bool,
    ) -> Result<()> {
        let rows = self.tmux.discover_panes().await?;
        self.collection.clear();
        for row in rows {
            match from_tmux_data(&row.pane_id, row.active, &row.current_command, &row.title) {
                Ok(pane) => {
                    if let Err(err) = self.collection.add(pane) {
                        warn!(pane_id = %row.pane_id, error = %err, "discovery: skipping pane");
                    }
                }
                Err(err) => {
                    warn!(pane_id = %row.pane_id, error = %err, "discovery: invalid pane row");
                }
            }
        }
        naming::assign_names(&mut self.collection, &self.name_sequence);
        Ok(())
    }

    pub fn get_pane_collection(&self) -> &PaneCollection {
        &self.collection
    }

    pub fn get_pane_collection_mut(&mut self) -> &mut PaneCollection {
        &mut self.collection
    }

    pub fn get_active_pane(&self) -> Option<&Pane> {
        self.collection.get_active()
    }

    pub fn get_monitoring_stats(&self) -> MonitoringStats {
        let mut stats = MonitoringStats {
            total: self.collection.count(),
            ..Default::default()
        };
        for pane in self.collection.get_all() {
            if pane.is_active() {
                stats.active += 1;
            } else {
                stats.inactive += 1;
            }
            match pane.status().kind() {
                StatusKind::Unknown => stats.unknown += 1,
                StatusKind::Idle => stats.idle += 1,
                StatusKind::Working => stats.working += 1,
                StatusKind::Blocked => stats.blocked += 1,
                StatusKind::Done => stats.done += 1,
                StatusKind::Terminated => stats.terminated += 1,
            }
        }
        stats
    }

    /// Captures every monitoring-target pane, diffs against history, maps
    /// the result to a status, and requests the transition when it changed.
    pub async fn process_all_panes_capture(&mut self) -> Result<ProcessCaptureResult> {
        let target_ids: Vec<PaneId> = self
            .collection
            .get_monitoring_targets()
            .iter()
            .map(|p| p.id().clone())
            .collect();

        let mut processed = 0usize;
        let mut changed = Vec::new();

        for id in &target_ids {
            let capture = match self.capture_adapter.capture(id, CaptureOptions::default()).await {
                Ok(c) => c,
                Err(err) => {
                    warn!(pane_id = %id, error = %err, "capture failed for pane");
                    continue;
                }
            };
            processed += 1;

            let previous = self.capture_history.previous(id).cloned();
            let activity = ActivityStatus::from_captures(previous.as_ref(), &capture);
            let context = StatusContext::from_capture_text(&capture.content);
            let mut new_status = map_status(activity, &context);
            let input_status = input_status_for(&capture.lines);

            let title_kind = self
                .collection
                .get(id)
                .and_then(|p| status_kind_from_title(p.title()));
            if let Some(kind) = title_kind {
                new_status = WorkerStatus::from_kind(kind);
            }

            self.capture_history.append(id, capture);

            let Some(pane) = self.collection.get_mut(id) else {
                continue;
            };
            let old_status = pane.status().clone();
            if old_status.kind() != new_status.kind() {
                match pane.update_status(new_status.clone(), Utc::now()) {
                    Ok(()) => {
                        changed.push(id.clone());
                        self.dispatcher
                            .dispatch(DomainEvent::PaneStatusChanged {
                                pane_id: id.clone(),
                                old_status,
                                new_status: new_status.clone(),
                                occurred_at: Utc::now(),
                            })
                            .await;
                    }
                    Err(err) => {
                        warn!(pane_id = %id, error = %err, "rejected status transition");
                    }
                }
            }

            let Some(pane) = self.collection.get(id) else {
                continue;
            };
            self.dispatcher
                .dispatch(DomainEvent::PaneCaptureStateUpdated {
                    pane_id: id.clone(),
                    activity_status: activity,
                    input_status,
                    is_available_for_new_task: pane.can_assign_task(),
                    occurred_at: Utc::now(),
                })
                .await;
        }

        Ok(ProcessCaptureResult {
            processed_panes: processed,
            changed_panes: changed,
        })
    }

    /// Out-of-cycle maintenance: clears every pane whose current command is
    /// Node tooling.
    pub async fn clear_node_panes(&mut self) -> Vec<ClearRecord> {
        let targets: Vec<(PaneId, bool)> = self
            .collection
            .get_all()
            .filter(|p| is_node_tooling_command(p.current_command()))
            .map(|p| (p.id().clone(), p.is_active()))
            .collect();

        let mut records = Vec::with_capacity(targets.len());
        for (pane_id, is_active) in targets {
            let start = Instant::now();
            if is_active {
                records.push(ClearRecord {
                    pane_id,
                    outcome: ClearOutcome::Skipped {
                        reason: "pane is active".to_string(),
                    },
                    duration: start.elapsed(),
                });
                continue;
            }

            let result = self.send_clear_command(pane_id.as_str()).await;
            let outcome = match result {
                Ok(()) => ClearOutcome::Success,
                Err(err) => ClearOutcome::Failed { reason: err.to_string() },
            };
            records.push(ClearRecord { pane_id, outcome, duration: start.elapsed() });
        }
        records
    }

    async fn send_clear_command(&self, pane_id: &str) -> Result<()> {
        self.tmux.send_keys(pane_id, &SendKey::Literal("/clear".to_string())).await?;
        self.tmux.send_keys(pane_id, &SendKey::Enter).await
    }
}

/// Row -> Pane mapping: validates id format, coerces blank command/title to
/// `"unknown"`/`"untitled"`.
pub fn from_tmux_data(id: &str, active: bool, command: &str, title: &str) -> Result<Pane> {
    let pane_id = PaneId::create(id)?;
    let command = if command.trim().is_empty() { "unknown" } else { command };
    let title = if title.trim().is_empty() { "untitled" } else { title };
    Pane::new(pane_id, active, command, title, Utc::now())
}

fn is_node_tooling_command(command: &str) -> bool {
    const NODE_COMMANDS: &[&str] = &["node", "npm", "npx", "yarn", "pnpm", "bun"];
    let lower = command.to_lowercase();
    NODE_COMMANDS.iter().any(|c| lower == *c || lower.starts_with(&format!("{c} ")))
}

/// Folds the input-field parser's `ValidationFailed` (fewer than 3 lines in
/// the capture) into `ParseError` so a short capture doesn't abort the
/// per-pane processing loop.
fn input_status_for(lines: &[String]) -> InputFieldStatus {
    match parse_input_field(lines) {
        Ok(status) => status,
        Err(err) => InputFieldStatus::ParseError { reason: err.to_string() },
    }
}
