//! The cycle coordinator: builds per-cycle plans, executes their actions
//! against the monitoring service's pane collection, and reacts to
//! `PaneStatusChanged` by requesting a completion Enter.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::dispatch::{Dispatcher, EventHandler};
use crate::domain::{
    clean_title, ClearReason, ClearStrategy, CycleAction, CycleExecutionResult, CyclePlan,
    DomainEvent, EnterReason, EventTopic, Pane, StatusKind,
};
use crate::error::Result;
use crate::monitor::service::MonitoringService;

/// Tunables for the per-cycle schedule.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    /// Number of leading cycles that use `short_cycle_delay` before falling
    /// back to `long_cycle_delay`.
    pub short_cycle_count: u64,
    pub short_cycle_delay: Duration,
    pub long_cycle_delay: Duration,
}

impl Default for CycleConfig {
    fn default() -> Self {
        CycleConfig {
            short_cycle_count: 5,
            short_cycle_delay: Duration::from_secs(5),
            long_cycle_delay: Duration::from_secs(30),
        }
    }
}

pub struct CycleCoordinator {
    cycle_number: AtomicU64,
    is_running: AtomicBool,
    dispatcher: Arc<dyn Dispatcher>,
    config: CycleConfig,
}

impl CycleCoordinator {
    pub fn new(dispatcher: Arc<dyn Dispatcher>, config: CycleConfig) -> Self {
        CycleCoordinator {
            cycle_number: AtomicU64::new(0),
            is_running: AtomicBool::new(false),
            dispatcher,
            config,
        }
    }

    pub fn current_cycle_number(&self) -> u64 {
        self.cycle_number.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Fails with `BusinessRuleViolation{SingleCycleExecution}` if a cycle is
    /// already running. Emits the bootstrap `MonitoringCycleStarted` and
    /// marks the coordinator running; the caller (the engine's main loop) is
    /// responsible for actually invoking `execute_single_cycle` on a
    /// schedule.
    pub async fn start_cycle(&self) -> Result<()> {
        if self.is_running.swap(true, Ordering::SeqCst) {
            return Err(crate::error::EngineError::business_rule(
                "SingleCycleExecution",
                "a monitoring cycle is already running",
            ));
        }
        self.dispatcher
            .dispatch(DomainEvent::MonitoringCycleStarted {
                cycle_number: self.current_cycle_number(),
                scheduled_actions: vec![CycleAction::CapturePaneStates, CycleAction::ValidateInvariants],
                occurred_at: Utc::now(),
            })
            .await;
        Ok(())
    }

    pub fn stop_cycle(&self) {
        self.is_running.store(false, Ordering::SeqCst);
    }

    /// Runs one full cycle: builds the plan for the next cycle number,
    /// executes its actions in order, and returns the aggregated counters.
    /// Per-action/per-pane errors are counted but never abort the cycle
    /// so one bad pane never stalls the rest of the cycle.
    pub async fn execute_single_cycle(&self, service: &mut MonitoringService) -> CycleExecutionResult {
        let cycle_number = self.cycle_number.fetch_add(1, Ordering::SeqCst) + 1;
        let start = Instant::now();

        let target_ids: Vec<_> = service
            .get_pane_collection()
            .get_monitoring_targets()
            .iter()
            .map(|p| p.id().clone())
            .collect();
        let plan = CyclePlan::build(cycle_number, target_ids);

        self.dispatcher
            .dispatch(DomainEvent::MonitoringCycleStarted {
                cycle_number,
                scheduled_actions: plan.scheduled_actions.clone(),
                occurred_at: Utc::now(),
            })
            .await;

        let mut result = CycleExecutionResult {
            cycle_number,
            ..Default::default()
        };

        for action in &plan.scheduled_actions {
            result.executed_actions += 1;
            match action {
                CycleAction::CapturePaneStates => self.run_capture(service, &mut result).await,
                CycleAction::SendRegularEnters => self.run_send_regular_enters(service, &mut result).await,
                CycleAction::ClearIdlePanes => self.run_clear_idle_panes(service, &mut result).await,
                CycleAction::UpdatePaneTitles => self.run_update_pane_titles(service, &mut result).await,
                CycleAction::ReportStatusChanges => {
                    // No-op accounting: capturing pane states already dispatched
                    // every PaneStatusChanged for this cycle.
                }
                CycleAction::ValidateInvariants => self.run_validate_invariants(service, &mut result),
            }
        }

        result.duration = start.elapsed();
        result.next_cycle_delay = if cycle_number <= self.config.short_cycle_count {
            self.config.short_cycle_delay
        } else {
            self.config.long_cycle_delay
        };

        self.dispatcher
            .dispatch(DomainEvent::MonitoringCycleCompleted {
                cycle_number,
                processed: result.total_processed,
                changes: result.status_changes,
                enters: result.enters_sent,
                clears: result.clears_executed,
                duration_ms: result.duration.as_millis() as u64,
                occurred_at: Utc::now(),
            })
            .await;

        debug!(
            cycle = cycle_number,
            processed = result.total_processed,
            changes = result.status_changes,
            enters = result.enters_sent,
            clears = result.clears_executed,
            errors = result.errors,
            next_delay_ms = result.next_cycle_delay.as_millis(),
            "cycle complete"
        );

        result
    }

    async fn run_capture(&self, service: &mut MonitoringService, result: &mut CycleExecutionResult) {
        match service.process_all_panes_capture().await {
            Ok(outcome) => {
                result.total_processed += outcome.processed_panes;
                result.status_changes += outcome.changed_panes.len();
            }
            Err(err) => {
                warn!(error = %err, "capture-pane-states action failed");
                result.errors += 1;
            }
        }
    }

    async fn run_send_regular_enters(
        &self,
        service: &mut MonitoringService,
        result: &mut CycleExecutionResult,
    ) {
        let target_ids: Vec<_> = service
            .get_pane_collection()
            .get_targets()
            .iter()
            .map(|p| p.id().clone())
            .collect();
        for pane_id in target_ids {
            self.dispatcher
                .dispatch(DomainEvent::PaneEnterSendRequested {
                    pane_id,
                    reason: EnterReason::RegularCycle,
                    occurred_at: Utc::now(),
                })
                .await;
            result.enters_sent += 1;
        }
    }

    async fn run_clear_idle_panes(&self, service: &mut MonitoringService, result: &mut CycleExecutionResult) {
        let targets: Vec<_> = service
            .get_pane_collection()
            .get_all()
            .filter(|p| p.should_be_cleared_when_idle())
            .map(|p| (p.id().clone(), p.status().kind()))
            .collect();
        for (pane_id, kind) in targets {
            let reason = if kind == StatusKind::Done {
                ClearReason::DoneState
            } else {
                ClearReason::IdleState
            };
            self.dispatcher
                .dispatch(DomainEvent::PaneClearRequested {
                    pane_id,
                    reason,
                    strategy: ClearStrategy::ClearCommand,
                    occurred_at: Utc::now(),
                })
                .await;
            result.clears_executed += 1;
        }
    }

    async fn run_update_pane_titles(&self, service: &mut MonitoringService, result: &mut CycleExecutionResult) {
        let now = Utc::now();
        let updates: Vec<_> = service
            .get_pane_collection()
            .get_all()
            .filter_map(|p| {
                let derived = derive_title(p, now);
                if derived != p.title() {
                    Some((p.id().clone(), p.title().to_string(), derived))
                } else {
                    None
                }
            })
            .collect();

        for (pane_id, old_title, new_title) in updates {
            if let Some(pane) = service.get_pane_collection_mut().get_mut(&pane_id) {
                pane.update_title(new_title.clone(), now);
            } else {
                continue;
            }
            self.dispatcher
                .dispatch(DomainEvent::PaneTitleChanged {
                    pane_id,
                    old_title,
                    new_title,
                    occurred_at: now,
                })
                .await;
        }
        let _ = result;
    }

    fn run_validate_invariants(&self, service: &MonitoringService, result: &mut CycleExecutionResult) {
        let collection = service.get_pane_collection();
        let active_count = collection.get_all().filter(|p| p.is_active()).count();
        if active_count > 1 {
            warn!(active_count, "invariant violation: more than one active pane");
            result.errors += 1;
        }
        for pane in collection.get_all() {
            if pane.history().len() > 2 {
                warn!(pane_id = %pane.id(), len = pane.history().len(), "invariant violation: history exceeds limit");
                result.errors += 1;
            }
        }
    }
}

/// Derives the title tmux should show for `pane`: a `[STATUS MM/DD HH:MM]`
/// prefix over the pane's own title, with any previous status prefix
/// stripped first.
fn derive_title(pane: &Pane, now: chrono::DateTime<Utc>) -> String {
    let base = clean_title(pane.title());
    let status = pane.status().kind().to_string().to_uppercase();
    format!("[{} {}] {}", status, now.format("%m/%d %H:%M"), base)
}

/// Reacts to `PaneStatusChanged` by requesting a completion Enter when a
/// pane moves from `WORKING` to `IDLE`. Subscribed to the dispatcher at
/// engine-construction time.
#[async_trait]
impl EventHandler for CycleCoordinator {
    fn name(&self) -> &str {
        "cycle-coordinator"
    }

    fn can_handle(&self, topic: EventTopic) -> bool {
        topic == EventTopic::PaneStatusChanged
    }

    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        if let DomainEvent::PaneStatusChanged {
            pane_id,
            old_status,
            new_status,
            ..
        } = event
        {
            if old_status.kind() == StatusKind::Working && new_status.kind() == StatusKind::Idle {
                self.dispatcher
                    .dispatch(DomainEvent::PaneEnterSendRequested {
                        pane_id: pane_id.clone(),
                        reason: EnterReason::InputCompletion,
                        occurred_at: Utc::now(),
                    })
                    .await;
            }
        }
        Ok(())
    }
}
