//! The engine façade: wires collaborators with explicit ownership and
//! drives the scheduled cycle loop.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::cancellation::CancellationToken;
use crate::cmd::{CommandExecutor, TokioCommandExecutor};
use crate::config::PaneherderConfig;
use crate::dispatch::handlers::{ClearHandler, EnterHandler, TitleHandler};
use crate::dispatch::{Dispatcher, EventDispatcher, EventHandler};
use crate::error::Result;
use crate::monitor::{ClearRecord, CycleConfig, CycleCoordinator, MonitoringService, MonitoringStats};
use crate::multiplexer::TmuxClient;

/// Owns every long-lived collaborator, constructed once per process run
/// with explicit wiring — no lazy globals.
pub struct Engine {
    service: MonitoringService,
    coordinator: Arc<CycleCoordinator>,
    cancellation: CancellationToken,
    max_cycles: u64,
}

impl Engine {
    pub fn new(config: &PaneherderConfig) -> Self {
        let executor: Arc<dyn CommandExecutor> = Arc::new(TokioCommandExecutor::tmux());
        Engine::with_executor(config, executor)
    }

    /// Constructs an engine against an injected `CommandExecutor`, so tests
    /// can wire a `MockCommandExecutor` instead of a live tmux binary.
    pub fn with_executor(config: &PaneherderConfig, executor: Arc<dyn CommandExecutor>) -> Self {
        let dispatcher = Arc::new(EventDispatcher::new());
        let dispatcher_dyn: Arc<dyn Dispatcher> = Arc::clone(&dispatcher) as Arc<dyn Dispatcher>;

        let tmux = Arc::new(TmuxClient::new(executor));

        let communication_delay = Duration::from_millis(config.communication_delay_ms);
        dispatcher.subscribe(Arc::new(EnterHandler::new(Arc::clone(&tmux), communication_delay)));
        dispatcher.subscribe(Arc::new(ClearHandler::new(Arc::clone(&tmux), communication_delay)));
        dispatcher.subscribe(Arc::new(TitleHandler::new(Arc::clone(&tmux))));

        let coordinator = Arc::new(CycleCoordinator::new(
            Arc::clone(&dispatcher_dyn),
            CycleConfig {
                short_cycle_count: config.short_cycle_count as u64,
                short_cycle_delay: Duration::from_secs(config.short_cycle_delay_secs),
                // `interval_secs` is the CLI-overridable steady-state cadence
                // (`watch --interval-secs`); `long_cycle_delay_secs` is its
                // config-file default.
                long_cycle_delay: Duration::from_secs(config.interval_secs),
            },
        ));
        dispatcher.subscribe(Arc::clone(&coordinator) as Arc<dyn EventHandler>);

        let service = MonitoringService::new(
            tmux,
            dispatcher_dyn,
            config.name_sequence.clone(),
            config.history_capacity,
        );

        let cancellation = CancellationToken::new();

        Engine {
            service,
            coordinator,
            cancellation,
            max_cycles: config.max_cycles,
        }
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn stats(&self) -> MonitoringStats {
        self.service.get_monitoring_stats()
    }

    pub async fn status_snapshot(
        &mut self,
        session_name: Option<&str>,
    ) -> Result<&MonitoringService> {
        self.service.start_monitoring(session_name, false).await?;
        self.service.process_all_panes_capture().await?;
        Ok(&self.service)
    }

    pub async fn clear_node_panes(&mut self, session_name: Option<&str>) -> Result<Vec<ClearRecord>> {
        self.service.start_monitoring(session_name, false).await?;
        Ok(self.service.clear_node_panes().await)
    }

    /// Runs discovery once, then drives cycles until cancellation fires or
    /// `max_cycles` is reached.
    pub async fn run(&mut self, session_name: Option<&str>, should_start_assistant: bool) -> Result<()> {
        self.cancellation.spawn_ctrl_c_listener();
        self.service.start_monitoring(session_name, should_start_assistant).await?;
        self.coordinator.start_cycle().await?;

        let mut cycles_run: u64 = 0;
        loop {
            if self.cancellation.is_cancelled() {
                info!("cancellation requested, stopping monitoring loop");
                break;
            }
            if cycles_run >= self.max_cycles {
                info!(max_cycles = self.max_cycles, "reached configured cycle limit");
                break;
            }

            let result = self.coordinator.execute_single_cycle(&mut self.service).await;
            cycles_run += 1;
            info!(
                cycle = result.cycle_number,
                processed = result.total_processed,
                changes = result.status_changes,
                enters = result.enters_sent,
                clears = result.clears_executed,
                errors = result.errors,
                "cycle summary"
            );
            if result.errors > 0 {
                error!(cycle = result.cycle_number, errors = result.errors, "cycle completed with errors");
            }

            if self.cancellation.delay(result.next_cycle_delay).await {
                info!("cancellation requested during cycle delay");
                break;
            }
        }

        self.coordinator.stop_cycle();
        let stats = self.service.get_monitoring_stats();
        info!(
            total = stats.total,
            idle = stats.idle,
            working = stats.working,
            done = stats.done,
            terminated = stats.terminated,
            cycles_run,
            "monitoring loop exiting"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::mock::MockCommandExecutor;

    fn mock_engine(config: &PaneherderConfig) -> Engine {
        let executor: Arc<dyn CommandExecutor> = Arc::new(MockCommandExecutor::new());
        Engine::with_executor(config, executor)
    }

    #[test]
    fn new_wires_an_engine_with_zero_cycles_run() {
        let config = PaneherderConfig::default();
        let engine = mock_engine(&config);
        assert_eq!(engine.stats().total, 0);
        assert!(!engine.cancellation().is_cancelled());
    }

    #[tokio::test]
    async fn max_cycles_of_zero_exits_the_loop_immediately() {
        let mut config = PaneherderConfig::default();
        config.max_cycles = 0;
        let mut engine = mock_engine(&config);
        engine.run(None, false).await.unwrap();
    }
}
