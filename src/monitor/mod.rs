//! Discovery, naming, and the scheduled cycle coordinator that drives
//! housekeeping actions against the monitoring service's pane collection.

pub mod coordinator;
pub mod naming;
pub mod service;

pub use coordinator::{CycleConfig, CycleCoordinator};
pub use service::{ClearOutcome, ClearRecord, MonitoringService, MonitoringStats, ProcessCaptureResult};
