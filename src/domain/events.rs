//! Typed domain events, created on the stack and pushed through the
//! dispatcher for the duration of a single dispatch call.

use chrono::{DateTime, Utc};

use crate::domain::capture::ActivityStatus;
use crate::domain::cycle::CycleAction;
use crate::domain::input_field::InputFieldStatus;
use crate::domain::pane_id::PaneId;
use crate::domain::worker_status::WorkerStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterReason {
    RegularCycle,
    InputCompletion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    IdleState,
    DoneState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearStrategy {
    ClearCommand,
    EscapeSequence,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    MonitoringCycleStarted {
        cycle_number: u64,
        scheduled_actions: Vec<CycleAction>,
        occurred_at: DateTime<Utc>,
    },
    MonitoringCycleCompleted {
        cycle_number: u64,
        processed: usize,
        changes: usize,
        enters: usize,
        clears: usize,
        duration_ms: u64,
        occurred_at: DateTime<Utc>,
    },
    PaneStatusChanged {
        pane_id: PaneId,
        old_status: WorkerStatus,
        new_status: WorkerStatus,
        occurred_at: DateTime<Utc>,
    },
    PaneCaptureStateUpdated {
        pane_id: PaneId,
        activity_status: ActivityStatus,
        input_status: InputFieldStatus,
        is_available_for_new_task: bool,
        occurred_at: DateTime<Utc>,
    },
    PaneEnterSendRequested {
        pane_id: PaneId,
        reason: EnterReason,
        occurred_at: DateTime<Utc>,
    },
    PaneClearRequested {
        pane_id: PaneId,
        reason: ClearReason,
        strategy: ClearStrategy,
        occurred_at: DateTime<Utc>,
    },
    PaneTitleChanged {
        pane_id: PaneId,
        old_title: String,
        new_title: String,
        occurred_at: DateTime<Utc>,
    },
}

/// The dispatcher's topic key. One event maps to exactly one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTopic {
    MonitoringCycleStarted,
    MonitoringCycleCompleted,
    PaneStatusChanged,
    PaneCaptureStateUpdated,
    PaneEnterSendRequested,
    PaneClearRequested,
    PaneTitleChanged,
}

impl DomainEvent {
    pub fn topic(&self) -> EventTopic {
        match self {
            DomainEvent::MonitoringCycleStarted { .. } => EventTopic::MonitoringCycleStarted,
            DomainEvent::MonitoringCycleCompleted { .. } => EventTopic::MonitoringCycleCompleted,
            DomainEvent::PaneStatusChanged { .. } => EventTopic::PaneStatusChanged,
            DomainEvent::PaneCaptureStateUpdated { .. } => EventTopic::PaneCaptureStateUpdated,
            DomainEvent::PaneEnterSendRequested { .. } => EventTopic::PaneEnterSendRequested,
            DomainEvent::PaneClearRequested { .. } => EventTopic::PaneClearRequested,
            DomainEvent::PaneTitleChanged { .. } => EventTopic::PaneTitleChanged,
        }
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DomainEvent::MonitoringCycleStarted { occurred_at, .. }
            | DomainEvent::MonitoringCycleCompleted { occurred_at, .. }
            | DomainEvent::PaneStatusChanged { occurred_at, .. }
            | DomainEvent::PaneCaptureStateUpdated { occurred_at, .. }
            | DomainEvent::PaneEnterSendRequested { occurred_at, .. }
            | DomainEvent::PaneClearRequested { occurred_at, .. }
            | DomainEvent::PaneTitleChanged { occurred_at, .. } => *occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_matches_variant() {
        let event = DomainEvent::PaneTitleChanged {
            pane_id: PaneId::create("%1").unwrap(),
            old_title: "a".into(),
            new_title: "b".into(),
            occurred_at: Utc::now(),
        };
        assert_eq!(event.topic(), EventTopic::PaneTitleChanged);
    }
}
