//! The pane aggregate root: identity, role-name, status, bounded history,
//! active flag, and the invariants enforced around all of it.

use chrono::{DateTime, Utc};

use crate::domain::pane_id::PaneId;
use crate::domain::pane_name::{PaneName, Role};
use crate::domain::worker_status::{StatusKind, WorkerStatus};
use crate::error::{EngineError, Result};

const MAX_HISTORY: usize = 2;

/// One retained snapshot of a pane's prior state, appended on each accepted
/// status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub status: WorkerStatus,
    pub title: String,
    pub command: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    id: PaneId,
    is_active: bool,
    current_command: String,
    title: String,
    status: WorkerStatus,
    name: Option<PaneName>,
    history: Vec<HistoryEntry>,
    created_at: DateTime<Utc>,
}

impl Pane {
    /// Constructs a freshly discovered pane. `command` and `title` must be
    /// non-empty — callers coerce blank values to `"unknown"`/`"untitled"`
    /// before calling this.
    pub fn new(
        id: PaneId,
        is_active: bool,
        current_command: impl Into<String>,
        title: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let current_command = current_command.into();
        let title = title.into();
        if current_command.trim().is_empty() {
            return Err(EngineError::EmptyInput);
        }
        if title.trim().is_empty() {
            return Err(EngineError::EmptyInput);
        }
        Ok(Pane {
            id,
            is_active,
            current_command,
            title,
            status: WorkerStatus::default(),
            name: None,
            history: Vec::with_capacity(MAX_HISTORY),
            created_at,
        })
    }

    pub fn id(&self) -> &PaneId {
        &self.id
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn current_command(&self) -> &str {
        &self.current_command
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> &WorkerStatus {
        &self.status
    }

    pub fn name(&self) -> Option<&PaneName> {
        self.name.as_ref()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Attempts the transition to `new`. Rejects transitions not in the
    /// allowed graph with `BusinessRuleViolation`. On
    /// acceptance, appends the *previous* status (and surrounding context) to
    /// history, trimming to `MAX_HISTORY`, then mutates.
    pub fn update_status(&mut self, new: WorkerStatus, occurred_at: DateTime<Utc>) -> Result<()> {
        if !self.status.can_transition_to(&new) {
            return Err(EngineError::business_rule(
                "ValidStatusTransition",
                format!("{} -> {}", self.status.kind(), new.kind()),
            ));
        }
        self.push_history(occurred_at);
        self.status = new;
        Ok(())
    }

    pub fn update_title(&mut self, new_title: impl Into<String>, occurred_at: DateTime<Utc>) {
        self.push_history(occurred_at);
        self.title = new_title.into();
    }

    pub fn update_command(&mut self, new_command: impl Into<String>, occurred_at: DateTime<Utc>) {
        self.push_history(occurred_at);
        self.current_command = new_command.into();
    }

    /// Rejects assigning a non-main/non-manager role while `isActive`.
    pub fn assign_name(&mut self, name: PaneName) -> Result<()> {
        if self.is_active && !matches!(name.role(), Role::Main | Role::Manager) {
            return Err(EngineError::business_rule(
                "ActivePaneRoleRestriction",
                format!("active pane cannot be assigned role {}", name.role()),
            ));
        }
        self.name = Some(name);
        Ok(())
    }

    /// Sets the active flag directly. Role-restriction re-validation when
    /// activating a pane that already carries a disallowed name is the
    /// caller's responsibility (the collection enforces single-active; this
    /// method only flips the local flag).
    pub fn set_active(&mut self, active: bool) -> Result<()> {
        if active {
            if let Some(name) = &self.name {
                if !matches!(name.role(), Role::Main | Role::Manager) {
                    return Err(EngineError::business_rule(
                        "ActivePaneRoleRestriction",
                        format!("cannot activate pane named {} with role {}", name, name.role()),
                    ));
                }
            }
        }
        self.is_active = active;
        Ok(())
    }

    fn push_history(&mut self, timestamp: DateTime<Utc>) {
        self.history.push(HistoryEntry {
            timestamp,
            status: self.status.clone(),
            title: self.title.clone(),
            command: self.current_command.clone(),
        });
        while self.history.len() > MAX_HISTORY {
            self.history.remove(0);
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status.kind() == StatusKind::Idle
    }

    pub fn is_working(&self) -> bool {
        self.status.kind() == StatusKind::Working
    }

    pub fn is_done(&self) -> bool {
        self.status.kind() == StatusKind::Done
    }

    pub fn is_terminated(&self) -> bool {
        self.status.kind() == StatusKind::Terminated
    }

    pub fn can_assign_task(&self) -> bool {
        self.is_idle() && !self.is_active
    }

    pub fn should_be_monitored(&self) -> bool {
        !self.is_terminated() && !self.is_active
    }

    /// Worker-role panes that are idle or done are eligible for an
    /// out-of-cycle clear. Non-worker panes are never cleared.
    pub fn should_be_cleared_when_idle(&self) -> bool {
        self.is_worker_role() && (self.is_idle() || self.is_done())
    }

    pub fn is_worker_role(&self) -> bool {
        matches!(self.name.as_ref().map(PaneName::role), Some(Role::Worker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pane(id: &str, active: bool) -> Pane {
        Pane::new(PaneId::create(id).unwrap(), active, "bash", "main", Utc::now()).unwrap()
    }

    #[test]
    fn new_rejects_blank_command_or_title() {
        assert!(Pane::new(PaneId::create("%1").unwrap(), false, "", "t", Utc::now()).is_err());
        assert!(Pane::new(PaneId::create("%1").unwrap(), false, "c", "", Utc::now()).is_err());
    }

    #[test]
    fn accepted_transition_updates_status_and_records_history() {
        let mut p = pane("%1", false);
        p.update_status(WorkerStatus::Idle, Utc::now()).unwrap();
        assert!(p.is_idle());
        assert_eq!(p.history().len(), 1);
        assert_eq!(p.history()[0].status.kind(), StatusKind::Unknown);
    }

    #[test]
    fn rejected_transition_leaves_status_unchanged() {
        let mut p = pane("%1", false);
        p.update_status(WorkerStatus::Idle, Utc::now()).unwrap();
        let err = p
            .update_status(WorkerStatus::Done { result: None }, Utc::now())
            .unwrap_err();
        assert!(matches!(err, EngineError::BusinessRuleViolation { .. }));
        assert!(p.is_idle());
    }

    #[test]
    fn history_never_exceeds_two_entries() {
        let mut p = pane("%1", false);
        p.update_status(WorkerStatus::Idle, Utc::now()).unwrap();
        p.update_status(WorkerStatus::Working { details: None }, Utc::now())
            .unwrap();
        p.update_status(WorkerStatus::Idle, Utc::now()).unwrap();
        assert_eq!(p.history().len(), 2);
    }

    #[test]
    fn active_pane_rejects_non_main_manager_name_assignment() {
        let mut p = pane("%1", true);
        let err = p.assign_name(PaneName::create("worker1").unwrap()).unwrap_err();
        assert!(matches!(err, EngineError::BusinessRuleViolation { .. }));
    }

    #[test]
    fn active_pane_accepts_main_or_manager_name_assignment() {
        let mut p = pane("%1", true);
        assert!(p.assign_name(PaneName::create("main").unwrap()).is_ok());
        let mut p2 = pane("%2", true);
        assert!(p2.assign_name(PaneName::create("manager1").unwrap()).is_ok());
    }

    #[test]
    fn inactive_pane_accepts_worker_name() {
        let mut p = pane("%3", false);
        assert!(p.assign_name(PaneName::create("worker1").unwrap()).is_ok());
        assert!(p.is_worker_role());
    }

    #[test]
    fn should_be_cleared_when_idle_requires_worker_role() {
        let mut p = pane("%1", false);
        p.update_status(WorkerStatus::Idle, Utc::now()).unwrap();
        assert!(!p.should_be_cleared_when_idle());
        p.assign_name(PaneName::create("worker1").unwrap()).unwrap();
        assert!(p.should_be_cleared_when_idle());
    }

    #[test]
    fn should_be_monitored_excludes_terminated_and_active() {
        let mut p = pane("%1", false);
        assert!(p.should_be_monitored());
        p.update_status(WorkerStatus::Terminated { reason: None }, Utc::now())
            .unwrap();
        assert!(!p.should_be_monitored());

        let active = pane("%2", true);
        assert!(!active.should_be_monitored());
    }

    #[test]
    fn can_assign_task_requires_idle_and_inactive() {
        let mut p = pane("%1", false);
        assert!(!p.can_assign_task());
        p.update_status(WorkerStatus::Idle, Utc::now()).unwrap();
        assert!(p.can_assign_task());

        let mut active = pane("%2", true);
        active.update_status(WorkerStatus::Idle, Utc::now()).unwrap();
        assert!(!active.can_assign_task());
    }
}
