//! In-memory keyed set of panes enforcing the single-active-pane invariant.

use std::collections::HashMap;

use crate::domain::pane::Pane;
use crate::domain::pane_id::PaneId;
use crate::domain::pane_name::Role;
use crate::domain::worker_status::StatusKind;
use crate::error::{EngineError, Result};

#[derive(Debug, Default)]
pub struct PaneCollection {
    panes: HashMap<String, Pane>,
    active_id: Option<String>,
}

impl PaneCollection {
    pub fn new() -> Self {
        PaneCollection::default()
    }

    /// Adds `pane`. Rejects a second active pane with `BusinessRuleViolation`.
    pub fn add(&mut self, pane: Pane) -> Result<()> {
        if pane.is_active() {
            if let Some(existing) = &self.active_id {
                if Some(pane.id().as_str()) != Some(existing.as_str()) {
                    return Err(EngineError::business_rule(
                        "SingleActivePane",
                        format!(
                            "pane {} is already active; cannot also activate {}",
                            existing,
                            pane.id()
                        ),
                    ));
                }
            }
            self.active_id = Some(pane.id().as_str().to_string());
        }
        self.panes.insert(pane.id().as_str().to_string(), pane);
        Ok(())
    }

    pub fn remove(&mut self, id: &PaneId) -> Option<Pane> {
        let removed = self.panes.remove(id.as_str());
        if removed.is_some() && self.active_id.as_deref() == Some(id.as_str()) {
            self.active_id = None;
        }
        removed
    }

    pub fn get(&self, id: &PaneId) -> Option<&Pane> {
        self.panes.get(id.as_str())
    }

    pub fn get_mut(&mut self, id: &PaneId) -> Option<&mut Pane> {
        self.panes.get_mut(id.as_str())
    }

    pub fn get_all(&self) -> impl Iterator<Item = &Pane> {
        self.panes.values()
    }

    pub fn get_active(&self) -> Option<&Pane> {
        self.active_id
            .as_ref()
            .and_then(|id| self.panes.get(id.as_str()))
    }

    /// Every non-active pane.
    pub fn get_targets(&self) -> Vec<&Pane> {
        self.panes.values().filter(|p| !p.is_active()).collect()
    }

    pub fn get_by_role(&self, role: Role) -> Vec<&Pane> {
        self.panes
            .values()
            .filter(|p| p.name().map(|n| n.role()) == Some(role))
            .collect()
    }

    pub fn get_by_status(&self, kind: StatusKind) -> Vec<&Pane> {
        self.panes
            .values()
            .filter(|p| p.status().kind() == kind)
            .collect()
    }

    pub fn get_available_for_task_assignment(&self) -> Vec<&Pane> {
        self.panes.values().filter(|p| p.can_assign_task()).collect()
    }

    pub fn get_monitoring_targets(&self) -> Vec<&Pane> {
        self.panes.values().filter(|p| p.should_be_monitored()).collect()
    }

    pub fn count(&self) -> usize {
        self.panes.len()
    }

    /// All pane ids, sorted by numeric value ascending, for deterministic
    /// sequential naming.
    pub fn ids_sorted_by_numeric(&self) -> Vec<PaneId> {
        let mut ids: Vec<PaneId> = self.panes.values().map(|p| p.id().clone()).collect();
        ids.sort_by_key(PaneId::numeric_value);
        ids
    }

    /// Removes every pane, used at the start of a fresh discovery pass.
    pub fn clear(&mut self) {
        self.panes.clear();
        self.active_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pane_id::PaneId;
    use chrono::Utc;

    fn pane(id: &str, active: bool) -> Pane {
        Pane::new(PaneId::create(id).unwrap(), active, "bash", "t", Utc::now()).unwrap()
    }

    #[test]
    fn add_enforces_single_active_pane() {
        let mut c = PaneCollection::new();
        c.add(pane("%1", true)).unwrap();
        let err = c.add(pane("%2", true)).unwrap_err();
        assert!(matches!(err, EngineError::BusinessRuleViolation { .. }));
        assert_eq!(c.count(), 1);
    }

    #[test]
    fn get_active_returns_the_one_active_pane() {
        let mut c = PaneCollection::new();
        c.add(pane("%1", true)).unwrap();
        c.add(pane("%2", false)).unwrap();
        assert_eq!(c.get_active().unwrap().id().as_str(), "%1");
    }

    #[test]
    fn get_targets_excludes_active_pane() {
        let mut c = PaneCollection::new();
        c.add(pane("%1", true)).unwrap();
        c.add(pane("%2", false)).unwrap();
        let targets = c.get_targets();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id().as_str(), "%2");
    }

    #[test]
    fn remove_clears_active_id_when_removing_the_active_pane() {
        let mut c = PaneCollection::new();
        c.add(pane("%1", true)).unwrap();
        c.remove(&PaneId::create("%1").unwrap());
        assert!(c.get_active().is_none());
    }

    #[test]
    fn clear_resets_collection() {
        let mut c = PaneCollection::new();
        c.add(pane("%1", true)).unwrap();
        c.add(pane("%2", false)).unwrap();
        c.clear();
        assert_eq!(c.count(), 0);
        assert!(c.get_active().is_none());
    }
}
