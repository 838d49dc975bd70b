//! Per-cycle plans, execution counters, and the title-cleaning helper shared
//! by the title event handler and the coordinator's per-pane refresh step.

use std::time::Duration;

use crate::domain::pane_id::PaneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CycleAction {
    CapturePaneStates,
    SendRegularEnters,
    ClearIdlePanes,
    UpdatePaneTitles,
    ReportStatusChanges,
    ValidateInvariants,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CyclePlan {
    pub cycle_number: u64,
    pub scheduled_actions: Vec<CycleAction>,
    pub target_pane_ids: Vec<PaneId>,
    pub estimated_duration: Duration,
}

impl CyclePlan {
    /// Builds the action list for `cycle_number`: always
    /// `CAPTURE_PANE_STATES`; `SEND_REGULAR_ENTERS` on even cycles;
    /// `CLEAR_IDLE_PANES` on multiples of 3; `UPDATE_PANE_TITLES` on
    /// multiples of 5; always `REPORT_STATUS_CHANGES` then
    /// `VALIDATE_INVARIANTS` last.
    pub fn build(cycle_number: u64, target_pane_ids: Vec<PaneId>) -> Self {
        let mut scheduled_actions = vec![CycleAction::CapturePaneStates];
        if cycle_number % 2 == 0 {
            scheduled_actions.push(CycleAction::SendRegularEnters);
        }
        if cycle_number % 3 == 0 {
            scheduled_actions.push(CycleAction::ClearIdlePanes);
        }
        if cycle_number % 5 == 0 {
            scheduled_actions.push(CycleAction::UpdatePaneTitles);
        }
        scheduled_actions.push(CycleAction::ReportStatusChanges);
        scheduled_actions.push(CycleAction::ValidateInvariants);

        CyclePlan {
            cycle_number,
            estimated_duration: Duration::from_millis(100 * target_pane_ids.len().max(1) as u64),
            scheduled_actions,
            target_pane_ids,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleExecutionResult {
    pub cycle_number: u64,
    pub executed_actions: usize,
    pub total_processed: usize,
    pub status_changes: usize,
    pub enters_sent: usize,
    pub clears_executed: usize,
    pub errors: usize,
    pub duration: Duration,
    pub next_cycle_delay: Duration,
}

/// Repeatedly strips a leading `[STATUS](optional " MM/DD HH:MM")]` marker and
/// collapses `word:` duplications, until the output no longer changes.
/// Idempotent by construction: `clean_title(clean_title(x)) == clean_title(x)`.
pub fn clean_title(title: &str) -> String {
    let mut current = title.to_string();
    loop {
        let next = clean_title_once(&current);
        if next == current {
            return next;
        }
        current = next;
    }
}

const RECOGNIZED_STATUS_KEYWORDS: &[&str] =
    &["WORKING", "IDLE", "TERMINATED", "DONE", "UNKNOWN"];

fn clean_title_once(title: &str) -> String {
    let stripped = strip_status_prefix(title).unwrap_or(title);
    collapse_duplicate_word_prefix(stripped)
}

/// Strips one leading `[KEYWORD]` or `[KEYWORD MM/DD HH:MM]` prefix (with an
/// optional trailing space before the remaining text).
fn strip_status_prefix(title: &str) -> Option<&str> {
    let rest = title.strip_prefix('[')?;
    let close = rest.find(']')?;
    let inner = &rest[..close];
    let keyword = inner.split(' ').next().unwrap_or("");
    if !RECOGNIZED_STATUS_KEYWORDS.contains(&keyword) {
        return None;
    }
    Some(rest[close + 1..].trim_start())
}

/// Collapses a leading `word: word: ...` run of identical repeated labels
/// down to a single occurrence, e.g. `"build: build: starting"` ->
/// `"build: starting"`.
fn collapse_duplicate_word_prefix(title: &str) -> String {
    if let Some(colon) = title.find(':') {
        let label = &title[..colon];
        let after = title[colon + 1..].trim_start();
        if let Some(rest) = after.strip_prefix(&format!("{label}:")) {
            return format!("{label}:{}", rest);
        }
    }
    title.to_string()
}
