//! Combines activity diff and contextual markers into a business status.

use crate::domain::capture::ActivityStatus;
use crate::domain::status_context::StatusContext;
use crate::domain::worker_status::{StatusKind, WorkerStatus};

/// Applies the ordered activity/context mapping rules.
pub fn map_status(activity: ActivityStatus, context: &StatusContext) -> WorkerStatus {
    match activity {
        ActivityStatus::NotEvaluated => WorkerStatus::Unknown {
            last_known_state: Some("initial or indeterminate".to_string()),
        },
        ActivityStatus::Idle => {
            if context.has_completion_marker {
                WorkerStatus::Done {
                    result: context.completion_text.clone(),
                }
            } else if context.has_error_marker {
                WorkerStatus::Terminated {
                    reason: context.error_text.clone(),
                }
            } else {
                WorkerStatus::Idle
            }
        }
        ActivityStatus::Working => {
            if context.is_blocked {
                WorkerStatus::Blocked {
                    reason: context.blocked_text.clone(),
                }
            } else {
                WorkerStatus::Working { details: None }
            }
        }
    }
}

/// A recognized status keyword embedded directly in a pane's title. When
/// present this short-circuits the activity/context mapping above as a
/// separate, higher-priority strategy.
pub fn status_kind_from_title(title: &str) -> Option<StatusKind> {
    let lower = title.to_lowercase();
    // Longest/most-specific keywords first so e.g. "terminated" isn't
    // mis-tokenized by a looser match.
    const KEYWORDS: &[(&str, StatusKind)] = &[
        ("terminated", StatusKind::Terminated),
        ("blocked", StatusKind::Blocked),
        ("working", StatusKind::Working),
        ("done", StatusKind::Done),
        ("idle", StatusKind::Idle),
        ("unknown", StatusKind::Unknown),
    ];
    KEYWORDS
        .iter()
        .find(|(kw, _)| lower.contains(kw))
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> StatusContext {
        StatusContext::default()
    }

    #[test]
    fn not_evaluated_maps_to_unknown() {
        let status = map_status(ActivityStatus::NotEvaluated, &ctx());
        assert_eq!(status.kind(), StatusKind::Unknown);
    }

    #[test]
    fn idle_with_completion_marker_is_done() {
        let mut c = ctx();
        c.has_completion_marker = true;
        c.completion_text = Some("done".into());
        let status = map_status(ActivityStatus::Idle, &c);
        assert_eq!(status, WorkerStatus::Done { result: Some("done".into()) });
    }

    #[test]
    fn idle_with_error_marker_is_terminated() {
        let mut c = ctx();
        c.has_error_marker = true;
        c.error_text = Some("error".into());
        let status = map_status(ActivityStatus::Idle, &c);
        assert_eq!(
            status,
            WorkerStatus::Terminated { reason: Some("error".into()) }
        );
    }

    #[test]
    fn idle_with_neither_marker_is_idle() {
        assert_eq!(map_status(ActivityStatus::Idle, &ctx()), WorkerStatus::Idle);
    }

    #[test]
    fn completion_marker_takes_priority_over_error_marker_when_idle() {
        let mut c = ctx();
        c.has_completion_marker = true;
        c.has_error_marker = true;
        let status = map_status(ActivityStatus::Idle, &c);
        assert_eq!(status.kind(), StatusKind::Done);
    }

    #[test]
    fn working_with_blocking_marker_is_blocked() {
        let mut c = ctx();
        c.is_blocked = true;
        c.blocked_text = Some("waiting".into());
        let status = map_status(ActivityStatus::Working, &c);
        assert_eq!(
            status,
            WorkerStatus::Blocked { reason: Some("waiting".into()) }
        );
    }

    #[test]
    fn working_without_blocking_marker_is_working() {
        let status = map_status(ActivityStatus::Working, &ctx());
        assert_eq!(status, WorkerStatus::Working { details: None });
    }

    #[test]
    fn title_keyword_short_circuit_detects_expected_kinds() {
        assert_eq!(status_kind_from_title("[BLOCKED] fix bug"), Some(StatusKind::Blocked));
        assert_eq!(status_kind_from_title("my-window"), None);
    }
}
