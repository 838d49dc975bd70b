//! Capture results and the pure activity diff derived from them.

use chrono::{DateTime, Utc};

use crate::domain::pane_id::PaneId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureResult {
    pub pane_id: PaneId,
    pub content: String,
    pub lines: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl CaptureResult {
    pub fn new(pane_id: PaneId, content: String, timestamp: DateTime<Utc>) -> Self {
        let lines = content.split('\n').map(str::to_string).collect();
        CaptureResult {
            pane_id,
            content,
            lines,
            timestamp,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Objective diff of successive captures. Derived purely from content equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityStatus {
    NotEvaluated,
    Idle,
    Working,
}

impl ActivityStatus {
    /// `NOT_EVALUATED` iff `previous` is `None`; otherwise `WORKING` iff the
    /// content differs from the previous capture, else `IDLE`.
    pub fn from_captures(previous: Option<&CaptureResult>, current: &CaptureResult) -> Self {
        match previous {
            None => ActivityStatus::NotEvaluated,
            Some(prev) if prev.content != current.content => ActivityStatus::Working,
            Some(_) => ActivityStatus::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(pane: &str, content: &str) -> CaptureResult {
        CaptureResult::new(PaneId::create(pane).unwrap(), content.to_string(), Utc::now())
    }

    #[test]
    fn no_previous_is_not_evaluated() {
        let cur = capture("%1", "hello");
        assert_eq!(
            ActivityStatus::from_captures(None, &cur),
            ActivityStatus::NotEvaluated
        );
    }

    #[test]
    fn unchanged_content_is_idle() {
        let prev = capture("%1", "same");
        let cur = capture("%1", "same");
        assert_eq!(
            ActivityStatus::from_captures(Some(&prev), &cur),
            ActivityStatus::Idle
        );
    }

    #[test]
    fn changed_content_is_working() {
        let prev = capture("%1", "before");
        let cur = capture("%1", "after");
        assert_eq!(
            ActivityStatus::from_captures(Some(&prev), &cur),
            ActivityStatus::Working
        );
    }

    #[test]
    fn line_count_matches_split() {
        let cap = capture("%1", "a\nb\nc");
        assert_eq!(cap.line_count(), 3);
    }
}
