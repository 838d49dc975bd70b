//! Business-level interpretation of a pane's liveness, and the transition
//! graph that the pane aggregate enforces when moving between statuses.

use std::fmt;

/// Discriminant used for queries/history/logging that don't need the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Unknown,
    Idle,
    Working,
    Blocked,
    Done,
    Terminated,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusKind::Unknown => "unknown",
            StatusKind::Idle => "idle",
            StatusKind::Working => "working",
            StatusKind::Blocked => "blocked",
            StatusKind::Done => "done",
            StatusKind::Terminated => "terminated",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStatus {
    Unknown { last_known_state: Option<String> },
    Idle,
    Working { details: Option<String> },
    Blocked { reason: Option<String> },
    Done { result: Option<String> },
    Terminated { reason: Option<String> },
}

impl WorkerStatus {
    /// Builds the no-payload form of `kind`, used by the title-keyword
    /// short-circuit where only the kind is known.
    pub fn from_kind(kind: StatusKind) -> WorkerStatus {
        match kind {
            StatusKind::Unknown => WorkerStatus::Unknown { last_known_state: None },
            StatusKind::Idle => WorkerStatus::Idle,
            StatusKind::Working => WorkerStatus::Working { details: None },
            StatusKind::Blocked => WorkerStatus::Blocked { reason: None },
            StatusKind::Done => WorkerStatus::Done { result: None },
            StatusKind::Terminated => WorkerStatus::Terminated { reason: None },
        }
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            WorkerStatus::Unknown { .. } => StatusKind::Unknown,
            WorkerStatus::Idle => StatusKind::Idle,
            WorkerStatus::Working { .. } => StatusKind::Working,
            WorkerStatus::Blocked { .. } => StatusKind::Blocked,
            WorkerStatus::Done { .. } => StatusKind::Done,
            WorkerStatus::Terminated { .. } => StatusKind::Terminated,
        }
    }

    /// Whether moving from `self` to `next` is an allowed transition.
    /// Unioned payload changes within the same kind are always allowed
    /// (they are not a "transition" in the state-machine
    /// sense); they still go through `Pane::update_status` so history is
    /// recorded.
    pub fn can_transition_to(&self, next: &WorkerStatus) -> bool {
        use StatusKind::*;
        let (from, to) = (self.kind(), next.kind());
        if from == to {
            return true;
        }
        matches!(
            (from, to),
            (Unknown, Idle)
                | (Unknown, Working)
                | (Unknown, Blocked)
                | (Unknown, Done)
                | (Unknown, Terminated)
                | (Idle, Working)
                | (Idle, Blocked)
                | (Idle, Terminated)
                | (Working, Idle)
                | (Working, Done)
                | (Working, Blocked)
                | (Working, Terminated)
                | (Blocked, Idle)
                | (Blocked, Working)
                | (Blocked, Terminated)
                | (Done, Idle)
                | (Done, Working)
                | (Terminated, Idle)
                | (Terminated, Working)
        )
    }
}

impl fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}

impl Default for WorkerStatus {
    fn default() -> Self {
        WorkerStatus::Unknown {
            last_known_state: None,
        }
    }
}
