//! Per-pane ring of the last N captures (N >= 2), used for activity diffing.

use std::collections::{HashMap, VecDeque};

use crate::domain::CaptureResult;
use crate::domain::PaneId;

pub struct CaptureHistory {
    capacity: usize,
    entries: HashMap<String, VecDeque<CaptureResult>>,
}

impl CaptureHistory {
    /// `capacity` is clamped to at least 2.
    pub fn new(capacity: usize) -> Self {
        CaptureHistory {
            capacity: capacity.max(2),
            entries: HashMap::new(),
        }
    }

    /// Appends `capture` for `id`, evicting the oldest entry (FIFO) once the
    /// ring is at capacity.
    pub fn append(&mut self, id: &PaneId, capture: CaptureResult) {
        let ring = self.entries.entry(id.as_str().to_string()).or_default();
        ring.push_back(capture);
        while ring.len() > self.capacity {
            ring.pop_front();
        }
    }

    /// The most recently stored capture for `id`, if any. Callers query this
    /// *before* appending the newly captured result, so it returns what was
    /// captured last cycle — the value to diff the new capture against.
    pub fn previous(&self, id: &PaneId) -> Option<&CaptureResult> {
        self.entries.get(id.as_str())?.back()
    }

    /// Number of captures currently retained for `id`.
    pub fn len(&self, id: &PaneId) -> usize {
        self.entries.get(id.as_str()).map_or(0, VecDeque::len)
    }
}
