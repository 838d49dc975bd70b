//! Pure domain layer: value objects, the pane aggregate, the pane
//! collection, and the event/cycle vocabulary they're expressed in terms of.
//! Nothing in this module performs I/O.

pub mod capture;
pub mod collection;
pub mod cycle;
pub mod events;
pub mod input_field;
pub mod pane;
pub mod pane_id;
pub mod pane_name;
pub mod status_context;
pub mod status_mapper;
pub mod worker_status;

pub use capture::{ActivityStatus, CaptureResult};
pub use collection::PaneCollection;
pub use cycle::{clean_title, CycleAction, CycleExecutionResult, CyclePlan};
pub use events::{ClearReason, ClearStrategy, DomainEvent, EnterReason, EventTopic};
pub use input_field::{parse_input_field, InputFieldStatus};
pub use pane::{HistoryEntry, Pane};
pub use pane_id::PaneId;
pub use pane_name::{PaneName, Role};
pub use status_context::StatusContext;
pub use status_mapper::{map_status, status_kind_from_title};
pub use worker_status::{StatusKind, WorkerStatus};
