//! tmux transport layer: argv construction and row parsing for the command
//! surface. No business logic lives here.

pub mod tmux;
pub mod types;

pub use tmux::TmuxClient;
pub use types::{CaptureOptions, PaneRow, SendKey};
