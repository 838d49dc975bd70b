//! Wire-level shapes for the tmux command surface.

/// One row from a pane-discovery listing, before validation/coercion into a
/// domain `Pane`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneRow {
    pub pane_id: String,
    pub active: bool,
    pub current_command: String,
    pub title: String,
    pub session_name: String,
    pub window_index: String,
    pub window_name: String,
    pub pane_index: String,
    pub tty: String,
    pub pid: String,
    pub current_path: String,
    pub zoomed: bool,
    pub width: String,
    pub height: String,
    pub start_command: String,
}

/// Optional capture-pane flags (`-S`/`-E`/`-J`/`-e`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureOptions {
    pub start_line: Option<i32>,
    pub end_line: Option<i32>,
    pub join_wrapped: bool,
    pub escape_sequences: bool,
}

/// A key or literal argument to `send-keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendKey {
    Enter,
    Escape,
    Literal(String),
}

impl SendKey {
    pub fn as_tmux_arg(&self) -> &str {
        match self {
            SendKey::Enter => "Enter",
            SendKey::Escape => "Escape",
            SendKey::Literal(s) => s,
        }
    }
}
