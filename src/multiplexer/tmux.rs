//! Thin tmux transport built on the `CommandExecutor` boundary. Builds the
//! exact argv shapes for each tmux subcommand and parses their output;
//! carries no business logic of its own.

use std::sync::Arc;

use crate::cmd::CommandExecutor;
use crate::error::{EngineError, Result};
use crate::multiplexer::types::{CaptureOptions, PaneRow, SendKey};

const PANE_FIELDS: &str = "#{pane_id}\x1f#{pane_active}\x1f#{pane_current_command}\x1f#{pane_title}\x1f#{session_name}\x1f#{window_index}\x1f#{window_name}\x1f#{pane_index}\x1f#{pane_tty}\x1f#{pane_pid}\x1f#{pane_current_path}\x1f#{window_zoomed_flag}\x1f#{pane_width}\x1f#{pane_height}\x1f#{pane_start_command}";

/// A tmux client mediated entirely through a `CommandExecutor`, so tests can
/// substitute a `MockCommandExecutor` for a live tmux server.
pub struct TmuxClient {
    executor: Arc<dyn CommandExecutor>,
}

impl TmuxClient {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        TmuxClient { executor }
    }

    /// Lists every pane across every session via `list-panes -a -F <fields>`.
    pub async fn discover_panes(&self) -> Result<Vec<PaneRow>> {
        let output = self
            .executor
            .execute(&["list-panes", "-a", "-F", PANE_FIELDS])
            .await?;
        output
            .stdout
            .lines()
            .filter(|l| !l.is_empty())
            .map(parse_pane_row)
            .collect()
    }

    /// `capture-pane -t <paneId> -p [-S][-E][-J][-e]`.
    pub async fn capture_pane(&self, pane_id: &str, opts: CaptureOptions) -> Result<String> {
        if pane_id.trim().is_empty() {
            return Err(EngineError::EmptyInput);
        }
        let mut argv: Vec<String> =
            vec!["capture-pane".into(), "-t".into(), pane_id.into(), "-p".into()];
        if let Some(s) = opts.start_line {
            argv.push("-S".into());
            argv.push(s.to_string());
        }
        if let Some(e) = opts.end_line {
            argv.push("-E".into());
            argv.push(e.to_string());
        }
        if opts.join_wrapped {
            argv.push("-J".into());
        }
        if opts.escape_sequences {
            argv.push("-e".into());
        }
        let argv_refs: Vec<&str> = argv.iter().map(String::as_str).collect();
        let output = self.executor.execute(&argv_refs).await?;
        Ok(output.stdout)
    }

    /// `send-keys -t <paneId> <key|literal>`.
    pub async fn send_keys(&self, pane_id: &str, key: &SendKey) -> Result<()> {
        if pane_id.trim().is_empty() {
            return Err(EngineError::EmptyInput);
        }
        self.executor
            .execute(&["send-keys", "-t", pane_id, key.as_tmux_arg()])
            .await?;
        Ok(())
    }

    /// `select-pane -t <paneId> -T <title>`.
    pub async fn select_pane_title(&self, pane_id: &str, title: &str) -> Result<()> {
        if pane_id.trim().is_empty() {
            return Err(EngineError::EmptyInput);
        }
        self.executor
            .execute(&["select-pane", "-t", pane_id, "-T", title])
            .await?;
        Ok(())
    }
}

fn parse_pane_row(line: &str) -> Result<PaneRow> {
    let fields: Vec<&str> = line.split('\x1f').collect();
    if fields.len() != 15 {
        return Err(EngineError::RepositoryError {
            operation: "discover_panes".to_string(),
            details: format!("expected 15 fields, got {}: {line:?}", fields.len()),
        });
    }
    Ok(PaneRow {
        pane_id: fields[0].to_string(),
        active: fields[1] == "1",
        current_command: fields[2].to_string(),
        title: fields[3].to_string(),
        session_name: fields[4].to_string(),
        window_index: fields[5].to_string(),
        window_name: fields[6].to_string(),
        pane_index: fields[7].to_string(),
        tty: fields[8].to_string(),
        pid: fields[9].to_string(),
        current_path: fields[10].to_string(),
        zoomed: fields[11] == "1",
        width: fields[12].to_string(),
        height: fields[13].to_string(),
        start_command: fields[14].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::mock::MockCommandExecutor;
    use crate::cmd::CommandOutput;

    fn client_with(mock: Arc<MockCommandExecutor>) -> TmuxClient {
        TmuxClient::new(mock)
    }

    #[tokio::test]
    async fn discover_panes_parses_rows() {
        let mock = Arc::new(MockCommandExecutor::new());
        let row = "%0\x1f1\x1fbash\x1fmain\x1fwork\x1f0\x1fwin\x1f0\x1f/dev/tty0\x1f123\x1f/home\x1f0\x1f80\x1f24\x1fbash";
        mock.on(
            &["list-panes", "-a", "-F", PANE_FIELDS],
            CommandOutput {
                stdout: format!("{row}\n"),
                stderr: String::new(),
            },
        );
        let client = client_with(mock);
        let rows = client.discover_panes().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].pane_id, "%0");
        assert!(rows[0].active);
        assert_eq!(rows[0].current_command, "bash");
    }

    #[tokio::test]
    async fn capture_pane_builds_optional_flags() {
        let mock = Arc::new(MockCommandExecutor::new());
        mock.on(
            &["capture-pane", "-t", "%1", "-p", "-S", "-10", "-J"],
            CommandOutput {
                stdout: "line1\nline2".to_string(),
                stderr: String::new(),
            },
        );
        let client = client_with(mock);
        let opts = CaptureOptions {
            start_line: Some(-10),
            join_wrapped: true,
            ..Default::default()
        };
        let text = client.capture_pane("%1", opts).await.unwrap();
        assert_eq!(text, "line1\nline2");
    }

    #[tokio::test]
    async fn capture_pane_rejects_blank_id() {
        let mock = Arc::new(MockCommandExecutor::new());
        let client = client_with(mock);
        let err = client.capture_pane("", CaptureOptions::default()).await.unwrap_err();
        assert_eq!(err, EngineError::EmptyInput);
    }

    #[tokio::test]
    async fn send_keys_uses_literal_arg() {
        let mock = Arc::new(MockCommandExecutor::new());
        let client = client_with(mock);
        client
            .send_keys("%1", &SendKey::Literal("/clear".to_string()))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn select_pane_title_sends_expected_argv() {
        let mock = Arc::new(MockCommandExecutor::new());
        let client = client_with(Arc::clone(&mock));
        client.select_pane_title("%1", "[IDLE] build").await.unwrap();
        let calls = mock.calls();
        let expected: Vec<String> = vec!["select-pane", "-t", "%1", "-T", "[IDLE] build"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(calls.last().unwrap(), &expected);
    }
}
