//! The command executor: the abstract boundary between the engine and the
//! concrete multiplexer transport.

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, trace};

use crate::error::{EngineError, Result};

/// The outcome of a successful external command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs external multiplexer commands and returns stdout/stderr/exit. The
/// one seam the engine depends on instead of shelling out directly.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, argv: &[&str]) -> Result<CommandOutput>;
}

/// Shells out via `tokio::process::Command`. The production executor.
#[derive(Debug)]
pub struct TokioCommandExecutor {
    program: String,
}

impl TokioCommandExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        TokioCommandExecutor {
            program: program.into(),
        }
    }

    pub fn tmux() -> Self {
        TokioCommandExecutor::new("tmux")
    }
}

#[async_trait]
impl CommandExecutor for TokioCommandExecutor {
    async fn execute(&self, argv: &[&str]) -> Result<CommandOutput> {
        trace!(program = %self.program, args = ?argv, "cmd:execute start");

        let output = Command::new(&self.program)
            .args(argv)
            .output()
            .await
            .map_err(|e| EngineError::CommandFailed {
                command: format!("{} {}", self.program, argv.join(" ")),
                stderr: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            debug!(
                program = %self.program,
                args = ?argv,
                status = ?output.status.code(),
                stderr = %stderr,
                "cmd:execute failure"
            );
            return Err(EngineError::CommandFailed {
                command: format!("{} {}", self.program, argv.join(" ")),
                stderr,
            });
        }

        trace!(program = %self.program, "cmd:execute success");
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scriptable canned responses keyed by the joined argv, for unit tests
    /// of every component that would otherwise need a live tmux server.
    #[derive(Default)]
    pub struct MockCommandExecutor {
        responses: Mutex<HashMap<String, Result<CommandOutput>>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl MockCommandExecutor {
        pub fn new() -> Self {
            MockCommandExecutor::default()
        }

        pub fn on(&self, argv: &[&str], output: CommandOutput) {
            self.responses.lock().unwrap().insert(key(argv), Ok(output));
        }

        pub fn on_error(&self, argv: &[&str], err: EngineError) {
            self.responses.lock().unwrap().insert(key(argv), Err(err));
        }

        pub fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn key(argv: &[&str]) -> String {
        argv.join(" ")
    }

    #[async_trait]
    impl CommandExecutor for MockCommandExecutor {
        async fn execute(&self, argv: &[&str]) -> Result<CommandOutput> {
            self.calls
                .lock()
                .unwrap()
                .push(argv.iter().map(|s| s.to_string()).collect());
            self.responses
                .lock()
                .unwrap()
                .get(&key(argv))
                .cloned()
                .unwrap_or_else(|| {
                    Ok(CommandOutput {
                        stdout: String::new(),
                        stderr: String::new(),
                    })
                })
        }
    }

    #[tokio::test]
    async fn mock_returns_scripted_response() {
        let mock = MockCommandExecutor::new();
        mock.on(
            &["capture-pane", "-t", "%1", "-p"],
            CommandOutput {
                stdout: "hello\n".to_string(),
                stderr: String::new(),
            },
        );
        let out = mock.execute(&["capture-pane", "-t", "%1", "-p"]).await.unwrap();
        assert_eq!(out.stdout, "hello\n");
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn mock_returns_scripted_error() {
        let mock = MockCommandExecutor::new();
        mock.on_error(
            &["send-keys", "-t", "%9", "Enter"],
            EngineError::CommandFailed {
                command: "tmux send-keys".into(),
                stderr: "no such pane".into(),
            },
        );
        let err = mock.execute(&["send-keys", "-t", "%9", "Enter"]).await.unwrap_err();
        assert!(matches!(err, EngineError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn unscripted_calls_return_empty_success() {
        let mock = MockCommandExecutor::new();
        let out = mock.execute(&["list-panes"]).await.unwrap();
        assert_eq!(out.stdout, "");
    }
}
