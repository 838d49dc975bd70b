//! Asks the tmux transport to dump a pane's visible buffer and wraps the
//! result into a domain `CaptureResult`.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinSet;

use crate::domain::{CaptureResult, PaneId};
use crate::error::{EngineError, Result};
use crate::multiplexer::{CaptureOptions, TmuxClient};

pub struct CaptureAdapter {
    client: Arc<TmuxClient>,
}

impl CaptureAdapter {
    pub fn new(client: Arc<TmuxClient>) -> Self {
        CaptureAdapter { client }
    }

    /// Captures one pane's buffer, wrapping the raw content into a
    /// `CaptureResult` with a timestamp.
    pub async fn capture(&self, pane_id: &PaneId, opts: CaptureOptions) -> Result<CaptureResult> {
        let content = self.client.capture_pane(pane_id.as_str(), opts).await?;
        Ok(CaptureResult::new(pane_id.clone(), content, Utc::now()))
    }

    /// Runs `capture` concurrently over `ids`, aggregating results. If any
    /// fail, returns an aggregate error listing every per-id failure rather
    /// than discarding the ones that succeeded.
    pub async fn capture_many(
        &self,
        ids: &[PaneId],
        opts: CaptureOptions,
    ) -> std::result::Result<Vec<CaptureResult>, EngineError> {
        let mut set = JoinSet::new();
        for id in ids {
            let client = Arc::clone(&self.client);
            let id = id.clone();
            set.spawn(async move {
                let adapter = CaptureAdapter::new(client);
                let result = adapter.capture(&id, opts).await;
                (id, result)
            });
        }

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(capture))) => successes.push(capture),
                Ok((id, Err(err))) => failures.push((id.as_str().to_string(), err)),
                Err(join_err) => failures.push((
                    "unknown".to_string(),
                    EngineError::UnexpectedError {
                        operation: "capture_many".to_string(),
                        details: join_err.to_string(),
                    },
                )),
            }
        }

        if failures.is_empty() {
            Ok(successes)
        } else {
            Err(EngineError::ValidationFailed {
                input: format!("{} pane captures", ids.len()),
                constraint: crate::error::AggregateFailure { failures }.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::mock::MockCommandExecutor;
    use crate::cmd::CommandOutput;
    use crate::error::EngineError;

    fn adapter_with(mock: Arc<MockCommandExecutor>) -> CaptureAdapter {
        CaptureAdapter::new(Arc::new(TmuxClient::new(mock)))
    }

    #[tokio::test]
    async fn capture_wraps_transport_output_into_capture_result() {
        let mock = Arc::new(MockCommandExecutor::new());
        mock.on(
            &["capture-pane", "-t", "%1", "-p"],
            CommandOutput {
                stdout: "a\nb".to_string(),
                stderr: String::new(),
            },
        );
        let adapter = adapter_with(mock);
        let result = adapter
            .capture(&PaneId::create("%1").unwrap(), CaptureOptions::default())
            .await
            .unwrap();
        assert_eq!(result.lines, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn capture_many_succeeds_for_all_panes() {
        let mock = Arc::new(MockCommandExecutor::new());
        mock.on(
            &["capture-pane", "-t", "%1", "-p"],
            CommandOutput { stdout: "one".into(), stderr: String::new() },
        );
        mock.on(
            &["capture-pane", "-t", "%2", "-p"],
            CommandOutput { stdout: "two".into(), stderr: String::new() },
        );
        let adapter = adapter_with(mock);
        let ids = vec![PaneId::create("%1").unwrap(), PaneId::create("%2").unwrap()];
        let results = adapter.capture_many(&ids, CaptureOptions::default()).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn capture_many_aggregates_per_id_failures() {
        let mock = Arc::new(MockCommandExecutor::new());
        mock.on(
            &["capture-pane", "-t", "%1", "-p"],
            CommandOutput { stdout: "one".into(), stderr: String::new() },
        );
        mock.on_error(
            &["capture-pane", "-t", "%2", "-p"],
            EngineError::CommandFailed { command: "tmux".into(), stderr: "no pane".into() },
        );
        let adapter = adapter_with(mock);
        let ids = vec![PaneId::create("%1").unwrap(), PaneId::create("%2").unwrap()];
        let err = adapter.capture_many(&ids, CaptureOptions::default()).await.unwrap_err();
        assert!(matches!(err, EngineError::ValidationFailed { .. }));
    }
}
