//! `PaneClearRequested` handler: a `CLEAR_COMMAND` or `ESCAPE_SEQUENCE`
//! keypress sequence, each send followed by the communication delay.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{ClearStrategy, DomainEvent, EventTopic};
use crate::dispatch::dispatcher::EventHandler;
use crate::error::Result;
use crate::multiplexer::{SendKey, TmuxClient};

pub struct ClearHandler {
    client: Arc<TmuxClient>,
    communication_delay: Duration,
}

impl ClearHandler {
    pub fn new(client: Arc<TmuxClient>, communication_delay: Duration) -> Self {
        ClearHandler { client, communication_delay }
    }

    async fn send(&self, pane_id: &str, key: SendKey) -> Result<()> {
        let result = self.client.send_keys(pane_id, &key).await;
        tokio::time::sleep(self.communication_delay).await;
        result
    }
}

#[async_trait]
impl EventHandler for ClearHandler {
    fn name(&self) -> &str {
        "clear"
    }

    fn can_handle(&self, topic: EventTopic) -> bool {
        topic == EventTopic::PaneClearRequested
    }

    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        let DomainEvent::PaneClearRequested { pane_id, strategy, .. } = event else {
            return Ok(());
        };
        let result = match strategy {
            ClearStrategy::ClearCommand => {
                self.send(pane_id.as_str(), SendKey::Literal("/clear".to_string())).await?;
                self.send(pane_id.as_str(), SendKey::Enter).await
            }
            ClearStrategy::EscapeSequence => {
                self.send(pane_id.as_str(), SendKey::Escape).await?;
                self.send(pane_id.as_str(), SendKey::Enter).await?;
                self.send(pane_id.as_str(), SendKey::Escape).await
            }
        };
        if let Err(err) = &result {
            warn!(pane_id = %pane_id, ?strategy, error = %err, "clear sequence failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::mock::MockCommandExecutor;
    use crate::domain::{ClearReason, PaneId};
    use chrono::Utc;

    fn handler(mock: Arc<MockCommandExecutor>) -> ClearHandler {
        ClearHandler::new(Arc::new(TmuxClient::new(mock)), Duration::from_millis(0))
    }

    #[tokio::test]
    async fn clear_command_strategy_sends_slash_clear_then_enter() {
        let mock = Arc::new(MockCommandExecutor::new());
        let h = handler(Arc::clone(&mock));
        let event = DomainEvent::PaneClearRequested {
            pane_id: PaneId::create("%1").unwrap(),
            reason: ClearReason::IdleState,
            strategy: ClearStrategy::ClearCommand,
            occurred_at: Utc::now(),
        };
        h.handle(&event).await.unwrap();
        let calls = mock.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], to_strings(&["send-keys", "-t", "%1", "/clear"]));
        assert_eq!(calls[1], to_strings(&["send-keys", "-t", "%1", "Enter"]));
    }

    fn to_strings(argv: &[&str]) -> Vec<String> {
        argv.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn escape_sequence_strategy_sends_three_ordered_keys() {
        let mock = Arc::new(MockCommandExecutor::new());
        let h = handler(Arc::clone(&mock));
        let event = DomainEvent::PaneClearRequested {
            pane_id: PaneId::create("%1").unwrap(),
            reason: ClearReason::DoneState,
            strategy: ClearStrategy::EscapeSequence,
            occurred_at: Utc::now(),
        };
        h.handle(&event).await.unwrap();
        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0][3], "Escape");
        assert_eq!(calls[1][3], "Enter");
        assert_eq!(calls[2][3], "Escape");
    }
}
