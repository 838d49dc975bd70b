//! `PaneEnterSendRequested` handler: sends an Enter keypress and waits out a
//! short communication delay.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{DomainEvent, EventTopic};
use crate::dispatch::dispatcher::EventHandler;
use crate::error::Result;
use crate::multiplexer::{SendKey, TmuxClient};

pub struct EnterHandler {
    client: Arc<TmuxClient>,
    communication_delay: Duration,
}

impl EnterHandler {
    pub fn new(client: Arc<TmuxClient>, communication_delay: Duration) -> Self {
        EnterHandler { client, communication_delay }
    }
}

#[async_trait]
impl EventHandler for EnterHandler {
    fn name(&self) -> &str {
        "enter"
    }

    fn can_handle(&self, topic: EventTopic) -> bool {
        topic == EventTopic::PaneEnterSendRequested
    }

    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        let DomainEvent::PaneEnterSendRequested { pane_id, reason, .. } = event else {
            return Ok(());
        };
        let result = self.client.send_keys(pane_id.as_str(), &SendKey::Enter).await;
        if let Err(err) = &result {
            warn!(pane_id = %pane_id, ?reason, error = %err, "enter send failed");
        }
        tokio::time::sleep(self.communication_delay).await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::mock::MockCommandExecutor;
    use crate::domain::{EnterReason, PaneId};
    use chrono::Utc;

    #[tokio::test]
    async fn can_handle_only_enter_topic() {
        let handler = EnterHandler::new(
            Arc::new(TmuxClient::new(Arc::new(MockCommandExecutor::new()))),
            Duration::from_millis(0),
        );
        assert!(handler.can_handle(EventTopic::PaneEnterSendRequested));
        assert!(!handler.can_handle(EventTopic::PaneClearRequested));
    }

    #[tokio::test]
    async fn handle_sends_enter_and_waits_the_communication_delay() {
        let mock = Arc::new(MockCommandExecutor::new());
        let handler = EnterHandler::new(
            Arc::new(TmuxClient::new(Arc::clone(&mock) as Arc<dyn crate::cmd::CommandExecutor>)),
            Duration::from_millis(1),
        );
        let event = DomainEvent::PaneEnterSendRequested {
            pane_id: PaneId::create("%1").unwrap(),
            reason: EnterReason::RegularCycle,
            occurred_at: Utc::now(),
        };
        handler.handle(&event).await.unwrap();
        assert_eq!(
            mock.calls(),
            vec![vec!["send-keys", "-t", "%1", "Enter"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()]
        );
    }
}
