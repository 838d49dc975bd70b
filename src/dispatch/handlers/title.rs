//! `PaneTitleChanged` handler: sets the already status-derived title on the
//! pane. Cleaning (stripping a stale status prefix before the new one is
//! prepended) happens upstream when the title is derived
//! (`monitor::coordinator::derive_title`); re-cleaning here would strip the
//! status bracket the coordinator just added, so this handler forwards
//! `new_title` verbatim.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{DomainEvent, EventTopic};
use crate::dispatch::dispatcher::EventHandler;
use crate::error::Result;
use crate::multiplexer::TmuxClient;

pub struct TitleHandler {
    client: Arc<TmuxClient>,
}

impl TitleHandler {
    pub fn new(client: Arc<TmuxClient>) -> Self {
        TitleHandler { client }
    }
}

#[async_trait]
impl EventHandler for TitleHandler {
    fn name(&self) -> &str {
        "title"
    }

    fn can_handle(&self, topic: EventTopic) -> bool {
        topic == EventTopic::PaneTitleChanged
    }

    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        let DomainEvent::PaneTitleChanged { pane_id, new_title, .. } = event else {
            return Ok(());
        };
        let result = self.client.select_pane_title(pane_id.as_str(), new_title).await;
        if let Err(err) = &result {
            warn!(pane_id = %pane_id, error = %err, "title update failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::mock::MockCommandExecutor;
    use crate::domain::PaneId;
    use chrono::Utc;

    #[tokio::test]
    async fn handle_sends_the_title_verbatim() {
        let mock = Arc::new(MockCommandExecutor::new());
        let handler = TitleHandler::new(Arc::new(TmuxClient::new(Arc::clone(&mock))));
        let event = DomainEvent::PaneTitleChanged {
            pane_id: PaneId::create("%1").unwrap(),
            old_title: "old".into(),
            new_title: "[WORKING 07/31 12:00] build server".into(),
            occurred_at: Utc::now(),
        };
        handler.handle(&event).await.unwrap();
        let calls = mock.calls();
        assert_eq!(calls[0][4], "[WORKING 07/31 12:00] build server");
    }
}
