//! The event dispatcher: multi-subscriber fan-out per topic, with per-handler
//! failures caught, logged, and never allowed to abort a sibling.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::task::JoinSet;
use tracing::warn;

use crate::domain::{DomainEvent, EventTopic};
use crate::error::Result;

/// A subscriber's capability interface. Implementations must not let errors
/// escape `handle` as panics; returning `Err` is how a failure is reported,
/// and the dispatcher absorbs it.
#[async_trait]
pub trait EventHandler: Send + Sync {
    fn name(&self) -> &str;
    fn can_handle(&self, topic: EventTopic) -> bool;
    async fn handle(&self, event: &DomainEvent) -> Result<()>;
}

/// The dispatcher contract, so a null-object variant can stand in for tests
/// that don't care about side effects.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    fn subscribe(&self, handler: Arc<dyn EventHandler>);
    fn unsubscribe(&self, name: &str);
    async fn dispatch(&self, event: DomainEvent);
}

/// The real dispatcher. The subscriber table is append-mostly; reads and
/// writes go through an `RwLock` so subscribe/unsubscribe are safe against a
/// concurrent dispatch in flight.
#[derive(Default)]
pub struct EventDispatcher {
    handlers: RwLock<Vec<Arc<dyn EventHandler>>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        EventDispatcher::default()
    }
}

#[async_trait]
impl Dispatcher for EventDispatcher {
    fn subscribe(&self, handler: Arc<dyn EventHandler>) {
        self.handlers.write().unwrap().push(handler);
    }

    fn unsubscribe(&self, name: &str) {
        self.handlers.write().unwrap().retain(|h| h.name() != name);
    }

    async fn dispatch(&self, event: DomainEvent) {
        let topic = event.topic();
        let handlers: Vec<Arc<dyn EventHandler>> = self
            .handlers
            .read()
            .unwrap()
            .iter()
            .filter(|h| h.can_handle(topic))
            .cloned()
            .collect();

        let mut set = JoinSet::new();
        let event = Arc::new(event);
        for handler in handlers {
            let event = Arc::clone(&event);
            set.spawn(async move {
                let result = handler.handle(&event).await;
                (handler.name().to_string(), result)
            });
        }

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_name, Ok(()))) => {}
                Ok((name, Err(err))) => {
                    warn!(handler = %name, error = %err, "event handler failed");
                }
                Err(join_err) => {
                    warn!(error = %join_err, "event handler task panicked");
                }
            }
        }
    }
}

/// A null-object dispatcher for tests that don't care about side effects:
/// accepts `subscribe`/`dispatch` and does nothing.
#[derive(Default)]
pub struct NullDispatcher;

#[async_trait]
impl Dispatcher for NullDispatcher {
    fn subscribe(&self, _handler: Arc<dyn EventHandler>) {}
    fn unsubscribe(&self, _name: &str) {}
    async fn dispatch(&self, _event: DomainEvent) {}
}
