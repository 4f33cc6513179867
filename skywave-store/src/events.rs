use skywave_shared::DomainEvent;
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Fan-out of store events to whoever is listening (dashboards, tests).
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    /// Publish to current subscribers. Having none is not an error.
    pub fn publish(&self, event: DomainEvent) {
        let topic = event.topic();
        let key = event.key();

        match self.tx.send(event) {
            Ok(receivers) => info!("Published {}/{} to {} subscriber(s)", topic, key, receivers),
            Err(_) => debug!("No subscribers for {}/{}", topic, key),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(100)
    }
}
