use std::sync::Arc;

use tokio::select;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::{
    codec::{Codec, JsonCodec},
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
    transport::Transport,
};
use super::{client::Client, shared::Shared};

const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Builder for constructing a [`Client`] with optional features.
pub struct ClientBuilder {
    transport: Arc<dyn Transport>,
    codec: Arc<dyn Codec>,
    subscribers: Vec<Arc<dyn Subscribe>>,
    bus_capacity: usize,
}

impl ClientBuilder {
    /// Creates a builder over `transport` with the JSON codec and no subscribers.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            codec: Arc::new(JsonCodec),
            subscribers: Vec::new(),
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }

    /// Replaces the frame codec.
    pub fn with_codec(mut self, codec: impl Codec) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events (state changes, failures, handler
    /// faults) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Sets the event bus ring buffer size (min 1).
    ///
    /// Receivers lagging further behind skip the oldest events.
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    /// Builds the client.
    ///
    /// With subscribers configured this spawns their workers, so it must then
    /// be called from within a tokio runtime.
    pub fn build(self) -> Arc<Client> {
        let bus = Bus::new(self.bus_capacity);
        let runtime_token = CancellationToken::new();

        if !self.subscribers.is_empty() {
            subscriber_listener(&bus, self.subscribers, runtime_token.clone());
        }

        let shared = Arc::new(Shared::new(bus, self.codec, self.transport));
        Arc::new(Client::new_internal(shared, runtime_token))
    }
}

/// Forwards bus events to the subscriber set until the client goes away.
fn subscriber_listener(bus: &Bus, subscribers: Vec<Arc<dyn Subscribe>>, token: CancellationToken) {
    let mut rx = bus.subscribe();
    let set = SubscriberSet::new(subscribers, bus.clone());

    tokio::spawn(async move {
        loop {
            select! {
                biased;
                ev = rx.recv() => match ev {
                    Ok(ev) => set.emit(Arc::new(ev)),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber listener lagged behind the bus");
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = token.cancelled() => break,
            }
        }
        set.shutdown().await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ClientConfig, ConnectionState};
    use crate::events::{Event, EventKind};
    use crate::transport::MemoryTransport;
    use async_trait::async_trait;
    use tokio::sync::mpsc;

    struct Forward(mpsc::UnboundedSender<EventKind>);

    #[async_trait]
    impl Subscribe for Forward {
        async fn on_event(&self, event: &Event) {
            let _ = self.0.send(event.kind);
        }
        fn name(&self) -> &'static str {
            "forward"
        }
    }

    #[tokio::test]
    async fn test_subscribers_observe_lifecycle() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let transport = MemoryTransport::new();
        let client = Client::builder(transport.clone())
            .with_bus_capacity(16)
            .with_subscribers(vec![Arc::new(Forward(tx))])
            .build();

        client.start("mem://game", ClientConfig::default()).await.unwrap();
        client.wait_for_state(ConnectionState::Connected).await;

        assert_eq!(rx.recv().await, Some(EventKind::StateChanged));
        assert_eq!(rx.recv().await, Some(EventKind::StateChanged));
        client.stop().await;
    }
}
