use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::mpsc;

use common::{DeviceError, MessageEnvelope, Result};

/// Buffered envelopes per subscription before the transport backpressures.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// One topic paired with the sink its messages are delivered on. The
/// subscriber owns the receiving half.
pub struct TopicChannel {
    pub topic: String,
    pub messages: mpsc::Sender<MessageEnvelope>,
}

/// Pub/sub bus client. Concrete transports (MQTT, NATS, ...) implement this;
/// the core only relies on concurrent `publish` being safe.
#[async_trait]
pub trait MessageClient: Send + Sync {
    /// Registers topic/channel pairs. A failure here is fatal for startup.
    async fn subscribe(&self, topics: Vec<TopicChannel>) -> Result<()>;

    /// Publishes one envelope to one topic.
    async fn publish(&self, envelope: MessageEnvelope, topic: &str) -> Result<()>;
}

/// In-process bus for tests and standalone runs. Exact-match topics, one
/// fan-out copy per subscriber, no retained messages.
#[derive(Default)]
pub struct LocalMessageBus {
    topics: RwLock<HashMap<String, Vec<mpsc::Sender<MessageEnvelope>>>>,
}

impl LocalMessageBus {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageClient for LocalMessageBus {
    async fn subscribe(&self, topics: Vec<TopicChannel>) -> Result<()> {
        if topics.is_empty() {
            return Err(DeviceError::Transport(
                "subscribe called with no topics".to_string(),
            ));
        }
        let mut map = self.topics.write();
        for channel in topics {
            debug!("local bus: subscription added for {}", channel.topic);
            map.entry(channel.topic).or_default().push(channel.messages);
        }
        Ok(())
    }

    async fn publish(&self, envelope: MessageEnvelope, topic: &str) -> Result<()> {
        // Snapshot senders so the lock is not held across await.
        let senders: Vec<_> = self
            .topics
            .read()
            .get(topic)
            .map(|subs| subs.to_vec())
            .unwrap_or_default();

        if senders.is_empty() {
            debug!("local bus: no subscribers for {}, message dropped", topic);
            return Ok(());
        }

        for sender in senders {
            let mut delivered = envelope.clone();
            delivered.received_topic = topic.to_string();
            if sender.send(delivered).await.is_err() {
                warn!("local bus: subscriber for {} is gone", topic);
            }
        }
        Ok(())
    }
}
