mod client;
mod validation;

pub use client::{LocalMessageBus, MessageClient, TopicChannel, DEFAULT_CHANNEL_CAPACITY};
pub use validation::subscribe_device_validation;
