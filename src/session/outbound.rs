//! Outbound publish handling.
//!
//! Publish-oriented sessions never queue publishes. The application offers its latest payload
//! when the session asks for one, the session keeps it in a single [`PendingOutbound`] slot, and
//! hands it to the transport only when the previous send has drained. A newer payload simply
//! replaces an older one that has not gone out yet.

use heapless::Vec;

use super::registry::Topic;
use crate::transport::MAX_PAYLOAD_LEN;

/// An owned publish request with inline storage for topic and payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// The topic (stored inline)
    pub topic: Topic,
    /// The payload (stored inline)
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl OutboundMessage {
    /// Copy a topic and payload. Returns `None` if either is too large.
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        let topic = Topic::try_from(topic).ok()?;
        let payload = Vec::from_slice(payload).ok()?;
        Some(Self { topic, payload })
    }

    pub fn topic(&self) -> &str {
        self.topic.as_str()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

/// The single-slot holder for the publish awaiting a drained transport.
#[derive(Debug, Default)]
pub struct PendingOutbound {
    slot: Option<OutboundMessage>,
}

impl PendingOutbound {
    pub const fn new() -> Self {
        Self { slot: None }
    }

    /// Store `message`, returning the older one it displaced, if any.
    pub fn replace(&mut self, message: OutboundMessage) -> Option<OutboundMessage> {
        self.slot.replace(message)
    }

    pub fn peek(&self) -> Option<&OutboundMessage> {
        self.slot.as_ref()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}
