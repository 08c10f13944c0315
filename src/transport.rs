//! # Collaborator Contracts
//!
//! The session does not speak MQTT on the wire and does not configure the network. It drives an
//! MQTT library through the [`BrokerTransport`] trait, asks a [`NetworkOracle`] whether the node
//! holds a usable address, and receives the library's asynchronous notifications as
//! [`TransportEvent`]s delivered to an [`EventSink`].
//!
//! Transport callbacks typically fire from a different execution context (an interrupt, the
//! network task). They must never touch the session directly; instead they hand their event to
//! the sink, which marshals it into the session's queue.

use embassy_time::Duration;
use heapless::{String, Vec};

use crate::error::{ConnectError, ConnectReasonCode, DisconnectReason, OutboundError};
use crate::identity::ClientIdentity;
use crate::session::registry::MAX_TOPIC_LEN;

/// Maximum inbound payload the session buffers, in bytes.
pub const MAX_PAYLOAD_LEN: usize = 256;

/// Represents the Quality of Service (QoS) levels for MQTT messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum QoS {
    AtMostOnce = 0,
    AtLeastOnce = 1,
    ExactlyOnce = 2,
}

/// Reports whether the node currently holds a usable network address.
pub trait NetworkOracle {
    fn has_global_address(&self) -> bool;
}

impl NetworkOracle for embassy_net::Stack<'_> {
    fn has_global_address(&self) -> bool {
        self.is_config_up()
    }
}

impl<F: Fn() -> bool> NetworkOracle for F {
    fn has_global_address(&self) -> bool {
        self()
    }
}

/// An inbound publish, copied out of the transport's buffers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String<MAX_TOPIC_LEN>,
    pub payload: Vec<u8, MAX_PAYLOAD_LEN>,
}

impl InboundMessage {
    /// Copy a message out of the transport. Returns `None` if either part does not fit.
    pub fn new(topic: &str, payload: &[u8]) -> Option<Self> {
        let topic = String::try_from(topic).ok()?;
        let payload = Vec::from_slice(payload).ok()?;
        Some(Self { topic, payload })
    }

    pub fn topic(&self) -> &str {
        self.topic.as_str()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The payload as text, if it is valid UTF-8.
    pub fn payload_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.payload).ok()
    }
}

/// Asynchronous notifications from the MQTT library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The broker acknowledged the connect request.
    Connected,
    /// The connection was lost or closed.
    Disconnected(DisconnectReason),
    /// The broker refused the connect request.
    ConnectionRefused(ConnectReasonCode),
    PublishAcked,
    SubscribeAcked,
    UnsubscribeAcked,
    /// A message arrived on one of the subscribed topics.
    MessageReceived(InboundMessage),
}

/// Destination for [`TransportEvent`]s, callable from any execution context.
pub trait EventSink {
    /// Hand an event over to the session. Never blocks.
    fn deliver(&self, event: TransportEvent);
}

/// The connect/publish/subscribe capability of the underlying MQTT library.
///
/// All methods are non-blocking: they queue a command and return. Completion is reported later
/// through the [`EventSink`] given to [`register`](BrokerTransport::register).
pub trait BrokerTransport<'s> {
    /// Prepare a new session under `identity`, discarding any previous one.
    fn register(&mut self, identity: &ClientIdentity, sink: &'s dyn EventSink);

    /// Start connecting to the broker. The outcome arrives as `Connected` or
    /// `ConnectionRefused`/`Disconnected`.
    fn connect(&mut self, host: &str, port: u16, keep_alive: Duration)
    -> Result<(), ConnectError>;

    /// The connection is up and the library accepts outbound commands.
    fn is_ready(&self) -> bool;

    /// The previous outbound packet has been fully handed to the network.
    fn last_send_drained(&self) -> bool;

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), OutboundError>;

    fn unsubscribe(&mut self, topic: &str) -> Result<(), OutboundError>;

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), OutboundError>;
}

impl<'s, T: BrokerTransport<'s> + ?Sized> BrokerTransport<'s> for &mut T {
    fn register(&mut self, identity: &ClientIdentity, sink: &'s dyn EventSink) {
        (**self).register(identity, sink)
    }

    fn connect(
        &mut self,
        host: &str,
        port: u16,
        keep_alive: Duration,
    ) -> Result<(), ConnectError> {
        (**self).connect(host, port, keep_alive)
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }

    fn last_send_drained(&self) -> bool {
        (**self).last_send_drained()
    }

    fn subscribe(&mut self, topic: &str, qos: QoS) -> Result<(), OutboundError> {
        (**self).subscribe(topic, qos)
    }

    fn unsubscribe(&mut self, topic: &str) -> Result<(), OutboundError> {
        (**self).unsubscribe(topic)
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), OutboundError> {
        (**self).publish(topic, payload, qos, retain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_message_copies_topic_and_payload() {
        let msg = InboundMessage::new("/device/01/bulb/color/", b"blue").unwrap();
        assert_eq!(msg.topic(), "/device/01/bulb/color/");
        assert_eq!(msg.payload(), b"blue");
        assert_eq!(msg.payload_str(), Some("blue"));
    }

    #[test]
    fn oversized_inbound_payload_is_refused() {
        let payload = [0u8; MAX_PAYLOAD_LEN + 1];
        assert!(InboundMessage::new("t", &payload).is_none());
    }

    #[test]
    fn closures_act_as_network_oracles() {
        let up = || true;
        let down = || false;
        assert!(up.has_global_address());
        assert!(!down.has_global_address());
    }
}
