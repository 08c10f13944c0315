//! Topic registration and client identity for a session.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::error::SessionError;
use crate::identity::{
    ClientIdentity, HardwareIdentity, MAX_HARDWARE_ID_LEN, hardware_hex,
};

/// Maximum length for a single topic string.
pub const MAX_TOPIC_LEN: usize = 128;

/// An owned topic string.
pub type Topic = String<MAX_TOPIC_LEN>;

/// Object-safe trait for collecting topics during registration.
///
/// Application glue calls `add()` for each topic it wants the session to subscribe to.
pub trait TopicCollector {
    /// Add a topic to subscribe to.
    ///
    /// The topic string is copied internally, so it only needs to live
    /// for the duration of this call.
    fn add(&mut self, topic: &str) -> Result<(), SessionError>;
}

/// The ordered set of topics a node subscribes to, plus the identity it registers with.
///
/// Order matters: the session subscribes one topic at a time, starting from index 0, and only
/// moves on once the transport accepted the previous one. The registry itself never changes
/// once the session is running; subscription progress is tracked by the session.
///
/// # Example
///
/// ```
/// # use myrtio_mqtt_session::session::TopicRegistry;
/// let mac: [u8; 8] = [0x00, 0x12, 0x4b, 0x00, 0x06, 0x0d, 0xb2, 0x1f];
/// let mut registry = TopicRegistry::<2>::from_hardware("contiki-", &mac).unwrap();
/// registry.add_device_topic("bulb", "state").unwrap();
/// registry.add_device_topic("bulb", "color").unwrap();
///
/// assert_eq!(registry.identity().as_str(), "contiki-00124b00060db21f");
/// assert_eq!(registry.topic_at(1), Some("/device/00124b00060db21f/bulb/color/"));
/// ```
#[derive(Debug, Clone)]
pub struct TopicRegistry<const MAX_TOPICS: usize> {
    identity: ClientIdentity,
    device: Option<String<{ MAX_HARDWARE_ID_LEN * 2 }>>,
    topics: Vec<Topic, MAX_TOPICS>,
}

impl<const MAX_TOPICS: usize> TopicRegistry<MAX_TOPICS> {
    /// Create an empty registry for a node with a fixed identity.
    ///
    /// Device-scoped topics are unavailable on such a registry since there is no hardware id to
    /// scope them with.
    pub fn new(identity: ClientIdentity) -> Self {
        Self {
            identity,
            device: None,
            topics: Vec::new(),
        }
    }

    /// Create an empty registry whose identity is derived from the node's hardware identifier.
    pub fn from_hardware<H>(prefix: &str, hardware: &H) -> Result<Self, SessionError>
    where
        H: HardwareIdentity + ?Sized,
    {
        let identity = ClientIdentity::from_hardware(prefix, hardware)?;
        let device = hardware_hex(hardware)?;
        Ok(Self {
            identity,
            device: Some(device),
            topics: Vec::new(),
        })
    }

    /// The identity the session registers with the transport.
    pub fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Add a topic to the registry by copying the string.
    pub fn add_topic(&mut self, topic: &str) -> Result<(), SessionError> {
        let owned = Topic::try_from(topic).map_err(|_| SessionError::TopicTooLong)?;
        self.topics
            .push(owned)
            .map_err(|_| SessionError::TooManyTopics)
    }

    /// Build the device-scoped topic `/device/<hex id>/<role>/<purpose>/` without registering it.
    ///
    /// Producers use this for the topics they publish on.
    pub fn device_topic(&self, role: &str, purpose: &str) -> Result<Topic, SessionError> {
        let device = self
            .device
            .as_ref()
            .ok_or(SessionError::IdentityUnavailable)?;

        let mut topic = Topic::new();
        write!(topic, "/device/{}/{}/{}/", device.as_str(), role, purpose)
            .map_err(|_| SessionError::TopicTooLong)?;
        Ok(topic)
    }

    /// Register the device-scoped topic for `role`/`purpose`.
    pub fn add_device_topic(&mut self, role: &str, purpose: &str) -> Result<(), SessionError> {
        let topic = self.device_topic(role, purpose)?;
        self.topics
            .push(topic)
            .map_err(|_| SessionError::TooManyTopics)
    }

    /// The topic at `index`, or `None` past the end.
    pub fn topic_at(&self, index: usize) -> Option<&str> {
        self.topics.get(index).map(|s| s.as_str())
    }

    /// Get the number of registered topics.
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Get an iterator over the registered topics.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|s| s.as_str())
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

impl<const MAX_TOPICS: usize> TopicCollector for TopicRegistry<MAX_TOPICS> {
    fn add(&mut self, topic: &str) -> Result<(), SessionError> {
        self.add_topic(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAC: [u8; 8] = [0x00, 0x12, 0x4b, 0x00, 0x06, 0x0d, 0xb2, 0x1f];

    #[test]
    fn topics_keep_insertion_order() {
        let mut registry = TopicRegistry::<3>::new(ClientIdentity::new("node-01").unwrap());
        registry.add_topic("/test/topic/").unwrap();
        registry.add_topic("/topic2").unwrap();
        registry.add_topic("/topic3/led").unwrap();

        assert_eq!(registry.topic_count(), 3);
        assert_eq!(registry.topic_at(0), Some("/test/topic/"));
        assert_eq!(registry.topic_at(2), Some("/topic3/led"));
        assert_eq!(registry.topic_at(3), None);
        let collected: std::vec::Vec<&str> = registry.iter().collect();
        assert_eq!(collected, ["/test/topic/", "/topic2", "/topic3/led"]);
    }

    #[test]
    fn full_registry_rejects_more_topics() {
        let mut registry = TopicRegistry::<1>::new(ClientIdentity::new("node-01").unwrap());
        registry.add_topic("a").unwrap();
        assert_eq!(registry.add_topic("b"), Err(SessionError::TooManyTopics));
        assert_eq!(registry.topic_count(), 1);
    }

    #[test]
    fn overlong_topic_is_rejected() {
        let mut registry = TopicRegistry::<1>::new(ClientIdentity::new("node-01").unwrap());
        let long = [b'x'; MAX_TOPIC_LEN + 1];
        let long = core::str::from_utf8(&long).unwrap();
        assert_eq!(registry.add_topic(long), Err(SessionError::TopicTooLong));
        assert!(registry.is_empty());
    }

    #[test]
    fn device_topics_embed_hardware_id() {
        let mut registry = TopicRegistry::<2>::from_hardware("contiki-", &MAC).unwrap();
        registry.add_device_topic("bulb", "state").unwrap();
        assert_eq!(
            registry.topic_at(0),
            Some("/device/00124b00060db21f/bulb/state/")
        );
        assert_eq!(
            registry.device_topic("sensor", "temperature").unwrap().as_str(),
            "/device/00124b00060db21f/sensor/temperature/"
        );
        // Building a topic does not register it.
        assert_eq!(registry.topic_count(), 1);
    }

    #[test]
    fn fixed_identity_has_no_device_topics() {
        let registry = TopicRegistry::<1>::new(ClientIdentity::new("node-01").unwrap());
        assert_eq!(
            registry.device_topic("bulb", "state"),
            Err(SessionError::IdentityUnavailable)
        );
    }

    #[test]
    fn collector_adds_topics() {
        let mut registry = TopicRegistry::<2>::new(ClientIdentity::new("node-01").unwrap());
        let collector: &mut dyn TopicCollector = &mut registry;
        collector.add("state").unwrap();
        assert_eq!(registry.topic_at(0), Some("state"));
    }
}
