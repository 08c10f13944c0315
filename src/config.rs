//! # Session Configuration
//!
//! Broker coordinates, timing and QoS for a session. None of these values change while the
//! session runs; reconnects reuse the same configuration.

use embassy_time::Duration;
use heapless::String;

use crate::error::SessionError;
use crate::transport::QoS;

/// Maximum length of the broker host (name or textual address).
pub const MAX_BROKER_HOST_LEN: usize = 64;

/// Default unencrypted MQTT port.
pub const DEFAULT_BROKER_PORT: u16 = 1883;

/// Default keep-alive, expressed as a multiple of the steady-state interval.
pub const DEFAULT_KEEP_ALIVE_MULTIPLIER: u8 = 3;

/// What the session does once the broker connection is ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionRole {
    /// Subscribe to every registered topic, then wait for messages.
    Subscriber,
    /// Publish application payloads at the steady-state cadence.
    Publisher,
}

/// Timer intervals used by the session.
///
/// All retries run at these constant intervals; there is no exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Poll interval while waiting for the network, the broker, or the transport to drain.
    pub waiting_interval: Duration,
    /// Pacing between two subscribe attempts.
    pub subscribing_interval: Duration,
    /// Interval once subscribed or publishing.
    pub steady_interval: Duration,
}

impl ReconnectPolicy {
    pub const fn new() -> Self {
        Self {
            waiting_interval: Duration::from_secs(1),
            subscribing_interval: Duration::from_secs(2),
            steady_interval: Duration::from_secs(30),
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration for a [`Session`](crate::session::Session).
///
/// ```
/// # use myrtio_mqtt_session::config::{SessionConfig, SessionRole};
/// # use embassy_time::Duration;
/// let config = SessionConfig::new("fd00::1", SessionRole::Subscriber)
///     .unwrap()
///     .with_port(1884);
/// assert_eq!(config.keep_alive(), Duration::from_secs(90));
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    broker_host: String<MAX_BROKER_HOST_LEN>,
    broker_port: u16,
    keep_alive_multiplier: u8,
    policy: ReconnectPolicy,
    role: SessionRole,
    subscribe_qos: QoS,
    publish_qos: QoS,
    retain: bool,
}

impl SessionConfig {
    pub fn new(broker_host: &str, role: SessionRole) -> Result<Self, SessionError> {
        let broker_host =
            String::try_from(broker_host).map_err(|_| SessionError::BrokerHostTooLong)?;
        Ok(Self {
            broker_host,
            broker_port: DEFAULT_BROKER_PORT,
            keep_alive_multiplier: DEFAULT_KEEP_ALIVE_MULTIPLIER,
            policy: ReconnectPolicy::new(),
            role,
            subscribe_qos: QoS::AtMostOnce,
            publish_qos: QoS::AtMostOnce,
            retain: false,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.broker_port = port;
        self
    }

    pub fn with_keep_alive_multiplier(mut self, multiplier: u8) -> Self {
        self.keep_alive_multiplier = multiplier;
        self
    }

    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_subscribe_qos(mut self, qos: QoS) -> Self {
        self.subscribe_qos = qos;
        self
    }

    pub fn with_publish_qos(mut self, qos: QoS) -> Self {
        self.publish_qos = qos;
        self
    }

    pub fn with_retain(mut self, retain: bool) -> Self {
        self.retain = retain;
        self
    }

    pub fn broker_host(&self) -> &str {
        self.broker_host.as_str()
    }

    pub fn broker_port(&self) -> u16 {
        self.broker_port
    }

    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    pub fn role(&self) -> SessionRole {
        self.role
    }

    pub fn subscribe_qos(&self) -> QoS {
        self.subscribe_qos
    }

    pub fn publish_qos(&self) -> QoS {
        self.publish_qos
    }

    pub fn retain(&self) -> bool {
        self.retain
    }

    /// Keep-alive advertised to the broker: the steady-state interval times the multiplier.
    pub fn keep_alive(&self) -> Duration {
        Duration::from_ticks(
            self.policy
                .steady_interval
                .as_ticks()
                .saturating_mul(self.keep_alive_multiplier as u64),
        )
    }
}
