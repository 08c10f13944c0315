//! # MQTT Session Lifecycle for Constrained Devices
//!
//! `myrtio-mqtt-session` is a `no_std`, allocation-free state machine that owns the broker
//! session of a small networked node: it waits for a network address, connects, subscribes to the
//! node's topics one at a time or publishes its readings at a steady cadence, and starts over
//! from scratch whenever the connection is lost.
//!
//! ## What it is not
//!
//! The crate does not encode MQTT packets and does not run a network stack. It drives an
//! existing MQTT library through the [`BrokerTransport`](transport::BrokerTransport) trait and
//! asks a [`NetworkOracle`](transport::NetworkOracle) (for instance an `embassy_net::Stack`)
//! whether the node is addressable. LEDs, sensors and buttons stay in the application, which sees
//! the session only through [`SessionHooks`](session::SessionHooks).
//!
//! ## Usage
//!
//! ```ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use myrtio_mqtt_session::config::{SessionConfig, SessionRole};
//! use myrtio_mqtt_session::session::{EventQueue, Session, TopicRegistry};
//!
//! static EVENTS: EventQueue<CriticalSectionRawMutex> = EventQueue::new();
//!
//! let mut registry = TopicRegistry::<2>::from_hardware("contiki-", &link_address)?;
//! registry.add_device_topic("bulb", "state")?;
//! registry.add_device_topic("bulb", "color")?;
//!
//! let config = SessionConfig::new("fd00::1", SessionRole::Subscriber)?;
//! let mut session = Session::new(registry, config, transport, stack, bulb, &EVENTS);
//! session.run(&EVENTS).await
//! ```
//!
//! ## Logging
//!
//! Enable one of the `defmt`, `log` or `esp32-log` features to see what the session is doing.
//!
//! See `demos/` for complete subscriber, publisher and push-button applications.

#![cfg_attr(not(test), no_std)]

// This must go first so the logging macros are visible to every other module.
pub(crate) mod fmt;

pub mod config;
pub mod error;
pub mod identity;
pub mod routing;
pub mod session;
pub mod status;
pub mod transport;

// Re-export key types for easier access at the crate root.
pub use config::{ReconnectPolicy, SessionConfig, SessionRole};
pub use error::SessionError;
pub use session::{EventQueue, Session, SessionEvent, SessionHooks, SessionState, TopicRegistry};
pub use transport::{BrokerTransport, NetworkOracle, QoS, TransportEvent};
