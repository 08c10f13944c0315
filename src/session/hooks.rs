//! Application hooks.
//!
//! This module defines the object-safe `SessionHooks` trait through which the session talks back
//! to the application: inbound messages, payloads to publish, and progress indication.
//!
//! # Object Safety
//!
//! The trait is dyn-compatible, so `&mut dyn SessionHooks` can be stored in a `StaticCell` and
//! handed to an Embassy task without making the task generic.
//!
//! # Synchronous Callbacks
//!
//! Hooks run inside a session step and must return promptly. They never perform I/O on the
//! broker connection themselves: publish payloads are returned to the session, which decides
//! when the transport can take them.

use super::outbound::OutboundMessage;
use crate::status::StatusIndication;
use crate::transport::InboundMessage;

/// Callbacks from the session to the application.
///
/// # Example
///
/// ```
/// # use myrtio_mqtt_session::session::{OutboundMessage, SessionHooks};
/// # use myrtio_mqtt_session::transport::InboundMessage;
/// struct Beacon {
///     seq: u8,
/// }
///
/// impl SessionHooks for Beacon {
///     fn on_message(&mut self, _msg: &InboundMessage) {}
///
///     fn acquire_publish_payload(&mut self) -> Option<OutboundMessage> {
///         self.seq = self.seq.wrapping_add(1);
///         OutboundMessage::new("/beacon", &[self.seq])
///     }
/// }
/// ```
pub trait SessionHooks {
    /// Handle an inbound message.
    ///
    /// Called for every message that arrives while the session is `Subscribed` or `Publishing`,
    /// whatever its topic. Topics the application does not recognise should be logged and
    /// ignored.
    fn on_message(&mut self, msg: &InboundMessage);

    /// Produce the next payload to publish, if any.
    ///
    /// Called each time a publishing session ticks, and on explicit publish requests. Returning
    /// `None` skips this round, e.g. after a failed sensor read.
    ///
    /// The default implementation publishes nothing.
    fn acquire_publish_payload(&mut self) -> Option<OutboundMessage> {
        None
    }

    /// Called each time every registered topic has been subscribed.
    fn on_subscribed(&mut self) {}

    /// Progress report for status LEDs and the like.
    fn on_status(&mut self, _status: StatusIndication) {}
}

/// Hooks that ignore everything.
///
/// Useful as a placeholder or for testing.
pub struct NoopHooks;

impl SessionHooks for NoopHooks {
    fn on_message(&mut self, _msg: &InboundMessage) {}
}

/// Blanket implementation for mutable references to trait objects.
///
/// This allows using `&mut dyn SessionHooks` wherever `SessionHooks` is expected.
impl<H: SessionHooks + ?Sized> SessionHooks for &mut H {
    fn on_message(&mut self, msg: &InboundMessage) {
        (**self).on_message(msg)
    }

    fn acquire_publish_payload(&mut self) -> Option<OutboundMessage> {
        (**self).acquire_publish_payload()
    }

    fn on_subscribed(&mut self) {
        (**self).on_subscribed()
    }

    fn on_status(&mut self, status: StatusIndication) {
        (**self).on_status(status)
    }
}
