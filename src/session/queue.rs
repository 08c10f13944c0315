//! The session's single-consumer event queue.
//!
//! Transport callbacks and application tasks run in other execution contexts. They never mutate
//! session state; they post a [`SessionEvent`] here and the session task consumes the queue one
//! event at a time.
//!
//! # Connection Loss
//!
//! `Disconnected` and `ConnectionRefused` bypass the bounded channel. They are latched in a
//! [`Signal`] and handed out before anything still queued, so a burst of inbound messages can
//! never crowd out the only event that gets a dead session reconnecting. Only the latest loss is
//! kept; the session reacts to every loss the same way.

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Channel, Sender};
use embassy_sync::signal::Signal;

use super::event::SessionEvent;
use crate::transport::{EventSink, TransportEvent};

/// Queue depth sufficient for the transport's burst of acks plus a few inbound messages.
pub const DEFAULT_QUEUE_DEPTH: usize = 8;

/// Bounded queue of events waiting for the session task.
///
/// Use `CriticalSectionRawMutex` when events are posted from interrupts or another core, and
/// `NoopRawMutex` when everything runs on one executor.
pub struct EventQueue<M: RawMutex, const DEPTH: usize = DEFAULT_QUEUE_DEPTH> {
    channel: Channel<M, SessionEvent, DEPTH>,
    loss: Signal<M, TransportEvent>,
}

impl<M: RawMutex, const DEPTH: usize> EventQueue<M, DEPTH> {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            loss: Signal::new(),
        }
    }

    /// Post an event without waiting. Returns `false` if the queue is full and the event was
    /// dropped.
    ///
    /// Connection loss is never dropped; see the module docs.
    pub fn post(&self, event: SessionEvent) -> bool {
        let event = match event {
            SessionEvent::Transport(
                loss @ (TransportEvent::Disconnected(_) | TransportEvent::ConnectionRefused(_)),
            ) => {
                self.loss.signal(loss);
                return true;
            }
            other => other,
        };

        match self.channel.try_send(event) {
            Ok(()) => true,
            Err(_) => {
                warn!("Session event queue full, dropping event");
                false
            }
        }
    }

    /// Wait for the next event. A pending connection loss comes first.
    pub async fn receive(&self) -> SessionEvent {
        if let Some(loss) = self.loss.try_take() {
            return SessionEvent::Transport(loss);
        }
        match select(self.loss.wait(), self.channel.receive()).await {
            Either::First(loss) => SessionEvent::Transport(loss),
            Either::Second(event) => event,
        }
    }

    /// Take the next event if one is queued. A pending connection loss comes first.
    pub fn try_receive(&self) -> Option<SessionEvent> {
        if let Some(loss) = self.loss.try_take() {
            return Some(SessionEvent::Transport(loss));
        }
        self.channel.try_receive().ok()
    }

    /// A handle application tasks use to nudge the session.
    pub fn handle(&self) -> SessionHandle<'_, M, DEPTH> {
        SessionHandle::new(self.channel.sender())
    }

    pub fn len(&self) -> usize {
        self.channel.len() + usize::from(self.loss.signaled())
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty() && !self.loss.signaled()
    }
}

impl<M: RawMutex, const DEPTH: usize> Default for EventQueue<M, DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const DEPTH: usize> EventSink for EventQueue<M, DEPTH> {
    fn deliver(&self, event: TransportEvent) {
        self.post(SessionEvent::Transport(event));
    }
}

/// A handle that lets application tasks request work from the session without access to it.
///
/// This handle wraps a channel sender and can be copied into multiple tasks.
pub struct SessionHandle<'a, M: RawMutex, const DEPTH: usize> {
    tx: Sender<'a, M, SessionEvent, DEPTH>,
}

impl<M: RawMutex, const DEPTH: usize> Clone for SessionHandle<'_, M, DEPTH> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: RawMutex, const DEPTH: usize> Copy for SessionHandle<'_, M, DEPTH> {}

impl<'a, M: RawMutex, const DEPTH: usize> SessionHandle<'a, M, DEPTH> {
    /// Create a new `SessionHandle` from a channel sender.
    pub fn new(tx: Sender<'a, M, SessionEvent, DEPTH>) -> Self {
        Self { tx }
    }

    /// Ask a publishing session to publish now, waiting for queue space.
    pub async fn request_publish(&self) {
        self.tx.send(SessionEvent::PublishRequested).await;
    }

    /// Ask a publishing session to publish now without waiting.
    ///
    /// Returns `false` if the queue is full.
    pub fn try_request_publish(&self) -> bool {
        self.tx.try_send(SessionEvent::PublishRequested).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DisconnectReason;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn sink_marshals_transport_events_in_order() {
        let queue = EventQueue::<NoopRawMutex, 4>::new();
        let sink: &dyn EventSink = &queue;
        sink.deliver(TransportEvent::Connected);
        sink.deliver(TransportEvent::SubscribeAcked);

        assert_eq!(
            queue.try_receive(),
            Some(SessionEvent::Transport(TransportEvent::Connected))
        );
        assert_eq!(
            queue.try_receive(),
            Some(SessionEvent::Transport(TransportEvent::SubscribeAcked))
        );
        assert_eq!(queue.try_receive(), None);
    }

    #[test]
    fn full_queue_drops_new_events() {
        let queue = EventQueue::<NoopRawMutex, 1>::new();
        assert!(queue.post(SessionEvent::Timer));
        assert!(!queue.post(SessionEvent::PublishRequested));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.try_receive(), Some(SessionEvent::Timer));
    }

    #[test]
    fn connection_loss_survives_a_full_queue() {
        let queue = EventQueue::<NoopRawMutex, 2>::new();
        let sink: &dyn EventSink = &queue;
        sink.deliver(TransportEvent::SubscribeAcked);
        sink.deliver(TransportEvent::PublishAcked);
        assert!(!queue.post(SessionEvent::Timer));

        sink.deliver(TransportEvent::Disconnected(DisconnectReason::KeepAliveTimeout));
        assert_eq!(queue.len(), 3);

        assert_eq!(
            queue.try_receive(),
            Some(SessionEvent::Transport(TransportEvent::Disconnected(
                DisconnectReason::KeepAliveTimeout
            )))
        );
        assert_eq!(
            queue.try_receive(),
            Some(SessionEvent::Transport(TransportEvent::SubscribeAcked))
        );
    }

    #[test]
    fn latest_connection_loss_wins() {
        let queue = EventQueue::<NoopRawMutex, 2>::new();
        queue.deliver(TransportEvent::Disconnected(DisconnectReason::NetworkError));
        queue.deliver(TransportEvent::ConnectionRefused(
            crate::error::ConnectReasonCode::ServerUnavailable,
        ));

        assert_eq!(
            queue.try_receive(),
            Some(SessionEvent::Transport(TransportEvent::ConnectionRefused(
                crate::error::ConnectReasonCode::ServerUnavailable
            )))
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn receive_prefers_pending_loss() {
        let queue = EventQueue::<NoopRawMutex, 2>::new();
        queue.post(SessionEvent::PublishRequested);
        queue.deliver(TransportEvent::Disconnected(DisconnectReason::ClosedByBroker));

        let event = embassy_futures::block_on(queue.receive());
        assert_eq!(
            event,
            SessionEvent::Transport(TransportEvent::Disconnected(DisconnectReason::ClosedByBroker))
        );
        let event = embassy_futures::block_on(queue.receive());
        assert_eq!(event, SessionEvent::PublishRequested);
    }

    #[test]
    fn handle_posts_publish_requests() {
        let queue = EventQueue::<NoopRawMutex, 2>::new();
        let handle = queue.handle();
        assert!(handle.try_request_publish());
        assert_eq!(queue.try_receive(), Some(SessionEvent::PublishRequested));
        assert!(queue.is_empty());
    }

    #[test]
    fn receive_resolves_queued_event() {
        let queue = EventQueue::<NoopRawMutex, 2>::new();
        queue.post(SessionEvent::Timer);
        let event = embassy_futures::block_on(queue.receive());
        assert_eq!(event, SessionEvent::Timer);
    }
}
