//! The session state machine.
//!
//! [`Session::step`] is the only place where session state changes. It consumes one event,
//! performs the side effects that event calls for through the collaborator traits, and tells the
//! caller when it wants its timer to fire next. Nothing in here waits or sleeps, so the whole
//! lifecycle can be driven by hand in tests.

use embassy_time::Duration;

use super::event::SessionEvent;
use super::hooks::SessionHooks;
use super::outbound::PendingOutbound;
use super::registry::TopicRegistry;
use super::state::SessionState;
use crate::config::{SessionConfig, SessionRole};
use crate::status::StatusIndication;
use crate::transport::{BrokerTransport, EventSink, NetworkOracle, TransportEvent};

/// A broker session for one node.
///
/// The session owns its state, its subscription progress and its collaborators. Transport
/// notifications reach it through `sink`, which the transport receives on registration; this is
/// normally the [`EventQueue`](super::EventQueue) the session task reads from.
pub struct Session<'s, T, N, H, const MAX_TOPICS: usize> {
    state: SessionState,
    registry: TopicRegistry<MAX_TOPICS>,
    next_unsubscribed: usize,
    pending: PendingOutbound,
    config: SessionConfig,
    transport: T,
    network: N,
    hooks: H,
    sink: &'s dyn EventSink,
}

impl<'s, T, N, H, const MAX_TOPICS: usize> Session<'s, T, N, H, MAX_TOPICS>
where
    T: BrokerTransport<'s>,
    N: NetworkOracle,
    H: SessionHooks,
{
    /// Create a session in `Init`. Nothing happens until the first timer tick.
    pub fn new(
        registry: TopicRegistry<MAX_TOPICS>,
        config: SessionConfig,
        transport: T,
        network: N,
        hooks: H,
        sink: &'s dyn EventSink,
    ) -> Self {
        Self {
            state: SessionState::Init,
            registry,
            next_unsubscribed: 0,
            pending: PendingOutbound::new(),
            config,
            transport,
            network,
            hooks,
            sink,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Index of the first topic not yet accepted by the transport.
    pub fn next_unsubscribed(&self) -> usize {
        self.next_unsubscribed
    }

    pub fn registry(&self) -> &TopicRegistry<MAX_TOPICS> {
        &self.registry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn pending(&self) -> &PendingOutbound {
        &self.pending
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    /// Process one event to completion.
    ///
    /// Returns the delay after which the timer must fire next, or `None` to keep the timer that
    /// is already armed. Timer events always re-arm.
    pub fn step(&mut self, event: SessionEvent) -> Option<Duration> {
        match event {
            SessionEvent::Timer => Some(self.on_timer()),
            SessionEvent::Transport(event) => self.on_transport_event(event),
            SessionEvent::PublishRequested => {
                self.on_publish_request();
                None
            }
        }
    }

    /// Run the current state's action and return the next timer delay.
    fn on_timer(&mut self) -> Duration {
        let policy = *self.config.policy();

        match self.state {
            SessionState::Init => {
                self.transport.register(self.registry.identity(), self.sink);
                self.reset_progress();
                debug!(
                    "Registered session as {}",
                    self.registry.identity().as_str()
                );
                self.transition(SessionState::AwaitingNetwork);
                policy.waiting_interval
            }
            SessionState::AwaitingNetwork => {
                if self.network.has_global_address() {
                    self.connect();
                } else {
                    debug!("No connectivity yet, waiting...");
                    self.hooks.on_status(StatusIndication::WaitingForNetwork);
                }
                policy.waiting_interval
            }
            SessionState::AwaitingBrokerAck => {
                debug!("Waiting for connection...");
                self.hooks.on_status(StatusIndication::Connecting);
                policy.waiting_interval
            }
            SessionState::Connected => {
                if self.transport.is_ready() && self.transport.last_send_drained() {
                    self.hooks.on_status(StatusIndication::Online);
                    match self.config.role() {
                        SessionRole::Subscriber => self.transition(SessionState::Subscribing),
                        SessionRole::Publisher => self.transition(SessionState::Publishing),
                    }
                } else {
                    debug!("Broker not ready yet...");
                }
                policy.waiting_interval
            }
            SessionState::Subscribing => {
                self.subscribe_next();
                policy.subscribing_interval
            }
            SessionState::Subscribed => {
                debug!("Subscribed, waiting for incoming messages...");
                policy.steady_interval
            }
            SessionState::Publishing => {
                self.publish_pending();
                policy.steady_interval
            }
            SessionState::Disconnected => {
                self.hooks.on_status(StatusIndication::Error);
                self.transition(SessionState::Init);
                policy.waiting_interval
            }
        }
    }

    /// React to a transport notification.
    ///
    /// Losing the connection re-arms the short timer so recovery does not wait out a
    /// steady-state interval. Other notifications leave the timer alone.
    fn on_transport_event(&mut self, event: TransportEvent) -> Option<Duration> {
        match event {
            TransportEvent::Connected => {
                if self.state == SessionState::AwaitingBrokerAck {
                    info!(
                        "Connected to broker {} on port {} with client ID {}",
                        self.config.broker_host(),
                        self.config.broker_port(),
                        self.registry.identity().as_str()
                    );
                    self.transition(SessionState::Connected);
                } else {
                    debug!("Ignoring connect ack in state {:?}", self.state);
                }
                None
            }
            TransportEvent::Disconnected(reason) => {
                warn!("MQTT disconnect, reason {:?}", reason);
                self.transition(SessionState::Disconnected);
                Some(self.config.policy().waiting_interval)
            }
            TransportEvent::ConnectionRefused(code) => {
                warn!("MQTT connection refused, reason {:?}", code);
                self.transition(SessionState::Disconnected);
                Some(self.config.policy().waiting_interval)
            }
            TransportEvent::PublishAcked => {
                debug!("Publishing complete");
                None
            }
            TransportEvent::SubscribeAcked => {
                debug!("Subscribed");
                None
            }
            TransportEvent::UnsubscribeAcked => {
                debug!("Unsubscribed");
                None
            }
            TransportEvent::MessageReceived(msg) => {
                if self.state.delivers_messages() {
                    info!(
                        "Received message on topic {} ({} bytes)",
                        msg.topic(),
                        msg.payload().len()
                    );
                    self.hooks.on_message(&msg);
                } else {
                    warn!(
                        "Dropping message on topic {} received in state {:?}",
                        msg.topic(),
                        self.state
                    );
                }
                None
            }
        }
    }

    /// Publish right away on behalf of the application, if the session is publishing.
    fn on_publish_request(&mut self) {
        if self.state == SessionState::Publishing {
            self.publish_pending();
        } else {
            debug!("Publish requested in state {:?}, ignoring", self.state);
        }
    }

    fn connect(&mut self) {
        let host = self.config.broker_host();
        let port = self.config.broker_port();
        info!("Device got a network address, connecting to {}:{}", host, port);

        match self.transport.connect(host, port, self.config.keep_alive()) {
            Ok(()) => self.transition(SessionState::AwaitingBrokerAck),
            Err(err) => {
                warn!("Connect request rejected: {:?}", err);
                self.transition(SessionState::Disconnected);
            }
        }
    }

    fn subscribe_next(&mut self) {
        let Some(topic) = self.registry.topic_at(self.next_unsubscribed) else {
            self.finish_subscribing();
            return;
        };

        info!("Subscribing to topic {}", topic);
        match self.transport.subscribe(topic, self.config.subscribe_qos()) {
            Ok(()) => {
                self.next_unsubscribed += 1;
                if self.next_unsubscribed == self.registry.topic_count() {
                    self.finish_subscribing();
                }
            }
            Err(err) => {
                warn!("Tried to subscribe on topic {} but got {:?}", topic, err);
            }
        }
    }

    fn finish_subscribing(&mut self) {
        self.transition(SessionState::Subscribed);
        self.hooks.on_subscribed();
    }

    fn publish_pending(&mut self) {
        if let Some(message) = self.hooks.acquire_publish_payload() {
            if let Some(stale) = self.pending.replace(message) {
                debug!("Dropping unsent payload for {}", stale.topic());
            }
        }

        let Some(message) = self.pending.peek() else {
            debug!("Nothing to publish");
            return;
        };

        if !self.transport.last_send_drained() {
            debug!("Previous publish still in flight, skipping");
            return;
        }

        let result = self.transport.publish(
            message.topic(),
            message.payload(),
            self.config.publish_qos(),
            self.config.retain(),
        );
        match result {
            Ok(()) => {
                info!("Publish on topic {}", message.topic());
                self.pending.clear();
                self.hooks.on_status(StatusIndication::Online);
            }
            Err(err) => {
                warn!("Publish on topic {} deferred: {:?}", message.topic(), err);
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        if next == self.state {
            return;
        }
        debug!("Session state {:?} -> {:?}", self.state, next);
        if next == SessionState::Init {
            self.reset_progress();
        }
        self.state = next;
    }

    fn reset_progress(&mut self) {
        self.next_unsubscribed = 0;
        self.pending.clear();
    }
}
