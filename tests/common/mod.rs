#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Duration;
use myrtio_mqtt_session::config::{SessionConfig, SessionRole};
use myrtio_mqtt_session::error::{ConnectError, OutboundError};
use myrtio_mqtt_session::identity::ClientIdentity;
use myrtio_mqtt_session::session::{
    EventQueue, OutboundMessage, Session, SessionEvent, SessionHooks, SessionState, TopicRegistry,
};
use myrtio_mqtt_session::status::StatusIndication;
use myrtio_mqtt_session::transport::{BrokerTransport, EventSink, InboundMessage, QoS};

pub type TestQueue = EventQueue<NoopRawMutex, 8>;

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectCall {
    pub host: String,
    pub port: u16,
    pub keep_alive: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishCall {
    pub topic: String,
    pub payload: Vec<u8>,
    pub qos: QoS,
    pub retain: bool,
}

/// Records every command and answers from scripted results.
pub struct MockTransport {
    pub registrations: Vec<String>,
    pub connects: Vec<ConnectCall>,
    pub connect_result: Result<(), ConnectError>,
    pub ready: bool,
    pub drained: bool,
    /// Every subscribe attempt, accepted or not.
    pub subscribe_attempts: Vec<String>,
    /// Only the subscribes the mock accepted.
    pub subscribed: Vec<String>,
    /// Results for the next subscribe calls; empty means accept.
    pub subscribe_script: VecDeque<Result<(), OutboundError>>,
    pub publishes: Vec<PublishCall>,
    pub publish_script: VecDeque<Result<(), OutboundError>>,
    pub unsubscribes: Vec<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            connects: Vec::new(),
            connect_result: Ok(()),
            ready: true,
            drained: true,
            subscribe_attempts: Vec::new(),
            subscribed: Vec::new(),
            subscribe_script: VecDeque::new(),
            publishes: Vec::new(),
            publish_script: VecDeque::new(),
            unsubscribes: Vec::new(),
        }
    }
}

impl<'s> BrokerTransport<'s> for MockTransport {
    fn register(&mut self, identity: &ClientIdentity, _sink: &'s dyn EventSink) {
        self.registrations.push(identity.as_str().to_string());
    }

    fn connect(
        &mut self,
        host: &str,
        port: u16,
        keep_alive: Duration,
    ) -> Result<(), ConnectError> {
        self.connects.push(ConnectCall {
            host: host.to_string(),
            port,
            keep_alive,
        });
        self.connect_result
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn last_send_drained(&self) -> bool {
        self.drained
    }

    fn subscribe(&mut self, topic: &str, _qos: QoS) -> Result<(), OutboundError> {
        self.subscribe_attempts.push(topic.to_string());
        let result = self.subscribe_script.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.subscribed.push(topic.to_string());
        }
        result
    }

    fn unsubscribe(&mut self, topic: &str) -> Result<(), OutboundError> {
        self.unsubscribes.push(topic.to_string());
        Ok(())
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QoS,
        retain: bool,
    ) -> Result<(), OutboundError> {
        let result = self.publish_script.pop_front().unwrap_or(Ok(()));
        if result.is_ok() {
            self.publishes.push(PublishCall {
                topic: topic.to_string(),
                payload: payload.to_vec(),
                qos,
                retain,
            });
            self.drained = false;
        }
        result
    }
}

/// Remembers everything the session told the application.
#[derive(Default)]
pub struct RecordingHooks {
    pub messages: Vec<(String, Vec<u8>)>,
    pub payloads: VecDeque<OutboundMessage>,
    pub acquisitions: usize,
    pub subscribed: usize,
    pub statuses: Vec<StatusIndication>,
}

impl SessionHooks for RecordingHooks {
    fn on_message(&mut self, msg: &InboundMessage) {
        self.messages
            .push((msg.topic().to_string(), msg.payload().to_vec()));
    }

    fn acquire_publish_payload(&mut self) -> Option<OutboundMessage> {
        self.acquisitions += 1;
        self.payloads.pop_front()
    }

    fn on_subscribed(&mut self) {
        self.subscribed += 1;
    }

    fn on_status(&mut self, status: StatusIndication) {
        self.statuses.push(status);
    }
}

pub type Network<'n> = Box<dyn Fn() -> bool + 'n>;

pub type TestSession<'s, 'n> = Session<'s, MockTransport, Network<'n>, RecordingHooks, 4>;

pub fn registry(topics: &[&str]) -> TopicRegistry<4> {
    let mut registry = TopicRegistry::new(ClientIdentity::new("node-01").unwrap());
    for topic in topics {
        registry.add_topic(topic).unwrap();
    }
    registry
}

pub fn session<'s, 'n>(
    role: SessionRole,
    topics: &[&str],
    network: &'n Cell<bool>,
    queue: &'s TestQueue,
) -> TestSession<'s, 'n> {
    let config = SessionConfig::new("fd00::1", role).unwrap();
    Session::new(
        registry(topics),
        config,
        MockTransport::new(),
        Box::new(move || network.get()),
        RecordingHooks::default(),
        queue,
    )
}

pub fn tick(session: &mut TestSession<'_, '_>) -> Duration {
    session
        .step(SessionEvent::Timer)
        .expect("timer ticks always re-arm")
}

pub fn deliver(session: &mut TestSession<'_, '_>, event: myrtio_mqtt_session::TransportEvent) {
    session.step(SessionEvent::Transport(event));
}

/// Tick until the session reaches `target`, failing after a bounded number of steps.
pub fn drive_to(session: &mut TestSession<'_, '_>, network: &Cell<bool>, target: SessionState) {
    network.set(true);
    for _ in 0..16 {
        if session.state() == target {
            return;
        }
        if session.state() == SessionState::AwaitingBrokerAck {
            deliver(session, myrtio_mqtt_session::TransportEvent::Connected);
        } else {
            tick(session);
        }
    }
    assert_eq!(session.state(), target, "session never reached {:?}", target);
}
