//! A loopback broker and a scripted task loop, so the demos run on a desktop.
#![allow(dead_code)]

use std::cell::Cell;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Duration;
use embedded_hal::digital::{ErrorType, OutputPin};
use myrtio_mqtt_session::error::{ConnectError, OutboundError};
use myrtio_mqtt_session::identity::ClientIdentity;
use myrtio_mqtt_session::session::{EventQueue, Session, SessionEvent, SessionHooks};
use myrtio_mqtt_session::transport::{
    BrokerTransport, EventSink, InboundMessage, NetworkOracle, QoS, TransportEvent,
};

pub type DemoQueue = EventQueue<NoopRawMutex, 8>;

/// Answers every command immediately and echoes publishes back to matching subscriptions.
pub struct LoopbackBroker<'s> {
    sink: Option<&'s dyn EventSink>,
    connected: bool,
    subscriptions: Vec<String>,
}

impl<'s> LoopbackBroker<'s> {
    pub fn new() -> Self {
        Self {
            sink: None,
            connected: false,
            subscriptions: Vec::new(),
        }
    }

    /// Pretend the broker sent `payload` on `topic`.
    pub fn inject(&self, topic: &str, payload: &[u8]) {
        if let (Some(sink), Some(msg)) = (self.sink, InboundMessage::new(topic, payload)) {
            sink.deliver(TransportEvent::MessageReceived(msg));
        }
    }

    fn notify(&self, event: TransportEvent) {
        if let Some(sink) = self.sink {
            sink.deliver(event);
        }
    }
}

impl<'s> BrokerTransport<'s> for LoopbackBroker<'s> {
    fn register(&mut self, identity: &ClientIdentity, sink: &'s dyn EventSink) {
        println!("[broker] client {} registered", identity);
        self.sink = Some(sink);
        self.connected = false;
        self.subscriptions.clear();
    }

    fn connect(
        &mut self,
        host: &str,
        port: u16,
        keep_alive: Duration,
    ) -> Result<(), ConnectError> {
        println!(
            "[broker] connect to {}:{} (keep-alive {}s)",
            host,
            port,
            keep_alive.as_secs()
        );
        self.connected = true;
        self.notify(TransportEvent::Connected);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.connected
    }

    fn last_send_drained(&self) -> bool {
        true
    }

    fn subscribe(&mut self, topic: &str, _qos: QoS) -> Result<(), OutboundError> {
        if !self.connected {
            return Err(OutboundError::NotConnected);
        }
        println!("[broker] subscribe {}", topic);
        self.subscriptions.push(topic.to_string());
        self.notify(TransportEvent::SubscribeAcked);
        Ok(())
    }

    fn unsubscribe(&mut self, topic: &str) -> Result<(), OutboundError> {
        self.subscriptions.retain(|t| t != topic);
        self.notify(TransportEvent::UnsubscribeAcked);
        Ok(())
    }

    fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        _qos: QoS,
        _retain: bool,
    ) -> Result<(), OutboundError> {
        if !self.connected {
            return Err(OutboundError::NotConnected);
        }
        println!(
            "[broker] publish {} <- {}",
            topic,
            String::from_utf8_lossy(payload)
        );
        self.notify(TransportEvent::PublishAcked);
        if self.subscriptions.iter().any(|t| t == topic) {
            self.inject(topic, payload);
        }
        Ok(())
    }
}

/// A network that comes up after a few polls.
pub struct SlowNetwork {
    polls_left: Cell<u32>,
}

impl SlowNetwork {
    pub fn new(polls: u32) -> Self {
        Self {
            polls_left: Cell::new(polls),
        }
    }
}

impl NetworkOracle for SlowNetwork {
    fn has_global_address(&self) -> bool {
        match self.polls_left.get() {
            0 => true,
            n => {
                self.polls_left.set(n - 1);
                false
            }
        }
    }
}

/// An LED that prints when it changes.
pub struct PrintPin(pub &'static str, pub bool);

impl ErrorType for PrintPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for PrintPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        if self.1 {
            println!("[led] {} off", self.0);
        }
        self.1 = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        if !self.1 {
            println!("[led] {} on", self.0);
        }
        self.1 = true;
        Ok(())
    }
}

/// Run `ticks` timer expirations, draining every queued event after each one, the way the
/// session task interleaves them. `between` runs after each tick and may inject events.
pub fn drive<'s, N, H, const MAX_TOPICS: usize>(
    session: &mut Session<'s, LoopbackBroker<'s>, N, H, MAX_TOPICS>,
    queue: &DemoQueue,
    ticks: usize,
    mut between: impl FnMut(usize, &mut Session<'s, LoopbackBroker<'s>, N, H, MAX_TOPICS>),
) where
    N: NetworkOracle,
    H: SessionHooks,
{
    for n in 0..ticks {
        let before = session.state();
        let delay = session.step(SessionEvent::Timer);
        while let Some(event) = queue.try_receive() {
            session.step(event);
        }
        between(n, session);
        while let Some(event) = queue.try_receive() {
            session.step(event);
        }
        println!(
            "[tick {:>2}] {:?} -> {:?} (next in {:?}s)",
            n,
            before,
            session.state(),
            delay.map(|d| d.as_secs())
        );
    }
}
