//! Example: a temperature and humidity sensor publishing over MQTT.
//!
//! Each steady-state tick the sensor is read and one value is published, alternating between
//! `/device/<id>/sensor/temperature/` and `/device/<id>/sensor/humidity/`. A failed read skips the
//! round.
//!
//! Run with `cargo run --example temp_sensor`.

#[path = "sim/mod.rs"]
mod sim;

use core::fmt::Write;

use myrtio_mqtt_session::SessionError;
use myrtio_mqtt_session::config::{SessionConfig, SessionRole};
use myrtio_mqtt_session::session::{OutboundMessage, Session, SessionHooks, Topic, TopicRegistry};
use myrtio_mqtt_session::status::StatusIndication;
use myrtio_mqtt_session::transport::InboundMessage;

use sim::{DemoQueue, LoopbackBroker, SlowNetwork, drive};

const LINK_ADDRESS: [u8; 8] = [0x00, 0x12, 0x4b, 0x00, 0x06, 0x0d, 0x9a, 0x40];

/// A DHT11 that reads back a slow drift and fails its checksum every fifth read.
struct FakeDht11 {
    reads: u32,
}

impl FakeDht11 {
    /// Returns `(temperature °C, relative humidity %)`.
    fn read(&mut self) -> Option<(u8, u8)> {
        self.reads += 1;
        if self.reads % 5 == 0 {
            return None;
        }
        let drift = (self.reads % 3) as u8;
        Some((21 + drift, 40 + drift * 2))
    }
}

#[derive(Clone, Copy)]
enum Reading {
    Temperature,
    Humidity,
}

struct Sensor {
    dht: FakeDht11,
    next: Reading,
    temperature_topic: Topic,
    humidity_topic: Topic,
}

impl SessionHooks for Sensor {
    fn on_message(&mut self, msg: &InboundMessage) {
        println!("[sensor] unexpected message on {}", msg.topic());
    }

    fn acquire_publish_payload(&mut self) -> Option<OutboundMessage> {
        let Some((temperature, humidity)) = self.dht.read() else {
            println!("[sensor] checksum failed, skipping");
            return None;
        };

        let mut text = heapless::String::<8>::new();
        let topic = match self.next {
            Reading::Temperature => {
                write!(text, "{}", temperature).ok()?;
                self.next = Reading::Humidity;
                &self.temperature_topic
            }
            Reading::Humidity => {
                write!(text, "{}", humidity).ok()?;
                self.next = Reading::Temperature;
                &self.humidity_topic
            }
        };
        OutboundMessage::new(topic, text.as_bytes())
    }

    fn on_status(&mut self, status: StatusIndication) {
        println!("[sensor] status {:?}", status);
    }
}

fn main() -> Result<(), SessionError> {
    let registry = TopicRegistry::<0>::from_hardware("contiki-", &LINK_ADDRESS)?;
    let hooks = Sensor {
        dht: FakeDht11 { reads: 0 },
        next: Reading::Temperature,
        temperature_topic: registry.device_topic("sensor", "temperature")?,
        humidity_topic: registry.device_topic("sensor", "humidity")?,
    };

    let config = SessionConfig::new("fd00::1", SessionRole::Publisher)?;
    let queue = DemoQueue::new();
    let mut session = Session::new(
        registry,
        config,
        LoopbackBroker::new(),
        SlowNetwork::new(1),
        hooks,
        &queue,
    );

    drive(&mut session, &queue, 14, |_, _| {});

    Ok(())
}
