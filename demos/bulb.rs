//! Example: an RGB bulb driven over MQTT.
//!
//! The bulb subscribes to two device-scoped topics, `/device/<id>/bulb/state/` (`on`/`off`) and
//! `/device/<id>/bulb/color/` (a color name), and applies whatever it receives. Messages are
//! routed to a handler by the purpose at the end of their topic.
//!
//! Run with `cargo run --example bulb`.

#[path = "sim/mod.rs"]
mod sim;

use myrtio_mqtt_session::config::{SessionConfig, SessionRole};
use myrtio_mqtt_session::routing::match_purpose;
use myrtio_mqtt_session::session::{Session, SessionHooks, TopicRegistry};
use myrtio_mqtt_session::status::{PinStatusIndicator, StatusIndication};
use myrtio_mqtt_session::transport::InboundMessage;
use myrtio_mqtt_session::SessionError;

use sim::{DemoQueue, LoopbackBroker, PrintPin, SlowNetwork, drive};

const ROLE: &str = "bulb";
const STATE: &str = "state";
const COLOR: &str = "color";

/// The node's IEEE 802.15.4 extended address.
const LINK_ADDRESS: [u8; 8] = [0x00, 0x12, 0x4b, 0x00, 0x06, 0x0d, 0xb2, 0x1f];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Green,
    Blue,
    Cyan,
    Magenta,
    Yellow,
    White,
}

impl Color {
    fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "red" => Self::Red,
            "green" => Self::Green,
            "blue" => Self::Blue,
            "cyan" => Self::Cyan,
            "magenta" => Self::Magenta,
            "yellow" => Self::Yellow,
            "white" => Self::White,
            _ => return None,
        })
    }
}

struct Bulb {
    on: bool,
    color: Color,
    status: PinStatusIndicator<PrintPin, PrintPin, PrintPin>,
}

impl Bulb {
    fn new() -> Self {
        Self {
            on: false,
            color: Color::White,
            status: PinStatusIndicator::new(
                PrintPin("blue", false),
                PrintPin("green", false),
                PrintPin("red", false),
            ),
        }
    }

    fn apply(&self) {
        if self.on {
            println!("[bulb] lit {:?}", self.color);
        } else {
            println!("[bulb] off");
        }
    }
}

impl SessionHooks for Bulb {
    fn on_message(&mut self, msg: &InboundMessage) {
        let Some(text) = msg.payload_str() else {
            println!("[bulb] ignoring non-text payload on {}", msg.topic());
            return;
        };

        match match_purpose(msg.topic(), &[STATE, COLOR]) {
            Some(STATE) => match text {
                "on" => self.on = true,
                "off" => self.on = false,
                other => println!("[bulb] unknown state {}", other),
            },
            Some(COLOR) => match Color::parse(text) {
                Some(color) => self.color = color,
                None => println!("[bulb] unknown color {}", text),
            },
            _ => {
                println!("[bulb] unknown topic {}", msg.topic());
                return;
            }
        }
        self.apply();
    }

    fn on_subscribed(&mut self) {
        self.apply();
    }

    fn on_status(&mut self, status: StatusIndication) {
        self.status.show(status);
    }
}

fn main() -> Result<(), SessionError> {
    let mut registry = TopicRegistry::<2>::from_hardware("contiki-", &LINK_ADDRESS)?;
    registry.add_device_topic(ROLE, STATE)?;
    registry.add_device_topic(ROLE, COLOR)?;
    let state_topic = registry.device_topic(ROLE, STATE)?;
    let color_topic = registry.device_topic(ROLE, COLOR)?;

    let config = SessionConfig::new("fd00::1", SessionRole::Subscriber)?;
    let queue = DemoQueue::new();
    let mut session = Session::new(
        registry,
        config,
        LoopbackBroker::new(),
        SlowNetwork::new(2),
        Bulb::new(),
        &queue,
    );

    drive(&mut session, &queue, 12, |n, session| match n {
        8 => session.transport().inject(&state_topic, b"on"),
        9 => session.transport().inject(&color_topic, b"blue"),
        10 => session.transport().inject("/device/ffff/fan/speed/", b"3"),
        _ => {}
    });

    Ok(())
}
