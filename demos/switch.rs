//! Example: a wall switch that toggles a remote bulb.
//!
//! The switch publishes `on`/`off` to the bulb's state topic whenever its button is pressed. The
//! button interrupt only flags the press and nudges the session through its handle; the payload
//! itself is produced when the session asks for it.
//!
//! Run with `cargo run --example switch`.

#[path = "sim/mod.rs"]
mod sim;

use core::sync::atomic::{AtomicBool, Ordering};

use myrtio_mqtt_session::SessionError;
use myrtio_mqtt_session::config::{SessionConfig, SessionRole};
use myrtio_mqtt_session::session::{OutboundMessage, Session, SessionHooks, TopicRegistry};
use myrtio_mqtt_session::transport::InboundMessage;

use sim::{DemoQueue, LoopbackBroker, SlowNetwork, drive};

const LINK_ADDRESS: [u8; 8] = [0x00, 0x12, 0x4b, 0x00, 0x06, 0x0d, 0x81, 0x07];

/// The bulb this switch controls.
const BULB_STATE_TOPIC: &str = "/device/00124b00060db21f/bulb/state/";

static PRESSED: AtomicBool = AtomicBool::new(false);

struct Switch {
    bulb_on: bool,
}

impl SessionHooks for Switch {
    fn on_message(&mut self, msg: &InboundMessage) {
        println!("[switch] unexpected message on {}", msg.topic());
    }

    fn acquire_publish_payload(&mut self) -> Option<OutboundMessage> {
        if !PRESSED.swap(false, Ordering::AcqRel) {
            return None;
        }
        self.bulb_on = !self.bulb_on;
        let payload: &[u8] = if self.bulb_on { b"on" } else { b"off" };
        OutboundMessage::new(BULB_STATE_TOPIC, payload)
    }
}

fn main() -> Result<(), SessionError> {
    let registry = TopicRegistry::<0>::from_hardware("contiki-", &LINK_ADDRESS)?;
    let config = SessionConfig::new("fd00::1", SessionRole::Publisher)?;
    let queue = DemoQueue::new();
    let handle = queue.handle();

    let mut session = Session::new(
        registry,
        config,
        LoopbackBroker::new(),
        SlowNetwork::new(0),
        Switch { bulb_on: false },
        &queue,
    );

    drive(&mut session, &queue, 10, |n, _| {
        if n == 5 || n == 7 {
            println!("[switch] button pressed");
            PRESSED.store(true, Ordering::Release);
            if !handle.try_request_publish() {
                println!("[switch] session busy, press picked up on next tick");
            }
        }
    });

    Ok(())
}
