//! MQTT Session Module
//!
//! Brings a broker session up from a cold, disconnected node and keeps it up.
//!
//! # Overview
//!
//! A [`Session`] walks through the lifecycle described by [`SessionState`]:
//!
//! ```text
//! Init -> AwaitingNetwork -> AwaitingBrokerAck -> Connected -+-> Subscribing -> Subscribed
//!  ^                                                         '-> Publishing
//!  '-- Disconnected <-- (any state, on disconnect or refusal)
//! ```
//!
//! It is driven by exactly two kinds of input: expirations of its own timer and notifications
//! from the transport. Every state arms a timer, so the session always makes progress even if an
//! expected notification never comes; none of the retries is bounded.
//!
//! # Single Task Model
//!
//! All state lives in the `Session` and is only touched by [`Session::step`]. Transport
//! callbacks run elsewhere and only post to the [`EventQueue`]; [`Session::run`] consumes that
//! queue one event at a time. No locks are needed around session state.
//!
//! # Testing
//!
//! `step` is synchronous and returns the next timer delay instead of sleeping, so tests can feed
//! events one by one against mock collaborators without any executor.

pub(crate) mod event;
pub(crate) mod hooks;
pub(crate) mod machine;
pub(crate) mod outbound;
pub(crate) mod queue;
pub(crate) mod registry;
pub(crate) mod runner;
pub(crate) mod state;

pub use event::SessionEvent;
pub use hooks::{NoopHooks, SessionHooks};
pub use machine::Session;
pub use outbound::{OutboundMessage, PendingOutbound};
pub use queue::{DEFAULT_QUEUE_DEPTH, EventQueue, SessionHandle};
pub use registry::{MAX_TOPIC_LEN, Topic, TopicCollector, TopicRegistry};
pub use state::SessionState;
