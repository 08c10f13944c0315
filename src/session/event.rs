use crate::transport::TransportEvent;

/// Everything that can wake the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session's own timer expired.
    Timer,
    /// A notification from the MQTT library.
    Transport(TransportEvent),
    /// The application asked for an immediate publish (e.g. a button press).
    PublishRequested,
}

impl From<TransportEvent> for SessionEvent {
    fn from(event: TransportEvent) -> Self {
        Self::Transport(event)
    }
}
