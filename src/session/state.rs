/// The lifecycle state of a session. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// Register with the transport and reset subscription progress.
    #[default]
    Init,
    /// Poll the network until the node holds a usable address.
    AwaitingNetwork,
    /// The connect request is out; waiting for the broker's answer.
    AwaitingBrokerAck,
    /// The broker accepted the connection; waiting for the transport to be ready to send.
    Connected,
    /// Subscribing to the registered topics, one per tick.
    Subscribing,
    /// All topics are subscribed; messages arrive as transport events.
    Subscribed,
    /// Publishing at the steady-state cadence.
    Publishing,
    /// The connection is gone; the next tick starts over from `Init`.
    Disconnected,
}

impl SessionState {
    /// Whether the transport may be asked to subscribe or publish in this state.
    pub fn is_online(&self) -> bool {
        matches!(
            self,
            Self::Connected | Self::Subscribing | Self::Subscribed | Self::Publishing
        )
    }

    /// Whether inbound messages are handed to the application in this state.
    pub fn delivers_messages(&self) -> bool {
        matches!(self, Self::Subscribed | Self::Publishing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connected_states_are_online() {
        assert!(!SessionState::Init.is_online());
        assert!(!SessionState::AwaitingNetwork.is_online());
        assert!(!SessionState::AwaitingBrokerAck.is_online());
        assert!(!SessionState::Disconnected.is_online());
        assert!(SessionState::Connected.is_online());
        assert!(SessionState::Subscribing.is_online());
        assert!(SessionState::Subscribed.is_online());
        assert!(SessionState::Publishing.is_online());
    }

    #[test]
    fn messages_are_delivered_once_steady() {
        assert!(SessionState::Subscribed.delivers_messages());
        assert!(SessionState::Publishing.delivers_messages());
        assert!(!SessionState::Subscribing.delivers_messages());
    }
}
