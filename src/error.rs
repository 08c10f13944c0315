//! # Error Types
//!
//! The session distinguishes between the few conditions that make it impossible to start
//! (a device without a usable identity, or a registry that cannot hold its topics) and the
//! transient conditions the state machine absorbs on its own.
//!
//! Only [`SessionError`] is ever returned to the application. Everything else is reported by the
//! transport to the state machine, which retries or reconnects without surfacing the failure.

/// Fatal errors raised while building a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionError {
    /// The hardware identifier needed to derive a client identity is missing.
    IdentityUnavailable,
    /// The derived client identity does not fit into `CLIENT_ID_SIZE` bytes.
    IdentityTooLong,
    /// The topic registry is already holding its maximum number of topics.
    TooManyTopics,
    /// A topic string exceeds `MAX_TOPIC_LEN` bytes.
    TopicTooLong,
    /// The broker host name does not fit into the configuration buffer.
    BrokerHostTooLong,
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::IdentityUnavailable => f.write_str("hardware identity unavailable"),
            Self::IdentityTooLong => f.write_str("client identity too long"),
            Self::TooManyTopics => f.write_str("topic registry is full"),
            Self::TopicTooLong => f.write_str("topic too long"),
            Self::BrokerHostTooLong => f.write_str("broker host too long"),
        }
    }
}

/// Why the transport refused to queue a subscribe, unsubscribe or publish.
///
/// Both variants are transient: the session keeps the pending item and tries again on a later
/// tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutboundError {
    /// The transport's outbound command queue has no free slot.
    QueueFull,
    /// The transport is not in a state where it accepts outbound traffic.
    NotConnected,
}

impl core::fmt::Display for OutboundError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::QueueFull => f.write_str("outbound queue full"),
            Self::NotConnected => f.write_str("not connected"),
        }
    }
}

/// A connect request the transport rejected before reaching the broker.
///
/// The session handles it exactly like a broker refusal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectError {
    /// The broker address could not be used.
    InvalidAddress,
    /// No socket or connection slot is available.
    NoResources,
    /// The transport is already connecting or connected.
    Busy,
}

impl core::fmt::Display for ConnectError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidAddress => f.write_str("invalid broker address"),
            Self::NoResources => f.write_str("no connection slot available"),
            Self::Busy => f.write_str("transport busy"),
        }
    }
}

/// Represents the reason codes for a connection refusal (`CONNACK`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectReasonCode {
    /// The connection was accepted.
    Success,
    /// The broker does not support the requested MQTT protocol version.
    UnacceptableProtocolVersion,
    /// The client identifier is not valid.
    IdentifierRejected,
    /// The broker is unavailable.
    ServerUnavailable,
    /// The username or password is not valid.
    BadUserNameOrPassword,
    /// The client is not authorized to connect.
    NotAuthorized,
    /// An unknown or unspecified error occurred.
    Other(u8),
}

impl From<u8> for ConnectReasonCode {
    fn from(val: u8) -> Self {
        match val {
            0 => Self::Success,
            1 => Self::UnacceptableProtocolVersion,
            2 => Self::IdentifierRejected,
            3 => Self::ServerUnavailable,
            4 => Self::BadUserNameOrPassword,
            5 => Self::NotAuthorized,
            _ => Self::Other(val),
        }
    }
}

impl core::fmt::Display for ConnectReasonCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::UnacceptableProtocolVersion => f.write_str("unacceptable protocol version"),
            Self::IdentifierRejected => f.write_str("identifier rejected"),
            Self::ServerUnavailable => f.write_str("server unavailable"),
            Self::BadUserNameOrPassword => f.write_str("bad user name or password"),
            Self::NotAuthorized => f.write_str("not authorized"),
            Self::Other(code) => write!(f, "reason code {:#04x}", code),
        }
    }
}

/// Why an established (or half-established) connection went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisconnectReason {
    /// The application or the session asked for the disconnect.
    Requested,
    /// The underlying network connection was lost or could not be opened.
    NetworkError,
    /// No traffic was seen from the broker within the keep-alive window.
    KeepAliveTimeout,
    /// The broker closed the connection.
    ClosedByBroker,
    /// A reason code the session does not know about.
    Other(u8),
}

impl From<u8> for DisconnectReason {
    fn from(val: u8) -> Self {
        match val {
            0 => Self::Requested,
            1 => Self::NetworkError,
            2 => Self::KeepAliveTimeout,
            3 => Self::ClosedByBroker,
            _ => Self::Other(val),
        }
    }
}

impl core::fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Requested => f.write_str("disconnect requested"),
            Self::NetworkError => f.write_str("network error"),
            Self::KeepAliveTimeout => f.write_str("keep-alive timeout"),
            Self::ClosedByBroker => f.write_str("closed by broker"),
            Self::Other(code) => write!(f, "reason {}", code),
        }
    }
}
