//! Client identity derivation.
//!
//! Every node needs a client identifier that no other node on the same broker uses. The
//! identifier is derived once, at startup, from a stable hardware identifier such as the
//! link-layer address, and never changes afterwards.

use core::fmt::Write;

use heapless::String;

use crate::error::SessionError;

/// Maximum length of a client identity, in bytes.
pub const CLIENT_ID_SIZE: usize = 32;

/// Maximum length of a hardware identifier, in bytes.
pub const MAX_HARDWARE_ID_LEN: usize = 8;

/// Prefix used by [`ClientIdentity::from_hardware`] when none is configured.
pub const DEFAULT_IDENTITY_PREFIX: &str = "contiki-";

/// Source of the stable hardware identifier a node is known by.
///
/// Returning `None` means the identifier is not available yet (or at all). This is the only
/// condition that prevents a session from ever starting.
pub trait HardwareIdentity {
    /// The raw identifier bytes, e.g. the 8-byte IEEE 802.15.4 extended address.
    fn hardware_id(&self) -> Option<&[u8]>;
}

impl<const N: usize> HardwareIdentity for [u8; N] {
    fn hardware_id(&self) -> Option<&[u8]> {
        if N == 0 { None } else { Some(self.as_slice()) }
    }
}

impl HardwareIdentity for &[u8] {
    fn hardware_id(&self) -> Option<&[u8]> {
        if self.is_empty() { None } else { Some(*self) }
    }
}

impl<T: HardwareIdentity> HardwareIdentity for Option<T> {
    fn hardware_id(&self) -> Option<&[u8]> {
        self.as_ref().and_then(HardwareIdentity::hardware_id)
    }
}

/// The identifier the transport registers the session under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    id: String<CLIENT_ID_SIZE>,
}

impl ClientIdentity {
    /// Use a fixed identity, e.g. one provisioned in flash.
    pub fn new(id: &str) -> Result<Self, SessionError> {
        if id.is_empty() {
            return Err(SessionError::IdentityUnavailable);
        }
        let id = String::try_from(id).map_err(|_| SessionError::IdentityTooLong)?;
        Ok(Self { id })
    }

    /// Derive `<prefix><lowercase hex of the hardware id>`.
    ///
    /// ```
    /// # use myrtio_mqtt_session::identity::ClientIdentity;
    /// let mac: [u8; 8] = [0x00, 0x12, 0x4b, 0x00, 0x06, 0x0d, 0xb2, 0x1f];
    /// let id = ClientIdentity::from_hardware("contiki-", &mac).unwrap();
    /// assert_eq!(id.as_str(), "contiki-00124b00060db21f");
    /// ```
    pub fn from_hardware<H>(prefix: &str, hardware: &H) -> Result<Self, SessionError>
    where
        H: HardwareIdentity + ?Sized,
    {
        let raw = hardware
            .hardware_id()
            .ok_or(SessionError::IdentityUnavailable)?;

        let mut id = String::new();
        id.push_str(prefix)
            .map_err(|_| SessionError::IdentityTooLong)?;
        write_hex(&mut id, raw).map_err(|_| SessionError::IdentityTooLong)?;

        Ok(Self { id })
    }

    pub fn as_str(&self) -> &str {
        self.id.as_str()
    }
}

impl core::fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase hex rendering of a hardware identifier, used inside device topics.
pub(crate) fn hardware_hex<H>(hardware: &H) -> Result<String<{ MAX_HARDWARE_ID_LEN * 2 }>, SessionError>
where
    H: HardwareIdentity + ?Sized,
{
    let raw = hardware
        .hardware_id()
        .ok_or(SessionError::IdentityUnavailable)?;
    if raw.len() > MAX_HARDWARE_ID_LEN {
        return Err(SessionError::IdentityTooLong);
    }

    let mut hex = String::new();
    write_hex(&mut hex, raw).map_err(|_| SessionError::IdentityTooLong)?;
    Ok(hex)
}

fn write_hex<const N: usize>(out: &mut String<N>, raw: &[u8]) -> core::fmt::Result {
    for byte in raw {
        write!(out, "{:02x}", byte)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAC: [u8; 8] = [0x00, 0x12, 0x4b, 0x00, 0x06, 0x0d, 0xb2, 0x1f];

    #[test]
    fn derives_prefixed_hex_identity() {
        let id = ClientIdentity::from_hardware(DEFAULT_IDENTITY_PREFIX, &MAC).unwrap();
        assert_eq!(id.as_str(), "contiki-00124b00060db21f");
    }

    #[test]
    fn derivation_is_deterministic() {
        let a = ClientIdentity::from_hardware("node-", &MAC).unwrap();
        let b = ClientIdentity::from_hardware("node-", &MAC).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_hardware_id_is_fatal() {
        let none: Option<[u8; 8]> = None;
        assert_eq!(
            ClientIdentity::from_hardware("node-", &none),
            Err(SessionError::IdentityUnavailable)
        );
        let empty: &[u8] = &[];
        assert_eq!(
            ClientIdentity::from_hardware("node-", &empty),
            Err(SessionError::IdentityUnavailable)
        );
    }

    #[test]
    fn overlong_identity_is_rejected() {
        let prefix = "a-very-long-prefix-for-a-node-";
        assert_eq!(
            ClientIdentity::from_hardware(prefix, &MAC),
            Err(SessionError::IdentityTooLong)
        );
    }

    #[test]
    fn fixed_identity() {
        let id = ClientIdentity::new("node-01").unwrap();
        assert_eq!(id.as_str(), "node-01");
        assert_eq!(ClientIdentity::new(""), Err(SessionError::IdentityUnavailable));
    }

    #[test]
    fn hardware_hex_is_sixteen_chars_for_extended_address() {
        assert_eq!(hardware_hex(&MAC).unwrap().as_str(), "00124b00060db21f");
    }
}
