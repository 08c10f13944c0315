//! Status indication.
//!
//! The session reports its progress as a [`StatusIndication`] so the application can show it,
//! usually on LEDs. Indication is purely observational: nothing the indicator does feeds back
//! into the session.

use embedded_hal::digital::OutputPin;

/// What the session is currently doing, from the user's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusIndication {
    /// No network address yet.
    WaitingForNetwork,
    /// Connect request issued, waiting for the broker.
    Connecting,
    /// The broker connection is usable (reported on readiness and on every publish).
    Online,
    /// The connection was lost or refused; a reconnect is about to start.
    Error,
}

/// Shows [`StatusIndication`]s on three LEDs.
///
/// Blue covers both waiting states, green means online, red means error. Exactly one LED is lit
/// after each call.
pub struct PinStatusIndicator<B, G, R> {
    blue: B,
    green: G,
    red: R,
}

impl<B, G, R> PinStatusIndicator<B, G, R>
where
    B: OutputPin,
    G: OutputPin,
    R: OutputPin,
{
    pub fn new(blue: B, green: G, red: R) -> Self {
        Self { blue, green, red }
    }

    pub fn show(&mut self, status: StatusIndication) {
        let (blue, green, red) = match status {
            StatusIndication::WaitingForNetwork | StatusIndication::Connecting => {
                (true, false, false)
            }
            StatusIndication::Online => (false, true, false),
            StatusIndication::Error => (false, false, true),
        };
        // A failing status pin must not affect the session.
        let _ = set(&mut self.blue, blue);
        let _ = set(&mut self.green, green);
        let _ = set(&mut self.red, red);
    }

    /// Turn every LED off.
    pub fn clear(&mut self) {
        let _ = self.blue.set_low();
        let _ = self.green.set_low();
        let _ = self.red.set_low();
    }

    pub fn release(self) -> (B, G, R) {
        (self.blue, self.green, self.red)
    }
}

fn set<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), P::Error> {
    if high { pin.set_high() } else { pin.set_low() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    #[derive(Default)]
    struct FakePin {
        high: bool,
    }

    impl ErrorType for FakePin {
        type Error = Infallible;
    }

    impl OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.high = true;
            Ok(())
        }
    }

    fn lit(indicator: PinStatusIndicator<FakePin, FakePin, FakePin>) -> (bool, bool, bool) {
        let (b, g, r) = indicator.release();
        (b.high, g.high, r.high)
    }

    #[test]
    fn each_status_lights_one_led() {
        let cases = [
            (StatusIndication::WaitingForNetwork, (true, false, false)),
            (StatusIndication::Connecting, (true, false, false)),
            (StatusIndication::Online, (false, true, false)),
            (StatusIndication::Error, (false, false, true)),
        ];
        for (status, expected) in cases {
            let mut indicator =
                PinStatusIndicator::new(FakePin::default(), FakePin::default(), FakePin::default());
            indicator.show(StatusIndication::Error);
            indicator.show(status);
            assert_eq!(lit(indicator), expected, "{:?}", status);
        }
    }

    #[test]
    fn clear_turns_everything_off() {
        let mut indicator =
            PinStatusIndicator::new(FakePin::default(), FakePin::default(), FakePin::default());
        indicator.show(StatusIndication::Online);
        indicator.clear();
        assert_eq!(lit(indicator), (false, false, false));
    }
}
