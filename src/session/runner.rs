//! The session task.

use embassy_futures::select::{Either, select};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Instant, Timer};

use super::event::SessionEvent;
use super::hooks::SessionHooks;
use super::machine::Session;
use super::queue::EventQueue;
use crate::transport::{BrokerTransport, NetworkOracle};

impl<'s, T, N, H, const MAX_TOPICS: usize> Session<'s, T, N, H, MAX_TOPICS>
where
    T: BrokerTransport<'s>,
    N: NetworkOracle,
    H: SessionHooks,
{
    /// Drive the session for the lifetime of the device.
    ///
    /// `queue` must be the sink the session was created with, so that transport notifications
    /// come back to this loop. The first tick fires immediately; after that the loop sleeps until
    /// either the timer the last step asked for expires or an event is queued, whichever comes
    /// first, and runs exactly one step for it.
    ///
    /// ```ignore
    /// static EVENTS: EventQueue<CriticalSectionRawMutex> = EventQueue::new();
    ///
    /// #[embassy_executor::task]
    /// async fn mqtt_task(mut session: Session<'static, MyTransport, Stack<'static>, Bulb, 2>) {
    ///     session.run(&EVENTS).await
    /// }
    /// ```
    pub async fn run<M: RawMutex, const DEPTH: usize>(
        &mut self,
        queue: &EventQueue<M, DEPTH>,
    ) -> ! {
        info!("Session task started");
        let mut deadline = Instant::now();

        loop {
            let event = match select(queue.receive(), Timer::at(deadline)).await {
                Either::First(event) => event,
                Either::Second(()) => SessionEvent::Timer,
            };

            if let Some(delay) = self.step(event) {
                deadline = Instant::now() + delay;
            }
        }
    }
}
