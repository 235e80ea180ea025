//! UART link over embassy-stm32 DMA
//!
//! The firmware runs two driver loops against a [`UartPort`]:
//!
//! ```ignore
//! let events = port.events().await;
//! loop {
//!     let chunk = port.next_transmit().await;
//!     match select(tx.write(&chunk), port.abort_requested()).await { ... }
//! }
//! ```
//!
//! and a receive loop that waits for [`UartPort::armed`] and then reads one
//! byte at a time forever.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::once_lock::OnceLock;
use embassy_sync::signal::Signal;

use duplex_hal::{UartEvents, UartLink};

use crate::error::LinkError;
use crate::Chunk;

/// State shared by a [`Stm32Uart`] handle and its driver loops
pub struct UartPort {
    events: OnceLock<&'static dyn UartEvents>,
    tx_request: Channel<CriticalSectionRawMutex, Chunk, 1>,
    tx_abort: Signal<CriticalSectionRawMutex, ()>,
    rx_arm: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for UartPort {
    fn default() -> Self {
        Self::new()
    }
}

impl UartPort {
    /// Create an idle port, suitable for a `static`
    pub const fn new() -> Self {
        Self {
            events: OnceLock::new(),
            tx_request: Channel::new(),
            tx_abort: Signal::new(),
            rx_arm: Signal::new(),
        }
    }

    /// Wait until a notification sink is attached
    pub async fn events(&self) -> &'static dyn UartEvents {
        *self.events.get().await
    }

    /// Wait for the next chunk to transmit
    ///
    /// Clears any abort left over from an earlier transmit.
    pub async fn next_transmit(&self) -> Chunk {
        let chunk = self.tx_request.receive().await;
        self.tx_abort.reset();
        chunk
    }

    /// Completes when the current transmit must be dropped
    pub async fn abort_requested(&self) {
        self.tx_abort.wait().await
    }

    /// Wait until reception has been armed
    pub async fn armed(&self) {
        self.rx_arm.wait().await
    }
}

/// UART link handle
pub struct Stm32Uart {
    port: &'static UartPort,
}

impl Stm32Uart {
    /// Create a handle on `port`
    ///
    /// The port's driver loops must be running for operations to complete.
    pub fn new(port: &'static UartPort) -> Self {
        Self { port }
    }
}

impl UartLink for Stm32Uart {
    type Error = LinkError;

    fn attach(&mut self, events: &'static dyn UartEvents) -> Result<(), LinkError> {
        self.port
            .events
            .init(events)
            .map_err(|_| LinkError::AlreadyAttached)
    }

    fn start_receive(&mut self) -> Result<(), LinkError> {
        self.port.rx_arm.signal(());
        Ok(())
    }

    fn start_transmit(&mut self, data: &[u8]) -> Result<(), LinkError> {
        let chunk = Chunk::from_slice(data).map_err(|_| LinkError::TooLong)?;
        self.port
            .tx_request
            .try_send(chunk)
            .map_err(|_| LinkError::Busy)
    }

    fn abort_transmit(&mut self) {
        self.port.tx_request.clear();
        self.port.tx_abort.signal(());
    }
}
