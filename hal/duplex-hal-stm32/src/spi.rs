//! SPI master link over embassy-stm32 DMA
//!
//! One exchange may be queued while another is on the wire. Finished
//! exchanges wait in a short result queue until the worker collects them
//! with [`SpiLink::take_received`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::once_lock::OnceLock;
use embassy_sync::signal::Signal;

use duplex_hal::{SpiEvents, SpiLink};

use crate::error::LinkError;
use crate::Chunk;

/// Finished exchanges kept for the worker
const RESULT_QUEUE_DEPTH: usize = 2;

/// State shared by a [`Stm32Spi`] handle and its driver loop
pub struct SpiPort {
    events: OnceLock<&'static dyn SpiEvents>,
    request: Channel<CriticalSectionRawMutex, Chunk, 1>,
    finished: Channel<CriticalSectionRawMutex, Chunk, RESULT_QUEUE_DEPTH>,
    abort: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for SpiPort {
    fn default() -> Self {
        Self::new()
    }
}

impl SpiPort {
    /// Create an idle port, suitable for a `static`
    pub const fn new() -> Self {
        Self {
            events: OnceLock::new(),
            request: Channel::new(),
            finished: Channel::new(),
            abort: Signal::new(),
        }
    }

    /// Wait until a notification sink is attached
    pub async fn events(&self) -> &'static dyn SpiEvents {
        *self.events.get().await
    }

    /// Wait for the next outgoing chunk
    ///
    /// Clears any abort left over from an earlier exchange.
    pub async fn next_transfer(&self) -> Chunk {
        let chunk = self.request.receive().await;
        self.abort.reset();
        chunk
    }

    /// Completes when the current exchange must be dropped
    pub async fn abort_requested(&self) {
        self.abort.wait().await
    }

    /// Store the bytes clocked in by a finished exchange
    ///
    /// Fails, dropping `rx`, when the worker has fallen behind by more than
    /// the result queue holds.
    pub fn finish(&self, rx: &[u8]) -> Result<(), LinkError> {
        let chunk = Chunk::from_slice(rx).map_err(|_| LinkError::TooLong)?;
        self.finished.try_send(chunk).map_err(|_| LinkError::Busy)
    }
}

/// SPI link handle
pub struct Stm32Spi {
    port: &'static SpiPort,
}

impl Stm32Spi {
    /// Create a handle on `port`
    ///
    /// The port's driver loop must be running for exchanges to complete.
    pub fn new(port: &'static SpiPort) -> Self {
        Self { port }
    }
}

impl SpiLink for Stm32Spi {
    type Error = LinkError;

    fn attach(&mut self, events: &'static dyn SpiEvents) -> Result<(), LinkError> {
        self.port
            .events
            .init(events)
            .map_err(|_| LinkError::AlreadyAttached)
    }

    fn start_transfer(&mut self, tx: &[u8]) -> Result<(), LinkError> {
        let chunk = Chunk::from_slice(tx).map_err(|_| LinkError::TooLong)?;
        self.port
            .request
            .try_send(chunk)
            .map_err(|_| LinkError::Busy)
    }

    fn take_received(&mut self, rx: &mut [u8]) -> usize {
        match self.port.finished.try_receive() {
            Ok(chunk) => {
                let n = chunk.len().min(rx.len());
                rx[..n].copy_from_slice(&chunk[..n]);
                n
            }
            Err(_) => 0,
        }
    }

    fn abort(&mut self) {
        self.port.request.clear();
        self.port.abort.signal(());
    }
}
