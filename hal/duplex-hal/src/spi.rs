//! SPI link abstractions
//!
//! The retranslator is the SPI master. Every exchange is full duplex: the
//! same number of bytes is clocked out and in.

/// Notification sink for an SPI link
///
/// Implementations run in interrupt context: they must return in bounded
/// time, never block and never allocate.
pub trait SpiEvents: Sync {
    /// A transfer started with [`SpiLink::start_transfer`] has finished
    fn on_transfer_complete(&self);

    /// The peripheral reported an error
    fn on_error(&self);
}

/// Asynchronous full-duplex SPI master link
///
/// The receive buffer belongs to the link while DMA is running. Received
/// bytes are collected with [`SpiLink::take_received`] once the transfer
/// has ended.
pub trait SpiLink {
    /// Error type for link operations
    type Error;

    /// Register the notification sink
    ///
    /// Must be called once, before any other operation.
    fn attach(&mut self, events: &'static dyn SpiEvents) -> Result<(), Self::Error>;

    /// Start exchanging `tx.len()` bytes without waiting for completion
    fn start_transfer(&mut self, tx: &[u8]) -> Result<(), Self::Error>;

    /// Move the bytes of the oldest finished transfer into `rx`
    ///
    /// Returns the number of bytes written, 0 when no finished transfer is
    /// pending (for instance after [`SpiLink::abort`]).
    fn take_received(&mut self, rx: &mut [u8]) -> usize;

    /// Cancel an in-flight transfer
    fn abort(&mut self);
}

/// SPI configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Clock polarity and phase
    pub mode: Mode,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 1_000_000, // 1 MHz
            mode: Mode::Mode0,
        }
    }
}

/// SPI mode (clock polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}
