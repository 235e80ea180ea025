//! UART link abstractions
//!
//! A UART link starts operations and returns immediately. Completion is
//! reported later through the [`UartEvents`] sink attached to the link,
//! usually from interrupt context.

/// Notification sink for a UART link
///
/// Implementations run in interrupt context: they must return in bounded
/// time, never block and never allocate.
pub trait UartEvents: Sync {
    /// A transmit started with [`UartLink::start_transmit`] has finished
    fn on_tx_complete(&self);

    /// One byte has been received
    ///
    /// The link re-arms single-byte reception after this returns.
    fn on_rx_byte(&self, byte: u8);

    /// The peripheral reported an error
    fn on_error(&self);
}

/// Asynchronous UART link
pub trait UartLink {
    /// Error type for link operations
    type Error;

    /// Register the notification sink
    ///
    /// Must be called once, before any other operation.
    fn attach(&mut self, events: &'static dyn UartEvents) -> Result<(), Self::Error>;

    /// Arm perpetual single-byte reception
    ///
    /// Every received byte is delivered to [`UartEvents::on_rx_byte`] and
    /// reception is re-armed by the link itself. A byte arriving before the
    /// re-arm completes may be lost.
    fn start_receive(&mut self) -> Result<(), Self::Error>;

    /// Start transmitting `data` without waiting for it to go out
    fn start_transmit(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Cancel an in-flight transmit
    fn abort_transmit(&mut self);
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
