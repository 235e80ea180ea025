//! Link error types

use embassy_stm32::spi::Error as SpiError;
use embassy_stm32::usart::Error as UsartError;

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too small
    BufferTooSmall,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            UsartError::BufferTooLong => UartBusError::BufferTooSmall,
            _ => UartBusError::Other,
        }
    }
}

/// Error from SPI operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiBusError {
    /// Framing error (TI mode)
    Framing,
    /// CRC mismatch
    Crc,
    /// Mode fault
    ModeFault,
    /// Overrun error
    Overrun,
    /// Other error
    Other,
}

impl From<SpiError> for SpiBusError {
    fn from(e: SpiError) -> Self {
        match e {
            SpiError::Framing => SpiBusError::Framing,
            SpiError::Crc => SpiBusError::Crc,
            SpiError::ModeFault => SpiBusError::ModeFault,
            SpiError::Overrun => SpiBusError::Overrun,
            #[allow(unreachable_patterns)]
            _ => SpiBusError::Other,
        }
    }
}

/// Error returned when starting a link operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// A request is already queued for the driver
    Busy,
    /// More than one chunk was handed over at once
    TooLong,
    /// The link already has a notification sink
    AlreadyAttached,
}
