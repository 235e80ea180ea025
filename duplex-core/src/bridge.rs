//! Bridge context
//!
//! Owns the two channels, the two completion signals and the counters, and
//! is the notification sink of both links. Constructed once by the
//! application, usually in a `StaticCell`, and shared by reference with
//! the two workers and the link drivers.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Duration;

use duplex_hal::{SpiEvents, SpiLink, UartEvents, UartLink};

use crate::channel::{ByteChannel, CHANNEL_CAPACITY};
use crate::signal::CompletionSignal;
use crate::spi::SpiWorker;
use crate::stats::LinkStats;
use crate::uart::UartWorker;

/// How long a worker waits for a started operation to finish before aborting it
pub const COMPLETION_TIMEOUT: Duration = Duration::from_millis(100);

/// Failure to bring the bridge up
///
/// Always fatal: the bridge cannot run half-attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartError<UE, SE> {
    /// The UART link rejected the notification sink
    Uart(UE),
    /// The SPI link rejected the notification sink
    Spi(SE),
}

/// Shared state of one UART/SPI retranslator
pub struct Bridge {
    /// Fed by UART reception, drained by the SPI worker
    pub(crate) uart_to_spi: ByteChannel<CHANNEL_CAPACITY>,
    /// Fed by the SPI worker, drained by the UART worker
    pub(crate) spi_to_uart: ByteChannel<CHANNEL_CAPACITY>,
    pub(crate) uart_tx_done: CompletionSignal,
    pub(crate) spi_done: CompletionSignal,
    pub(crate) uart_stop: Signal<CriticalSectionRawMutex, ()>,
    pub(crate) spi_stop: Signal<CriticalSectionRawMutex, ()>,
    pub(crate) stats: LinkStats,
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new()
    }
}

impl Bridge {
    /// Create a bridge with empty channels and available completion signals
    pub fn new() -> Self {
        Self {
            uart_to_spi: ByteChannel::new(),
            spi_to_uart: ByteChannel::new(),
            uart_tx_done: CompletionSignal::new(),
            spi_done: CompletionSignal::new(),
            uart_stop: Signal::new(),
            spi_stop: Signal::new(),
            stats: LinkStats::new(),
        }
    }

    /// Attach the bridge to both links and hand out the two workers
    ///
    /// Both links must already be electrically configured. The caller runs
    /// each worker in its own task.
    pub fn start<U: UartLink, S: SpiLink>(
        &'static self,
        mut uart: U,
        mut spi: S,
    ) -> Result<(UartWorker<'static, U>, SpiWorker<'static, S>), StartError<U::Error, S::Error>>
    {
        uart.attach(self).map_err(StartError::Uart)?;
        spi.attach(self).map_err(StartError::Spi)?;

        Ok((UartWorker::new(self, uart), SpiWorker::new(self, spi)))
    }

    /// Ask both workers to stop
    ///
    /// Each worker's `run` returns its link once the current iteration has
    /// been cancelled and any in-flight operation aborted.
    pub fn shutdown(&self) {
        self.uart_stop.signal(());
        self.spi_stop.signal(());
    }

    /// Bytes received on UART, waiting to go out on SPI
    pub fn uart_to_spi(&self) -> &ByteChannel<CHANNEL_CAPACITY> {
        &self.uart_to_spi
    }

    /// Message bytes received on SPI, waiting to go out on UART
    pub fn spi_to_uart(&self) -> &ByteChannel<CHANNEL_CAPACITY> {
        &self.spi_to_uart
    }

    /// Traffic and fault counters
    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }
}

impl UartEvents for Bridge {
    fn on_tx_complete(&self) {
        self.uart_tx_done.release();
    }

    fn on_rx_byte(&self, byte: u8) {
        let stored = self.uart_to_spi.produce(&[byte]) == 1;
        self.stats.record_uart_rx(stored);
    }

    fn on_error(&self) {
        // Errors end the transfer just like a completion does
        self.stats.record_peripheral_error();
        self.uart_tx_done.release();
    }
}

impl SpiEvents for Bridge {
    fn on_transfer_complete(&self) {
        self.spi_done.release();
    }

    fn on_error(&self) {
        self.stats.record_peripheral_error();
        self.spi_done.release();
    }
}
