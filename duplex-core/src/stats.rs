//! Traffic and fault counters
//!
//! Updated from both worker tasks and interrupt context. Counters wrap on
//! overflow and are only ever read as a whole through
//! [`LinkStats::snapshot`].

use portable_atomic::{AtomicU32, Ordering};

/// Live counters shared by the bridge and its workers
#[derive(Debug, Default)]
pub struct LinkStats {
    uart_rx_bytes: AtomicU32,
    uart_rx_dropped: AtomicU32,
    uart_tx_chunks: AtomicU32,
    uart_tx_start_failures: AtomicU32,
    uart_tx_timeouts: AtomicU32,
    spi_transfers: AtomicU32,
    spi_idle_transfers: AtomicU32,
    spi_start_failures: AtomicU32,
    spi_timeouts: AtomicU32,
    spi_forwarded_bytes: AtomicU32,
    spi_forward_dropped: AtomicU32,
    peripheral_errors: AtomicU32,
}

/// Point-in-time copy of [`LinkStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatsSnapshot {
    /// Bytes received on UART
    pub uart_rx_bytes: u32,
    /// Received UART bytes lost because the UART→SPI channel was full
    pub uart_rx_dropped: u32,
    /// Chunks handed to the UART for transmission
    pub uart_tx_chunks: u32,
    /// Chunks dropped because the UART refused to start
    pub uart_tx_start_failures: u32,
    /// UART transmits aborted after the completion timeout
    pub uart_tx_timeouts: u32,
    /// SPI exchanges started
    pub spi_transfers: u32,
    /// SPI exchanges that carried only idle filler
    pub spi_idle_transfers: u32,
    /// SPI exchanges the peripheral refused to start
    pub spi_start_failures: u32,
    /// SPI exchanges aborted after the completion timeout
    pub spi_timeouts: u32,
    /// Message bytes forwarded from SPI towards UART
    pub spi_forwarded_bytes: u32,
    /// Message bytes lost because the SPI→UART channel was full
    pub spi_forward_dropped: u32,
    /// Error notifications from either peripheral
    pub peripheral_errors: u32,
}

fn bump(counter: &AtomicU32, by: usize) {
    if by > 0 {
        counter.fetch_add(by as u32, Ordering::Relaxed);
    }
}

impl LinkStats {
    /// Create zeroed counters
    pub const fn new() -> Self {
        Self {
            uart_rx_bytes: AtomicU32::new(0),
            uart_rx_dropped: AtomicU32::new(0),
            uart_tx_chunks: AtomicU32::new(0),
            uart_tx_start_failures: AtomicU32::new(0),
            uart_tx_timeouts: AtomicU32::new(0),
            spi_transfers: AtomicU32::new(0),
            spi_idle_transfers: AtomicU32::new(0),
            spi_start_failures: AtomicU32::new(0),
            spi_timeouts: AtomicU32::new(0),
            spi_forwarded_bytes: AtomicU32::new(0),
            spi_forward_dropped: AtomicU32::new(0),
            peripheral_errors: AtomicU32::new(0),
        }
    }

    pub(crate) fn record_uart_rx(&self, stored: bool) {
        bump(&self.uart_rx_bytes, 1);
        if !stored {
            bump(&self.uart_rx_dropped, 1);
        }
    }

    pub(crate) fn record_uart_tx(&self) {
        bump(&self.uart_tx_chunks, 1);
    }

    pub(crate) fn record_uart_start_failure(&self) {
        bump(&self.uart_tx_start_failures, 1);
    }

    pub(crate) fn record_uart_timeout(&self) {
        bump(&self.uart_tx_timeouts, 1);
    }

    pub(crate) fn record_spi_transfer(&self, idle: bool) {
        bump(&self.spi_transfers, 1);
        if idle {
            bump(&self.spi_idle_transfers, 1);
        }
    }

    pub(crate) fn record_spi_start_failure(&self) {
        bump(&self.spi_start_failures, 1);
    }

    pub(crate) fn record_spi_timeout(&self) {
        bump(&self.spi_timeouts, 1);
    }

    pub(crate) fn record_spi_forward(&self, committed: usize, dropped: usize) {
        bump(&self.spi_forwarded_bytes, committed);
        bump(&self.spi_forward_dropped, dropped);
    }

    pub(crate) fn record_peripheral_error(&self) {
        bump(&self.peripheral_errors, 1);
    }

    /// Copy all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uart_rx_bytes: self.uart_rx_bytes.load(Ordering::Relaxed),
            uart_rx_dropped: self.uart_rx_dropped.load(Ordering::Relaxed),
            uart_tx_chunks: self.uart_tx_chunks.load(Ordering::Relaxed),
            uart_tx_start_failures: self.uart_tx_start_failures.load(Ordering::Relaxed),
            uart_tx_timeouts: self.uart_tx_timeouts.load(Ordering::Relaxed),
            spi_transfers: self.spi_transfers.load(Ordering::Relaxed),
            spi_idle_transfers: self.spi_idle_transfers.load(Ordering::Relaxed),
            spi_start_failures: self.spi_start_failures.load(Ordering::Relaxed),
            spi_timeouts: self.spi_timeouts.load(Ordering::Relaxed),
            spi_forwarded_bytes: self.spi_forwarded_bytes.load(Ordering::Relaxed),
            spi_forward_dropped: self.spi_forward_dropped.load(Ordering::Relaxed),
            peripheral_errors: self.peripheral_errors.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_records() {
        let stats = LinkStats::new();
        stats.record_uart_rx(true);
        stats.record_uart_rx(false);
        stats.record_spi_transfer(true);
        stats.record_spi_transfer(false);
        stats.record_spi_forward(5, 2);

        let snap = stats.snapshot();
        assert_eq!(snap.uart_rx_bytes, 2);
        assert_eq!(snap.uart_rx_dropped, 1);
        assert_eq!(snap.spi_transfers, 2);
        assert_eq!(snap.spi_idle_transfers, 1);
        assert_eq!(snap.spi_forwarded_bytes, 5);
        assert_eq!(snap.spi_forward_dropped, 2);
        assert_eq!(snap.peripheral_errors, 0);
    }
}
