//! UART worker: SPI→UART direction
//!
//! ```text
//! ArmReceive ──▶ Idle ──(chunk started)──▶ AwaitingTxCompletion
//!                 ▲                                │
//!                 └──(complete / error / timeout)──┘
//! ```
//!
//! Reception is armed once; from then on the link delivers bytes straight
//! into the bridge from interrupt context and the worker only transmits.

use embassy_futures::select::{select, Either};
use embassy_futures::yield_now;

use duplex_hal::UartLink;
use duplex_protocol::CHUNK_SIZE;

use crate::bridge::{Bridge, COMPLETION_TIMEOUT};
use crate::channel::Wait;

/// UART worker states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartState {
    /// Reception not yet armed
    ArmReceive,
    /// Waiting for bytes from the SPI side
    Idle,
    /// A chunk is on the wire
    AwaitingTxCompletion,
}

/// Result of one worker iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartOutcome {
    /// Perpetual single-byte reception is running
    ReceiveArmed,
    /// The link refused to arm reception; nothing will be received
    ReceiveArmFailed,
    /// A chunk was transmitted (or ended in a peripheral error)
    Sent { len: usize },
    /// The link refused to start; the chunk was dropped
    StartFailed { dropped: usize },
    /// No completion within the timeout; the transmit was aborted
    TimedOut { len: usize },
    /// Woke up with nothing to send
    Empty,
}

/// Drives the UART link from the SPI→UART channel
pub struct UartWorker<'a, U: UartLink> {
    bridge: &'a Bridge,
    link: U,
    state: UartState,
    chunk: [u8; CHUNK_SIZE],
}

impl<'a, U: UartLink> UartWorker<'a, U> {
    pub(crate) fn new(bridge: &'a Bridge, link: U) -> Self {
        Self {
            bridge,
            link,
            state: UartState::ArmReceive,
            chunk: [0; CHUNK_SIZE],
        }
    }

    /// Current state
    pub fn state(&self) -> UartState {
        self.state
    }

    /// The driven link
    pub fn link(&self) -> &U {
        &self.link
    }

    /// Run one iteration
    ///
    /// The first call arms reception. Every later call waits, without a
    /// timeout, for bytes from the SPI side, transmits up to one chunk and
    /// waits up to [`COMPLETION_TIMEOUT`] for it to finish.
    pub async fn step(&mut self) -> UartOutcome {
        if self.state == UartState::ArmReceive {
            self.state = UartState::Idle;
            return match self.link.start_receive() {
                Ok(()) => UartOutcome::ReceiveArmed,
                Err(_) => UartOutcome::ReceiveArmFailed,
            };
        }

        let len = self
            .bridge
            .spi_to_uart
            .consume(&mut self.chunk, Wait::Forever)
            .await;
        if len == 0 {
            return UartOutcome::Empty;
        }

        if self.link.start_transmit(&self.chunk[..len]).is_err() {
            self.bridge.stats.record_uart_start_failure();
            return UartOutcome::StartFailed { dropped: len };
        }
        self.bridge.stats.record_uart_tx();
        self.state = UartState::AwaitingTxCompletion;

        let outcome = match self.bridge.uart_tx_done.acquire(COMPLETION_TIMEOUT).await {
            Ok(()) => UartOutcome::Sent { len },
            Err(_) => {
                // Leave the peripheral idle before the next transmit
                self.link.abort_transmit();
                self.bridge.stats.record_uart_timeout();
                UartOutcome::TimedOut { len }
            }
        };
        self.state = UartState::Idle;
        outcome
    }

    /// Run until [`Bridge::shutdown`], reporting every iteration to `observe`
    ///
    /// Yields to the executor between iterations so the link driver can
    /// take a queued chunk before the next one is started. Returns the
    /// link. A transmit still in flight at shutdown is aborted.
    pub async fn run<F: FnMut(UartOutcome)>(mut self, mut observe: F) -> U {
        let bridge = self.bridge;
        loop {
            match select(bridge.uart_stop.wait(), self.step()).await {
                Either::First(()) => break,
                Either::Second(outcome) => observe(outcome),
            }
            yield_now().await;
        }

        if self.state == UartState::AwaitingTxCompletion {
            self.link.abort_transmit();
            self.state = UartState::Idle;
        }
        self.link
    }
}
