//! SPI worker: UART→SPI direction and message recovery
//!
//! The worker polls the SPI link continuously. Each iteration sends
//! whatever the UART side has queued, or a full chunk of idle filler when
//! nothing is queued, and runs the bytes clocked in through the
//! [`MessageFramer`] into the SPI→UART channel.

use embassy_futures::select::{select, Either};
use embassy_futures::yield_now;

use duplex_hal::SpiLink;
use duplex_protocol::{fill_idle, MessageFramer, CHUNK_SIZE};

use crate::bridge::{Bridge, COMPLETION_TIMEOUT};
use crate::channel::Wait;

/// Summary of one SPI exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Exchange {
    /// Bytes clocked out
    pub sent: usize,
    /// The exchange carried only idle filler
    pub idle: bool,
    /// Bytes collected from the link
    pub received: usize,
    /// Message bytes stored in the SPI→UART channel
    pub forwarded: usize,
    /// Message bytes lost because the SPI→UART channel was full
    pub overflow: usize,
    /// No completion within the timeout; the exchange was aborted
    pub timed_out: bool,
}

/// Result of one worker iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiOutcome {
    /// An exchange was started and has ended one way or another
    Exchanged(Exchange),
    /// The link refused to start; `dropped` UART bytes were lost
    StartFailed { dropped: usize },
}

/// Drives the SPI link between the two channels
pub struct SpiWorker<'a, S: SpiLink> {
    bridge: &'a Bridge,
    link: S,
    framer: MessageFramer,
    tx: [u8; CHUNK_SIZE],
    rx: [u8; CHUNK_SIZE],
    in_flight: bool,
}

impl<'a, S: SpiLink> SpiWorker<'a, S> {
    pub(crate) fn new(bridge: &'a Bridge, link: S) -> Self {
        Self {
            bridge,
            link,
            framer: MessageFramer::new(),
            tx: [0; CHUNK_SIZE],
            rx: [0; CHUNK_SIZE],
            in_flight: false,
        }
    }

    /// The driven link
    pub fn link(&self) -> &S {
        &self.link
    }

    /// True while a received message is still waiting for its terminator
    pub fn inside_message(&self) -> bool {
        self.framer.inside_message()
    }

    /// Run one exchange
    pub async fn step(&mut self) -> SpiOutcome {
        let pending = self
            .bridge
            .uart_to_spi
            .consume(&mut self.tx, Wait::NoWait)
            .await;

        let idle = pending == 0;
        let len = if idle {
            fill_idle(&mut self.tx);
            CHUNK_SIZE
        } else {
            pending
        };

        if self.link.start_transfer(&self.tx[..len]).is_err() {
            self.bridge.stats.record_spi_start_failure();
            return SpiOutcome::StartFailed { dropped: pending };
        }
        self.bridge.stats.record_spi_transfer(idle);
        self.in_flight = true;

        let timed_out = self.bridge.spi_done.acquire(COMPLETION_TIMEOUT).await.is_err();
        if timed_out {
            self.link.abort();
            self.bridge.stats.record_spi_timeout();
        }
        self.in_flight = false;

        let received = self.link.take_received(&mut self.rx);

        // The outgoing chunk is on the wire already; reuse its buffer
        let forwarded = self.framer.feed_slice(&self.rx[..received], &mut self.tx);
        let committed = self.bridge.spi_to_uart.produce(&self.tx[..forwarded]);
        self.bridge
            .stats
            .record_spi_forward(committed, forwarded - committed);

        SpiOutcome::Exchanged(Exchange {
            sent: len,
            idle,
            received,
            forwarded: committed,
            overflow: forwarded - committed,
            timed_out,
        })
    }

    /// Run until [`Bridge::shutdown`], reporting every iteration to `observe`
    ///
    /// Yields to the executor between iterations so the link drivers get to
    /// run even when nothing suspends. Returns the link; an exchange still
    /// in flight at shutdown is aborted.
    pub async fn run<F: FnMut(SpiOutcome)>(mut self, mut observe: F) -> S {
        let bridge = self.bridge;
        loop {
            match select(bridge.spi_stop.wait(), self.step()).await {
                Either::First(()) => break,
                Either::Second(outcome) => observe(outcome),
            }
            yield_now().await;
        }

        if self.in_flight {
            self.link.abort();
            self.in_flight = false;
        }
        self.link
    }
}
