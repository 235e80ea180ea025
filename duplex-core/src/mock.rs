//! Scripted links for host tests
//!
//! Completing mocks call the bridge's notification methods synchronously
//! from `start_*`, the way a very fast interrupt would.

use std::boxed::Box;
use std::collections::VecDeque;
use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use duplex_hal::{SpiEvents, SpiLink, UartEvents, UartLink};

use crate::bridge::Bridge;

/// Error returned by the mock links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    Rejected,
}

/// A fresh bridge that lives for the rest of the test process
pub fn leak_bridge() -> &'static Bridge {
    Box::leak(Box::new(Bridge::new()))
}

pub struct MockUart {
    events: Option<&'static dyn UartEvents>,
    reject_attach: bool,
    fail_receive: bool,
    fail_transmit: bool,
    complete: bool,
    receive_arms: usize,
    transmitted: Vec<u8>,
    aborts: usize,
}

impl MockUart {
    pub fn new() -> Self {
        Self {
            events: None,
            reject_attach: false,
            fail_receive: false,
            fail_transmit: false,
            complete: true,
            receive_arms: 0,
            transmitted: Vec::new(),
            aborts: 0,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject_attach: true,
            ..Self::new()
        }
    }

    pub fn failing_receive(self) -> Self {
        Self {
            fail_receive: true,
            ..self
        }
    }

    pub fn failing_transmit(self) -> Self {
        Self {
            fail_transmit: true,
            ..self
        }
    }

    pub fn never_completing(self) -> Self {
        Self {
            complete: false,
            ..self
        }
    }

    pub fn attached(&self) -> bool {
        self.events.is_some()
    }

    pub fn receive_arms(&self) -> usize {
        self.receive_arms
    }

    pub fn transmitted(&self) -> &[u8] {
        &self.transmitted
    }

    pub fn aborts(&self) -> usize {
        self.aborts
    }
}

impl UartLink for MockUart {
    type Error = MockError;

    fn attach(&mut self, events: &'static dyn UartEvents) -> Result<(), MockError> {
        if self.reject_attach {
            return Err(MockError::Rejected);
        }
        self.events = Some(events);
        Ok(())
    }

    fn start_receive(&mut self) -> Result<(), MockError> {
        if self.fail_receive {
            return Err(MockError::Rejected);
        }
        self.receive_arms += 1;
        Ok(())
    }

    fn start_transmit(&mut self, data: &[u8]) -> Result<(), MockError> {
        if self.fail_transmit {
            return Err(MockError::Rejected);
        }
        self.transmitted.extend_from_slice(data);
        if self.complete {
            if let Some(events) = self.events {
                events.on_tx_complete();
            }
        }
        Ok(())
    }

    fn abort_transmit(&mut self) {
        self.aborts += 1;
    }
}

/// One-slot request queue between a [`QueuedUart`] and its driver
pub type TxQueue = Channel<CriticalSectionRawMutex, Vec<u8>, 1>;

/// UART link that only queues transmits, like the STM32 handle
///
/// Nothing completes until [`drive_uart`] takes the request off the queue.
pub struct QueuedUart {
    queue: &'static TxQueue,
}

impl QueuedUart {
    pub fn new() -> (Self, &'static TxQueue) {
        let queue: &'static TxQueue = Box::leak(Box::new(Channel::new()));
        (Self { queue }, queue)
    }
}

impl UartLink for QueuedUart {
    type Error = MockError;

    fn attach(&mut self, _events: &'static dyn UartEvents) -> Result<(), MockError> {
        Ok(())
    }

    fn start_receive(&mut self) -> Result<(), MockError> {
        Ok(())
    }

    fn start_transmit(&mut self, data: &[u8]) -> Result<(), MockError> {
        self.queue
            .try_send(data.to_vec())
            .map_err(|_| MockError::Rejected)
    }

    fn abort_transmit(&mut self) {
        self.queue.clear();
    }
}

/// Driver side of a [`QueuedUart`]
///
/// Puts queued chunks on the "wire" and completes them until `total` bytes
/// went out, then shuts the bridge down and returns the wire.
pub async fn drive_uart(bridge: &'static Bridge, queue: &TxQueue, total: usize) -> Vec<u8> {
    let mut wire = Vec::new();
    while wire.len() < total {
        let chunk = queue.receive().await;
        wire.extend_from_slice(&chunk);
        bridge.on_tx_complete();
    }
    bridge.shutdown();
    wire
}

pub struct MockSpi {
    events: Option<&'static dyn SpiEvents>,
    reject_attach: bool,
    fail_start: bool,
    complete: bool,
    responses: VecDeque<Vec<u8>>,
    finished: Option<Vec<u8>>,
    transfers: Vec<Vec<u8>>,
    aborts: usize,
}

impl MockSpi {
    pub fn new() -> Self {
        Self {
            events: None,
            reject_attach: false,
            fail_start: false,
            complete: true,
            responses: VecDeque::new(),
            finished: None,
            transfers: Vec::new(),
            aborts: 0,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject_attach: true,
            ..Self::new()
        }
    }

    pub fn failing_start(self) -> Self {
        Self {
            fail_start: true,
            ..self
        }
    }

    pub fn never_completing(self) -> Self {
        Self {
            complete: false,
            ..self
        }
    }

    /// Queue the bytes the slave clocks back on the next exchange
    ///
    /// Padded with zeros or cut to the length of that exchange.
    pub fn respond(&mut self, miso: &[u8]) {
        self.responses.push_back(miso.to_vec());
    }

    pub fn attached(&self) -> bool {
        self.events.is_some()
    }

    pub fn transfers(&self) -> &[Vec<u8>] {
        &self.transfers
    }

    pub fn aborts(&self) -> usize {
        self.aborts
    }
}

impl SpiLink for MockSpi {
    type Error = MockError;

    fn attach(&mut self, events: &'static dyn SpiEvents) -> Result<(), MockError> {
        if self.reject_attach {
            return Err(MockError::Rejected);
        }
        self.events = Some(events);
        Ok(())
    }

    fn start_transfer(&mut self, tx: &[u8]) -> Result<(), MockError> {
        if self.fail_start {
            return Err(MockError::Rejected);
        }
        self.transfers.push(tx.to_vec());

        let mut miso = self.responses.pop_front().unwrap_or_default();
        miso.resize(tx.len(), 0);
        if self.complete {
            self.finished = Some(miso);
            if let Some(events) = self.events {
                events.on_transfer_complete();
            }
        }
        Ok(())
    }

    fn take_received(&mut self, rx: &mut [u8]) -> usize {
        match self.finished.take() {
            Some(miso) => {
                let n = miso.len().min(rx.len());
                rx[..n].copy_from_slice(&miso[..n]);
                n
            }
            None => 0,
        }
    }

    fn abort(&mut self) {
        self.aborts += 1;
        self.finished = None;
    }
}
