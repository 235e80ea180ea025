//! Board-agnostic forwarding engine for the UART/SPI retranslator
//!
//! This crate contains everything between the two peripheral links:
//!
//! - [`channel::ByteChannel`] - bounded byte pipes between contexts
//! - [`signal::CompletionSignal`] - "operation finished" latch
//! - [`bridge::Bridge`] - context object owning channels and signals,
//!   and the event sink of both links
//! - [`uart::UartWorker`] - SPI→UART direction
//! - [`spi::SpiWorker`] - UART→SPI direction and message framing
//! - [`stats::LinkStats`] - traffic and fault counters
//!
//! Data flow:
//!
//! ```text
//! UART rx ──▶ uart_to_spi ──▶ SpiWorker ──▶ SPI exchange
//!                                               │
//! UART tx ◀── UartWorker ◀── spi_to_uart ◀── framer
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod bridge;
pub mod channel;
pub mod signal;
pub mod spi;
pub mod stats;
pub mod uart;

#[cfg(test)]
mod mock;

pub use bridge::{Bridge, StartError, COMPLETION_TIMEOUT};
pub use channel::{ByteChannel, Wait, CHANNEL_CAPACITY};
pub use duplex_protocol::CHUNK_SIZE;
pub use signal::CompletionSignal;
pub use spi::{Exchange, SpiOutcome, SpiWorker};
pub use stats::{LinkStats, StatsSnapshot};
pub use uart::{UartOutcome, UartState, UartWorker};
