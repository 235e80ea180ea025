//! STM32 links for the Duplex retranslator
//!
//! Implements [`duplex_hal::UartLink`] and [`duplex_hal::SpiLink`] on top of
//! embassy-stm32 DMA drivers.
//!
//! embassy peripherals complete through futures rather than callbacks, so
//! each link is split in two halves sharing a static port:
//!
//! - the link handle ([`Stm32Uart`], [`Stm32Spi`]) owned by a worker, which
//!   only queues requests and never waits;
//! - a driver loop, run by the firmware in its own task, which owns the
//!   embassy peripheral, performs the transfers and raises the
//!   notifications an interrupt handler would.
//!
//! # Features
//!
//! - `stm32f411ce`, `stm32f401cc` - chip selection, forwarded to embassy-stm32
//! - `defmt` - Enable debug formatting support

#![no_std]

pub mod config;
pub mod error;
pub mod spi;
pub mod uart;

pub use error::{LinkError, SpiBusError, UartBusError};
pub use spi::{SpiPort, Stm32Spi};
pub use uart::{Stm32Uart, UartPort};

/// Copy of one outgoing or incoming chunk
pub type Chunk = heapless::Vec<u8, { duplex_protocol::CHUNK_SIZE }>;
