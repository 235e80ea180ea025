//! Duplex Hardware Abstraction Layer
//!
//! This crate defines the two peripheral capability sets the retranslator
//! core is built against. Chip-specific crates implement them; the core
//! never touches a register or a DMA channel itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  duplex-core (workers, channels)        │
//! └─────────────────────────────────────────┘
//!        │ start/abort            ▲ notifications
//!        ▼                        │ (interrupt context)
//! ┌─────────────────────────────────────────┐
//! │  duplex-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  duplex-hal-stm32                       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartLink`], [`uart::UartEvents`] - Asynchronous serial link
//! - [`spi::SpiLink`], [`spi::SpiEvents`] - Asynchronous full-duplex SPI link

#![no_std]
#![deny(unsafe_code)]

pub mod spi;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use spi::{SpiConfig, SpiEvents, SpiLink};
pub use uart::{UartConfig, UartEvents, UartLink};
