//! SPI link message convention
//!
//! The SPI side of the retranslator is a continuous full-duplex byte stream
//! with no boundaries of its own. Messages are recovered from content:
//!
//! ```text
//! ┌──────┬─────────────────────────┬──────┬──────┬─────────────┬──────┐
//! │ 0x00 │ payload (1..=255 bytes) │ 0x00 │ 0x00 │ payload ... │ 0x00 │
//! │ idle │ message body            │ term │ idle │             │ term │
//! └──────┴─────────────────────────┴──────┴──────┴─────────────┴──────┘
//! ```
//!
//! A message is a maximal run of non-zero bytes followed by one zero
//! terminator. Any other zero is idle filler. Message content is therefore
//! restricted to byte values 1–255.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod framing;

pub use framing::{fill_idle, MessageFramer, CHUNK_SIZE, IDLE_FILLER, TERMINATOR};
