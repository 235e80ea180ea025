//! Bounded byte channel
//!
//! Single producer, single consumer. Producing never blocks: bytes that do
//! not fit are dropped. Consuming waits according to [`Wait`].

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use embassy_time::{with_timeout, Duration};

/// Capacity of each of the two bridge channels
pub const CHANNEL_CAPACITY: usize = 1024;

/// How long [`ByteChannel::consume`] may wait for the first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wait {
    /// Take whatever is ready, possibly nothing
    NoWait,
    /// Give up after the duration
    Timeout(Duration),
    /// Wait until a byte arrives
    Forever,
}

/// Bounded FIFO byte queue
///
/// Safe to produce into from interrupt context: the critical section is
/// held only for a bounded copy.
pub struct ByteChannel<const N: usize> {
    pipe: Pipe<CriticalSectionRawMutex, N>,
}

impl<const N: usize> Default for ByteChannel<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ByteChannel<N> {
    /// Create an empty channel
    pub const fn new() -> Self {
        Self { pipe: Pipe::new() }
    }

    /// Number of bytes waiting to be consumed
    pub fn len(&self) -> usize {
        self.pipe.len()
    }

    /// True when nothing is waiting to be consumed
    pub fn is_empty(&self) -> bool {
        self.pipe.is_empty()
    }

    /// Enqueue as many of `bytes` as fit, without waiting
    ///
    /// Returns the number of bytes stored, in order from the start of
    /// `bytes`. The rest are dropped.
    pub fn produce(&self, bytes: &[u8]) -> usize {
        let mut committed = 0;
        while committed < bytes.len() {
            match self.pipe.try_write(&bytes[committed..]) {
                Ok(0) | Err(_) => break,
                Ok(n) => committed += n,
            }
        }
        committed
    }

    /// Dequeue up to `buf.len()` bytes
    ///
    /// Waits for the first byte as `wait` allows, then returns whatever is
    /// ready without waiting for `buf` to fill. Returns 0 only when no byte
    /// arrived in time.
    pub async fn consume(&self, buf: &mut [u8], wait: Wait) -> usize {
        if buf.is_empty() {
            return 0;
        }

        let first = match wait {
            Wait::NoWait => self.pipe.try_read(buf).unwrap_or(0),
            Wait::Timeout(timeout) => with_timeout(timeout, self.pipe.read(buf))
                .await
                .unwrap_or(0),
            Wait::Forever => self.pipe.read(buf).await,
        };

        if first == 0 {
            return 0;
        }
        first + self.drain_ready(&mut buf[first..])
    }

    /// Pipe reads stop at the ring buffer wrap point; pick up the rest.
    fn drain_ready(&self, buf: &mut [u8]) -> usize {
        let mut taken = 0;
        while taken < buf.len() {
            match self.pipe.try_read(&mut buf[taken..]) {
                Ok(0) | Err(_) => break,
                Ok(n) => taken += n,
            }
        }
        taken
    }
}
