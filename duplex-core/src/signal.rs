//! Completion latch for asynchronous peripheral operations
//!
//! A binary flag, available or taken, that starts available. The owning
//! worker takes it while waiting for an operation to end; the peripheral's
//! completion and error notifications both make it available again.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration, TimeoutError};

/// Single-slot "operation finished" latch
pub struct CompletionSignal {
    inner: Signal<CriticalSectionRawMutex, ()>,
}

impl Default for CompletionSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CompletionSignal {
    /// Create a latch in the available state
    pub fn new() -> Self {
        let inner = Signal::new();
        inner.signal(());
        Self { inner }
    }

    /// Take the latch, waiting at most `timeout` for it to become available
    pub async fn acquire(&self, timeout: Duration) -> Result<(), TimeoutError> {
        with_timeout(timeout, self.inner.wait()).await
    }

    /// Take the latch if it is available
    #[cfg(test)]
    pub(crate) fn try_acquire(&self) -> bool {
        self.inner.try_take().is_some()
    }

    /// Make the latch available
    ///
    /// Callable from interrupt context. Releasing an available latch does
    /// nothing.
    pub fn release(&self) {
        self.inner.signal(());
    }

    /// True if an [`acquire`](Self::acquire) would succeed immediately
    #[cfg(test)]
    pub(crate) fn is_available(&self) -> bool {
        self.inner.signaled()
    }
}
