//! SPI worker task
//!
//! Polls the SPI slave continuously and recovers messages from its replies.

use defmt::*;

use duplex_core::{SpiOutcome, SpiWorker};
use duplex_hal_stm32::Stm32Spi;

/// SPI worker task
#[embassy_executor::task]
pub async fn spi_worker_task(worker: SpiWorker<'static, Stm32Spi>) {
    info!("SPI worker started");

    worker.run(log_outcome).await;

    info!("SPI worker stopped");
}

fn log_outcome(outcome: SpiOutcome) {
    match outcome {
        SpiOutcome::Exchanged(exchange) => {
            if exchange.timed_out {
                warn!("SPI exchange timeout, aborted {} bytes", exchange.sent);
            }
            if exchange.overflow > 0 {
                warn!("SPI->UART channel full, dropped {} bytes", exchange.overflow);
            }
            // Idle polling runs flat out; only log real traffic
            if !exchange.idle || exchange.forwarded > 0 {
                trace!(
                    "SPI: sent {} bytes, forwarded {} bytes",
                    exchange.sent,
                    exchange.forwarded
                );
            }
        }
        SpiOutcome::StartFailed { dropped } => {
            if dropped > 0 {
                warn!("SPI busy, dropped {} bytes", dropped);
            }
        }
    }
}
