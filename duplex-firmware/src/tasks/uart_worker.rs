//! UART worker task
//!
//! Moves framed messages from the SPI side out over UART.

use defmt::*;

use duplex_core::{UartOutcome, UartWorker};
use duplex_hal_stm32::Stm32Uart;

/// UART worker task
#[embassy_executor::task]
pub async fn uart_worker_task(worker: UartWorker<'static, Stm32Uart>) {
    info!("UART worker started");

    worker.run(log_outcome).await;

    info!("UART worker stopped");
}

fn log_outcome(outcome: UartOutcome) {
    match outcome {
        UartOutcome::ReceiveArmed => info!("UART reception armed"),
        UartOutcome::ReceiveArmFailed => error!("UART reception could not be armed"),
        UartOutcome::Sent { len } => trace!("UART TX: {} bytes", len),
        UartOutcome::StartFailed { dropped } => {
            warn!("UART busy, dropped {} bytes", dropped)
        }
        UartOutcome::TimedOut { len } => warn!("UART TX timeout, aborted {} bytes", len),
        UartOutcome::Empty => {}
    }
}
