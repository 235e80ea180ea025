//! SPI1 driver task
//!
//! Performs the full-duplex DMA exchanges queued through the SPI port.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_stm32::mode::Async;
use embassy_stm32::spi::Spi;

use duplex_core::CHUNK_SIZE;
use duplex_hal_stm32::SpiBusError;

use crate::ports::SPI_PORT;

/// SPI exchange driver
#[embassy_executor::task]
pub async fn spi_driver_task(mut spi: Spi<'static, Async>) {
    let events = SPI_PORT.events().await;
    info!("SPI driver started");

    let mut rx = [0u8; CHUNK_SIZE];
    loop {
        let tx = SPI_PORT.next_transfer().await;
        let len = tx.len();

        match select(spi.transfer(&mut rx[..len], &tx[..]), SPI_PORT.abort_requested()).await {
            Either::First(Ok(())) => {
                if SPI_PORT.finish(&rx[..len]).is_err() {
                    warn!("SPI result queue full, dropping {} bytes", len);
                }
                events.on_transfer_complete();
            }
            Either::First(Err(e)) => {
                warn!("SPI error: {:?}", SpiBusError::from(e));
                events.on_error();
            }
            Either::Second(()) => {
                debug!("SPI exchange aborted ({} bytes)", len);
            }
        }
    }
}
