//! USART1 driver tasks
//!
//! Perform the DMA transfers queued through the UART port and raise the
//! completion, receive and error notifications.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_stm32::mode::Async;
use embassy_stm32::usart::{UartRx, UartTx};

use duplex_hal_stm32::UartBusError;

use crate::ports::UART_PORT;

/// UART transmit driver
#[embassy_executor::task]
pub async fn uart_tx_driver_task(mut tx: UartTx<'static, Async>) {
    let events = UART_PORT.events().await;
    info!("UART TX driver started");

    loop {
        let chunk = UART_PORT.next_transmit().await;

        match select(tx.write(&chunk[..]), UART_PORT.abort_requested()).await {
            Either::First(Ok(())) => events.on_tx_complete(),
            Either::First(Err(e)) => {
                warn!("UART TX error: {:?}", UartBusError::from(e));
                events.on_error();
            }
            Either::Second(()) => {
                debug!("UART TX aborted ({} bytes)", chunk.len());
            }
        }
    }
}

/// UART receive driver
///
/// Single-byte reads back to back; each completed read re-arms the next.
#[embassy_executor::task]
pub async fn uart_rx_driver_task(mut rx: UartRx<'static, Async>) {
    let events = UART_PORT.events().await;
    UART_PORT.armed().await;
    info!("UART RX driver armed");

    let mut byte = [0u8; 1];
    loop {
        match rx.read(&mut byte).await {
            Ok(()) => events.on_rx_byte(byte[0]),
            Err(e) => {
                warn!("UART RX error: {:?}", UartBusError::from(e));
                events.on_error();
            }
        }
    }
}
