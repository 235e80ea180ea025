//! Duplex - UART/SPI Retranslator Firmware
//!
//! Bridges a host-facing UART and an SPI slave. Bytes received on UART are
//! clocked out over SPI; zero-terminated messages the slave clocks back are
//! recovered from the idle filler and sent out over UART.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::peripherals::USART1;
use embassy_stm32::spi::Spi;
use embassy_stm32::usart::{self, Uart};
use embassy_stm32::bind_interrupts;
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use duplex_core::{Bridge, StartError};
use duplex_hal_stm32::config::{spi_config, usart_config};
use duplex_hal_stm32::{Stm32Spi, Stm32Uart};

use crate::ports::{SPI_PORT, UART_PORT};

mod board;
mod ports;
mod tasks;

bind_interrupts!(struct Irqs {
    USART1 => usart::InterruptHandler<USART1>;
});

/// Seconds between statistics reports
const STATS_INTERVAL_SECS: u64 = 10;

// Channels, signals and counters shared by both workers (must live forever)
static BRIDGE: StaticCell<Bridge> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Duplex firmware starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    // Setup USART1 for the host link
    let uart = match Uart::new(
        p.USART1,
        p.PA10,
        p.PA9,
        Irqs,
        p.DMA2_CH7,
        p.DMA2_CH5,
        usart_config(&board::uart_config()),
    ) {
        Ok(uart) => uart,
        Err(e) => defmt::panic!("USART1 config rejected: {:?}", e),
    };
    let (uart_tx, uart_rx) = uart.split();

    info!("UART initialized");

    // Setup SPI1 as master towards the slave
    let spi = Spi::new(
        p.SPI1,
        p.PA5,
        p.PA7,
        p.PA6,
        p.DMA2_CH3,
        p.DMA2_CH0,
        spi_config(&board::spi_config()),
    );

    info!("SPI initialized");

    let bridge: &'static Bridge = BRIDGE.init(Bridge::new());

    // Any failure here leaves the device without a working link
    let (uart_worker, spi_worker) =
        match bridge.start(Stm32Uart::new(&UART_PORT), Stm32Spi::new(&SPI_PORT)) {
            Ok(workers) => workers,
            Err(StartError::Uart(e)) => defmt::panic!("UART link attach failed: {:?}", e),
            Err(StartError::Spi(e)) => defmt::panic!("SPI link attach failed: {:?}", e),
        };

    // Spawn tasks
    spawner.spawn(tasks::uart_tx_driver_task(uart_tx).unwrap());
    spawner.spawn(tasks::uart_rx_driver_task(uart_rx).unwrap());
    spawner.spawn(tasks::spi_driver_task(spi).unwrap());
    spawner.spawn(tasks::uart_worker_task(uart_worker).unwrap());
    spawner.spawn(tasks::spi_worker_task(spi_worker).unwrap());

    info!("All tasks spawned, retranslator running");

    // All forwarding happens in spawned tasks; report counters
    loop {
        Timer::after_secs(STATS_INTERVAL_SECS).await;
        info!("Stats: {}", bridge.stats().snapshot());
    }
}
