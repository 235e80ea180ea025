//! Link ports shared between the bridge workers and the peripheral drivers

use duplex_hal_stm32::{SpiPort, UartPort};

/// USART1 request queues and notification sink
pub static UART_PORT: UartPort = UartPort::new();

/// SPI1 request and result queues and notification sink
pub static SPI_PORT: SpiPort = SpiPort::new();
