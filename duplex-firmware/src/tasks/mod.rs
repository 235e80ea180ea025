//! Embassy async tasks
//!
//! Two bridge workers, and the peripheral drivers standing in for the
//! UART and SPI interrupt handlers.

pub mod spi_link;
pub mod spi_worker;
pub mod uart_link;
pub mod uart_worker;

pub use spi_link::spi_driver_task;
pub use spi_worker::spi_worker_task;
pub use uart_link::{uart_rx_driver_task, uart_tx_driver_task};
pub use uart_worker::uart_worker_task;
