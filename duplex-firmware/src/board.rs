//! Board configuration
//!
//! WeAct "Black Pill" (STM32F411CE / STM32F401CC):
//!
//! | Signal    | Pin  | DMA      |
//! |-----------|------|----------|
//! | USART1 TX | PA9  | DMA2_CH7 |
//! | USART1 RX | PA10 | DMA2_CH5 |
//! | SPI1 SCK  | PA5  |          |
//! | SPI1 MISO | PA6  | DMA2_CH0 |
//! | SPI1 MOSI | PA7  | DMA2_CH3 |

use duplex_hal::spi::Mode;
use duplex_hal::{SpiConfig, UartConfig};

/// Host-facing serial line
pub fn uart_config() -> UartConfig {
    UartConfig {
        baudrate: 115_200,
        ..Default::default()
    }
}

/// Link to the SPI slave
pub fn spi_config() -> SpiConfig {
    SpiConfig {
        frequency: 2_000_000,
        mode: Mode::Mode0,
    }
}
