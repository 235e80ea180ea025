//! Conversion of link configuration to embassy-stm32 peripheral configs

use embassy_stm32::spi;
use embassy_stm32::time::Hertz;
use embassy_stm32::usart;

use duplex_hal::spi::Mode;
use duplex_hal::uart::{DataBits, Parity, StopBits};
use duplex_hal::{SpiConfig, UartConfig};

/// Build the embassy-stm32 USART config
pub fn usart_config(config: &UartConfig) -> usart::Config {
    let mut out = usart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => usart::DataBits::DataBits7,
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    out.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    out
}

/// Build the embassy-stm32 SPI master config
pub fn spi_config(config: &SpiConfig) -> spi::Config {
    let mut out = spi::Config::default();
    out.frequency = Hertz(config.frequency);
    out.mode = match config.mode {
        Mode::Mode0 => spi::MODE_0,
        Mode::Mode1 => spi::MODE_1,
        Mode::Mode2 => spi::MODE_2,
        Mode::Mode3 => spi::MODE_3,
    };
    out
}
