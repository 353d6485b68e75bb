//! Provides a driver for a Microchip MCP3208 12-bit ADC via the `embedded-hal` ecosystem.
//!
//! A conversion is a single 3-byte full-duplex exchange. The command carries a start bit, the
//! single-ended flag and a 3-bit channel selector; the reply carries the 12-bit sample in the low
//! nibble of its second byte and the whole of its third byte:
//!
//! ```text
//! tx: 0000_0SM2  10xx_xxxx  xxxx_xxxx    S: start, M: single-ended, 2/1/0: selector bits
//! rx: ????_????  ???0_BA98  7654_3210    B..0: sample bits 11..0
//! ```

#![no_std]
#![forbid(unsafe_code)]

use core::fmt;

use embedded_hal::spi::SpiDevice;

mod channel;
mod mcp3208;

pub use channel::Channel;
pub use mcp3208::Mcp3208;

/// Number of single-ended inputs on the chip.
pub const CHANNEL_COUNT: u8 = 8;

/// Largest value a 12-bit conversion can produce.
pub const MAX_SAMPLE: u16 = 0x0FFF;

/// The maximum SPI clock speed when V_DD is 5V.
pub const MAX_CLK_AT_5V: u32 = 2_000_000;

/// The maximum SPI clock speed when V_DD is 2.7V.
pub const MAX_CLK_AT_2_7V: u32 = 1_000_000;

// Bit positions within the command frame.
const START: u8 = 2;
const SINGLE_ENDED: u8 = 1;
const D1: u8 = 7;
const D0: u8 = 6;

/// Failure of a single conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The requested 1-based channel index is outside `1..=8`.
    InvalidChannel(u8),
    /// The bus transaction did not complete.
    Spi(E),
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidChannel(index) => write!(
                f,
                "invalid channel {index}, expected a value in 1..={CHANNEL_COUNT}"
            ),
            Error::Spi(err) => write!(f, "SPI transfer failed: {err:?}"),
        }
    }
}

/// Builds the 3-byte command selecting `channel` in single-ended mode.
pub fn encode_command(channel: Channel) -> [u8; 3] {
    let selector = channel.selector();

    [
        (1 << START) | (1 << SINGLE_ENDED) | ((selector & 0b100) >> 2),
        (((selector & 0b010) >> 1) << D1) | ((selector & 0b001) << D0),
        // Padding so the full reply is clocked back in
        0b0000_0000,
    ]
}

/// Extracts the 12-bit sample from a reply frame. The first byte and the high nibble of the
/// second byte carry no data and are ignored.
pub fn decode_reply(reply: [u8; 3]) -> u16 {
    u16::from_be_bytes([reply[1], reply[2]]) & MAX_SAMPLE
}

/// Internal method for one single-ended conversion.
pub(crate) fn read_single_ended<SPI: SpiDevice>(
    spi: &mut SPI,
    channel: Channel,
) -> Result<u16, SPI::Error> {
    let mut buffer = encode_command(channel);

    spi.transfer_in_place(&mut buffer)?;

    Ok(decode_reply(buffer))
}
