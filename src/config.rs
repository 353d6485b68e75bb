use std::path::PathBuf;

use mcp3208::{MAX_CLK_AT_2_7V, MAX_CLK_AT_5V};

use crate::error::{Error, Result};

/// Electrical parameters for the SPI link to the converter.
///
/// The device node is `/dev/spidev<bus>.<device>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    pub bus: u8,
    pub device: u8,
    /// Clock polarity and phase, `0..=3`.
    pub mode: u8,
    pub bits_per_word: u8,
    pub max_clock_hz: u32,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bus: 0,
            device: 0,
            mode: 0,
            bits_per_word: 8,
            max_clock_hz: 500_000,
        }
    }
}

impl BusConfig {
    /// Path of the `spidev` node this configuration addresses.
    pub fn device_path(&self) -> PathBuf {
        PathBuf::from(format!("/dev/spidev{}.{}", self.bus, self.device))
    }

    /// Rejects parameters no SPI controller can honour.
    pub fn validate(&self) -> Result<()> {
        if self.mode > 3 {
            return Err(Error::InvalidConfig(format!(
                "SPI mode {} is outside 0..=3",
                self.mode
            )));
        }

        if self.bits_per_word == 0 {
            return Err(Error::InvalidConfig("bits per word must be non-zero".into()));
        }

        if self.max_clock_hz == 0 {
            return Err(Error::InvalidConfig("maximum clock rate must be non-zero".into()));
        }

        Ok(())
    }

    /// The datasheet clock limit `max_clock_hz` exceeds, if any: [`MAX_CLK_AT_5V`] when it is too
    /// fast for any supply, [`MAX_CLK_AT_2_7V`] when it needs a 5V supply.
    pub fn exceeded_clock_limit(&self) -> Option<u32> {
        if self.max_clock_hz > MAX_CLK_AT_5V {
            Some(MAX_CLK_AT_5V)
        } else if self.max_clock_hz > MAX_CLK_AT_2_7V {
            Some(MAX_CLK_AT_2_7V)
        } else {
            None
        }
    }
}
