use embedded_hal::spi::SpiDevice;
use log::{debug, trace, warn};
use mcp3208::{Channel, Mcp3208, CHANNEL_COUNT, MAX_CLK_AT_5V};

use crate::config::BusConfig;
use crate::error::{Error, Result};

/// Opens and configures the SPI device a [`Driver`] talks through.
///
/// The returned device is the open handle. Each conversion is one
/// [`SpiDevice::transaction`], and dropping the device closes it.
pub trait Connector {
    type Device: SpiDevice;

    /// Opens the device node for `config` and applies its mode, word size and clock rate.
    fn connect(&mut self, config: &BusConfig) -> Result<Self::Device>;
}

/// MCP3208 converter behind an owned, closable SPI handle.
///
/// Only one transaction may be in flight on a handle. Callers sharing a driver across threads
/// must serialize access themselves, e.g. with a `Mutex<Driver<_>>`.
pub struct Driver<C: Connector> {
    connector: C,
    config: BusConfig,
    adc: Option<Mcp3208<C::Device>>,
}

#[cfg(feature = "raspberry_pi")]
impl Driver<crate::spidev::Spidev> {
    /// Opens the converter on the host's `spidev` bus.
    pub fn new(config: BusConfig) -> Result<Self> {
        Self::open(crate::spidev::Spidev, config)
    }
}

impl<C: Connector> Driver<C> {
    /// Validates `config` and opens the device through `connector`. No driver is returned
    /// unless the device is open and configured.
    pub fn open(mut connector: C, config: BusConfig) -> Result<Self> {
        config.validate()?;

        match config.exceeded_clock_limit() {
            Some(MAX_CLK_AT_5V) => warn!(
                "{} Hz is above the converter's {MAX_CLK_AT_5V} Hz limit",
                config.max_clock_hz
            ),
            Some(limit) => debug!(
                "{} Hz is above {limit} Hz and needs a 5V supply",
                config.max_clock_hz
            ),
            None => {}
        }

        let device = connector.connect(&config)?;

        debug!(
            "opened {} (mode {}, {} bits per word, {} Hz)",
            config.device_path().display(),
            config.mode,
            config.bits_per_word,
            config.max_clock_hz
        );

        Ok(Self {
            connector,
            config,
            adc: Some(Mcp3208::new(device)),
        })
    }

    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    pub fn is_open(&self) -> bool {
        self.adc.is_some()
    }

    /// Converts the channel with 1-based index `channel` and returns the 12-bit sample.
    pub fn read_channel(&mut self, channel: u8) -> Result<u16> {
        if !self.is_open() {
            return Err(Error::NotOpen);
        }

        let Some(ch) = Channel::from_index(channel) else {
            warn!("rejected channel {channel}, expected 1..={CHANNEL_COUNT}");
            return Err(Error::InvalidChannel(channel));
        };

        self.read(ch)
    }

    /// Converts `ch` and returns the 12-bit sample.
    pub fn read(&mut self, ch: Channel) -> Result<u16> {
        trace!("command {:02X?} for channel {}", mcp3208::encode_command(ch), ch.index());

        let sample = self.adc()?.read(ch).map_err(|err| {
            debug!("transfer on channel {} failed: {err:?}", ch.index());
            Error::from(mcp3208::Error::Spi(err))
        })?;

        Ok(sample)
    }

    /// Converts channels 1 to 8 in order, stopping at the first failure.
    pub fn read_all(&mut self) -> Result<[u16; CHANNEL_COUNT as usize]> {
        let samples = self.adc()?.read_all().map_err(|err| {
            debug!("channel sweep failed: {err:?}");
            Error::from(mcp3208::Error::Spi(err))
        })?;

        Ok(samples)
    }

    /// Releases the device. Later reads fail with [`Error::NotOpen`] until [`Driver::reopen`].
    pub fn close(&mut self) {
        if let Some(adc) = self.adc.take() {
            drop(adc.release());
            debug!("closed {}", self.config.device_path().display());
        }
    }

    /// Closes the device if open, then opens and configures it again with the stored config.
    /// On failure the driver stays closed.
    pub fn reopen(&mut self) -> Result<()> {
        self.close();

        let device = self.connector.connect(&self.config)?;
        self.adc = Some(Mcp3208::new(device));

        debug!("reopened {}", self.config.device_path().display());

        Ok(())
    }

    fn adc(&mut self) -> Result<&mut Mcp3208<C::Device>> {
        self.adc.as_mut().ok_or(Error::NotOpen)
    }
}
