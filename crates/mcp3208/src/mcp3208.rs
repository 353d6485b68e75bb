use embedded_hal::spi::SpiDevice;

use crate::{read_single_ended, Channel, Error, CHANNEL_COUNT};

/// MCP3208 driver
pub struct Mcp3208<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Mcp3208<SPI> {
    /// Creates a new driver from an SPI peripheral.
    /// Please ensure the SPI bus is in SPI mode 0, aka (0, 0), with 8 bit words.
    pub fn new(spi: SPI) -> Self {
        spi.into()
    }

    /// Read a channel and return the 12 bit value as a [`u16`] in single-ended mode.
    pub fn read(&mut self, ch: Channel) -> Result<u16, SPI::Error> {
        read_single_ended(&mut self.spi, ch)
    }

    /// Read the channel with 1-based index `index` (1 is `CH0`, 8 is `CH7`).
    ///
    /// An index outside `1..=8` is rejected before anything is sent on the bus.
    pub fn read_channel(&mut self, index: u8) -> Result<u16, Error<SPI::Error>> {
        let ch = Channel::from_index(index).ok_or(Error::InvalidChannel(index))?;

        self.read(ch).map_err(Error::Spi)
    }

    /// Read every channel in order, stopping at the first failed transfer.
    pub fn read_all(&mut self) -> Result<[u16; CHANNEL_COUNT as usize], SPI::Error> {
        let mut samples = [0; CHANNEL_COUNT as usize];

        for (sample, ch) in samples.iter_mut().zip(Channel::all()) {
            *sample = self.read(ch)?;
        }

        Ok(samples)
    }

    /// Gives back the underlying SPI peripheral.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> From<SPI> for Mcp3208<SPI> {
    fn from(spi: SPI) -> Self {
        Self { spi }
    }
}
