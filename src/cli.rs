use std::time::Duration;

use clap::Parser;

use crate::config::BusConfig;
use crate::error::Result;
use crate::sampler::Sampler;

/// Poll an MCP3208 ADC channel and print one sample per line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// SPI bus index (selects /dev/spidev<BUS>.<DEVICE>)
    #[arg(long, default_value_t = 0)]
    pub bus: u8,

    /// Chip-select index on the bus
    #[arg(long, default_value_t = 0)]
    pub device: u8,

    /// SPI mode, 0 to 3
    #[arg(long, default_value_t = 0)]
    pub mode: u8,

    /// Bits per transfer word
    #[arg(long, default_value_t = 8)]
    pub bits_per_word: u8,

    /// Maximum clock rate in Hz
    #[arg(long, default_value_t = 500_000)]
    pub max_clock_hz: u32,

    /// Channel to sample, 1 to 8
    #[arg(short, long, default_value_t = 1)]
    pub channel: u8,

    /// Stop after this many samples
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// Milliseconds to wait between samples
    #[arg(long)]
    pub interval_ms: Option<u64>,
}

impl Args {
    pub fn bus_config(&self) -> BusConfig {
        BusConfig {
            bus: self.bus,
            device: self.device,
            mode: self.mode,
            bits_per_word: self.bits_per_word,
            max_clock_hz: self.max_clock_hz,
        }
    }

    pub fn sampler(&self) -> Result<Sampler> {
        let mut sampler = Sampler::new(self.channel)?;

        if let Some(count) = self.count {
            sampler = sampler.with_count(count);
        }

        if let Some(interval) = self.interval_ms {
            sampler = sampler.with_interval(Duration::from_millis(interval));
        }

        Ok(sampler)
    }
}
