//! Linux `spidev` transport via `rppal`.

use std::thread;
use std::time::Duration;

use embedded_hal::spi::{self, ErrorKind, ErrorType, Operation, SpiDevice};
use rppal::spi::{Bus, Mode, Segment, SlaveSelect, Spi};

use crate::config::BusConfig;
use crate::driver::Connector;
use crate::error::{Error, Result};

/// Opens `/dev/spidev<bus>.<device>` through `rppal`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Spidev;

impl Connector for Spidev {
    type Device = SpidevDevice;

    fn connect(&mut self, config: &BusConfig) -> Result<SpidevDevice> {
        let unavailable = |reason: String| Error::TransportUnavailable {
            path: config.device_path(),
            reason,
        };

        let bus = bus(config.bus).ok_or_else(|| unavailable(format!("no SPI bus {}", config.bus)))?;

        let slave_select = slave_select(config.device)
            .ok_or_else(|| unavailable(format!("no chip select {}", config.device)))?;

        let mode = match config.mode {
            0 => Mode::Mode0,
            1 => Mode::Mode1,
            2 => Mode::Mode2,
            3 => Mode::Mode3,
            other => {
                return Err(Error::InvalidConfig(format!(
                    "SPI mode {other} is outside 0..=3"
                )))
            }
        };

        let spi = Spi::new(bus, slave_select, config.max_clock_hz, mode)
            .map_err(|err| open_error(config, err))?;

        spi.set_bits_per_word(config.bits_per_word)
            .map_err(|err| Error::InvalidConfig(err.to_string()))?;

        Ok(SpidevDevice { spi })
    }
}

/// A missing or inaccessible node is `TransportUnavailable`; anything the controller refuses
/// after opening is `InvalidConfig`.
fn open_error(config: &BusConfig, err: rppal::spi::Error) -> Error {
    match err {
        rppal::spi::Error::Io(err) => Error::TransportUnavailable {
            path: config.device_path(),
            reason: err.to_string(),
        },
        other => Error::InvalidConfig(other.to_string()),
    }
}

fn bus(index: u8) -> Option<Bus> {
    Some(match index {
        0 => Bus::Spi0,
        1 => Bus::Spi1,
        2 => Bus::Spi2,
        3 => Bus::Spi3,
        4 => Bus::Spi4,
        5 => Bus::Spi5,
        6 => Bus::Spi6,
        _ => return None,
    })
}

fn slave_select(index: u8) -> Option<SlaveSelect> {
    Some(match index {
        0 => SlaveSelect::Ss0,
        1 => SlaveSelect::Ss1,
        2 => SlaveSelect::Ss2,
        3 => SlaveSelect::Ss3,
        4 => SlaveSelect::Ss4,
        5 => SlaveSelect::Ss5,
        6 => SlaveSelect::Ss6,
        7 => SlaveSelect::Ss7,
        8 => SlaveSelect::Ss8,
        9 => SlaveSelect::Ss9,
        10 => SlaveSelect::Ss10,
        11 => SlaveSelect::Ss11,
        12 => SlaveSelect::Ss12,
        13 => SlaveSelect::Ss13,
        14 => SlaveSelect::Ss14,
        15 => SlaveSelect::Ss15,
        _ => return None,
    })
}

/// Open `spidev` handle. Chip select is driven by the kernel and stays asserted for a whole
/// transaction.
pub struct SpidevDevice {
    spi: Spi,
}

/// A `spidev` transfer that the kernel rejected or aborted.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct TransferError(#[from] rppal::spi::Error);

impl spi::Error for TransferError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for SpidevDevice {
    type Error = TransferError;
}

/// Delays between operations are summed and applied after the preceding segment while chip
/// select stays asserted. The kernel caps a segment's trailing delay at `u16::MAX` µs (about
/// 65.5 ms), so longer totals are clamped. A delay before the first operation is slept before
/// chip select is asserted.
impl SpiDevice for SpidevDevice {
    fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> std::result::Result<(), Self::Error> {
        // rppal needs separate buffers for both directions
        let outgoing: Vec<Vec<u8>> = operations
            .iter()
            .map(|operation| match operation {
                Operation::TransferInPlace(words) => words.to_vec(),
                _ => Vec::new(),
            })
            .collect();

        let mut segments: Vec<Segment<'_, '_>> = Vec::with_capacity(operations.len());
        let mut delays: Vec<u32> = Vec::with_capacity(operations.len());

        for (operation, scratch) in operations.iter_mut().zip(&outgoing) {
            let segment = match operation {
                Operation::Read(words) => Segment::with_read(words),
                Operation::Write(words) => Segment::with_write(words),
                Operation::Transfer(read, write) => Segment::new(read, write),
                Operation::TransferInPlace(words) => Segment::new(words, scratch),
                Operation::DelayNs(ns) => {
                    match delays.last_mut() {
                        Some(total) => *total = total.saturating_add(delay_micros(*ns)),
                        None => thread::sleep(Duration::from_nanos(u64::from(*ns))),
                    }

                    continue;
                }
            };

            segments.push(segment);
            delays.push(0);
        }

        for (segment, micros) in segments.iter_mut().zip(delays) {
            if micros > 0 {
                segment.set_delay(segment_delay(micros));
            }
        }

        self.spi.transfer_segments(&segments)?;

        Ok(())
    }
}

fn delay_micros(ns: u32) -> u32 {
    ns.div_ceil(1_000)
}

fn segment_delay(micros: u32) -> u16 {
    u16::try_from(micros).unwrap_or(u16::MAX)
}
