//! Samples a Microchip MCP3208 ADC over a Linux `spidev` bus.
//!
//! [`Driver`] owns the open bus handle and turns 1-based channel indices into 12-bit samples.
//! The bus itself is reached through a [`Connector`]; enable the `raspberry_pi` feature for the
//! `rppal` backed one.

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod sampler;

#[cfg(feature = "raspberry_pi")]
pub mod spidev;

pub use config::BusConfig;
pub use driver::{Connector, Driver};
pub use error::{Error, Result};
pub use mcp3208::{Channel, CHANNEL_COUNT, MAX_SAMPLE};
pub use sampler::{Sampler, StopHandle};

#[cfg(feature = "raspberry_pi")]
pub use spidev::{Spidev, SpidevDevice};
