use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The device node could not be opened.
    #[error("cannot open SPI device {}: {reason}", .path.display())]
    TransportUnavailable { path: PathBuf, reason: String },

    /// Mode, word size or clock rate was rejected.
    #[error("invalid SPI configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid channel {0}, expected a value in 1..={}", mcp3208::CHANNEL_COUNT)]
    InvalidChannel(u8),

    #[error("hardware exchange did not complete: {0}")]
    TransferFailed(String),

    #[error("converter is closed")]
    NotOpen,
}

impl<E: std::fmt::Debug> From<mcp3208::Error<E>> for Error {
    fn from(err: mcp3208::Error<E>) -> Self {
        match err {
            mcp3208::Error::InvalidChannel(index) => Error::InvalidChannel(index),
            mcp3208::Error::Spi(err) => Error::TransferFailed(format!("{err:?}")),
        }
    }
}
