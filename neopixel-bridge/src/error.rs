//! Errors raised while bringing the bridge up or talking to the controller.
//!
//! Opening the serial device fails with [`Error::Serial`], writing to it
//! with [`Error::Io`], and a bad config file or environment override with
//! [`Error::Config`].

use thiserror::Error;

/// Error type for the driver, configuration and API server.
#[derive(Error, Debug)]
pub enum Error {
    /// Write to the device or API socket failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial device could not be opened
    #[error("Serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// Unreadable or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result with the bridge [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
