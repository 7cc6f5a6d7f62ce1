use std::{io, path::PathBuf};

/// Errors that can occur while reading the remote
#[derive(thiserror::Error, Debug)]
pub enum RemoteError {
    /// The serial device could not be opened
    #[error("failed to open serial device '{path}': {details}")]
    Open {
        /// Device path
        path: PathBuf,
        /// Error details
        details: String,
    },

    /// The serial device could not be configured
    #[error("failed to configure serial device '{path}': {details}")]
    PortSetup {
        /// Device path
        path: PathBuf,
        /// Error details
        details: String,
    },

    /// Baud rate the terminal layer has no constant for
    #[error("unsupported baud rate {0}")]
    UnsupportedBaudRate(u32),

    /// Reading from the device failed
    #[error("failed to read from serial device: {0}")]
    Read(#[from] io::Error),
}
