use std::{
    fs::{File, OpenOptions},
    os::unix::fs::OpenOptionsExt,
    path::{Path, PathBuf},
    pin::Pin,
};

use async_stream::stream;
use futures::Stream;
use nix::{
    errno::Errno,
    sys::termios::{self, BaudRate, SetArg},
};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, info, instrument, warn};

use super::RemoteError;

/// Stream of raw tokens, one per received line.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, RemoteError>> + Send>>;

/// Serial device the infrared receiver writes to.
#[derive(Debug)]
pub struct SerialPort {
    path: PathBuf,
    file: File,
}

impl SerialPort {
    /// Opens `path` read-only and configures it for raw input at `baud_rate`.
    ///
    /// Line setup is skipped for paths that are not terminals, so a FIFO or
    /// plain file can stand in for the receiver.
    ///
    /// # Errors
    /// Returns error if the device cannot be opened or configured
    #[instrument]
    pub fn open(path: &Path, baud_rate: u32) -> Result<Self, RemoteError> {
        let speed = baud_rate_constant(baud_rate)?;

        let file = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NOCTTY)
            .open(path)
            .map_err(|e| RemoteError::Open {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?;

        configure_line(&file, path, speed)?;
        info!("Opened serial device");

        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Device path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consumes the port and yields one token per received line.
    pub fn into_tokens(self) -> TokenStream {
        read_tokens(tokio::fs::File::from_std(self.file))
    }
}

fn configure_line(file: &File, path: &Path, speed: BaudRate) -> Result<(), RemoteError> {
    let setup_error = |e: Errno| RemoteError::PortSetup {
        path: path.to_path_buf(),
        details: e.to_string(),
    };

    let mut settings = match termios::tcgetattr(file) {
        Ok(settings) => settings,
        Err(Errno::ENOTTY) => {
            warn!(path = %path.display(), "Device is not a terminal, skipping line setup");
            return Ok(());
        }
        Err(e) => return Err(setup_error(e)),
    };

    termios::cfmakeraw(&mut settings);
    termios::cfsetspeed(&mut settings, speed).map_err(setup_error)?;
    termios::tcsetattr(file, SetArg::TCSANOW, &settings).map_err(setup_error)?;

    debug!(path = %path.display(), ?speed, "Configured serial line");
    Ok(())
}

/// Terminal speed constant for a numeric baud rate.
///
/// # Errors
/// Returns `RemoteError::UnsupportedBaudRate` for rates without a constant
pub fn baud_rate_constant(rate: u32) -> Result<BaudRate, RemoteError> {
    let speed = match rate {
        1200 => BaudRate::B1200,
        2400 => BaudRate::B2400,
        4800 => BaudRate::B4800,
        9600 => BaudRate::B9600,
        19200 => BaudRate::B19200,
        38400 => BaudRate::B38400,
        57600 => BaudRate::B57600,
        115200 => BaudRate::B115200,
        230400 => BaudRate::B230400,
        _ => return Err(RemoteError::UnsupportedBaudRate(rate)),
    };

    Ok(speed)
}

/// Splits `reader` into newline-terminated tokens.
///
/// Surrounding whitespace (including the `\r` of `\r\n` line endings) is
/// trimmed, blank lines are skipped and invalid UTF-8 is replaced rather
/// than treated as an error. The stream ends at end of input or after the
/// first read error.
pub fn read_tokens<R>(reader: R) -> TokenStream
where
    R: AsyncRead + Unpin + Send + 'static,
{
    Box::pin(stream! {
        let mut reader = BufReader::new(reader);
        let mut line = Vec::new();

        loop {
            line.clear();
            let read = match reader.read_until(b'\n', &mut line).await {
                Ok(read) => read,
                Err(e) => {
                    yield Err(RemoteError::Read(e));
                    break;
                }
            };
            if read == 0 {
                break;
            }

            let text = String::from_utf8_lossy(&line);
            let token = text.trim();
            if token.is_empty() {
                continue;
            }

            yield Ok(token.to_string());
        }
    })
}
