use std::io::{Read, Write};
use std::time::Duration;

use crate::error::Result;

/// Default line speed of Xerxes devices.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default read timeout for a single byte on the bus.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(20);

/// Line settings applied when a link is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkConfig {
    /// Line speed in bits per second.
    pub baud_rate: u32,
    /// How long a read may block before returning zero bytes.
    pub read_timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// A byte-oriented duplex stream to the bus.
///
/// `read` must return fewer bytes than requested, including zero, once the
/// configured read timeout expires instead of blocking indefinitely.
/// Implementations may also report the timeout as `WouldBlock` or `TimedOut`;
/// [`BusChannel`](crate::BusChannel) folds both into a zero-length read.
pub trait Channel: Read + Write + Send {
    /// Apply line speed and read timeout.
    fn configure(&mut self, config: &LinkConfig) -> Result<()>;

    /// Change only the read timeout.
    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Release the underlying device. Default: nothing to release.
    fn shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}
