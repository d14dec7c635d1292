use std::io::{ErrorKind, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::error::{Result, TransportError};
use crate::traits::{Channel, LinkConfig};

/// Lifecycle state of a [`BusChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Closed,
    Open,
}

/// A serial link with an explicit open/closed lifecycle.
///
/// Created closed. [`open`](Self::open) applies a [`LinkConfig`] and moves it
/// to [`LinkState::Open`]; every read or write on a closed link fails with
/// [`TransportError::NotOpen`]. There is no reconnect state: errors surface
/// to the caller, who decides whether to retry.
pub struct BusChannel {
    port: String,
    inner: Box<dyn Channel>,
    config: LinkConfig,
    state: LinkState,
}

impl BusChannel {
    /// Wrap a channel for `port`. The link starts closed.
    pub fn new(port: impl Into<String>, inner: impl Channel + 'static) -> Self {
        Self {
            port: port.into(),
            inner: Box::new(inner),
            config: LinkConfig::default(),
            state: LinkState::Closed,
        }
    }

    /// Apply `config` and open the link.
    ///
    /// Opening an already open link re-applies the configuration.
    pub fn open(&mut self, config: LinkConfig) -> Result<()> {
        self.inner.configure(&config)?;
        self.config = config;
        self.state = LinkState::Open;
        debug!(
            port = %self.port,
            baud_rate = config.baud_rate,
            read_timeout = ?config.read_timeout,
            "link opened"
        );
        Ok(())
    }

    /// Close the link. Closing a closed link is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if self.state == LinkState::Closed {
            return Ok(());
        }
        self.state = LinkState::Closed;
        debug!(port = %self.port, "link closed");
        self.inner.shutdown()
    }

    pub fn is_open(&self) -> bool {
        self.state == LinkState::Open
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Port identifier this link was created for.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Settings applied by the last `open` or reconfiguration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    pub fn read_timeout(&self) -> Duration {
        self.config.read_timeout
    }

    /// Change the read timeout of an open link.
    pub fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.ensure_open()?;
        self.inner.set_read_timeout(timeout)?;
        self.config.read_timeout = timeout;
        Ok(())
    }

    /// Change the line speed of an open link.
    pub fn set_baud_rate(&mut self, baud_rate: u32) -> Result<()> {
        self.ensure_open()?;
        let config = LinkConfig {
            baud_rate,
            ..self.config
        };
        self.inner.configure(&config)?;
        self.config = config;
        Ok(())
    }

    /// Run `f` with a temporary read timeout, then restore the previous one.
    ///
    /// The previous timeout is restored even when `f` fails. A failed restore
    /// is logged and does not replace the result of `f`.
    pub fn with_read_timeout<T, E>(
        &mut self,
        timeout: Duration,
        f: impl FnOnce(&mut Self) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: From<TransportError>,
    {
        let previous = self.config.read_timeout;
        self.set_read_timeout(timeout)?;
        let result = f(self);
        if let Err(err) = self.set_read_timeout(previous) {
            warn!(port = %self.port, error = %err, "failed to restore read timeout");
        }
        result
    }

    /// Read a single byte. `Ok(None)` means the read timed out.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(err) if err.kind() == ErrorKind::NotConnected => Err(self.not_open()),
            Err(err) => Err(TransportError::Io(err)),
        }
    }

    /// Write every byte of `bytes` to the link.
    pub fn send_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_open()?;
        self.inner.write_all(bytes)?;
        self.inner.flush()?;
        trace!(port = %self.port, len = bytes.len(), "bytes written");
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(self.not_open())
        }
    }

    fn not_open(&self) -> TransportError {
        TransportError::NotOpen {
            port: self.port.clone(),
        }
    }
}

impl Read for BusChannel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if !self.is_open() {
            return Err(std::io::Error::new(
                ErrorKind::NotConnected,
                format!("channel {} is not open", self.port),
            ));
        }
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    return Ok(0)
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Write for BusChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !self.is_open() {
            return Err(std::io::Error::new(
                ErrorKind::NotConnected,
                format!("channel {} is not open", self.port),
            ));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl Drop for BusChannel {
    fn drop(&mut self) {
        if self.is_open() {
            let _ = self.close();
        }
    }
}

impl std::fmt::Debug for BusChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusChannel")
            .field("port", &self.port)
            .field("state", &self.state)
            .field("config", &self.config)
            .finish()
    }
}

/// Reference-counted handle to one [`BusChannel`].
///
/// Every root talking over the same physical port holds a clone of the same
/// handle. Access is serialized by a mutex held for one operation at a time;
/// the protocol itself is strictly request/reply, so callers must not
/// reconfigure the link while an exchange is in flight.
#[derive(Clone, Debug)]
pub struct SharedChannel {
    inner: Arc<Mutex<BusChannel>>,
}

impl SharedChannel {
    pub fn new(channel: BusChannel) -> Self {
        Self {
            inner: Arc::new(Mutex::new(channel)),
        }
    }

    /// Lock the link for one operation.
    ///
    /// A panic in a previous holder does not leave the link in a torn state
    /// (every operation is a whole write or a whole read), so poisoning is
    /// ignored.
    pub fn lock(&self) -> MutexGuard<'_, BusChannel> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// True if both handles refer to the same channel instance.
    pub fn ptr_eq(&self, other: &SharedChannel) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of live handles to this channel.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl From<BusChannel> for SharedChannel {
    fn from(channel: BusChannel) -> Self {
        Self::new(channel)
    }
}
