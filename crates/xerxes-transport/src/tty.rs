use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{Channel, LinkConfig, DEFAULT_READ_TIMEOUT};

/// Serial device node (e.g. `/dev/ttyUSB0`) in raw mode.
///
/// The line is put into raw 8N1 mode with `VMIN = VTIME = 0`; read timeouts
/// are enforced with `poll(2)` so they keep millisecond resolution instead of
/// the tenth-of-a-second granularity of `VTIME`.
///
/// [`Channel::shutdown`] releases the descriptor; the next
/// [`Channel::configure`] reopens the device.
pub struct TtyChannel {
    file: Option<File>,
    path: PathBuf,
    read_timeout: Duration,
}

impl TtyChannel {
    /// Open a serial device without applying line settings yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = open_device(&path)?;
        Ok(Self {
            file: Some(file),
            path,
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True while the device descriptor is held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    fn file(&self) -> std::io::Result<&File> {
        self.file.as_ref().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                format!("{} is shut down", self.path.display()),
            )
        })
    }

    /// Transport name for diagnostics.
    pub fn transport_name(&self) -> &'static str {
        "tty"
    }

    fn configure_error(&self, source: std::io::Error) -> TransportError {
        TransportError::Configure {
            port: self.path.display().to_string(),
            source,
        }
    }

    /// Block until the device is readable or the timeout expires.
    fn wait_readable(&self) -> std::io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.file()?.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = self.read_timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;

        // SAFETY: `pfd` is a valid pollfd for an open descriptor owned by `self.file`,
        // and we pass exactly one entry.
        let rc = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        match rc {
            0 => Ok(false),
            n if n > 0 => Ok(true),
            _ => Err(std::io::Error::last_os_error()),
        }
    }
}

impl Read for TtyChannel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if buf.is_empty() || !self.wait_readable()? {
            return Ok(0);
        }
        self.file()?.read(buf)
    }
}

impl Write for TtyChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let fd = self.file()?.as_raw_fd();
        // SAFETY: `fd` belongs to the file held in `self.file`.
        let rc = unsafe { libc::tcdrain(fd) };
        if rc == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

impl Channel for TtyChannel {
    fn configure(&mut self, config: &LinkConfig) -> Result<()> {
        let speed = baud_to_speed(config.baud_rate)?;
        if self.file.is_none() {
            self.file = Some(open_device(&self.path)?);
        }
        let fd = self.file().map_err(|err| self.configure_error(err))?.as_raw_fd();

        // SAFETY: termios is a plain C struct; tcgetattr fully initializes it on success.
        let mut tio: libc::termios = unsafe { std::mem::zeroed() };
        // SAFETY: `fd` is an open descriptor and `tio` is a valid, writable termios.
        if unsafe { libc::tcgetattr(fd, &mut tio) } != 0 {
            return Err(self.configure_error(std::io::Error::last_os_error()));
        }

        // SAFETY: `tio` was initialized by tcgetattr above.
        unsafe {
            libc::cfmakeraw(&mut tio);
            libc::cfsetispeed(&mut tio, speed);
            libc::cfsetospeed(&mut tio, speed);
        }
        tio.c_cflag |= libc::CLOCAL | libc::CREAD;
        tio.c_cflag &= !(libc::CSTOPB | libc::PARENB);
        tio.c_cc[libc::VMIN] = 0;
        tio.c_cc[libc::VTIME] = 0;

        // SAFETY: `fd` is open and `tio` is a fully initialized termios.
        if unsafe { libc::tcsetattr(fd, libc::TCSANOW, &tio) } != 0 {
            return Err(self.configure_error(std::io::Error::last_os_error()));
        }
        // SAFETY: `fd` is open; discarding stale input is harmless.
        unsafe {
            libc::tcflush(fd, libc::TCIFLUSH);
        }

        self.read_timeout = config.read_timeout;
        debug!(path = ?self.path, baud_rate = config.baud_rate, "configured serial line");
        Ok(())
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.read_timeout = timeout;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        if self.file.take().is_some() {
            info!(path = ?self.path, "released serial device");
        }
        Ok(())
    }
}

impl std::fmt::Debug for TtyChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtyChannel")
            .field("path", &self.path)
            .field("read_timeout", &self.read_timeout)
            .field("held", &self.is_held())
            .finish()
    }
}

fn open_device(path: &Path) -> Result<File> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .custom_flags(libc::O_NOCTTY | libc::O_CLOEXEC)
        .open(path)
        .map_err(|source| TransportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
    info!(?path, "opened serial device");
    Ok(file)
}

/// Map a numeric baud rate to its termios speed constant.
pub fn baud_to_speed(baud_rate: u32) -> Result<libc::speed_t> {
    let speed = match baud_rate {
        1_200 => libc::B1200,
        2_400 => libc::B2400,
        4_800 => libc::B4800,
        9_600 => libc::B9600,
        19_200 => libc::B19200,
        38_400 => libc::B38400,
        57_600 => libc::B57600,
        115_200 => libc::B115200,
        230_400 => libc::B230400,
        #[cfg(target_os = "linux")]
        460_800 => libc::B460800,
        #[cfg(target_os = "linux")]
        921_600 => libc::B921600,
        other => return Err(TransportError::UnsupportedBaudRate(other)),
    };
    Ok(speed)
}
