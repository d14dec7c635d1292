use std::fmt;
use std::io;

use xerxes_frame::FrameError;
use xerxes_memory::MemoryError;
use xerxes_node::NodeError;
use xerxes_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(USAGE, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound | io::ErrorKind::NotConnected => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Open { source, .. } if source.kind() == io::ErrorKind::PermissionDenied => {
            io_error(context, source)
        }
        TransportError::UnsupportedBaudRate(_) => CliError::usage(format!("{context}: {err}")),
        TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::Timeout => CliError::new(TIMEOUT, format!("{context}: {err}")),
        FrameError::IncompleteMessage { .. }
        | FrameError::Checksum { .. }
        | FrameError::UnknownMessageKind(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        FrameError::PayloadTooLarge { .. }
        | FrameError::AddressOutOfRange(_)
        | FrameError::AddressLength(_) => CliError::usage(format!("{context}: {err}")),
    }
}

pub fn node_error(context: &str, err: NodeError) -> CliError {
    match err {
        NodeError::Transport(err) => transport_error(context, err),
        NodeError::Frame(err) => frame_error(context, err),
        NodeError::ChannelNotOpen { .. } => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
        NodeError::InvalidReply { .. } | NodeError::MalformedPayload { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn memory_error(context: &str, err: MemoryError<NodeError>) -> CliError {
    match err {
        MemoryError::Access(err) => node_error(context, err),
        MemoryError::UnknownRegister(_)
        | MemoryError::WriteRejected { .. }
        | MemoryError::KindMismatch { .. }
        | MemoryError::ValueOutOfRange { .. } => CliError::usage(format!("{context}: {err}")),
        MemoryError::WriteNotAcknowledged { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
        MemoryError::ShortRead { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_map_to_timeout_code() {
        let err = node_error("ping failed", NodeError::Frame(FrameError::Timeout));
        assert_eq!(err.code, TIMEOUT);
        assert!(err.message.starts_with("ping failed: "));
    }

    #[test]
    fn corrupt_frames_are_invalid_data() {
        let err = frame_error("read failed", FrameError::Checksum { residue: 2 });
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn read_only_write_is_usage() {
        let err = memory_error("write failed", MemoryError::WriteRejected { name: "uid" });
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn closed_link_is_transport_error() {
        let err = node_error(
            "send failed",
            NodeError::ChannelNotOpen {
                port: "/dev/ttyUSB0".into(),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
    }
}
