/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// No start-of-header byte arrived within the read timeout.
    #[error("timed out waiting for start of message")]
    Timeout,

    /// The link went quiet after the start-of-header byte.
    #[error("incomplete message: missing {field}")]
    IncompleteMessage { field: &'static str },

    /// The byte sum of the received frame is not zero mod 256.
    #[error("invalid checksum (residue 0x{residue:02x})")]
    Checksum { residue: u8 },

    /// The payload does not fit the one-byte length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The frame is intact but carries a message kind this crate does not know.
    #[error("unknown message kind 0x{0:04x}")]
    UnknownMessageKind(u16),

    /// An address outside 0..=255.
    #[error("address {0} out of range (0..=255)")]
    AddressOutOfRange(i64),

    /// An address built from a byte slice that is not exactly one byte long.
    #[error("address must be exactly one byte, got {0}")]
    AddressLength(usize),

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    /// Conditions a caller may clear by retrying the whole exchange.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FrameError::Timeout
                | FrameError::IncompleteMessage { .. }
                | FrameError::Checksum { .. }
                | FrameError::UnknownMessageKind(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
