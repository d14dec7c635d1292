use xerxes_frame::{FrameError, MessageKind};
use xerxes_transport::TransportError;

/// Errors that can occur in root and leaf operations.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    /// The link was used before it was opened.
    #[error("channel on {port} is not open")]
    ChannelNotOpen { port: String },

    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Frame-level error: timeout, incomplete frame, bad checksum.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A well-formed reply of the wrong kind.
    #[error("invalid reply: expected {expected}, got {got}")]
    InvalidReply {
        expected: MessageKind,
        got: MessageKind,
    },

    /// A reply of the right kind whose payload has the wrong size.
    #[error("malformed {kind} payload: expected {expected} bytes, got {got}")]
    MalformedPayload {
        kind: MessageKind,
        expected: usize,
        got: usize,
    },
}

impl NodeError {
    /// Conditions a caller may clear by retrying the whole exchange.
    ///
    /// Use-before-open and link failures are not recoverable this way.
    pub fn is_recoverable(&self) -> bool {
        match self {
            NodeError::Frame(err) => err.is_recoverable(),
            NodeError::InvalidReply { .. } | NodeError::MalformedPayload { .. } => true,
            NodeError::ChannelNotOpen { .. } | NodeError::Transport(_) => false,
        }
    }

    /// True if the device did not answer within the read timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, NodeError::Frame(FrameError::Timeout))
    }
}

pub type Result<T> = std::result::Result<T, NodeError>;
