//! Checksummed wire framing for the Xerxes field bus.
//!
//! Every message on the bus is one frame:
//! - `SOH` (0x01) start-of-header byte for stream synchronization
//! - `LEN`: total frame length including SOH and checksum
//! - source and destination addresses, one byte each
//! - a 2-byte little-endian message kind followed by operation data
//! - a checksum byte making the byte sum of the whole frame zero mod 256
//!
//! Decoding is a blocking, byte-at-a-time read from the link that surfaces
//! timeouts, short frames and corrupt frames as distinct errors.

pub mod address;
pub mod codec;
pub mod error;
pub mod kind;
pub mod message;
pub mod reader;
pub mod writer;

pub use address::Address;
pub use codec::{
    checksum, encode_frame, frame_bytes, FRAME_OVERHEAD, HEADER_SIZE, MAX_PAYLOAD, SOH,
};
pub use error::{FrameError, Result};
pub use kind::{request, MessageKind};
pub use message::Message;
pub use reader::read_message;
pub use writer::write_message;
