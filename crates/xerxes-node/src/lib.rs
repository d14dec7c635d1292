//! Root and leaf node model for the Xerxes field bus.
//!
//! A [`Root`] is this host's node: it owns an address and a handle to the
//! serial link, and performs addressed sends, broadcasts, pings and bus sync.
//! A [`Leaf`] is a remote device reached through a root. Every leaf operation
//! is one exchange: a request frame followed by exactly one blocking read of
//! the reply. Nothing is retried; timeouts and corrupt frames go back to the
//! caller.

pub mod device;
pub mod error;
pub mod leaf;
pub mod protocol;
pub mod record;
pub mod root;

#[cfg(test)]
pub(crate) mod emulator;

pub use device::{DeviceKind, PingReply};
pub use error::{NodeError, Result};
pub use leaf::Leaf;
pub use protocol::{
    write_timeout, NV_WRITE_LATENCY_PER_BYTE, PROTOCOL_VERSION_MAJOR, PROTOCOL_VERSION_MINOR,
};
pub use record::{average, Record, ToRecord};
pub use root::Root;
