//! Host-side driver for the Xerxes multi-drop serial field bus.
//!
//! One root node (this host) talks to many addressed leaf devices over a
//! single half-duplex serial line, one request and one reply at a time.
//!
//! # Crate Structure
//!
//! - [`transport`]: serial link lifecycle, shared channels, tty and scripted channels
//! - [`frame`]: checksummed wire framing, addresses and message kinds
//! - [`memory`]: typed register map over a device's memory
//! - [`node`]: root and leaf nodes, ping, register exchange, averaging

/// Re-export transport types.
pub mod transport {
    pub use xerxes_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use xerxes_frame::*;
}

/// Re-export memory map types.
pub mod memory {
    pub use xerxes_memory::*;
}

/// Re-export node types.
pub mod node {
    pub use xerxes_node::*;
}

pub use xerxes_frame::{Address, Message, MessageKind};
pub use xerxes_node::{Leaf, NodeError, PingReply, Root};
