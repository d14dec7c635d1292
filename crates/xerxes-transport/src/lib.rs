//! Serial link abstraction for the Xerxes field bus.
//!
//! The bus is single-master and half-duplex: the root writes a frame and then
//! blocks on the link until a reply arrives or the read timeout expires. This
//! crate provides the pieces the protocol layers need from the link:
//! - the [`Channel`] contract (byte stream with a mutable read timeout)
//! - [`BusChannel`], which adds the open/closed lifecycle on top of it
//! - [`SharedChannel`] and [`ChannelRegistry`] so one physical port maps to
//!   exactly one channel instance
//! - [`TtyChannel`] for serial device nodes on Unix
//! - [`ScriptedChannel`] for driving the protocol without hardware

pub mod error;
pub mod link;
pub mod registry;
pub mod scripted;
pub mod traits;

#[cfg(unix)]
pub mod tty;

pub use error::{Result, TransportError};
pub use link::{BusChannel, LinkState, SharedChannel};
pub use registry::ChannelRegistry;
pub use scripted::{ScriptedChannel, ScriptedHandle};
pub use traits::{Channel, LinkConfig, DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};

#[cfg(unix)]
pub use tty::TtyChannel;
