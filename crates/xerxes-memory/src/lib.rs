//! Typed register map for Xerxes field-bus devices.
//!
//! A device exposes a byte-addressed register space split into three regions:
//! - non-volatile (offset 0): calibration and configuration kept across power cycles
//! - volatile (offset 256): live process values and running statistics
//! - read-only (offset 512): status, error and unique ID
//!
//! Registers are described by static tables ([`registers`]) and accessed
//! through a [`MemoryMap`] bound to two primitives, "read N bytes at offset"
//! and "write bytes at offset", supplied by whoever owns the connection to the
//! device ([`RegisterAccess`]). Nothing is cached: every get re-reads the
//! device and every set re-writes it.

pub mod element;
pub mod error;
pub mod layout;
pub mod map;
pub mod register;
pub mod registers;

pub use element::{ByteOrder, Element, ElementType, Encoding, LogicalKind, Value};
pub use error::{LayoutError, MemoryError};
pub use layout::RegisterLayout;
pub use map::{MemoryMap, RegisterAccess};
pub use register::{Region, Register, RegisterDescriptor};
