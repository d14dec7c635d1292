use crate::element::{LogicalKind, Value};

/// Errors that can occur while reading or writing registers.
///
/// `E` is the error type of the underlying [`RegisterAccess`](crate::RegisterAccess).
#[derive(Debug, thiserror::Error)]
pub enum MemoryError<E> {
    /// No register with this name in the layout.
    #[error("unknown register '{0}'")]
    UnknownRegister(String),

    /// Attempted write to a read-only register.
    #[error("register '{name}' is read-only")]
    WriteRejected { name: &'static str },

    /// The value's host kind does not match the register's element type.
    #[error("register '{name}' holds {expected} values, got {found}")]
    KindMismatch {
        name: &'static str,
        expected: LogicalKind,
        found: LogicalKind,
    },

    /// The value does not fit the register's wire encoding.
    #[error("value {value} does not fit register '{name}'")]
    ValueOutOfRange { name: &'static str, value: Value },

    /// The device did not acknowledge the write; the register state is unknown.
    #[error("write to register '{name}' was not acknowledged")]
    WriteNotAcknowledged { name: &'static str },

    /// The device returned a byte range of the wrong size.
    #[error("register '{name}' read returned {got} bytes, expected {expected}")]
    ShortRead {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    /// The read or write primitive itself failed.
    #[error("register access failed: {0}")]
    Access(#[source] E),
}

/// Errors found while validating a register layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Two registers share at least one byte.
    #[error("registers '{first}' and '{second}' overlap")]
    Overlap {
        first: &'static str,
        second: &'static str,
    },

    /// Two registers share a name.
    #[error("duplicate register name '{0}'")]
    DuplicateName(&'static str),
}
