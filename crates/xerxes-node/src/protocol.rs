//! Protocol constants shared by root and leaf.

use std::time::Duration;

pub const PROTOCOL_VERSION_MAJOR: u8 = 1;
pub const PROTOCOL_VERSION_MINOR: u8 = 4;

/// Time a device needs to commit one byte to non-volatile memory.
pub const NV_WRITE_LATENCY_PER_BYTE: Duration = Duration::from_millis(10);

/// Reply window for a register write whose request payload is
/// `payload_len` bytes long (kind and offset included).
pub fn write_timeout(payload_len: usize) -> Duration {
    NV_WRITE_LATENCY_PER_BYTE.saturating_mul(u32::try_from(payload_len).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_timeout_scales_with_payload() {
        assert_eq!(write_timeout(0), Duration::ZERO);
        assert_eq!(write_timeout(8), Duration::from_millis(80));
    }
}
