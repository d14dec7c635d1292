use std::time::Duration;

use bytes::Bytes;

use crate::address::Address;
use crate::codec::FRAME_OVERHEAD;
use crate::kind::MessageKind;

/// A decoded frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub source: Address,
    pub destination: Address,
    /// `LEN` byte as received: kind + data length plus the frame overhead.
    pub length: u8,
    pub kind: MessageKind,
    /// Operation data following the kind code.
    pub payload: Bytes,
    /// Time from the first byte read until the checksum byte arrived.
    pub latency: Duration,
    /// Byte sum of the whole frame mod 256; zero for every accepted message.
    pub residue: u8,
}

impl Message {
    /// Kind code plus operation data length implied by `length`.
    pub fn declared_payload_len(&self) -> usize {
        (self.length as usize).saturating_sub(FRAME_OVERHEAD)
    }

    /// Operation data as consecutive little-endian `f32` values.
    ///
    /// `None` if the data length is not a multiple of four.
    pub fn payload_f32_le(&self) -> Option<Vec<f32>> {
        if self.payload.len() % 4 != 0 {
            return None;
        }
        Some(
            self.payload
                .chunks_exact(4)
                .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(payload: &[u8]) -> Message {
        Message {
            source: Address::new(1),
            destination: Address::new(0),
            length: (payload.len() + 2 + FRAME_OVERHEAD) as u8,
            kind: MessageKind::FetchMeasurement,
            payload: Bytes::copy_from_slice(payload),
            latency: Duration::ZERO,
            residue: 0,
        }
    }

    #[test]
    fn declared_payload_len_includes_kind() {
        let msg = message(&[1, 2, 3]);
        assert_eq!(msg.declared_payload_len(), 5);
        assert_eq!(msg.declared_payload_len() - 2, msg.payload.len());
    }

    #[test]
    fn unpacks_float_payload() {
        let mut data = Vec::new();
        data.extend_from_slice(&1.5f32.to_le_bytes());
        data.extend_from_slice(&(-2.25f32).to_le_bytes());

        assert_eq!(message(&data).payload_f32_le(), Some(vec![1.5, -2.25]));
        assert_eq!(message(&[]).payload_f32_le(), Some(Vec::new()));
    }

    #[test]
    fn partial_float_is_rejected() {
        let mut data = 1.5f32.to_le_bytes().to_vec();
        data.push(0xEE);

        assert_eq!(message(&data).payload_f32_le(), None);
    }
}
