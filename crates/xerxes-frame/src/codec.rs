use bytes::{BufMut, BytesMut};

use crate::address::Address;
use crate::error::{FrameError, Result};

/// Start-of-header byte opening every frame.
pub const SOH: u8 = 0x01;

/// SOH + LEN + SRC + DST.
pub const HEADER_SIZE: usize = 4;

/// Bytes a frame adds around its payload: header plus checksum.
///
/// `LEN` on the wire is `payload.len() + FRAME_OVERHEAD`, where the payload
/// starts with the two message-kind bytes.
pub const FRAME_OVERHEAD: usize = HEADER_SIZE + 1;

/// Largest payload (kind code + data) the one-byte length field can describe.
pub const MAX_PAYLOAD: usize = u8::MAX as usize - FRAME_OVERHEAD;

/// Two's-complement checksum: the byte that makes the sum of `bytes` plus
/// itself zero mod 256.
pub fn checksum(bytes: &[u8]) -> u8 {
    let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    sum.wrapping_neg()
}

/// Encode a frame into the wire format.
///
/// `payload` must already start with the 2-byte message kind.
///
/// Wire format:
/// ```text
/// ┌──────┬───────┬──────┬──────┬───────────────────────────┬──────┐
/// │ SOH  │ LEN   │ SRC  │ DST  │ Payload                   │ CHK  │
/// │ 0x01 │ (1B)  │ (1B) │ (1B) │ kind (2B LE) + data       │ (1B) │
/// └──────┴───────┴──────┴──────┴───────────────────────────┴──────┘
/// ```
pub fn encode_frame(
    source: Address,
    destination: Address,
    payload: &[u8],
    dst: &mut BytesMut,
) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }

    let start = dst.len();
    dst.reserve(payload.len() + FRAME_OVERHEAD);
    dst.put_u8(SOH);
    dst.put_u8((payload.len() + FRAME_OVERHEAD) as u8);
    dst.put_u8(source.value());
    dst.put_u8(destination.value());
    dst.put_slice(payload);
    let chk = checksum(&dst[start..]);
    dst.put_u8(chk);
    Ok(())
}

/// Encode a single frame into a fresh buffer.
pub fn frame_bytes(source: Address, destination: Address, payload: &[u8]) -> Result<BytesMut> {
    let mut buf = BytesMut::with_capacity(payload.len() + FRAME_OVERHEAD);
    encode_frame(source, destination, payload, &mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::kind::{request, MessageKind};

    fn frame_sum(frame: &[u8]) -> u8 {
        frame.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
    }

    #[test]
    fn checksum_of_empty_is_zero() {
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn checksum_known_values() {
        assert_eq!(checksum(&[0x01]), 0xFF);
        assert_eq!(checksum(&[0x80, 0x80]), 0x00);
        assert_eq!(checksum(&[0xFF, 0x02]), 0xFF);
    }

    #[test]
    fn encode_ping_frame_layout() {
        let frame = frame_bytes(
            Address::new(0x00),
            Address::new(0x01),
            &request(MessageKind::Ping, &[]),
        )
        .unwrap();

        // SOH, LEN = 2 + 5, SRC, DST, kind LE, CHK
        assert_eq!(frame.as_ref(), &[0x01, 0x07, 0x00, 0x01, 0x00, 0x00, 0xF7]);
        assert_eq!(frame_sum(&frame), 0);
    }

    #[test]
    fn encode_appends_to_existing_buffer() {
        let mut buf = BytesMut::from(&b"junk"[..]);
        encode_frame(Address::new(1), Address::new(2), &[0x02, 0x00], &mut buf).unwrap();

        assert_eq!(&buf[..4], b"junk");
        assert_eq!(frame_sum(&buf[4..]), 0);
    }

    #[test]
    fn payload_size_limit() {
        let ok = vec![0u8; MAX_PAYLOAD];
        let frame = frame_bytes(Address::new(0), Address::new(1), &ok).unwrap();
        assert_eq!(frame[1], 0xFF);
        assert_eq!(frame.len(), 255);

        let too_big = vec![0u8; MAX_PAYLOAD + 1];
        let err = frame_bytes(Address::new(0), Address::new(1), &too_big).unwrap_err();
        assert!(matches!(
            err,
            FrameError::PayloadTooLarge { size: 251, max: 250 }
        ));
    }

    proptest! {
        #[test]
        fn appended_checksum_zeroes_the_sum(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
            let mut with_chk = bytes.clone();
            with_chk.push(checksum(&bytes));
            prop_assert_eq!(frame_sum(&with_chk), 0);
        }

        #[test]
        fn encoded_frames_sum_to_zero(
            src in any::<u8>(),
            dst in any::<u8>(),
            payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD),
        ) {
            let frame = frame_bytes(Address::new(src), Address::new(dst), &payload).unwrap();
            prop_assert_eq!(frame_sum(&frame), 0);
            prop_assert_eq!(frame[1] as usize, payload.len() + FRAME_OVERHEAD);
            prop_assert_eq!(frame.len(), payload.len() + FRAME_OVERHEAD);
        }
    }
}
