use std::io::{ErrorKind, Read};
use std::time::Instant;

use bytes::BytesMut;
use tracing::{debug, trace, warn};

use crate::address::Address;
use crate::codec::SOH;
use crate::error::{FrameError, Result};
use crate::kind::MessageKind;
use crate::message::Message;

/// Header bytes counted by `LEN` before the operation data: SOH, LEN, SRC,
/// DST and the two kind bytes. Together with the checksum byte this is the
/// 7 that `LEN` exceeds the operation data length by.
const PRE_DATA_LEN: usize = 6;

/// Read the next frame from `src` (blocking, one byte at a time).
///
/// Bytes before the start-of-header are discarded. A read that returns no
/// data before SOH is a [`FrameError::Timeout`]; after SOH it is a
/// [`FrameError::IncompleteMessage`]. Every byte read, checksum included,
/// must sum to zero mod 256 or the frame is rejected with
/// [`FrameError::Checksum`].
pub fn read_message<R: Read + ?Sized>(src: &mut R) -> Result<Message> {
    let started = Instant::now();

    let mut discarded = 0usize;
    loop {
        match read_byte(src)? {
            None => {
                if discarded > 0 {
                    debug!(discarded, "no start of message after line noise");
                }
                return Err(FrameError::Timeout);
            }
            Some(SOH) => break,
            Some(byte) => {
                discarded += 1;
                trace!(byte, "discarding byte before start of message");
            }
        }
    }
    let mut sum = SOH;

    let length = expect_byte(src, "length")?;
    let source = expect_byte(src, "source address")?;
    let destination = expect_byte(src, "destination address")?;
    let kind_lo = expect_byte(src, "message kind")?;
    let kind_hi = expect_byte(src, "message kind")?;
    for byte in [length, source, destination, kind_lo, kind_hi] {
        sum = sum.wrapping_add(byte);
    }

    let data_len = (length as usize).saturating_sub(PRE_DATA_LEN + 1);
    let mut payload = BytesMut::with_capacity(data_len);
    for _ in 0..data_len {
        let byte = expect_byte(src, "payload")?;
        sum = sum.wrapping_add(byte);
        payload.extend_from_slice(&[byte]);
    }

    let chk = expect_byte(src, "checksum")?;
    sum = sum.wrapping_add(chk);
    let latency = started.elapsed();

    if sum != 0 {
        warn!(residue = sum, length, "dropping frame with invalid checksum");
        return Err(FrameError::Checksum { residue: sum });
    }

    let code = u16::from_le_bytes([kind_lo, kind_hi]);
    let kind = MessageKind::try_from(code)?;

    let message = Message {
        source: Address::new(source),
        destination: Address::new(destination),
        length,
        kind,
        payload: payload.freeze(),
        latency,
        residue: sum,
    };
    debug!(
        src = %message.source,
        dst = %message.destination,
        kind = %message.kind,
        len = message.payload.len(),
        "received message"
    );
    Ok(message)
}

fn expect_byte<R: Read + ?Sized>(src: &mut R, field: &'static str) -> Result<u8> {
    read_byte(src)?.ok_or(FrameError::IncompleteMessage { field })
}

/// One byte from the link; `None` when the read times out.
fn read_byte<R: Read + ?Sized>(src: &mut R) -> Result<Option<u8>> {
    let mut byte = [0u8; 1];
    loop {
        match src.read(&mut byte) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(byte[0])),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Ok(None)
            }
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use proptest::prelude::*;
    use xerxes_transport::{BusChannel, LinkConfig, ScriptedChannel};

    use super::*;
    use crate::codec::{frame_bytes, MAX_PAYLOAD};
    use crate::kind::request;

    fn wire(src: u8, dst: u8, kind: MessageKind, data: &[u8]) -> Vec<u8> {
        frame_bytes(Address::new(src), Address::new(dst), &request(kind, data))
            .unwrap()
            .to_vec()
    }

    #[test]
    fn read_single_frame() {
        let bytes = wire(0x01, 0x00, MessageKind::PingReply, &[0x03, 1, 4]);
        let msg = read_message(&mut Cursor::new(bytes)).unwrap();

        assert_eq!(msg.source, Address::new(0x01));
        assert_eq!(msg.destination, Address::new(0x00));
        assert_eq!(msg.kind, MessageKind::PingReply);
        assert_eq!(msg.payload.as_ref(), &[0x03, 1, 4]);
        assert_eq!(msg.length, 10);
        assert_eq!(msg.residue, 0);
    }

    #[test]
    fn read_multiple_frames() {
        let mut bytes = wire(1, 0, MessageKind::AckOk, &[]);
        bytes.extend(wire(2, 0, MessageKind::ReadReply, &[9, 8, 7, 6]));
        let mut cursor = Cursor::new(bytes);

        let first = read_message(&mut cursor).unwrap();
        let second = read_message(&mut cursor).unwrap();

        assert_eq!((first.source, first.kind), (Address::new(1), MessageKind::AckOk));
        assert_eq!(second.payload.as_ref(), &[9, 8, 7, 6]);
    }

    #[test]
    fn skips_noise_before_start_of_message() {
        let mut bytes = vec![0x00, 0xFF, 0x55, 0x02];
        bytes.extend(wire(1, 0, MessageKind::AckOk, &[]));

        let msg = read_message(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(msg.kind, MessageKind::AckOk);
    }

    #[test]
    fn empty_stream_times_out() {
        let err = read_message(&mut Cursor::new(Vec::<u8>::new())).unwrap_err();
        assert!(matches!(err, FrameError::Timeout));
    }

    #[test]
    fn noise_only_times_out() {
        let err = read_message(&mut Cursor::new(vec![0x42, 0x43])).unwrap_err();
        assert!(matches!(err, FrameError::Timeout));
    }

    #[test]
    fn header_without_payload_is_incomplete() {
        // SOH, LEN, SRC, DST, kind (2 bytes), then silence.
        let bytes = vec![0x01, 0x0B, 0x01, 0x00, 0x02, 0x02];
        let err = read_message(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, FrameError::IncompleteMessage { field: "payload" }));
    }

    #[test]
    fn truncated_kind_is_incomplete() {
        let err = read_message(&mut Cursor::new(vec![0x01, 0x07, 0x01, 0x00, 0x01])).unwrap_err();
        assert!(matches!(
            err,
            FrameError::IncompleteMessage {
                field: "message kind"
            }
        ));
    }

    #[test]
    fn missing_checksum_is_incomplete() {
        let mut bytes = wire(1, 0, MessageKind::AckOk, &[]);
        bytes.pop();
        let err = read_message(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, FrameError::IncompleteMessage { field: "checksum" }));
    }

    #[test]
    fn corrupt_checksum_is_rejected() {
        let mut bytes = wire(1, 0, MessageKind::ReadReply, &[1, 2, 3, 4]);
        let last = bytes.len() - 1;
        bytes[last] = bytes[last].wrapping_add(1);

        let err = read_message(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, FrameError::Checksum { residue: 0x01 }));
    }

    #[test]
    fn unknown_kind_with_valid_checksum() {
        let bytes = frame_bytes(Address::new(1), Address::new(0), &[0xEF, 0xBE])
            .unwrap()
            .to_vec();
        let err = read_message(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, FrameError::UnknownMessageKind(0xBEEF)));
    }

    #[test]
    fn short_length_field_defers_to_checksum() {
        // LEN below the fixed overhead: no data bytes are read.
        let mut bytes = vec![0x01, 0x03, 0x01, 0x00, 0x02, 0x00];
        bytes.push(crate::codec::checksum(&bytes));
        let msg = read_message(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(msg.kind, MessageKind::AckOk);
        assert!(msg.payload.is_empty());
    }

    #[test]
    fn reads_from_bus_channel() {
        let channel = ScriptedChannel::new();
        channel
            .handle()
            .push_read(&wire(5, 0, MessageKind::AckOk, &[]));
        let mut link = BusChannel::new("scripted", channel);
        link.open(LinkConfig::default()).unwrap();

        let msg = read_message(&mut link).unwrap();
        assert_eq!(msg.source, Address::new(5));

        let err = read_message(&mut link).unwrap_err();
        assert!(matches!(err, FrameError::Timeout));
    }

    #[test]
    fn closed_bus_channel_is_an_io_error() {
        let mut link = BusChannel::new("scripted", ScriptedChannel::new());
        let err = read_message(&mut link).unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::NotConnected));
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn interrupted_read_retries() {
        let mut src = InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(wire(3, 0, MessageKind::AckNok, &[])),
        };
        let msg = read_message(&mut src).unwrap();
        assert_eq!(msg.kind, MessageKind::AckNok);
    }

    proptest! {
        #[test]
        fn decode_reproduces_encode(
            src in any::<u8>(),
            dst in any::<u8>(),
            data in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD - 2),
        ) {
            let bytes = wire(src, dst, MessageKind::Write, &data);
            let msg = read_message(&mut Cursor::new(bytes)).unwrap();

            prop_assert_eq!(msg.source, Address::new(src));
            prop_assert_eq!(msg.destination, Address::new(dst));
            prop_assert_eq!(msg.kind, MessageKind::Write);
            prop_assert_eq!(msg.payload.as_ref(), data.as_slice());
            prop_assert_eq!(msg.residue, 0);
        }

        // SOH and LEN flips change framing itself (resync or a different
        // read length); every other single-bit flip must be caught by the sum.
        #[test]
        fn single_bit_flip_is_a_checksum_error(
            data in proptest::collection::vec(any::<u8>(), 0..32),
            position in any::<proptest::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut bytes = wire(0x10, 0x20, MessageKind::ReadReply, &data);
            let index = 2 + position.index(bytes.len() - 2);
            bytes[index] ^= 1 << bit;

            let err = read_message(&mut Cursor::new(bytes)).unwrap_err();
            prop_assert!(matches!(err, FrameError::Checksum { .. }), "got {:?}", err);
        }
    }
}
