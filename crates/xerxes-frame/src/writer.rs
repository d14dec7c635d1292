use std::io::{ErrorKind, Write};

use tracing::debug;

use crate::address::Address;
use crate::codec::frame_bytes;
use crate::error::{FrameError, Result};

/// Encode one frame and write it to `dst` in full.
pub fn write_message<W: Write + ?Sized>(
    dst: &mut W,
    source: Address,
    destination: Address,
    payload: &[u8],
) -> Result<()> {
    let frame = frame_bytes(source, destination, payload)?;

    let mut offset = 0usize;
    while offset < frame.len() {
        match dst.write(&frame[offset..]) {
            Ok(0) => return Err(FrameError::Io(ErrorKind::WriteZero.into())),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
    loop {
        match dst.flush() {
            Ok(()) => break,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }

    debug!(
        src = %source,
        dst = %destination,
        len = frame.len(),
        "sent message"
    );
    Ok(())
}
