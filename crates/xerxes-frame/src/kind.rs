//! Message kinds carried in the first two payload bytes of every frame.

use std::fmt;

use crate::error::FrameError;

/// Protocol operation identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum MessageKind {
    /// Presence and version probe.
    Ping = 0x0000,
    /// Reply to [`Ping`](Self::Ping): device kind, protocol major, protocol minor.
    PingReply = 0x0001,
    /// Generic positive acknowledgement.
    AckOk = 0x0002,
    /// Generic negative acknowledgement.
    AckNok = 0x0003,
    /// Put the device to sleep.
    Sleep = 0x0004,
    /// Hardware reset.
    ResetHard = 0x00FE,
    /// Restart the device firmware.
    ResetSoft = 0x00FF,
    /// Request the latest measurement values.
    FetchMeasurement = 0x0100,
    /// Bus-wide synchronization pulse, broadcast only.
    Sync = 0x0101,
    /// Write bytes into the register space.
    Write = 0x0200,
    /// Request a byte range of the register space.
    ReadRequest = 0x0201,
    /// Reply carrying a requested byte range.
    ReadReply = 0x0202,
}

impl MessageKind {
    pub const ALL: [MessageKind; 12] = [
        MessageKind::Ping,
        MessageKind::PingReply,
        MessageKind::AckOk,
        MessageKind::AckNok,
        MessageKind::Sleep,
        MessageKind::ResetHard,
        MessageKind::ResetSoft,
        MessageKind::FetchMeasurement,
        MessageKind::Sync,
        MessageKind::Write,
        MessageKind::ReadRequest,
        MessageKind::ReadReply,
    ];

    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Little-endian wire form.
    pub const fn to_bytes(self) -> [u8; 2] {
        self.code().to_le_bytes()
    }

    pub fn name(self) -> &'static str {
        match self {
            MessageKind::Ping => "PING",
            MessageKind::PingReply => "PING_REPLY",
            MessageKind::AckOk => "ACK_OK",
            MessageKind::AckNok => "ACK_NOK",
            MessageKind::Sleep => "SLEEP",
            MessageKind::ResetHard => "RESET_HARD",
            MessageKind::ResetSoft => "RESET_SOFT",
            MessageKind::FetchMeasurement => "FETCH_MEASUREMENT",
            MessageKind::Sync => "SYNC",
            MessageKind::Write => "WRITE",
            MessageKind::ReadRequest => "READ_REQ",
            MessageKind::ReadReply => "READ_REPLY",
        }
    }
}

impl TryFrom<u16> for MessageKind {
    type Error = FrameError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        MessageKind::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(FrameError::UnknownMessageKind(code))
    }
}

impl From<MessageKind> for u16 {
    fn from(kind: MessageKind) -> Self {
        kind.code()
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:04x})", self.name(), self.code())
    }
}

/// Build a frame payload: the kind code followed by operation data.
pub fn request(kind: MessageKind, data: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(2 + data.len());
    payload.extend_from_slice(&kind.to_bytes());
    payload.extend_from_slice(data);
    payload
}
