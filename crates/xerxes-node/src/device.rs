use std::fmt;
use std::time::Duration;

use serde::{Serialize, Serializer};
use xerxes_frame::{Message, MessageKind};

use crate::error::{NodeError, Result};
use crate::protocol::{PROTOCOL_VERSION_MAJOR, PROTOCOL_VERSION_MINOR};

/// Device family reported in a ping reply.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceKind(pub u8);

impl DeviceKind {
    pub const PRESSURE_600MBAR_2TEMP: DeviceKind = DeviceKind(0x03);
    pub const PRESSURE_60MBAR_2TEMP: DeviceKind = DeviceKind(0x04);
    pub const STRAIN_24BIT: DeviceKind = DeviceKind(0x11);
    pub const IO_8DI_8DO: DeviceKind = DeviceKind(0x20);
    pub const ANGLE_XY_90: DeviceKind = DeviceKind(0x30);
    pub const ANGLE_XY_30: DeviceKind = DeviceKind(0x31);
    pub const DIST_225MM: DeviceKind = DeviceKind(0x40);
    pub const DIST_15MM: DeviceKind = DeviceKind(0x41);
    pub const DIST_100MM: DeviceKind = DeviceKind(0x42);

    const KNOWN: [(DeviceKind, &'static str); 9] = [
        (Self::PRESSURE_600MBAR_2TEMP, "pressure_600mbar_2temp"),
        (Self::PRESSURE_60MBAR_2TEMP, "pressure_60mbar_2temp"),
        (Self::STRAIN_24BIT, "strain_24bit"),
        (Self::IO_8DI_8DO, "io_8di_8do"),
        (Self::ANGLE_XY_90, "angle_xy_90"),
        (Self::ANGLE_XY_30, "angle_xy_30"),
        (Self::DIST_225MM, "dist_225mm"),
        (Self::DIST_15MM, "dist_15mm"),
        (Self::DIST_100MM, "dist_100mm"),
    ];

    pub const fn code(self) -> u8 {
        self.0
    }

    /// Name of a well-known device family.
    pub fn name(self) -> Option<&'static str> {
        Self::KNOWN
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "device(0x{:02x})", self.0),
        }
    }
}

impl fmt::Debug for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceKind(0x{:02x})", self.0)
    }
}

impl Serialize for DeviceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Answer to a ping: who the device is and which protocol it speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PingReply {
    pub device: DeviceKind,
    pub version_major: u8,
    pub version_minor: u8,
    /// Wall-clock time from sending the ping to decoding the reply.
    #[serde(serialize_with = "as_seconds")]
    pub latency: Duration,
}

impl PingReply {
    /// Parse a ping reply message. Any other kind is an invalid reply.
    pub fn from_message(message: &Message, latency: Duration) -> Result<Self> {
        if message.kind != MessageKind::PingReply {
            return Err(NodeError::InvalidReply {
                expected: MessageKind::PingReply,
                got: message.kind,
            });
        }
        match message.payload.as_ref() {
            &[device, version_major, version_minor] => Ok(Self {
                device: DeviceKind(device),
                version_major,
                version_minor,
                latency,
            }),
            other => Err(NodeError::MalformedPayload {
                kind: MessageKind::PingReply,
                expected: 3,
                got: other.len(),
            }),
        }
    }

    /// Protocol version as `major.minor`.
    pub fn version(&self) -> String {
        format!("{}.{}", self.version_major, self.version_minor)
    }

    /// True if the device speaks the protocol version this crate implements.
    pub fn is_current(&self) -> bool {
        self.version_major == PROTOCOL_VERSION_MAJOR && self.version_minor == PROTOCOL_VERSION_MINOR
    }
}

fn as_seconds<S: Serializer>(latency: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_f64(latency.as_secs_f64())
}
