use std::fmt;
use std::hash::{Hash, Hasher};

use bytes::Bytes;
use tracing::debug;
use xerxes_frame::{request, Address, Message, MessageKind};
use xerxes_memory::{MemoryError, MemoryMap, RegisterAccess, RegisterLayout, Value};

use crate::device::PingReply;
use crate::error::{NodeError, Result};
use crate::protocol::write_timeout;
use crate::record::{self, Record, ToRecord};
use crate::root::Root;

/// A remote device reached through a [`Root`].
///
/// Two leaves are equal when their addresses are equal, whichever root they
/// go through.
pub struct Leaf<'r> {
    address: Address,
    root: &'r Root,
    layout: RegisterLayout,
}

impl<'r> Leaf<'r> {
    /// A leaf with the standard register layout.
    pub fn new(address: Address, root: &'r Root) -> Self {
        Self::with_layout(address, root, RegisterLayout::standard())
    }

    pub fn with_layout(address: Address, root: &'r Root, layout: RegisterLayout) -> Self {
        Self {
            address,
            root,
            layout,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn root(&self) -> &'r Root {
        self.root
    }

    pub fn ping(&self) -> Result<PingReply> {
        self.root.ping(self.address)
    }

    /// Send `payload` to this leaf and read exactly one reply.
    pub fn exchange(&self, payload: &[u8]) -> Result<Message> {
        self.root.exchange(self.address, payload, None)
    }

    /// Request `length` bytes at `offset`; returns the reply as received.
    pub fn read_register(&self, offset: u16, length: u8) -> Result<Message> {
        let [lo, hi] = offset.to_le_bytes();
        self.exchange(&request(MessageKind::ReadRequest, &[lo, hi, length]))
    }

    /// Write `data` at `offset`; returns the reply as received.
    ///
    /// The reply window grows with the payload, since the device commits
    /// non-volatile bytes one at a time before acknowledging.
    pub fn write_register(&self, offset: u16, data: &[u8]) -> Result<Message> {
        let mut operation = Vec::with_capacity(2 + data.len());
        operation.extend_from_slice(&offset.to_le_bytes());
        operation.extend_from_slice(data);
        let payload = request(MessageKind::Write, &operation);
        self.root
            .exchange(self.address, &payload, Some(write_timeout(payload.len())))
    }

    /// Named, typed view over this leaf's registers.
    pub fn memory(&self) -> MemoryMap<'_, &Self> {
        MemoryMap::new(&self.layout, self)
    }

    pub fn read_param(&self, name: &str) -> std::result::Result<Value, MemoryError<NodeError>> {
        self.memory().get(name)
    }

    pub fn write_param(
        &self,
        name: &str,
        value: impl Into<Value>,
    ) -> std::result::Result<(), MemoryError<NodeError>> {
        self.memory().set(name, value)
    }

    /// Restart the device. No reply is expected.
    pub fn reset_soft(&self) -> Result<()> {
        debug!(leaf = %self.address, "soft reset");
        self.root
            .send(self.address, &request(MessageKind::ResetSoft, &[]))
    }

    /// Fetch one measurement as raw little-endian `f32` values.
    ///
    /// Interpreting the values is up to the device-specific decoder.
    pub fn fetch_raw(&self) -> Result<Vec<f32>> {
        let reply = self.exchange(&request(MessageKind::FetchMeasurement, &[]))?;
        if reply.kind != MessageKind::FetchMeasurement {
            return Err(NodeError::InvalidReply {
                expected: MessageKind::FetchMeasurement,
                got: reply.kind,
            });
        }
        reply
            .payload_f32_le()
            .ok_or_else(|| NodeError::MalformedPayload {
                kind: MessageKind::FetchMeasurement,
                expected: reply.payload.len().next_multiple_of(4),
                got: reply.payload.len(),
            })
    }

    /// Field-wise mean of decoded samples. See [`record::average`].
    pub fn average<R: ToRecord>(samples: &[R]) -> Record {
        record::average(samples)
    }
}

impl RegisterAccess for Leaf<'_> {
    type Error = NodeError;

    fn read_register(&self, offset: u16, length: u8) -> Result<Bytes> {
        let reply = Leaf::read_register(self, offset, length)?;
        if reply.kind != MessageKind::ReadReply {
            return Err(NodeError::InvalidReply {
                expected: MessageKind::ReadReply,
                got: reply.kind,
            });
        }
        Ok(reply.payload)
    }

    fn write_register(&self, offset: u16, data: &[u8]) -> Result<bool> {
        let reply = Leaf::write_register(self, offset, data)?;
        Ok(reply.kind == MessageKind::AckOk)
    }
}

impl PartialEq for Leaf<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
    }
}

impl Eq for Leaf<'_> {}

impl Hash for Leaf<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
    }
}

impl fmt::Debug for Leaf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Leaf")
            .field("address", &self.address)
            .field("root", &self.root.address())
            .finish()
    }
}
