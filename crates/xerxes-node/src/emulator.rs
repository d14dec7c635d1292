//! Scripted leaf device for exercising roots and leaves without hardware.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use xerxes_frame::{frame_bytes, read_message, request, Address, MessageKind};
use xerxes_transport::{BusChannel, LinkConfig, ScriptedChannel, ScriptedHandle, SharedChannel};

use crate::root::Root;

pub(crate) const DEVICE: u8 = 0x40;
pub(crate) const MEASUREMENT: [f32; 4] = [1.0, 2.0, 3.0, 4.0];

/// One emulated leaf at `address` with a 1 KiB register image.
///
/// Writes to the read-only region are answered with `AckNok`.
pub(crate) struct Emulator {
    pub address: Address,
    pub memory: Arc<Mutex<Vec<u8>>>,
    pub handle: ScriptedHandle,
    pub channel: SharedChannel,
}

impl Emulator {
    pub fn new(address: u8) -> Self {
        let address = Address::new(address);
        let memory = Arc::new(Mutex::new(vec![0u8; 1024]));
        let image = Arc::clone(&memory);

        let scripted = ScriptedChannel::new().with_responder(move |frame| {
            let request_msg = read_message(&mut Cursor::new(frame)).ok()?;
            if request_msg.destination != address {
                return None;
            }
            let data = request_msg.payload.as_ref();
            let (kind, reply): (MessageKind, Vec<u8>) = match request_msg.kind {
                MessageKind::Ping => (MessageKind::PingReply, vec![DEVICE, 1, 4]),
                MessageKind::ReadRequest => {
                    let offset = u16::from_le_bytes([data[0], data[1]]) as usize;
                    let len = data[2] as usize;
                    let bytes = image.lock().ok()?[offset..offset + len].to_vec();
                    (MessageKind::ReadReply, bytes)
                }
                MessageKind::Write => {
                    let offset = u16::from_le_bytes([data[0], data[1]]) as usize;
                    if (512..544).contains(&offset) {
                        (MessageKind::AckNok, Vec::new())
                    } else {
                        let value = &data[2..];
                        image.lock().ok()?[offset..offset + value.len()].copy_from_slice(value);
                        (MessageKind::AckOk, Vec::new())
                    }
                }
                MessageKind::FetchMeasurement => (
                    MessageKind::FetchMeasurement,
                    MEASUREMENT.iter().flat_map(|v| v.to_le_bytes()).collect(),
                ),
                _ => return None,
            };
            let bytes = frame_bytes(address, request_msg.source, &request(kind, &reply)).ok()?;
            Some(bytes.to_vec())
        });

        let handle = scripted.handle();
        let mut link = BusChannel::new("emulated", scripted);
        link.open(LinkConfig::default())
            .expect("scripted channel always opens");

        Self {
            address,
            memory,
            handle,
            channel: SharedChannel::new(link),
        }
    }

    pub fn root(&self) -> Root {
        Root::new(Address::new(0), self.channel.clone())
    }

    pub fn poke(&self, offset: usize, bytes: &[u8]) {
        self.memory.lock().unwrap()[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn peek(&self, offset: usize, len: usize) -> Vec<u8> {
        self.memory.lock().unwrap()[offset..offset + len].to_vec()
    }
}
