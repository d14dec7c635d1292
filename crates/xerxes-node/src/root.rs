use std::sync::MutexGuard;
use std::time::{Duration, Instant};

use tracing::{debug, info};
use xerxes_frame::{read_message, request, write_message, Address, Message, MessageKind};
use xerxes_transport::{BusChannel, SharedChannel};

use crate::device::PingReply;
use crate::error::{NodeError, Result};

/// This host's node on the bus.
///
/// Owns its address and a handle to the link. Several roots on the same
/// physical port must share one [`SharedChannel`] (see
/// [`ChannelRegistry`](xerxes_transport::ChannelRegistry)); the link is locked
/// for the whole of each send or exchange.
#[derive(Debug)]
pub struct Root {
    address: Address,
    channel: SharedChannel,
}

impl Root {
    pub fn new(address: Address, channel: SharedChannel) -> Self {
        Self { address, channel }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn set_address(&mut self, address: Address) {
        self.address = address;
    }

    pub fn channel(&self) -> &SharedChannel {
        &self.channel
    }

    /// Send `payload` (kind code first) to `destination`. No reply is read.
    pub fn send(&self, destination: Address, payload: &[u8]) -> Result<()> {
        let mut link = self.lock_open()?;
        write_message(&mut *link, self.address, destination, payload)?;
        Ok(())
    }

    pub fn broadcast(&self, payload: &[u8]) -> Result<()> {
        self.send(Address::BROADCAST, payload)
    }

    /// Broadcast a bus-wide sync. Devices do not reply.
    pub fn sync(&self) -> Result<()> {
        debug!(root = %self.address, "sync");
        self.broadcast(&request(MessageKind::Sync, &[]))
    }

    /// Ping `address` and wait for its reply.
    pub fn ping(&self, address: Address) -> Result<PingReply> {
        let started = Instant::now();
        let reply = self.exchange(address, &request(MessageKind::Ping, &[]), None)?;
        let ping = PingReply::from_message(&reply, started.elapsed())?;
        info!(
            address = %address,
            device = %ping.device,
            version = %ping.version(),
            latency = ?ping.latency,
            "ping reply"
        );
        Ok(ping)
    }

    /// Read the next message with the link's current timeout.
    pub fn read_message(&self) -> Result<Message> {
        let mut link = self.lock_open()?;
        Ok(read_message(&mut *link)?)
    }

    /// Read the next message, waiting up to `timeout` for it to start.
    ///
    /// The link's configured timeout is restored afterwards.
    pub fn wait_for_reply(&self, timeout: Duration) -> Result<Message> {
        let mut link = self.lock_open()?;
        read_with_timeout(&mut link, timeout)
    }

    /// True if the replying device speaks the protocol version this crate
    /// implements.
    pub fn is_protocol_current(&self, reply: &PingReply) -> bool {
        reply.is_current()
    }

    /// Send `payload` to `destination` and read exactly one reply, holding
    /// the link for the whole round trip. `timeout` overrides the link's read
    /// timeout for the reply only.
    pub(crate) fn exchange(
        &self,
        destination: Address,
        payload: &[u8],
        timeout: Option<Duration>,
    ) -> Result<Message> {
        let mut link = self.lock_open()?;
        write_message(&mut *link, self.address, destination, payload)?;
        match timeout {
            Some(timeout) => read_with_timeout(&mut link, timeout),
            None => Ok(read_message(&mut *link)?),
        }
    }

    fn lock_open(&self) -> Result<MutexGuard<'_, BusChannel>> {
        let link = self.channel.lock();
        if !link.is_open() {
            return Err(NodeError::ChannelNotOpen {
                port: link.port().to_string(),
            });
        }
        Ok(link)
    }
}

fn read_with_timeout(link: &mut BusChannel, timeout: Duration) -> Result<Message> {
    link.with_read_timeout(timeout, |link| Ok(read_message(link)?))
}

#[cfg(test)]
mod tests {
    use xerxes_frame::frame_bytes;
    use xerxes_transport::{LinkConfig, ScriptedChannel};

    use super::*;
    use crate::device::DeviceKind;
    use crate::emulator::{Emulator, DEVICE};

    fn scripted_root() -> (Root, xerxes_transport::ScriptedHandle) {
        let scripted = ScriptedChannel::new();
        let handle = scripted.handle();
        let mut link = BusChannel::new("scripted", scripted);
        link.open(LinkConfig::default()).unwrap();
        (Root::new(Address::new(0), SharedChannel::new(link)), handle)
    }

    #[test]
    fn send_writes_one_frame() {
        let (root, handle) = scripted_root();
        root.send(Address::new(0x1E), &request(MessageKind::ResetSoft, &[]))
            .unwrap();

        let writes = handle.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(
            writes[0],
            frame_bytes(Address::new(0), Address::new(0x1E), &[0xFF, 0x00])
                .unwrap()
                .to_vec()
        );
    }

    #[test]
    fn broadcast_and_sync_target_broadcast_address() {
        let (root, handle) = scripted_root();
        root.sync().unwrap();

        let frame = &handle.writes()[0];
        assert_eq!(frame[3], 0xFF);
        assert_eq!(&frame[4..6], &MessageKind::Sync.to_bytes());
    }

    #[test]
    fn ping_end_to_end() {
        let device = Emulator::new(1);
        let root = device.root();

        let reply = root.ping(device.address).unwrap();
        assert_eq!(reply.device, DeviceKind(DEVICE));
        assert_eq!((reply.version_major, reply.version_minor), (1, 4));
        assert!(reply.latency >= Duration::ZERO);
        assert!(root.is_protocol_current(&reply));

        let request = &device.handle.writes()[0];
        assert_eq!(request, &vec![0x01, 0x07, 0x00, 0x01, 0x00, 0x00, 0xF7]);
    }

    #[test]
    fn ping_with_scripted_reply() {
        let (root, handle) = scripted_root();
        handle.push_read(
            &frame_bytes(Address::new(1), Address::new(0), &[0x01, 0x00, 0x03, 1, 4])
                .unwrap(),
        );

        let reply = root.ping(Address::new(1)).unwrap();
        assert_eq!(reply.device, DeviceKind::PRESSURE_600MBAR_2TEMP);
        assert_eq!(reply.version(), "1.4");
    }

    #[test]
    fn ping_with_wrong_reply_kind() {
        let (root, handle) = scripted_root();
        handle.push_read(&frame_bytes(Address::new(1), Address::new(0), &[0x02, 0x00]).unwrap());

        let err = root.ping(Address::new(1)).unwrap_err();
        assert!(matches!(
            err,
            NodeError::InvalidReply {
                expected: MessageKind::PingReply,
                got: MessageKind::AckOk
            }
        ));
    }

    #[test]
    fn silent_device_times_out() {
        let device = Emulator::new(1);
        let root = device.root();

        let err = root.ping(Address::new(2)).unwrap_err();
        assert!(err.is_timeout());
        assert!(err.is_recoverable());
    }

    #[test]
    fn closed_channel_is_rejected_before_writing() {
        let scripted = ScriptedChannel::new();
        let handle = scripted.handle();
        let root = Root::new(
            Address::new(0),
            SharedChannel::new(BusChannel::new("/dev/ttyUSB9", scripted)),
        );

        let err = root.send(Address::new(1), &[0x00, 0x00]).unwrap_err();
        assert!(matches!(&err, NodeError::ChannelNotOpen { port } if port == "/dev/ttyUSB9"));
        assert!(!err.is_recoverable());
        assert!(handle.writes().is_empty());

        assert!(matches!(
            root.ping(Address::new(1)),
            Err(NodeError::ChannelNotOpen { .. })
        ));
    }

    #[test]
    fn wait_for_reply_restores_timeout() {
        let (root, handle) = scripted_root();
        handle.push_read(&frame_bytes(Address::new(1), Address::new(0), &[0x02, 0x00]).unwrap());

        let msg = root.wait_for_reply(Duration::from_millis(80)).unwrap();
        assert_eq!(msg.kind, MessageKind::AckOk);
        assert_eq!(
            handle.timeout_history(),
            vec![
                LinkConfig::default().read_timeout,
                Duration::from_millis(80),
                LinkConfig::default().read_timeout
            ]
        );
    }

    #[test]
    fn roots_share_one_channel() {
        let device = Emulator::new(1);
        let first = device.root();
        let mut second = device.root();
        second.set_address(Address::new(9));

        assert!(first.channel().ptr_eq(second.channel()));
        first.ping(device.address).unwrap();
        second.ping(device.address).unwrap();

        let writes = device.handle.writes();
        assert_eq!(writes[0][2], 0x00);
        assert_eq!(writes[1][2], 0x09);
    }
}
