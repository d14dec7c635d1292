//! In-memory channel for exercising the protocol without a serial port.
//!
//! Reads are served from a queue of scripted bytes; an empty queue behaves
//! like a read timeout (zero bytes). Every write is recorded and can
//! optionally be answered by a responder closure, which lets tests emulate a
//! device that replies to each request frame.

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::error::Result;
use crate::traits::{Channel, LinkConfig, DEFAULT_READ_TIMEOUT};

type Responder = Box<dyn FnMut(&[u8]) -> Option<Vec<u8>> + Send>;

struct State {
    rx: VecDeque<u8>,
    writes: Vec<Vec<u8>>,
    configs: Vec<LinkConfig>,
    read_timeout: Duration,
    timeout_history: Vec<Duration>,
    responder: Option<Responder>,
    shut_down: bool,
}

/// A scripted [`Channel`].
pub struct ScriptedChannel {
    state: Arc<Mutex<State>>,
}

/// Inspection and scripting handle for a [`ScriptedChannel`].
///
/// Stays usable after the channel itself has been moved into a
/// [`BusChannel`](crate::BusChannel).
#[derive(Clone)]
pub struct ScriptedHandle {
    state: Arc<Mutex<State>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                rx: VecDeque::new(),
                writes: Vec::new(),
                configs: Vec::new(),
                read_timeout: DEFAULT_READ_TIMEOUT,
                timeout_history: Vec::new(),
                responder: None,
                shut_down: false,
            })),
        }
    }

    /// Answer every write with the bytes returned by `responder`.
    pub fn with_responder(
        self,
        responder: impl FnMut(&[u8]) -> Option<Vec<u8>> + Send + 'static,
    ) -> Self {
        lock(&self.state).responder = Some(Box::new(responder));
        self
    }

    pub fn handle(&self) -> ScriptedHandle {
        ScriptedHandle {
            state: Arc::clone(&self.state),
        }
    }
}

impl Default for ScriptedChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedHandle {
    /// Queue bytes for subsequent reads.
    pub fn push_read(&self, bytes: &[u8]) {
        lock(&self.state).rx.extend(bytes.iter().copied());
    }

    /// Every `write` call seen so far, in order.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        lock(&self.state).writes.clone()
    }

    /// All written bytes concatenated.
    pub fn written(&self) -> Vec<u8> {
        lock(&self.state).writes.concat()
    }

    /// Bytes still waiting to be read.
    pub fn pending_reads(&self) -> usize {
        lock(&self.state).rx.len()
    }

    pub fn last_config(&self) -> Option<LinkConfig> {
        lock(&self.state).configs.last().copied()
    }

    pub fn read_timeout(&self) -> Duration {
        lock(&self.state).read_timeout
    }

    /// Every read timeout applied, including those set by `configure`.
    pub fn timeout_history(&self) -> Vec<Duration> {
        lock(&self.state).timeout_history.clone()
    }

    pub fn is_shut_down(&self) -> bool {
        lock(&self.state).shut_down
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl Read for ScriptedChannel {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let mut state = lock(&self.state);
        let n = buf.len().min(state.rx.len());
        for slot in buf.iter_mut().take(n) {
            // n is bounded by rx.len()
            *slot = state.rx.pop_front().unwrap_or_default();
        }
        Ok(n)
    }
}

impl Write for ScriptedChannel {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut state = lock(&self.state);
        state.writes.push(buf.to_vec());
        let reply = state.responder.as_mut().and_then(|respond| respond(buf));
        if let Some(reply) = reply {
            state.rx.extend(reply);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Channel for ScriptedChannel {
    fn configure(&mut self, config: &LinkConfig) -> Result<()> {
        let mut state = lock(&self.state);
        state.configs.push(*config);
        state.read_timeout = config.read_timeout;
        state.timeout_history.push(config.read_timeout);
        state.shut_down = false;
        Ok(())
    }

    fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        let mut state = lock(&self.state);
        state.read_timeout = timeout;
        state.timeout_history.push(timeout);
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        lock(&self.state).shut_down = true;
        Ok(())
    }
}

impl std::fmt::Debug for ScriptedChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("ScriptedChannel")
            .field("pending_reads", &state.rx.len())
            .field("writes", &state.writes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serves_queued_bytes_then_times_out() {
        let mut channel = ScriptedChannel::new();
        channel.handle().push_read(&[1, 2, 3]);

        let mut buf = [0u8; 2];
        assert_eq!(channel.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(channel.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 3);
        assert_eq!(channel.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn records_writes() {
        let mut channel = ScriptedChannel::new();
        let handle = channel.handle();
        channel.write_all(b"ab").unwrap();
        channel.write_all(b"c").unwrap();

        assert_eq!(handle.writes(), vec![b"ab".to_vec(), b"c".to_vec()]);
        assert_eq!(handle.written(), b"abc".to_vec());
    }

    #[test]
    fn responder_queues_reply() {
        let mut channel =
            ScriptedChannel::new().with_responder(|request| Some(request.iter().rev().copied().collect()));
        let handle = channel.handle();

        channel.write_all(&[1, 2, 3]).unwrap();

        assert_eq!(handle.pending_reads(), 3);
        let mut buf = [0u8; 3];
        channel.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [3, 2, 1]);
    }

    #[test]
    fn tracks_timeouts_and_shutdown() {
        let mut channel = ScriptedChannel::new();
        let handle = channel.handle();

        channel.configure(&LinkConfig::default()).unwrap();
        channel.set_read_timeout(Duration::from_millis(5)).unwrap();
        channel.shutdown().unwrap();

        assert_eq!(
            handle.timeout_history(),
            vec![DEFAULT_READ_TIMEOUT, Duration::from_millis(5)]
        );
        assert!(handle.is_shut_down());
    }
}
