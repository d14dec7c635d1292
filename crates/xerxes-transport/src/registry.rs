use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;
use crate::link::{BusChannel, SharedChannel};
use crate::traits::{Channel, LinkConfig};

/// Maps port identifiers to their single shared channel.
///
/// Owned by the application's composition root and passed to whatever needs
/// a link; opening the same port twice through the registry hands back the
/// instance that is already open instead of opening the device again.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    channels: HashMap<String, SharedChannel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the channel for `port`, creating and opening it with `factory`
    /// and `config` if the registry does not know the port yet.
    ///
    /// A known port keeps its current configuration; `config` only applies to
    /// channels created by this call.
    pub fn open_with<C, F>(&mut self, port: &str, config: LinkConfig, factory: F) -> Result<SharedChannel>
    where
        C: Channel + 'static,
        F: FnOnce(&str) -> Result<C>,
    {
        if let Some(existing) = self.channels.get(port) {
            debug!(port, "reusing registered channel");
            return Ok(existing.clone());
        }

        let mut link = BusChannel::new(port, factory(port)?);
        link.open(config)?;
        let shared = SharedChannel::new(link);
        self.channels.insert(port.to_string(), shared.clone());
        debug!(port, "registered channel");
        Ok(shared)
    }

    /// Register an already constructed link under its own port name.
    ///
    /// Returns the previously registered channel for that port, if any.
    pub fn insert(&mut self, channel: SharedChannel) -> Option<SharedChannel> {
        let port = channel.lock().port().to_string();
        self.channels.insert(port, channel)
    }

    pub fn get(&self, port: &str) -> Option<SharedChannel> {
        self.channels.get(port).cloned()
    }

    /// Forget a port. Outstanding handles keep the channel alive until dropped.
    pub fn remove(&mut self, port: &str) -> Option<SharedChannel> {
        self.channels.remove(port)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn ports(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }
}
