//! MIDI device transports.
//!
//! A [`MidiTransport`] enumerates devices and opens input handles that the
//! stream's worker polls. Backends:
//! - [`MidirTransport`]: hardware devices via midir (feature `midi-io`)
//! - [`VirtualTransport`]: in-process devices fed from [`VirtualPort`]s

mod resolver;
mod virtual_port;

#[cfg(feature = "midi-io")]
mod midir_backend;

pub use resolver::{resolve_device, MAX_DEVICE_SLOTS};
pub use virtual_port::{VirtualPort, VirtualTransport};

#[cfg(feature = "midi-io")]
pub use midir_backend::MidirTransport;

use crate::error::Result;
use crate::event::RawMessage;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Client name registered with the platform MIDI service.
pub const CLIENT_NAME: &str = "tactile";

/// One enumerated device slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub is_input: bool,
}

/// Source of MIDI devices.
pub trait MidiTransport: Send + Sync {
    fn devices(&self) -> Result<Vec<DeviceInfo>>;

    /// Open `device` for exclusive reading.
    fn open(&self, device: &DeviceInfo) -> Result<Box<dyn InputHandle>>;
}

/// An open input device.
///
/// `read` must return promptly when nothing is pending; the stream's
/// shutdown latency depends on it.
pub trait InputHandle: Send {
    /// Take up to `max_count` pending messages, oldest first.
    fn read(&mut self, max_count: usize) -> Vec<RawMessage>;

    fn close(self: Box<Self>);
}

static MIDI_INIT: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Initialize the platform MIDI subsystem once per process.
///
/// Idempotent; the first outcome is cached. Hardware transports call this on
/// first enumeration, but an application may call it at startup to surface
/// backend failures early.
pub fn init() -> Result<()> {
    MIDI_INIT
        .get_or_init(probe_backend)
        .clone()
        .map_err(crate::Error::MidiDevice)
}

#[cfg(feature = "midi-io")]
fn probe_backend() -> std::result::Result<(), String> {
    match midir::MidiInput::new(CLIENT_NAME) {
        Ok(input) => {
            tracing::debug!("MIDI subsystem initialized ({} inputs)", input.port_count());
            Ok(())
        }
        Err(e) => Err(format!("Failed to initialize MIDI: {}", e)),
    }
}

#[cfg(not(feature = "midi-io"))]
fn probe_backend() -> std::result::Result<(), String> {
    Ok(())
}

/// Hardware input devices visible to midir.
#[cfg(feature = "midi-io")]
pub fn list_input_devices() -> Result<Vec<DeviceInfo>> {
    Ok(MidirTransport::default()
        .devices()?
        .into_iter()
        .filter(|device| device.is_input)
        .collect())
}
