//! Hardware MIDI input via midir.
//!
//! midir delivers messages on its own callback thread. The callback queues
//! them into a bounded channel which the stream's worker drains on each poll,
//! so `read` never blocks.

use super::{init, DeviceInfo, InputHandle, MidiTransport, CLIENT_NAME};
use crate::error::{Error, Result};
use crate::event::RawMessage;
use crossbeam_channel::{bounded, Receiver};
use midir::{MidiInput, MidiInputConnection};
use tracing::debug;

/// Messages buffered between the midir callback and the polling worker.
pub const INPUT_QUEUE_CAPACITY: usize = 4096;

#[derive(Debug, Clone)]
pub struct MidirTransport {
    client_name: String,
}

impl MidirTransport {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
        }
    }
}

impl Default for MidirTransport {
    fn default() -> Self {
        Self::new(CLIENT_NAME)
    }
}

impl MidiTransport for MidirTransport {
    fn devices(&self) -> Result<Vec<DeviceInfo>> {
        init()?;
        let midi_input = MidiInput::new(&self.client_name)?;
        let devices = midi_input
            .ports()
            .iter()
            .enumerate()
            .map(|(index, port)| DeviceInfo {
                index,
                name: midi_input
                    .port_name(port)
                    .unwrap_or_else(|_| format!("Unknown Device {}", index)),
                is_input: true,
            })
            .collect();
        Ok(devices)
    }

    fn open(&self, device: &DeviceInfo) -> Result<Box<dyn InputHandle>> {
        init()?;
        let midi_input = MidiInput::new(&self.client_name)?;

        let ports = midi_input.ports();
        let port = ports
            .get(device.index)
            .ok_or_else(|| Error::DeviceNotFound(format!("'{}'", device.name)))?;

        // Ports can be renumbered between enumeration and open.
        let port_name = midi_input
            .port_name(port)
            .map_err(|e| Error::MidiPort(e.to_string()))?;
        if port_name != device.name {
            return Err(Error::MidiPort(format!(
                "device {} is now '{}', expected '{}'",
                device.index, port_name, device.name
            )));
        }

        let (sender, receiver) = bounded(INPUT_QUEUE_CAPACITY);
        let connection = midi_input.connect(
            port,
            "tactile-input",
            move |timestamp, message, _| {
                if sender.try_send(RawMessage::new(message, timestamp)).is_err() {
                    debug!("MIDI input queue full, dropping message");
                }
            },
            (),
        )?;
        debug!("Opened MIDI input '{}'", port_name);

        Ok(Box::new(MidirInputHandle {
            connection,
            receiver,
        }))
    }
}

struct MidirInputHandle {
    connection: MidiInputConnection<()>,
    receiver: Receiver<RawMessage>,
}

impl InputHandle for MidirInputHandle {
    fn read(&mut self, max_count: usize) -> Vec<RawMessage> {
        self.receiver.try_iter().take(max_count).collect()
    }

    fn close(self: Box<Self>) {
        let MidirInputHandle { connection, .. } = *self;
        connection.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_devices_does_not_panic() {
        // Device availability depends on the system; CI usually has none.
        match MidirTransport::default().devices() {
            Ok(devices) => {
                assert!(devices.iter().all(|d| d.is_input));
                println!("Found {} MIDI inputs", devices.len());
            }
            Err(e) => println!("MIDI backend unavailable: {}", e),
        }
    }
}
