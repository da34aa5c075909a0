//! In-process MIDI devices.
//!
//! A [`VirtualTransport`] lists devices created at runtime. Each input has a
//! [`VirtualPort`] on the sending side, so tests, demos and headless rigs can
//! drive a stream without hardware.

use super::{DeviceInfo, InputHandle, MidiTransport};
use crate::error::{Error, Result};
use crate::event::RawMessage;
use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Messages a virtual input buffers before `send` starts failing.
pub const VIRTUAL_QUEUE_CAPACITY: usize = 4096;

struct VirtualDevice {
    info: DeviceInfo,
    receiver: Option<Receiver<RawMessage>>,
    open: Arc<AtomicBool>,
}

/// Transport over in-process devices. Clones share the same device list.
#[derive(Clone, Default)]
pub struct VirtualTransport {
    devices: Arc<Mutex<Vec<VirtualDevice>>>,
}

impl VirtualTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input device and return the port that feeds it.
    pub fn add_input(&self, name: impl Into<String>) -> VirtualPort {
        let (sender, receiver) = bounded(VIRTUAL_QUEUE_CAPACITY);
        let open = Arc::new(AtomicBool::new(false));
        self.push(name.into(), true, Some(receiver), Arc::clone(&open));
        VirtualPort {
            sender,
            open,
            epoch: Instant::now(),
        }
    }

    /// Add a device that enumerates but cannot be opened for input.
    pub fn add_output(&self, name: impl Into<String>) {
        self.push(name.into(), false, None, Arc::new(AtomicBool::new(false)));
    }

    fn push(
        &self,
        name: String,
        is_input: bool,
        receiver: Option<Receiver<RawMessage>>,
        open: Arc<AtomicBool>,
    ) {
        let mut devices = self.devices.lock();
        let index = devices.len();
        devices.push(VirtualDevice {
            info: DeviceInfo {
                index,
                name,
                is_input,
            },
            receiver,
            open,
        });
    }
}

impl MidiTransport for VirtualTransport {
    fn devices(&self) -> Result<Vec<DeviceInfo>> {
        Ok(self
            .devices
            .lock()
            .iter()
            .map(|device| device.info.clone())
            .collect())
    }

    fn open(&self, device: &DeviceInfo) -> Result<Box<dyn InputHandle>> {
        let devices = self.devices.lock();
        let entry = devices
            .get(device.index)
            .ok_or_else(|| Error::DeviceNotFound(format!("'{}'", device.name)))?;
        let receiver = entry
            .receiver
            .clone()
            .ok_or_else(|| Error::MidiPort(format!("'{}' is not an input", entry.info.name)))?;
        if entry.open.swap(true, Ordering::AcqRel) {
            return Err(Error::MidiPort(format!(
                "'{}' is already open",
                entry.info.name
            )));
        }
        Ok(Box::new(VirtualInputHandle {
            receiver,
            open: Arc::clone(&entry.open),
        }))
    }
}

struct VirtualInputHandle {
    receiver: Receiver<RawMessage>,
    open: Arc<AtomicBool>,
}

impl InputHandle for VirtualInputHandle {
    fn read(&mut self, max_count: usize) -> Vec<RawMessage> {
        self.receiver.try_iter().take(max_count).collect()
    }

    fn close(self: Box<Self>) {
        self.open.store(false, Ordering::Release);
    }
}

impl Drop for VirtualInputHandle {
    fn drop(&mut self) {
        self.open.store(false, Ordering::Release);
    }
}

/// Sending side of a virtual input device.
#[derive(Clone)]
pub struct VirtualPort {
    sender: Sender<RawMessage>,
    open: Arc<AtomicBool>,
    epoch: Instant,
}

impl VirtualPort {
    /// Queue raw bytes. Returns false when the queue is full.
    pub fn send_raw(&self, bytes: &[u8]) -> bool {
        let timestamp = self.epoch.elapsed().as_micros() as u64;
        self.sender
            .try_send(RawMessage::new(bytes, timestamp))
            .is_ok()
    }

    pub fn send(&self, status: u8, data1: u8, data2: u8) -> bool {
        self.send_raw(&[status, data1, data2])
    }

    /// Control change on MIDI channel 1.
    pub fn control_change(&self, controller: u8, value: u8) -> bool {
        self.send(0xB0, controller, value)
    }

    /// Whether a stream currently holds the device open.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_order() {
        let transport = VirtualTransport::new();
        transport.add_input("a");
        transport.add_output("b");
        let devices = transport.devices().unwrap();
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].index, 0);
        assert!(devices[0].is_input);
        assert_eq!(devices[1].name, "b");
        assert!(!devices[1].is_input);
    }

    #[test]
    fn test_read_respects_max_count() {
        let transport = VirtualTransport::new();
        let port = transport.add_input("knobs");
        let device = transport.devices().unwrap().remove(0);
        let mut handle = transport.open(&device).unwrap();

        for value in 0..5 {
            assert!(port.control_change(1, value));
        }
        let first = handle.read(3);
        assert_eq!(first.len(), 3);
        assert_eq!(first[0].bytes.as_slice(), &[0xB0, 1, 0]);
        assert_eq!(handle.read(10).len(), 2);
        assert!(handle.read(10).is_empty());
    }

    #[test]
    fn test_open_is_exclusive() {
        let transport = VirtualTransport::new();
        let port = transport.add_input("knobs");
        let device = transport.devices().unwrap().remove(0);

        let handle = transport.open(&device).unwrap();
        assert!(port.is_open());
        assert!(matches!(transport.open(&device), Err(Error::MidiPort(_))));

        handle.close();
        assert!(!port.is_open());
        assert!(transport.open(&device).is_ok());
    }

    #[test]
    fn test_output_cannot_be_opened() {
        let transport = VirtualTransport::new();
        transport.add_output("synth");
        let device = transport.devices().unwrap().remove(0);
        assert!(matches!(transport.open(&device), Err(Error::MidiPort(_))));
    }
}
