//! Polling MIDI stream that routes controller events to knobs.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tactile_midi_io::{MidiStream, RelativeSettings};
//!
//! let mut stream = MidiStream::builder()
//!     .device("Arturia BeatStep")
//!     .relative(RelativeSettings::new(65, 63))
//!     .build()?;
//! stream.start()?;
//!
//! // Explicit channel
//! stream.assign(16, laser_current.clone());
//!
//! // Or: bind whichever knob is turned next
//! stream.bind(piezo_voltage.clone());
//!
//! stream.stop();
//! ```
//!
//! A stream moves `Idle -> Running -> Stopped` and never restarts; build a
//! new one instead. Always call [`MidiStream::stop`]: dropping a running
//! stream only asks the worker to exit and does not wait for it.

mod builder;
pub(crate) mod worker;

pub use builder::{MidiStreamBuilder, StreamConfig, DEFAULT_BUFFER_SIZE};

use crate::error::{Error, Result};
use crate::io::{resolve_device, DeviceInfo, InputHandle, MidiTransport};
use crate::knob::Knob;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tactile_core::{DisplaySink, Parameter};
use tracing::{debug, warn};
use worker::Dispatcher;

/// Extra wait on stop for an in-flight read to finish.
pub const STOP_GRACE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Idle,
    Running,
    Stopped,
}

pub struct MidiStream {
    transport: Arc<dyn MidiTransport>,
    config: StreamConfig,
    dispatcher: Arc<Dispatcher>,
    running: Arc<AtomicBool>,
    worker: Option<JoinHandle<Box<dyn InputHandle>>>,
    device: Option<DeviceInfo>,
    state: StreamState,
}

impl MidiStream {
    pub fn builder() -> MidiStreamBuilder {
        MidiStreamBuilder::default()
    }

    pub(crate) fn new(
        transport: Arc<dyn MidiTransport>,
        config: StreamConfig,
        display: Option<Arc<dyn DisplaySink>>,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(config.mode, display));
        Self {
            transport,
            config,
            dispatcher,
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            device: None,
            state: StreamState::Idle,
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StreamState::Running
    }

    /// The device opened by [`start`](Self::start).
    pub fn device(&self) -> Option<&DeviceInfo> {
        self.device.as_ref()
    }

    // ==================== Lifecycle ====================

    /// Resolve and open the device, then spawn the polling thread.
    ///
    /// Returns as soon as the thread is running. Fails with
    /// [`Error::DeviceNotFound`] before spawning anything if no input device
    /// matches the configured name.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            StreamState::Idle => {}
            StreamState::Running => {
                return Err(Error::InvalidState("stream is already running".to_string()))
            }
            StreamState::Stopped => {
                return Err(Error::InvalidState(
                    "stream was stopped; build a new one".to_string(),
                ))
            }
        }

        let name = self.config.device_name.as_deref();
        let device = resolve_device(self.transport.as_ref(), name)?.ok_or_else(|| {
            Error::DeviceNotFound(match name {
                Some(name) => format!("'{}'", name),
                None => "any name (no input devices)".to_string(),
            })
        })?;
        let handle = self.transport.open(&device)?;

        self.running.store(true, Ordering::Release);
        let dispatcher = Arc::clone(&self.dispatcher);
        let running = Arc::clone(&self.running);
        let buffer_size = self.config.buffer_size;
        let delay = self.config.delay;

        let spawned = thread::Builder::new()
            .name(format!("tactile-midi-{}", device.index))
            .spawn(move || worker::run(handle, dispatcher, running, buffer_size, delay));
        match spawned {
            Ok(worker) => self.worker = Some(worker),
            Err(e) => {
                self.running.store(false, Ordering::Release);
                return Err(Error::Io(e));
            }
        }

        debug!("Started MIDI stream on '{}'", device.name);
        self.device = Some(device);
        self.state = StreamState::Running;
        Ok(())
    }

    /// Stop polling and close the device.
    ///
    /// Waits one poll interval plus [`STOP_GRACE`] and joins the worker
    /// before the handle is closed. The stream cannot be restarted.
    pub fn stop(&mut self) {
        if self.state == StreamState::Stopped {
            return;
        }
        self.running.store(false, Ordering::Release);

        if let Some(worker) = self.worker.take() {
            thread::sleep(self.config.delay + STOP_GRACE);
            match worker.join() {
                Ok(handle) => handle.close(),
                Err(_) => warn!("MIDI polling thread panicked; device handle dropped"),
            }
        }

        self.dispatcher.clear();
        self.state = StreamState::Stopped;
        debug!("Stopped MIDI stream");
    }

    // ==================== Knob assignment ====================

    /// Drive `parameter` from `channel`, replacing any knob already there.
    pub fn assign(&self, channel: u8, parameter: Arc<dyn Parameter>) -> Arc<Knob> {
        self.dispatcher.assign(channel, parameter)
    }

    /// Bind `parameter` to whichever channel sends the next event.
    ///
    /// That first event is also applied to the new knob. Only one bind is
    /// pending at a time; a second call replaces the first.
    pub fn bind(&self, parameter: Arc<dyn Parameter>) {
        self.dispatcher.bind(parameter);
    }

    /// Returns whether a bind was pending.
    pub fn cancel_bind(&self) -> bool {
        self.dispatcher.cancel_bind()
    }

    pub fn is_binding(&self) -> bool {
        self.dispatcher.is_binding()
    }

    pub fn unassign(&self, channel: u8) -> bool {
        self.dispatcher.unassign(channel)
    }

    pub fn knob(&self, channel: u8) -> Option<Arc<Knob>> {
        self.dispatcher.knob(channel)
    }

    /// Assigned channels in ascending order.
    pub fn assigned_channels(&self) -> Vec<u8> {
        self.dispatcher.channels()
    }

    // ==================== Locking ====================

    /// Returns the new lock state, or `None` if `channel` has no knob.
    pub fn toggle_lock(&self, channel: u8) -> Option<bool> {
        self.knob(channel).map(|knob| knob.toggle_lock())
    }

    /// Returns false if `channel` has no knob.
    pub fn set_locked(&self, channel: u8, locked: bool) -> bool {
        match self.knob(channel) {
            Some(knob) => {
                knob.set_locked(locked);
                true
            }
            None => false,
        }
    }

    pub fn is_locked(&self, channel: u8) -> Option<bool> {
        self.knob(channel).map(|knob| knob.is_locked())
    }
}

impl Drop for MidiStream {
    fn drop(&mut self) {
        if self.state == StreamState::Running {
            warn!("MidiStream dropped while running; call stop() to close the device");
            self.running.store(false, Ordering::Release);
        }
    }
}
