//! MIDI I/O for tactile.
//!
//! Turns physical knobs and faders into parameter adjustments: a
//! [`MidiStream`] polls an input device on a background thread, decodes each
//! message into a [`MidiEvent`] and hands its value to the [`Knob`] assigned
//! to the event's channel.
//!
//! Feature gates: `midi-io` (hardware devices via midir, default).

pub mod error;
pub use error::{DecodeError, Error, Result};

pub(crate) mod event;
pub use event::{MidiEvent, RawMessage};

pub mod io;
pub use io::{
    init, resolve_device, DeviceInfo, InputHandle, MidiTransport, VirtualPort, VirtualTransport,
    MAX_DEVICE_SLOTS,
};

#[cfg(feature = "midi-io")]
pub use io::{list_input_devices, MidirTransport};

pub mod knob;
pub use knob::{
    AbsoluteKnob, Direction, Knob, KnobMode, RelativeKnob, RelativeSettings, DEFAULT_RESOLUTION,
};

mod stream;
pub use stream::{
    MidiStream, MidiStreamBuilder, StreamConfig, StreamState, DEFAULT_BUFFER_SIZE, STOP_GRACE,
};

pub use tactile_core::{
    Bounds, DisplaySink, Parameter, ParameterError, SharedParameter, TextDisplay, TracingDisplay,
};
