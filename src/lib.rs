//! # tactile - MIDI control for experimental devices
//!
//! Turn the knobs of a MIDI controller to adjust instrument settings live.
//!
//! ## Architecture
//!
//! tactile is an umbrella crate that coordinates:
//! - **tactile-core** - Parameter abstraction, bounds, display sinks
//! - **tactile-midi-io** - Device resolution, polling streams, absolute and relative knobs
//!
//! ## Quick Start
//!
//! ```ignore
//! use tactile::prelude::*;
//!
//! let piezo = Arc::new(SharedParameter::new("piezo", Bounds::new(0.0, 10.0)?, 5.0));
//!
//! let mut stream = MidiStream::builder()
//!     .device("nanoKONTROL2")
//!     .build()?;
//! stream.start()?;
//!
//! // Turn any knob to take control of the piezo
//! stream.bind(piezo.clone());
//!
//! // ...
//! stream.stop();
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Hardware MIDI
//! - `midi-io` - Hardware MIDI devices via midir

/// Re-export of tactile-core for direct access
pub use tactile_core as core;

/// Re-export of tactile-midi-io for direct access
pub use tactile_midi_io as midi;

mod error;
pub use error::{Error, Result};

pub use tactile_core::{
    Bounds, DisplaySink, Parameter, ParameterError, SharedParameter, TextDisplay, TracingDisplay,
};

pub use tactile_midi_io::{
    init, resolve_device, DeviceInfo, Direction, Knob, KnobMode, MidiEvent, MidiStream,
    MidiStreamBuilder, MidiTransport, RelativeSettings, StreamConfig, StreamState, VirtualPort,
    VirtualTransport,
};

#[cfg(feature = "midi-io")]
pub use tactile_midi_io::{list_input_devices, MidirTransport};

pub mod prelude {
    // Streams
    pub use crate::midi::{MidiStream, MidiStreamBuilder, RelativeSettings};

    // Parameters
    pub use crate::core::{Bounds, Parameter, SharedParameter};

    // Display
    pub use crate::core::{DisplaySink, TextDisplay};

    pub use std::sync::Arc;
}
