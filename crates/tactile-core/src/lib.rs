//! Core types for tactile.
//!
//! - [`Parameter`]: the controllable quantity a knob drives
//! - [`Bounds`]: closed value interval with interpolation helpers
//! - [`SharedParameter`]: ready-made thread-safe parameter
//! - [`DisplaySink`]: live text readout ([`TextDisplay`], [`TracingDisplay`])

pub mod error;
pub use error::{Error, ParameterError, Result};

pub mod lockfree;
pub use lockfree::{AtomicDouble, AtomicFlag};

pub mod parameter;
pub use parameter::{Bounds, Parameter, SharedParameter};

pub mod display;
pub use display::{DisplaySink, TextDisplay, TracingDisplay};
