//! MidiStream configuration and builder.

use super::MidiStream;
use crate::error::{Error, Result};
use crate::io::MidiTransport;
use crate::knob::{KnobMode, RelativeSettings};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tactile_core::DisplaySink;

pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Construction-time settings of a stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Exact device name; `None` picks the first input device.
    pub device_name: Option<String>,
    /// Sleep between polls. Zero polls as fast as possible.
    pub delay: Duration,
    /// Maximum messages read per poll.
    pub buffer_size: usize,
    /// Publish every event and parameter change to the display.
    pub display_events: bool,
    pub mode: KnobMode,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            device_name: None,
            delay: Duration::ZERO,
            buffer_size: DEFAULT_BUFFER_SIZE,
            display_events: false,
            mode: KnobMode::Absolute,
        }
    }
}

impl StreamConfig {
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(Error::InvalidConfig(
                "buffer_size must be at least 1".to_string(),
            ));
        }
        if let KnobMode::Relative(settings) = &self.mode {
            validate_relative(settings)?;
        }
        Ok(())
    }
}

fn validate_relative(settings: &RelativeSettings) -> Result<()> {
    if !settings.resolution.is_finite() || settings.resolution <= 0.0 {
        return Err(Error::InvalidConfig(format!(
            "resolution must be positive, got {}",
            settings.resolution
        )));
    }
    let mut values = vec![settings.plus_value, settings.minus_value];
    values.extend(settings.lock_value);
    if let Some(value) = values.iter().find(|v| **v > 0x7F) {
        return Err(Error::InvalidConfig(format!(
            "relative value {} is not a 7-bit MIDI value",
            value
        )));
    }
    values.sort_unstable();
    if values.windows(2).any(|pair| pair[0] == pair[1]) {
        return Err(Error::InvalidConfig(
            "plus, minus and lock values must be distinct".to_string(),
        ));
    }
    Ok(())
}

/// Builder for [`MidiStream`].
///
/// ```ignore
/// let mut stream = MidiStream::builder()
///     .device("nanoKONTROL2")
///     .relative(RelativeSettings::new(65, 63).with_resolution(512.0))
///     .build()?;
/// stream.start()?;
/// ```
#[derive(Default)]
pub struct MidiStreamBuilder {
    config: StreamConfig,
    transport: Option<Arc<dyn MidiTransport>>,
    display: Option<Arc<dyn DisplaySink>>,
}

impl MidiStreamBuilder {
    /// Replace every setting at once, e.g. with one loaded from a file.
    pub fn config(mut self, config: StreamConfig) -> Self {
        self.config = config;
        self
    }

    pub fn device(mut self, name: impl Into<String>) -> Self {
        self.config.device_name = Some(name.into());
        self
    }

    pub fn first_device(mut self) -> Self {
        self.config.device_name = None;
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = delay;
        self
    }

    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.config.buffer_size = buffer_size;
        self
    }

    pub fn display_events(mut self, enabled: bool) -> Self {
        self.config.display_events = enabled;
        self
    }

    /// Publish to `sink` instead of the tracing log. Enables display.
    pub fn display(mut self, sink: Arc<dyn DisplaySink>) -> Self {
        self.config.display_events = true;
        self.display = Some(sink);
        self
    }

    pub fn absolute(mut self) -> Self {
        self.config.mode = KnobMode::Absolute;
        self
    }

    pub fn relative(mut self, settings: RelativeSettings) -> Self {
        self.config.mode = KnobMode::Relative(settings);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn MidiTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<MidiStream> {
        self.config.validate()?;
        let transport = match self.transport {
            Some(transport) => transport,
            None => default_transport()?,
        };
        let display: Option<Arc<dyn DisplaySink>> = match self.display {
            _ if !self.config.display_events => None,
            Some(sink) => Some(sink),
            None => Some(Arc::new(tactile_core::TracingDisplay)),
        };
        Ok(MidiStream::new(transport, self.config, display))
    }
}

#[cfg(feature = "midi-io")]
fn default_transport() -> Result<Arc<dyn MidiTransport>> {
    Ok(Arc::new(crate::io::MidirTransport::default()))
}

#[cfg(not(feature = "midi-io"))]
fn default_transport() -> Result<Arc<dyn MidiTransport>> {
    Err(Error::InvalidConfig(
        "no MIDI transport: enable `midi-io` or call .transport()".to_string(),
    ))
}
