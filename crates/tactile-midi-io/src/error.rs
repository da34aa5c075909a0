//! Error types for the MIDI I/O subsystem.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No MIDI input device matching {0}")]
    DeviceNotFound(String),

    #[error("MIDI port error: {0}")]
    MidiPort(String),

    #[error("MIDI device error: {0}")]
    MidiDevice(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid stream state: {0}")]
    InvalidState(String),

    #[error(transparent)]
    Core(#[from] tactile_core::Error),
}

/// Why a raw message could not be turned into a [`MidiEvent`](crate::MidiEvent).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("message too short: {0} bytes, expected 3")]
    Truncated(usize),

    #[error("invalid status byte 0x{0:02X}")]
    StatusByte(u8),

    #[error("invalid data byte 0x{0:02X}")]
    DataByte(u8),

    /// Short system common or real-time message (clock, active sensing...).
    #[error("system message 0x{0:02X} carries no controller value")]
    SystemMessage(u8),
}

#[cfg(feature = "midi-io")]
impl From<midir::InitError> for Error {
    fn from(e: midir::InitError) -> Self {
        Error::MidiDevice(e.to_string())
    }
}

#[cfg(feature = "midi-io")]
impl From<midir::ConnectError<midir::MidiInput>> for Error {
    fn from(e: midir::ConnectError<midir::MidiInput>) -> Self {
        Error::MidiPort(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
