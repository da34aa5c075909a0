//! Centralized error type for the tactile umbrella crate.
//!
//! Wraps all subsystem errors so `?` propagates naturally across crate boundaries.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] tactile_core::Error),

    #[error("MIDI: {0}")]
    Midi(#[from] tactile_midi_io::Error),

    #[error("Parameter: {0}")]
    Parameter(#[from] tactile_core::ParameterError),
}

pub type Result<T> = std::result::Result<T, Error>;
