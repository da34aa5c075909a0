//! Controllable parameters with bounds and getter/setter access.
//!
//! A [`Parameter`] is whatever the caller wants a knob to drive: a laser
//! current, a piezo voltage, a delay-stage position. The knob only needs the
//! bounds and a way to read and write the value.
//!
//! # Example
//!
//! ```
//! use tactile_core::{Bounds, Parameter, SharedParameter};
//!
//! let voltage = SharedParameter::new("piezo", Bounds::new(0.0, 10.0).unwrap(), 5.0);
//! voltage.set(7.5).unwrap();
//! assert_eq!(voltage.get(), 7.5);
//! assert_eq!(voltage.bounds().lerp(0.5), 5.0);
//! ```

use crate::error::{Error, ParameterError, Result};
use crate::lockfree::AtomicDouble;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed interval `[low, high]` a parameter may take.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    /// Create bounds, rejecting NaN/infinite limits and `low > high`.
    pub fn new(low: f64, high: f64) -> Result<Self> {
        let bounds = Self { low, high };
        if !bounds.is_valid() {
            return Err(Error::InvalidBounds { low, high });
        }
        Ok(bounds)
    }

    /// Both limits finite and ordered. The fields are public, so bounds
    /// reported by a [`Parameter`] are not guaranteed to pass.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low <= self.high
    }

    /// Get the range span (high - low).
    #[inline]
    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    /// Never panics, even on invalid bounds (unlike `f64::clamp`).
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        if value < self.low {
            self.low
        } else if value > self.high {
            self.high
        } else {
            value
        }
    }

    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Linear interpolation: `t = 0` gives `low`, `t = 1` gives `high`.
    #[inline]
    pub fn lerp(&self, t: f64) -> f64 {
        self.low + self.span() * t
    }
}

impl TryFrom<(f64, f64)> for Bounds {
    type Error = Error;

    fn try_from((low, high): (f64, f64)) -> Result<Self> {
        Self::new(low, high)
    }
}

/// A controllable quantity.
///
/// Getters and setters are called from the stream's polling thread, so
/// implementations must tolerate being driven concurrently with the caller's
/// own thread. The knob applies no locking of its own.
pub trait Parameter: Send + Sync {
    fn bounds(&self) -> Bounds;

    fn get(&self) -> f64;

    fn set(&self, value: f64) -> std::result::Result<(), ParameterError>;

    /// Human-readable form published to display sinks.
    fn describe(&self) -> String {
        format!("{}", self.get())
    }
}

/// Thread-safe in-memory parameter.
///
/// Stores its value in an atomic so a knob thread and the caller can both
/// read and write without a mutex. Writes outside the bounds are rejected.
#[derive(Debug)]
pub struct SharedParameter {
    name: String,
    bounds: Bounds,
    value: AtomicDouble,
}

impl SharedParameter {
    /// `initial` is clamped into `bounds`.
    pub fn new(name: impl Into<String>, bounds: Bounds, initial: f64) -> Self {
        Self {
            name: name.into(),
            bounds,
            value: AtomicDouble::new(bounds.clamp(initial)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Parameter for SharedParameter {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn get(&self) -> f64 {
        self.value.get()
    }

    fn set(&self, value: f64) -> std::result::Result<(), ParameterError> {
        if !self.bounds.contains(value) {
            return Err(ParameterError::OutOfRange {
                value,
                low: self.bounds.low,
                high: self.bounds.high,
            });
        }
        self.value.set(value);
        Ok(())
    }

    fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SharedParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.6}", self.name, self.get())
    }
}
