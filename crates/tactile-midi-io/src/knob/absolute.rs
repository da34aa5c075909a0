//! Knob whose controller position maps onto the full parameter range.

use super::KnobState;
use std::sync::Arc;
use tactile_core::{DisplaySink, Parameter};

/// Highest 7-bit controller value.
pub const MAX_POSITION: u8 = 127;

/// Maps a 0-127 controller reading linearly onto the parameter bounds.
pub struct AbsoluteKnob {
    pub(super) state: KnobState,
}

impl AbsoluteKnob {
    pub fn new(parameter: Arc<dyn Parameter>, display: Option<Arc<dyn DisplaySink>>) -> Self {
        Self {
            state: KnobState::new(parameter, display),
        }
    }

    /// Parameter value a controller position maps to. Positions above 127
    /// are treated as 127. `None` when the parameter's bounds are invalid.
    #[inline]
    pub fn target(&self, position: u8) -> Option<f64> {
        let position = position.min(MAX_POSITION);
        let bounds = self.state.bounds()?;
        // lerp can overshoot `high` by one ulp
        Some(bounds.clamp(bounds.lerp(f64::from(position) / f64::from(MAX_POSITION))))
    }

    /// Move the parameter to `position`. Returns the value written, or `None`
    /// when locked, when the bounds are invalid or when the setter refused it.
    pub fn handle(&self, position: u8) -> Option<f64> {
        if self.state.locked.get() {
            return None;
        }
        let target = self.target(position)?;
        self.state.apply(target)
    }
}
