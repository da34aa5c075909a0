//! Knob whose controller ticks map to fixed-size steps.

use super::KnobState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tactile_core::{DisplaySink, Parameter};
use tracing::trace;

pub const DEFAULT_RESOLUTION: f64 = 1024.0;

/// Step direction decoded from a relative controller value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Decrement,
    Hold,
    Increment,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Decrement => -1.0,
            Direction::Hold => 0.0,
            Direction::Increment => 1.0,
        }
    }
}

/// What a relative knob does with one raw controller value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeInput {
    Step(Direction),
    ToggleLock,
    Ignored,
}

/// Raw-value encoding and step size for relative controllers.
///
/// Most endless encoders send 65 for a clockwise tick and 63 for a
/// counter-clockwise tick, which are the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelativeSettings {
    pub plus_value: u8,
    pub minus_value: u8,
    /// Raw value that toggles the knob's lock instead of stepping.
    #[serde(default)]
    pub lock_value: Option<u8>,
    /// Number of steps spanning the full parameter range.
    #[serde(default = "default_resolution")]
    pub resolution: f64,
}

fn default_resolution() -> f64 {
    DEFAULT_RESOLUTION
}

impl RelativeSettings {
    pub fn new(plus_value: u8, minus_value: u8) -> Self {
        Self {
            plus_value,
            minus_value,
            lock_value: None,
            resolution: DEFAULT_RESOLUTION,
        }
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_lock_value(mut self, lock_value: u8) -> Self {
        self.lock_value = Some(lock_value);
        self
    }

    #[inline]
    pub fn decode(&self, value: u8) -> RelativeInput {
        if value == self.plus_value {
            RelativeInput::Step(Direction::Increment)
        } else if value == self.minus_value {
            RelativeInput::Step(Direction::Decrement)
        } else if self.lock_value == Some(value) {
            RelativeInput::ToggleLock
        } else {
            RelativeInput::Ignored
        }
    }
}

impl Default for RelativeSettings {
    fn default() -> Self {
        Self::new(65, 63)
    }
}

/// Steps the parameter by `(high - low) / resolution` per tick, saturating
/// at the bounds.
///
/// The current value is read through the getter on every tick, so the
/// parameter may also be changed by other code between ticks.
pub struct RelativeKnob {
    pub(super) state: KnobState,
    settings: RelativeSettings,
}

impl RelativeKnob {
    pub fn new(
        parameter: Arc<dyn Parameter>,
        settings: RelativeSettings,
        display: Option<Arc<dyn DisplaySink>>,
    ) -> Self {
        Self {
            state: KnobState::new(parameter, display),
            settings,
        }
    }

    pub fn settings(&self) -> &RelativeSettings {
        &self.settings
    }

    pub fn handle(&self, direction: Direction) -> Option<f64> {
        if self.state.locked.get() {
            return None;
        }
        let bounds = self.state.bounds()?;
        let step = bounds.span() / self.settings.resolution;
        let target = bounds.clamp(self.state.parameter.get() + direction.sign() * step);
        self.state.apply(target)
    }

    /// Interpret one raw controller value.
    pub fn handle_value(&self, value: u8) -> Option<f64> {
        match self.settings.decode(value) {
            RelativeInput::Step(direction) => self.handle(direction),
            RelativeInput::ToggleLock => {
                let locked = self.state.locked.toggle();
                trace!(locked, "Relative knob lock toggled");
                None
            }
            RelativeInput::Ignored => {
                trace!(value, "Ignoring unrecognized relative value");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use tactile_core::{Bounds, SharedParameter};

    fn knob(settings: RelativeSettings, initial: f64) -> (Arc<SharedParameter>, RelativeKnob) {
        let param = Arc::new(SharedParameter::new(
            "x",
            Bounds::new(0.0, 10.0).unwrap(),
            initial,
        ));
        let knob = RelativeKnob::new(param.clone(), settings, None);
        (param, knob)
    }

    #[test]
    fn test_decode() {
        let settings = RelativeSettings::new(65, 63).with_lock_value(127);
        assert_eq!(settings.decode(65), RelativeInput::Step(Direction::Increment));
        assert_eq!(settings.decode(63), RelativeInput::Step(Direction::Decrement));
        assert_eq!(settings.decode(127), RelativeInput::ToggleLock);
        assert_eq!(settings.decode(1), RelativeInput::Ignored);
    }

    #[test]
    fn test_minus_value_steps_down() {
        let (param, knob) = knob(RelativeSettings::new(65, 63).with_resolution(10.0), 5.0);
        knob.handle_value(63);
        assert_relative_eq!(param.get(), 4.0);
    }

    #[test]
    fn test_saturates_at_high_bound() {
        let (param, knob) = knob(RelativeSettings::default().with_resolution(10.0), 0.0);
        for i in 1..=15 {
            knob.handle(Direction::Increment);
            if i >= 10 {
                assert_relative_eq!(param.get(), 10.0, epsilon = 1e-9);
            } else {
                assert!(param.get() < 10.0);
            }
        }
        assert_eq!(param.get(), 10.0);
    }

    #[test]
    fn test_saturates_at_low_bound() {
        let (param, knob) = knob(RelativeSettings::default().with_resolution(4.0), 1.0);
        knob.handle(Direction::Decrement);
        knob.handle(Direction::Decrement);
        assert_eq!(param.get(), 0.0);
    }

    #[test]
    fn test_hold_keeps_value() {
        let (param, knob) = knob(RelativeSettings::default(), 3.0);
        knob.handle(Direction::Hold);
        assert_eq!(param.get(), 3.0);
    }

    #[test]
    fn test_unknown_value_is_ignored() {
        let (param, knob) = knob(RelativeSettings::new(65, 63), 5.0);
        assert_eq!(knob.handle_value(1), None);
        assert_eq!(param.get(), 5.0);
    }

    #[test]
    fn test_reads_external_changes() {
        let (param, knob) = knob(RelativeSettings::default().with_resolution(10.0), 0.0);
        knob.handle(Direction::Increment);
        param.set(7.0).unwrap();
        knob.handle(Direction::Increment);
        assert_relative_eq!(param.get(), 8.0);
    }

    #[test]
    fn test_lock_value_toggles() {
        let (param, knob) = knob(
            RelativeSettings::new(65, 63)
                .with_lock_value(0)
                .with_resolution(10.0),
            5.0,
        );
        knob.handle_value(0);
        knob.handle_value(65);
        knob.handle_value(65);
        assert_eq!(param.get(), 5.0);

        knob.handle_value(0);
        knob.handle_value(65);
        assert_relative_eq!(param.get(), 6.0);
    }

    proptest! {
        #[test]
        fn prop_never_leaves_bounds(
            initial in 0f64..=10.0,
            resolution in 1f64..100.0,
            ticks in proptest::collection::vec(prop_oneof![Just(65u8), Just(63u8)], 0..300),
        ) {
            let settings = RelativeSettings::new(65, 63).with_resolution(resolution);
            let (param, knob) = knob(settings, initial);
            for tick in ticks {
                knob.handle_value(tick);
                prop_assert!((0.0..=10.0).contains(&param.get()));
            }
        }
    }
}
