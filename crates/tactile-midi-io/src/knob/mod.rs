//! Knobs: translate decoded controller values into parameter updates.
//!
//! Two models are supported:
//! - [`AbsoluteKnob`]: position 0-127 maps directly onto the parameter bounds
//! - [`RelativeKnob`]: each tick moves the parameter by a fixed step
//!
//! A stream creates all its knobs from one [`KnobMode`].

mod absolute;
mod relative;

pub use absolute::{AbsoluteKnob, MAX_POSITION};
pub use relative::{
    Direction, RelativeInput, RelativeKnob, RelativeSettings, DEFAULT_RESOLUTION,
};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tactile_core::{AtomicFlag, Bounds, DisplaySink, Parameter};
use tracing::warn;

/// How a stream interprets controller values for every knob it creates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum KnobMode {
    #[default]
    Absolute,
    Relative(RelativeSettings),
}

pub(crate) struct KnobState {
    pub(crate) parameter: Arc<dyn Parameter>,
    pub(crate) locked: AtomicFlag,
    display: Option<Arc<dyn DisplaySink>>,
}

impl KnobState {
    fn new(parameter: Arc<dyn Parameter>, display: Option<Arc<dyn DisplaySink>>) -> Self {
        Self {
            parameter,
            locked: AtomicFlag::new(false),
            display,
        }
    }

    /// The parameter's current bounds, or `None` (with a warning) when they
    /// are inverted or not finite.
    fn bounds(&self) -> Option<Bounds> {
        let bounds = self.parameter.bounds();
        if !bounds.is_valid() {
            warn!(
                "Parameter reported invalid bounds [{}, {}], skipping event",
                bounds.low, bounds.high
            );
            return None;
        }
        Some(bounds)
    }

    /// Write `target`, then publish the parameter if a display is attached.
    fn apply(&self, target: f64) -> Option<f64> {
        if let Err(e) = self.parameter.set(target) {
            warn!("Parameter rejected {}: {}", target, e);
            return None;
        }
        if let Some(display) = &self.display {
            display.show(&self.parameter.describe());
        }
        Some(target)
    }
}

/// A knob bound to one parameter.
pub enum Knob {
    Absolute(AbsoluteKnob),
    Relative(RelativeKnob),
}

impl Knob {
    pub fn new(
        mode: &KnobMode,
        parameter: Arc<dyn Parameter>,
        display: Option<Arc<dyn DisplaySink>>,
    ) -> Self {
        match mode {
            KnobMode::Absolute => Knob::Absolute(AbsoluteKnob::new(parameter, display)),
            KnobMode::Relative(settings) => {
                Knob::Relative(RelativeKnob::new(parameter, *settings, display))
            }
        }
    }

    fn state(&self) -> &KnobState {
        match self {
            Knob::Absolute(knob) => &knob.state,
            Knob::Relative(knob) => &knob.state,
        }
    }

    pub fn parameter(&self) -> &Arc<dyn Parameter> {
        &self.state().parameter
    }

    /// Feed one raw controller value: a position for absolute knobs, an
    /// encoded tick for relative knobs. Returns the value written, if any.
    pub fn handle_value(&self, value: u8) -> Option<f64> {
        match self {
            Knob::Absolute(knob) => knob.handle(value),
            Knob::Relative(knob) => knob.handle_value(value),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.state().locked.get()
    }

    pub fn set_locked(&self, locked: bool) {
        self.state().locked.set(locked);
    }

    /// Returns the new lock state.
    pub fn toggle_lock(&self) -> bool {
        self.state().locked.toggle()
    }
}
