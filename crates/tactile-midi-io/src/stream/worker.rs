//! Event dispatch and the polling loop.

use crate::error::DecodeError;
use crate::event::MidiEvent;
use crate::io::InputHandle;
use crate::knob::{Knob, KnobMode};
use arc_swap::ArcSwapOption;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tactile_core::{DisplaySink, Parameter};
use tracing::{debug, trace, warn};

struct PendingBind {
    parameter: Arc<dyn Parameter>,
}

/// Channel→knob table plus the one-shot bind slot.
///
/// Shared between the stream (assign/bind from the caller's thread) and the
/// worker (dispatch).
pub(crate) struct Dispatcher {
    knobs: DashMap<u8, Arc<Knob>>,
    pending: ArcSwapOption<PendingBind>,
    mode: KnobMode,
    display: Option<Arc<dyn DisplaySink>>,
}

impl Dispatcher {
    pub(crate) fn new(mode: KnobMode, display: Option<Arc<dyn DisplaySink>>) -> Self {
        Self {
            knobs: DashMap::new(),
            pending: ArcSwapOption::empty(),
            mode,
            display,
        }
    }

    pub(crate) fn assign(&self, channel: u8, parameter: Arc<dyn Parameter>) -> Arc<Knob> {
        let knob = Arc::new(Knob::new(&self.mode, parameter, self.display.clone()));
        if self.knobs.insert(channel, Arc::clone(&knob)).is_some() {
            debug!("Replaced knob on channel {}", channel);
        }
        knob
    }

    pub(crate) fn unassign(&self, channel: u8) -> bool {
        self.knobs.remove(&channel).is_some()
    }

    pub(crate) fn knob(&self, channel: u8) -> Option<Arc<Knob>> {
        self.knobs.get(&channel).map(|entry| Arc::clone(entry.value()))
    }

    pub(crate) fn channels(&self) -> Vec<u8> {
        let mut channels: Vec<u8> = self.knobs.iter().map(|entry| *entry.key()).collect();
        channels.sort_unstable();
        channels
    }

    pub(crate) fn clear(&self) {
        self.knobs.clear();
        self.pending.store(None);
    }

    pub(crate) fn bind(&self, parameter: Arc<dyn Parameter>) {
        self.pending.store(Some(Arc::new(PendingBind { parameter })));
    }

    pub(crate) fn cancel_bind(&self) -> bool {
        self.pending.swap(None).is_some()
    }

    pub(crate) fn is_binding(&self) -> bool {
        self.pending.load().is_some()
    }

    /// Route one event: complete a pending bind if any, then hand the value
    /// to the knob on the event's channel.
    pub(crate) fn dispatch(&self, event: &MidiEvent) {
        if let Some(display) = &self.display {
            display.show(&event.to_string());
        }

        // swap, not load+store: a bind must be consumed by exactly one event
        let knob = if let Some(pending) = self.pending.swap(None) {
            debug!("Bound channel {} to pending parameter", event.channel);
            self.assign(event.channel, Arc::clone(&pending.parameter))
        } else {
            match self.knob(event.channel) {
                Some(knob) => knob,
                None => {
                    trace!("No knob on channel {}, dropping event", event.channel);
                    return;
                }
            }
        };

        if let Some(value) = knob.handle_value(event.value) {
            trace!("Channel {} set parameter to {}", event.channel, value);
        }
    }
}

/// Poll `handle` until `running` is cleared, then give the handle back so the
/// stream can close it.
pub(crate) fn run(
    mut handle: Box<dyn InputHandle>,
    dispatcher: Arc<Dispatcher>,
    running: Arc<AtomicBool>,
    buffer_size: usize,
    delay: Duration,
) -> Box<dyn InputHandle> {
    debug!("MIDI polling loop started");
    while running.load(Ordering::Acquire) {
        for raw in handle.read(buffer_size) {
            match MidiEvent::decode(&raw) {
                Ok(event) => dispatcher.dispatch(&event),
                Err(DecodeError::SystemMessage(status)) => {
                    trace!("Ignoring system message 0x{:02X}", status)
                }
                Err(e) => warn!("Skipping MIDI message {:02X?}: {}", raw.bytes.as_slice(), e),
            }
        }
        if delay.is_zero() {
            thread::yield_now();
        } else {
            thread::sleep(delay);
        }
    }
    debug!("MIDI polling loop stopped");
    handle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RawMessage;
    use crate::knob::RelativeSettings;
    use tactile_core::{Bounds, SharedParameter, TextDisplay};

    fn param(name: &str) -> Arc<SharedParameter> {
        Arc::new(SharedParameter::new(
            name,
            Bounds::new(0.0, 10.0).unwrap(),
            0.0,
        ))
    }

    fn cc(channel: u8, value: u8) -> MidiEvent {
        MidiEvent::decode(&RawMessage::triplet(0xB0, channel, value, 0)).unwrap()
    }

    #[test]
    fn test_dispatch_to_assigned_channel() {
        let dispatcher = Dispatcher::new(KnobMode::Absolute, None);
        let p = param("a");
        dispatcher.assign(3, p.clone());

        dispatcher.dispatch(&cc(3, 127));
        assert_eq!(p.get(), 10.0);
    }

    #[test]
    fn test_unassigned_channel_dropped() {
        let dispatcher = Dispatcher::new(KnobMode::Absolute, None);
        let p = param("a");
        dispatcher.assign(3, p.clone());

        dispatcher.dispatch(&cc(4, 127));
        assert_eq!(p.get(), 0.0);
    }

    #[test]
    fn test_bind_consumes_first_event_and_applies_it() {
        let dispatcher = Dispatcher::new(KnobMode::Absolute, None);
        let p = param("a");
        dispatcher.bind(p.clone());
        assert!(dispatcher.is_binding());

        dispatcher.dispatch(&cc(9, 127));
        assert!(!dispatcher.is_binding());
        assert_eq!(dispatcher.channels(), vec![9]);
        assert_eq!(p.get(), 10.0);

        dispatcher.dispatch(&cc(9, 0));
        assert_eq!(p.get(), 0.0);
    }

    #[test]
    fn test_bind_replaces_existing_knob() {
        let dispatcher = Dispatcher::new(KnobMode::Absolute, None);
        let old = param("old");
        let new = param("new");
        dispatcher.assign(2, old.clone());
        dispatcher.bind(new.clone());

        dispatcher.dispatch(&cc(2, 127));
        assert_eq!(old.get(), 0.0);
        assert_eq!(new.get(), 10.0);
    }

    #[test]
    fn test_second_bind_overrides_first() {
        let dispatcher = Dispatcher::new(KnobMode::Absolute, None);
        let first = param("first");
        let second = param("second");
        dispatcher.bind(first.clone());
        dispatcher.bind(second.clone());

        dispatcher.dispatch(&cc(1, 127));
        assert_eq!(first.get(), 0.0);
        assert_eq!(second.get(), 10.0);
    }

    #[test]
    fn test_cancel_bind() {
        let dispatcher = Dispatcher::new(KnobMode::Absolute, None);
        dispatcher.bind(param("a"));
        assert!(dispatcher.cancel_bind());
        assert!(!dispatcher.cancel_bind());

        dispatcher.dispatch(&cc(1, 64));
        assert!(dispatcher.channels().is_empty());
    }

    #[test]
    fn test_relative_mode_knobs() {
        let settings = RelativeSettings::new(65, 63).with_resolution(10.0);
        let dispatcher = Dispatcher::new(KnobMode::Relative(settings), None);
        let p = param("a");
        dispatcher.assign(0, p.clone());

        dispatcher.dispatch(&cc(0, 65));
        dispatcher.dispatch(&cc(0, 65));
        dispatcher.dispatch(&cc(0, 63));
        assert!((p.get() - 1.0).abs() < 1e-9);

        dispatcher.dispatch(&cc(0, 1));
        assert!((p.get() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_display_shows_event_then_parameter() {
        let display = TextDisplay::new();
        let dispatcher = Dispatcher::new(KnobMode::Absolute, Some(Arc::new(display.clone())));

        dispatcher.dispatch(&cc(5, 10));
        assert_eq!(display.value(), "MIDI event: value 10 on channel 5");

        dispatcher.assign(5, param("bias"));
        dispatcher.dispatch(&cc(5, 127));
        assert_eq!(display.value(), "bias: 10.000000");
    }

    #[test]
    fn test_clear_drops_knobs_and_pending_bind() {
        let dispatcher = Dispatcher::new(KnobMode::Absolute, None);
        dispatcher.assign(1, param("a"));
        dispatcher.bind(param("b"));
        dispatcher.clear();
        assert!(dispatcher.channels().is_empty());
        assert!(!dispatcher.is_binding());
    }
}
