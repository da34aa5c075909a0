//! Look up an input device by name.

use super::{DeviceInfo, MidiTransport};
use crate::error::Result;

/// Device slots scanned when resolving a name.
pub const MAX_DEVICE_SLOTS: usize = 255;

/// Find an input device by exact name, or the first input device when
/// `name` is `None`.
///
/// Only slots `0..MAX_DEVICE_SLOTS` are considered. Returns `Ok(None)` when
/// nothing matches; enumeration failures are errors.
pub fn resolve_device(
    transport: &dyn MidiTransport,
    name: Option<&str>,
) -> Result<Option<DeviceInfo>> {
    let found = transport.devices()?.into_iter().find(|device| {
        device.index < MAX_DEVICE_SLOTS
            && device.is_input
            && name.map_or(true, |name| device.name == name)
    });
    Ok(found)
}
