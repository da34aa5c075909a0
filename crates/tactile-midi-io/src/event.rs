//! Raw and decoded controller messages.

use crate::error::DecodeError;
use smallvec::SmallVec;
use std::fmt;

/// One undecoded message as delivered by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawMessage {
    pub bytes: SmallVec<[u8; 3]>,
    /// Transport timestamp in microseconds.
    pub timestamp: u64,
}

impl RawMessage {
    pub fn new(bytes: &[u8], timestamp: u64) -> Self {
        Self {
            bytes: SmallVec::from_slice(bytes),
            timestamp,
        }
    }

    #[inline]
    pub fn triplet(status: u8, data1: u8, data2: u8, timestamp: u64) -> Self {
        Self {
            bytes: SmallVec::from_buf([status, data1, data2]),
            timestamp,
        }
    }
}

/// A decoded controller message.
///
/// `channel` is the controller id carried in the first data byte (the CC
/// number for control change), which is what knobs are keyed on. The MIDI
/// channel nibble of the status byte is kept in `status`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MidiEvent {
    pub timestamp: u64,
    pub status: u8,
    pub channel: u8,
    pub value: u8,
}

impl MidiEvent {
    /// Program change and channel pressure carry a single data byte; they
    /// decode with `value = 0`.
    pub fn decode(raw: &RawMessage) -> Result<Self, DecodeError> {
        let bytes = raw.bytes.as_slice();
        let (&status, data) = bytes.split_first().ok_or(DecodeError::Truncated(0))?;
        if status & 0x80 == 0 {
            return Err(DecodeError::StatusByte(status));
        }
        let (data1, data2) = match *data {
            [data1, data2, ..] => (data1, data2),
            [data1] if has_single_data_byte(status) => (data1, 0),
            _ if status >= 0xF0 => return Err(DecodeError::SystemMessage(status)),
            _ => return Err(DecodeError::Truncated(bytes.len())),
        };
        if data1 > 0x7F {
            return Err(DecodeError::DataByte(data1));
        }
        if data2 > 0x7F {
            return Err(DecodeError::DataByte(data2));
        }
        Ok(Self {
            timestamp: raw.timestamp,
            status,
            channel: data1,
            value: data2,
        })
    }

    /// Message kind (upper nibble of the status byte).
    #[inline]
    pub fn kind(&self) -> u8 {
        self.status & 0xF0
    }

    /// MIDI channel 0-15 from the status byte.
    #[inline]
    pub fn midi_channel(&self) -> u8 {
        self.status & 0x0F
    }

    #[inline]
    pub fn is_control_change(&self) -> bool {
        self.kind() == 0xB0
    }
}

#[inline]
fn has_single_data_byte(status: u8) -> bool {
    matches!(status & 0xF0, 0xC0 | 0xD0)
}

impl fmt::Display for MidiEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MIDI event: value {} on channel {}",
            self.value, self.channel
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_control_change() {
        let raw = RawMessage::triplet(0xB2, 16, 65, 1_500);
        let event = MidiEvent::decode(&raw).unwrap();
        assert_eq!(event.channel, 16);
        assert_eq!(event.value, 65);
        assert_eq!(event.timestamp, 1_500);
        assert_eq!(event.midi_channel(), 2);
        assert!(event.is_control_change());
    }

    #[test]
    fn test_decode_note_uses_first_data_byte_as_channel() {
        let event = MidiEvent::decode(&RawMessage::triplet(0x90, 60, 100, 0)).unwrap();
        assert_eq!(event.channel, 60);
        assert_eq!(event.value, 100);
        assert!(!event.is_control_change());
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let event = MidiEvent::decode(&RawMessage::new(&[0xB0, 1, 2, 0], 0)).unwrap();
        assert_eq!((event.channel, event.value), (1, 2));
    }

    #[test]
    fn test_decode_truncated() {
        let raw = RawMessage::new(&[0xB0, 5], 0);
        assert_eq!(MidiEvent::decode(&raw), Err(DecodeError::Truncated(2)));
        assert_eq!(
            MidiEvent::decode(&RawMessage::new(&[0x90], 0)),
            Err(DecodeError::Truncated(1))
        );
        assert_eq!(
            MidiEvent::decode(&RawMessage::new(&[], 0)),
            Err(DecodeError::Truncated(0))
        );
    }

    #[test]
    fn test_decode_two_byte_channel_messages() {
        let program = MidiEvent::decode(&RawMessage::new(&[0xC3, 5], 0)).unwrap();
        assert_eq!((program.channel, program.value), (5, 0));
        assert_eq!(program.midi_channel(), 3);

        let pressure = MidiEvent::decode(&RawMessage::new(&[0xD0, 90], 0)).unwrap();
        assert_eq!((pressure.channel, pressure.value), (90, 0));
    }

    #[test]
    fn test_decode_short_system_messages() {
        for bytes in [&[0xF8][..], &[0xFE][..], &[0xF1, 0x10][..]] {
            assert_eq!(
                MidiEvent::decode(&RawMessage::new(bytes, 0)),
                Err(DecodeError::SystemMessage(bytes[0]))
            );
        }
    }

    #[test]
    fn test_decode_rejects_running_status() {
        let raw = RawMessage::triplet(0x10, 5, 5, 0);
        assert_eq!(MidiEvent::decode(&raw), Err(DecodeError::StatusByte(0x10)));
    }

    #[test]
    fn test_decode_rejects_high_data_bytes() {
        assert_eq!(
            MidiEvent::decode(&RawMessage::triplet(0xB0, 0x80, 1, 0)),
            Err(DecodeError::DataByte(0x80))
        );
        assert_eq!(
            MidiEvent::decode(&RawMessage::triplet(0xB0, 1, 0xFF, 0)),
            Err(DecodeError::DataByte(0xFF))
        );
    }

    #[test]
    fn test_display() {
        let event = MidiEvent::decode(&RawMessage::triplet(0xB0, 7, 127, 0)).unwrap();
        assert_eq!(event.to_string(), "MIDI event: value 127 on channel 7");
    }
}
