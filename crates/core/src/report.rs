//! Pointer report framing.
//!
//! Report format (6 bytes, little-endian axes):
//!   - Byte 0: Report ID (0x01)
//!   - Byte 1: Button mask
//!   - Byte 2-3: X delta, i16 (low, high)
//!   - Byte 4-5: Y delta, i16 (low, high)
//!
//! Axis values are clamped to +/-32767 so that -32768 is never sent.

use crate::buttons::Buttons;
use crate::error::{Error, Result};

/// Report ID of the relative pointer report.
pub const REPORT_ID: u8 = 0x01;

/// Encoded report length in bytes.
pub const REPORT_LEN: usize = 6;

/// Largest magnitude either axis may carry.
pub const AXIS_LIMIT: i32 = 32767;

/// Clamp a motion delta into the reportable range.
pub fn clamp_axis(value: i32) -> i16 {
    // In range after the clamp, so the cast cannot truncate.
    value.clamp(-AXIS_LIMIT, AXIS_LIMIT) as i16
}

/// Low byte of a 16-bit two's-complement value.
pub fn low_byte(value: i16) -> u8 {
    ((value as u16) & 0xFF) as u8
}

/// High byte of a 16-bit two's-complement value.
pub fn high_byte(value: i16) -> u8 {
    (((value as u16) >> 8) & 0xFF) as u8
}

/// One relative pointer report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseReport {
    pub buttons: Buttons,
    pub x: i16,
    pub y: i16,
}

impl MouseReport {
    /// Build a report, clamping both axes independently.
    pub fn new(buttons: Buttons, dx: i32, dy: i32) -> Self {
        Self {
            buttons,
            x: clamp_axis(dx),
            y: clamp_axis(dy),
        }
    }

    /// A report that only re-asserts the button state.
    pub fn buttons_only(buttons: Buttons) -> Self {
        Self { buttons, x: 0, y: 0 }
    }

    /// Encode to wire bytes.
    pub fn encode(&self) -> [u8; REPORT_LEN] {
        [
            REPORT_ID,
            self.buttons.bits(),
            low_byte(self.x),
            high_byte(self.x),
            low_byte(self.y),
            high_byte(self.y),
        ]
    }

    /// Decode wire bytes.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let bytes: &[u8; REPORT_LEN] = data.try_into().map_err(|_| {
            Error::Framing(format!(
                "report length {} (expected {REPORT_LEN})",
                data.len()
            ))
        })?;
        if bytes[0] != REPORT_ID {
            return Err(Error::Framing(format!(
                "unexpected report ID 0x{:02X} (expected 0x{REPORT_ID:02X})",
                bytes[0]
            )));
        }
        Ok(Self {
            buttons: Buttons::from_bits(bytes[1]),
            x: i16::from_le_bytes([bytes[2], bytes[3]]),
            y: i16::from_le_bytes([bytes[4], bytes[5]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_is_identity_in_range() {
        for v in [-32767, -1000, -1, 0, 1, 127, 128, 32767] {
            assert_eq!(clamp_axis(v) as i32, v);
        }
    }

    #[test]
    fn clamp_maps_to_nearest_bound() {
        assert_eq!(clamp_axis(32768), 32767);
        assert_eq!(clamp_axis(40000), 32767);
        assert_eq!(clamp_axis(i32::MAX), 32767);
        assert_eq!(clamp_axis(-32768), -32767);
        assert_eq!(clamp_axis(i32::MIN), -32767);
    }

    #[test]
    fn byte_split() {
        assert_eq!((low_byte(0x1234), high_byte(0x1234)), (0x34, 0x12));
        assert_eq!((low_byte(-1), high_byte(-1)), (0xFF, 0xFF));
        assert_eq!((low_byte(-32767), high_byte(-32767)), (0x01, 0x80));
    }

    #[test]
    fn encode_layout() {
        let report = MouseReport::new(Buttons::RIGHT, 5, -2);
        assert_eq!(report.encode(), [0x01, 0x02, 0x05, 0x00, 0xFE, 0xFF]);
    }

    #[test]
    fn encode_clamped_extremes() {
        let report = MouseReport::new(Buttons::NONE, 40000, -40000);
        assert_eq!(report.encode(), [0x01, 0x00, 0xFF, 0x7F, 0x01, 0x80]);
    }

    #[test]
    fn buttons_only_has_zero_motion() {
        let report = MouseReport::buttons_only(Buttons::ALL);
        assert_eq!(report.encode(), [0x01, 0x07, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn decode_reads_signed_axes() {
        let report = MouseReport::decode(&[0x01, 0x01, 0x9C, 0xFF, 0x64, 0x00]).unwrap();
        assert_eq!(report.buttons, Buttons::LEFT);
        assert_eq!(report.x, -100);
        assert_eq!(report.y, 100);
    }

    #[test]
    fn decode_rejects_bad_frames() {
        assert!(matches!(
            MouseReport::decode(&[0x01, 0x00]),
            Err(Error::Framing(_))
        ));
        assert!(matches!(
            MouseReport::decode(&[0x02, 0x00, 0x00, 0x00, 0x00, 0x00]),
            Err(Error::Framing(_))
        ));
    }
}
