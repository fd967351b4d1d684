//! Pointer button mask.
//!
//! One bit per button in the second byte of every report:
//!   - bit 0: left
//!   - bit 1: right
//!   - bit 2: middle
//!
//! Remaining bits are reserved and never set by this crate's constants, but
//! `from_bits` passes them through untouched.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// 8-bit button mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0x00);
    pub const LEFT: Buttons = Buttons(0x01);
    pub const RIGHT: Buttons = Buttons(0x02);
    pub const MIDDLE: Buttons = Buttons(0x04);
    pub const ALL: Buttons = Buttons(0x01 | 0x02 | 0x04);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Mask with every bit of `other` set.
    pub const fn union(self, other: Buttons) -> Self {
        Self(self.0 | other.0)
    }

    /// Mask with every bit of `other` cleared.
    pub const fn difference(self, other: Buttons) -> Self {
        Self(self.0 & !other.0)
    }

    /// True if any bit of `other` is set in `self`.
    pub const fn intersects(self, other: Buttons) -> bool {
        self.0 & other.0 != 0
    }

    /// Parse a button name (case-insensitive).
    ///
    /// Accepts "left", "right", "middle", "all", and "none", plus the
    /// "-button" suffixed forms and raw masks such as "0x03".
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_lowercase();
        let base = lower.strip_suffix("-button").unwrap_or(&lower);
        match base {
            "left" | "l" => Some(Self::LEFT),
            "right" | "r" => Some(Self::RIGHT),
            "middle" | "m" | "wheel" => Some(Self::MIDDLE),
            "all" => Some(Self::ALL),
            "none" => Some(Self::NONE),
            other => other
                .strip_prefix("0x")
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .map(Self),
        }
    }

    /// Human-readable label.
    pub fn label(self) -> String {
        let names: Vec<&str> = [
            (Self::LEFT, "left"),
            (Self::RIGHT, "right"),
            (Self::MIDDLE, "middle"),
        ]
        .iter()
        .filter(|(b, _)| self.intersects(*b))
        .map(|(_, n)| *n)
        .collect();

        if names.is_empty() {
            "none".to_string()
        } else {
            names.join("+")
        }
    }
}

impl BitOr for Buttons {
    type Output = Buttons;

    fn bitor(self, rhs: Buttons) -> Buttons {
        self.union(rhs)
    }
}

impl FromStr for Buttons {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            format!("unknown button '{s}'. Valid buttons: left, right, middle, all, none, 0xNN")
        })
    }
}

impl fmt::Display for Buttons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02X})", self.label(), self.0)
    }
}
