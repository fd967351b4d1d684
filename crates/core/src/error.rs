//! Error types for hidmouse-core.

use thiserror::Error;

/// Core library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HID backend failure (init, enumeration, open, raw I/O).
    #[error("HID error: {0}")]
    Hid(String),

    /// No enumerated device answered the ping handshake.
    #[error(
        "device VID: {} PID: {} ping code: 0x{ping_code:02X} not found",
        display_id(.vendor_id),
        display_id(.product_id)
    )]
    DeviceNotFound {
        vendor_id: Option<u16>,
        product_id: Option<u16>,
        ping_code: u8,
    },

    /// Writing a report to an established session failed.
    #[error("transmission failed: {0}")]
    Transmission(String),

    /// The device accepted fewer bytes than the report length.
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },

    /// Bounded read elapsed without data.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Bytes that do not form a valid mouse report.
    #[error("malformed report: {0}")]
    Framing(String),

    /// Config file could not be located, read, or parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error came from sending a report on an open session.
    pub fn is_transmission(&self) -> bool {
        matches!(self, Self::Transmission(_) | Self::ShortWrite { .. })
    }
}

fn display_id(id: &Option<u16>) -> String {
    match id {
        Some(v) => format!("0x{v:04X}"),
        None => "Unspecified".to_string(),
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, Error>;
