//! hidmouse-core: discovery and pointer control for a ping-verified HID mouse.
//!
//! The target is a programmable HID device (typically a microcontroller
//! board) that answers a one-byte ping and accepts a fixed 6-byte relative
//! pointer report. Discovery finds and verifies it; a [`session::MouseSession`]
//! then drives it.
//!
//! Nothing here runs at load time. Call [`hid::HidapiBackend::new`] to
//! initialize the native HID library before discovery.

pub mod buttons;
pub mod config;
pub mod discovery;
pub mod error;
pub mod hid;
pub mod report;
pub mod session;
pub mod transport;

pub use buttons::Buttons;
pub use discovery::{connect, find_device, DeviceIdentity};
pub use error::{Error, Result};
pub use session::MouseSession;

/// Arduino USB Vendor ID.
pub const ARDUINO_VID: u16 = 0x2341;
