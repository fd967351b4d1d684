//! Pointer session over one verified device.
//!
//! The device has no button state of its own: every report carries the full
//! mask, so the session keeps the mask and re-sends it with each motion.
//! The mask is only updated once the report carrying it was written, so it
//! always equals the mask of the last report the device accepted.

use crate::buttons::Buttons;
use crate::error::Result;
use crate::report::MouseReport;
use crate::transport::{send_report, HidTransport};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Hold time between the two halves of a flick.
pub const FLICK_SETTLE: Duration = Duration::from_millis(6);

/// Button used by callers that do not name one.
pub const DEFAULT_BUTTON: Buttons = Buttons::LEFT;

/// An open pointer session. Owns the device handle; dropping the session
/// closes it.
pub struct MouseSession<T: HidTransport> {
    device: T,
    buttons: Buttons,
}

impl<T: HidTransport> MouseSession<T> {
    /// Take ownership of a verified device and send a zero-motion baseline
    /// report with no buttons held.
    pub fn new(device: T) -> Result<Self> {
        let mut session = Self {
            device,
            buttons: Buttons::NONE,
        };
        session.move_by(0, 0)?;
        Ok(session)
    }

    /// Currently held buttons.
    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    pub fn is_pressed(&self, button: Buttons) -> bool {
        self.buttons.intersects(button)
    }

    /// Relative motion with the current buttons held. Each axis is clamped
    /// to +/-32767 independently.
    pub fn move_by(&mut self, dx: i32, dy: i32) -> Result<()> {
        self.transmit(MouseReport::new(self.buttons, dx, dy))
    }

    /// Hold `button` in addition to whatever is already held.
    ///
    /// Nothing is sent if the mask does not change.
    pub fn press(&mut self, button: Buttons) -> Result<()> {
        self.update_buttons(self.buttons.union(button))
    }

    /// Let go of `button`.
    ///
    /// Nothing is sent if the mask does not change.
    pub fn release(&mut self, button: Buttons) -> Result<()> {
        self.update_buttons(self.buttons.difference(button))
    }

    /// Press and release `button` in place. Replaces the whole mask for
    /// the press half, so other held buttons are released too.
    pub fn click(&mut self, button: Buttons) -> Result<()> {
        debug!(button = %button, "click");
        self.transmit(MouseReport::buttons_only(button))?;
        self.transmit(MouseReport::buttons_only(Buttons::NONE))
    }

    /// Move by (dx, dy) with `button` held, wait [`FLICK_SETTLE`], then move
    /// back by the negated clamped deltas with no buttons held.
    pub fn silent_flick(&mut self, dx: i32, dy: i32, button: Buttons) -> Result<()> {
        let out = MouseReport::new(button, dx, dy);
        debug!(x = out.x, y = out.y, button = %button, "flick");
        self.transmit(out)?;

        thread::sleep(FLICK_SETTLE);

        // Clamped values are symmetric, so the negation cannot overflow.
        self.transmit(MouseReport {
            buttons: Buttons::NONE,
            x: -out.x,
            y: -out.y,
        })
    }

    /// End the session and hand back the device handle.
    pub fn into_inner(self) -> T {
        self.device
    }

    fn update_buttons(&mut self, buttons: Buttons) -> Result<()> {
        if buttons == self.buttons {
            return Ok(());
        }
        self.transmit(MouseReport::buttons_only(buttons))
    }

    fn transmit(&mut self, report: MouseReport) -> Result<()> {
        send_report(&self.device, &report.encode())?;
        self.buttons = report.buttons;
        Ok(())
    }
}
