//! Real HID backend over the `hidapi` crate.
//!
//! Creating a [`HidapiBackend`] initializes the native HID library. This is
//! the only initialization step and is left to the composing application.

use crate::error::{Error, Result};
use crate::transport::{DeviceInfo, HidBackend, HidTransport};
use hidapi::{HidApi, HidDevice};
use tracing::debug;

/// Host HID subsystem.
pub struct HidapiBackend {
    api: HidApi,
}

impl HidapiBackend {
    /// Initialize the native HID library.
    pub fn new() -> Result<Self> {
        let api = HidApi::new().map_err(|e| Error::Hid(format!("hidapi init: {e}")))?;
        Ok(Self { api })
    }
}

impl HidBackend for HidapiBackend {
    type Device = HidapiDevice;

    fn enumerate(&mut self) -> Result<Vec<DeviceInfo>> {
        self.api
            .refresh_devices()
            .map_err(|e| Error::Hid(format!("enumerate: {e}")))?;

        let devices: Vec<DeviceInfo> = self
            .api
            .device_list()
            .map(|info| DeviceInfo {
                vid: info.vendor_id(),
                pid: info.product_id(),
                path: info.path().to_owned(),
                product: info.product_string().map(|s| s.to_string()),
                serial: info.serial_number().map(|s| s.to_string()),
            })
            .collect();

        debug!(count = devices.len(), "HID enumeration complete");
        Ok(devices)
    }

    fn open(&self, info: &DeviceInfo) -> Result<HidapiDevice> {
        let device = self.api.open_path(&info.path).map_err(|e| {
            Error::Hid(format!(
                "open HID device (VID=0x{:04X} PID=0x{:04X} path={}): {e}",
                info.vid,
                info.pid,
                info.display_path()
            ))
        })?;
        Ok(HidapiDevice { device })
    }
}

/// An open hidapi device. Closed on drop.
pub struct HidapiDevice {
    device: HidDevice,
}

impl HidTransport for HidapiDevice {
    fn write(&self, data: &[u8]) -> Result<usize> {
        self.device
            .write(data)
            .map_err(|e| Error::Hid(format!("write: {e}")))
    }

    fn read_timeout(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize> {
        self.device
            .read_timeout(buf, timeout_ms)
            .map_err(|e| Error::Hid(format!("read_timeout: {e}")))
    }
}
