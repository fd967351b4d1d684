//! HID transport abstraction for device communication.
//!
//! Provides a trait-based transport layer so that real HID devices and
//! mock devices share the same interface. `HidBackend` covers enumeration
//! and opening; `HidTransport` covers I/O on one open handle. Dropping a
//! handle closes it.

use crate::error::{Error, Result};
use std::borrow::Cow;
use std::ffi::CString;
use tracing::{trace, warn};

/// Descriptor for one enumerated HID device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub vid: u16,
    pub pid: u16,
    /// Platform device path, kept byte-for-byte as enumerated.
    pub path: CString,
    pub product: Option<String>,
    pub serial: Option<String>,
}

impl DeviceInfo {
    /// Path for logs and user output. Lossy for non-UTF-8 paths.
    pub fn display_path(&self) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }
}

/// Abstraction over raw HID read/write on an open device.
pub trait HidTransport: Send {
    /// Write a raw output report. Returns the number of bytes accepted.
    fn write(&self, data: &[u8]) -> Result<usize>;

    /// Read into `buf`, waiting at most `timeout_ms`. Returns `Ok(0)` when
    /// the wait elapsed with nothing to read.
    fn read_timeout(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize>;
}

/// Source of HID devices: enumeration and opening.
pub trait HidBackend {
    type Device: HidTransport;

    /// List every HID device currently attached, in host enumeration order.
    fn enumerate(&mut self) -> Result<Vec<DeviceInfo>>;

    /// Open the device described by `info` for read/write.
    fn open(&self, info: &DeviceInfo) -> Result<Self::Device>;
}

/// Write one complete report, mapping any failure to a transmission error.
pub fn send_report(transport: &dyn HidTransport, data: &[u8]) -> Result<()> {
    trace!(report_hex = format_args!("{:02X?}", data), "report TX");

    let written = transport.write(data).map_err(|e| {
        warn!(error = %e, "report write failed");
        match e {
            Error::Transmission(_) | Error::ShortWrite { .. } => e,
            other => Error::Transmission(other.to_string()),
        }
    })?;

    if written < data.len() {
        warn!(expected = data.len(), written, "short report write");
        return Err(Error::ShortWrite {
            expected: data.len(),
            written,
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::mock::{MockDevice, PingReply};
    use super::*;

    #[test]
    fn send_report_writes_bytes() {
        let (dev, log) = MockDevice::new(PingReply::Silent);
        send_report(&dev, &[1, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(log.lock().unwrap().writes, vec![vec![1, 0, 0, 0, 0, 0]]);
    }

    #[test]
    fn send_report_maps_write_error_to_transmission() {
        let (dev, _log) = MockDevice::new(PingReply::Silent);
        let dev = dev.failing_writes();
        let err = send_report(&dev, &[1, 0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, Error::Transmission(_)));
    }

    #[test]
    fn send_report_detects_short_write() {
        let (dev, _log) = MockDevice::new(PingReply::Silent);
        let dev = dev.short_writes();
        let err = send_report(&dev, &[1, 0, 0, 0, 0, 0]).unwrap_err();
        assert!(matches!(
            err,
            Error::ShortWrite {
                expected: 6,
                written: 5
            }
        ));
    }

    #[test]
    fn mock_device_records_close_on_drop() {
        let (dev, log) = MockDevice::new(PingReply::Silent);
        drop(dev);
        assert_eq!(log.lock().unwrap().closed, 1);
    }
}
