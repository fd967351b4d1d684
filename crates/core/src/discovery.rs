//! Device discovery: enumeration, filtering, and the ping handshake.
//!
//! Many HID devices can share a vendor/product ID (the same microcontroller
//! board flashed with different sketches, for example), so the IDs only
//! narrow the candidate list. The target is identified by the ping
//! handshake:
//!   - Host writes `[0x00, ping_code]`
//!   - Device replies with at least one byte, the first equal to `ping_code`
//!
//! Candidates are tried in enumeration order and the first one that answers
//! wins. Every rejected candidate is closed before the next one is opened.

use crate::error::{Error, Result};
use crate::session::MouseSession;
use crate::transport::{DeviceInfo, HidBackend, HidTransport};
use tracing::{debug, info};

/// How long to wait for a ping reply.
pub const PING_TIMEOUT_MS: i32 = 10;

/// Bytes read back from a ping.
pub const PING_REPLY_LEN: usize = 1;

/// Optional vendor/product filter. `None` matches any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceFilter {
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
}

impl DeviceFilter {
    pub fn matches(&self, info: &DeviceInfo) -> bool {
        self.vendor_id.is_none_or(|vid| vid == info.vid)
            && self.product_id.is_none_or(|pid| pid == info.pid)
    }
}

/// What to look for during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
    pub ping_code: u8,
}

impl DeviceIdentity {
    pub fn new(vendor_id: Option<u16>, product_id: Option<u16>, ping_code: u8) -> Self {
        Self {
            vendor_id,
            product_id,
            ping_code,
        }
    }

    pub fn filter(&self) -> DeviceFilter {
        DeviceFilter {
            vendor_id: self.vendor_id,
            product_id: self.product_id,
        }
    }

    fn not_found(&self) -> Error {
        Error::DeviceNotFound {
            vendor_id: self.vendor_id,
            product_id: self.product_id,
            ping_code: self.ping_code,
        }
    }
}

/// Send the ping frame and return the first reply byte.
fn exchange_ping(transport: &dyn HidTransport, ping_code: u8) -> Result<u8> {
    transport.write(&[0x00, ping_code])?;

    let mut reply = [0u8; PING_REPLY_LEN];
    match transport.read_timeout(&mut reply, PING_TIMEOUT_MS)? {
        0 => Err(Error::Timeout(format!(
            "no ping reply within {PING_TIMEOUT_MS}ms"
        ))),
        _ => Ok(reply[0]),
    }
}

/// Run the ping handshake against an open device.
///
/// Any I/O error or timeout counts as "no answer".
pub fn check_ping(transport: &dyn HidTransport, ping_code: u8) -> bool {
    match exchange_ping(transport, ping_code) {
        Ok(received) => {
            let matched = received == ping_code;
            debug!(
                expected = format_args!("0x{:02X}", ping_code),
                received = format_args!("0x{:02X}", received),
                matched,
                "Ping reply"
            );
            matched
        }
        Err(e) => {
            debug!(error = %e, "Ping failed");
            false
        }
    }
}

/// Enumerate devices matching `filter` without opening them.
pub fn list_candidates<B: HidBackend>(
    backend: &mut B,
    filter: &DeviceFilter,
) -> Result<Vec<DeviceInfo>> {
    let candidates: Vec<DeviceInfo> = backend
        .enumerate()?
        .into_iter()
        .filter(|info| filter.matches(info))
        .collect();
    debug!(count = candidates.len(), "Candidate enumeration complete");
    Ok(candidates)
}

/// Find the device that answers the ping, returning its descriptor too.
pub fn find_device_with_info<B: HidBackend>(
    backend: &mut B,
    identity: &DeviceIdentity,
) -> Result<(DeviceInfo, B::Device)> {
    debug!(
        vid = ?identity.vendor_id,
        pid = ?identity.product_id,
        ping_code = format_args!("0x{:02X}", identity.ping_code),
        "Starting device discovery"
    );

    for candidate in list_candidates(backend, &identity.filter())? {
        debug!(
            vid = format_args!("0x{:04X}", candidate.vid),
            pid = format_args!("0x{:04X}", candidate.pid),
            path = %candidate.display_path(),
            "Pinging candidate"
        );

        let device = match backend.open(&candidate) {
            Ok(device) => device,
            Err(e) => {
                debug!(
                    path = %candidate.display_path(),
                    error = %e,
                    "Skipping candidate that failed to open"
                );
                continue;
            }
        };

        if check_ping(&device, identity.ping_code) {
            info!(
                vid = format_args!("0x{:04X}", candidate.vid),
                pid = format_args!("0x{:04X}", candidate.pid),
                path = %candidate.display_path(),
                "Found device"
            );
            return Ok((candidate, device));
        }

        drop(device);
        debug!(path = %candidate.display_path(), "Candidate rejected and closed");
    }

    Err(identity.not_found())
}

/// Find the device that answers the ping and return its open handle.
pub fn find_device<B: HidBackend>(
    backend: &mut B,
    identity: &DeviceIdentity,
) -> Result<B::Device> {
    find_device_with_info(backend, identity).map(|(_, device)| device)
}

/// Discover the device and start a session on it.
pub fn connect<B: HidBackend>(
    backend: &mut B,
    identity: &DeviceIdentity,
) -> Result<MouseSession<B::Device>> {
    let device = find_device(backend, identity)?;
    MouseSession::new(device)
}
