//! Saved device identity.
//!
//! Stores the vendor/product filter and ping code as JSON so the target
//! device does not have to be named on every invocation.

use crate::discovery::DeviceIdentity;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides the config location.
pub const CONFIG_ENV: &str = "HIDMOUSE_CONFIG";

const CONFIG_DIR: &str = "hidmouse";
const CONFIG_FILE: &str = "device.json";

/// Persisted discovery parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<u16>,
    pub ping_code: u8,
}

impl DeviceConfig {
    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity::new(self.vendor_id, self.product_id, self.ping_code)
    }
}

impl From<DeviceIdentity> for DeviceConfig {
    fn from(identity: DeviceIdentity) -> Self {
        Self {
            vendor_id: identity.vendor_id,
            product_id: identity.product_id,
            ping_code: identity.ping_code,
        }
    }
}

/// Default config location.
///
/// `HIDMOUSE_CONFIG` wins if set. Otherwise `%APPDATA%\hidmouse\device.json`
/// on Windows and `$XDG_CONFIG_HOME/hidmouse/device.json` (falling back to
/// `~/.config`) elsewhere.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Ok(PathBuf::from(path));
    }

    #[cfg(target_os = "windows")]
    {
        let app_data = std::env::var_os("APPDATA")
            .ok_or_else(|| Error::Config("APPDATA is not set".to_string()))?;
        Ok(PathBuf::from(app_data).join(CONFIG_DIR).join(CONFIG_FILE))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let base = match std::env::var_os("XDG_CONFIG_HOME") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let home = std::env::var_os("HOME").ok_or_else(|| {
                    Error::Config("neither XDG_CONFIG_HOME nor HOME is set".to_string())
                })?;
                PathBuf::from(home).join(".config")
            }
        };
        Ok(base.join(CONFIG_DIR).join(CONFIG_FILE))
    }
}

/// Write `config` to `path` as pretty JSON, creating parent directories.
pub fn save_config(path: &Path, config: &DeviceConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("create {}: {e}", parent.display())))?;
    }
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("serialize: {e}")))?;
    fs::write(path, json).map_err(|e| Error::Config(format!("write {}: {e}", path.display())))?;
    debug!(path = %path.display(), "Saved device config");
    Ok(())
}

/// Read a config previously written by [`save_config`].
pub fn load_config(path: &Path) -> Result<DeviceConfig> {
    let json = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
    let config = serde_json::from_str(&json)
        .map_err(|e| Error::Config(format!("parse {}: {e}", path.display())))?;
    debug!(path = %path.display(), "Loaded device config");
    Ok(config)
}

/// Parse a 16-bit ID given as `0x`-prefixed hex or decimal.
pub fn parse_u16(text: &str) -> std::result::Result<u16, String> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|e| format!("invalid 16-bit value '{text}': {e}"))
}

/// Parse an 8-bit code given as `0x`-prefixed hex or decimal.
pub fn parse_u8(text: &str) -> std::result::Result<u8, String> {
    let wide = parse_u16(text)?;
    u8::try_from(wide).map_err(|_| format!("value '{}' does not fit in 8 bits", text.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("hidmouse-test-{}-{name}", std::process::id()))
            .join(CONFIG_FILE)
    }

    #[test]
    fn save_then_load() {
        let path = temp_config("save-load");
        let config = DeviceConfig {
            vendor_id: Some(0x2341),
            product_id: None,
            ping_code: 0xF9,
        };
        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);

        let json = fs::read_to_string(&path).unwrap();
        assert!(!json.contains("product_id"));

        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn missing_ids_default_to_unspecified() {
        let config: DeviceConfig = serde_json::from_str(r#"{"ping_code": 5}"#).unwrap();
        assert_eq!(config.identity(), DeviceIdentity::new(None, None, 5));
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let path = temp_config("missing");
        assert!(matches!(load_config(&path), Err(Error::Config(_))));
    }

    #[test]
    fn load_rejects_out_of_range_ping_code() {
        let path = temp_config("bad");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"ping_code": 300}"#).unwrap();
        assert!(matches!(load_config(&path), Err(Error::Config(_))));
        fs::remove_dir_all(path.parent().unwrap()).unwrap();
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(parse_u16("0x2341"), Ok(0x2341));
        assert_eq!(parse_u16("0X8036"), Ok(0x8036));
        assert_eq!(parse_u16("1234"), Ok(1234));
        assert!(parse_u16("0x10000").is_err());
        assert!(parse_u16("vid").is_err());

        assert_eq!(parse_u8("0xF9"), Ok(0xF9));
        assert_eq!(parse_u8("5"), Ok(5));
        assert!(parse_u8("256").is_err());
    }

    #[test]
    fn identity_roundtrip_through_config() {
        let identity = DeviceIdentity::new(Some(1), Some(2), 3);
        assert_eq!(DeviceConfig::from(identity).identity(), identity);
    }
}
