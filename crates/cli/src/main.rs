//! hidmouse CLI: discover the device and send one-shot pointer commands.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use hidmouse_core::buttons::Buttons;
use hidmouse_core::config::{self, parse_u16, parse_u8, DeviceConfig};
use hidmouse_core::discovery::{self, DeviceFilter, DeviceIdentity};
use hidmouse_core::hid::{HidapiBackend, HidapiDevice};
use hidmouse_core::session::MouseSession;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(
    name = "hidmouse",
    version,
    about = "Discover and drive a ping-verified HID mouse"
)]
struct Cli {
    /// Vendor ID filter (e.g. 0x2341). Omit to match any vendor.
    #[arg(long, global = true, value_parser = parse_u16)]
    vid: Option<u16>,

    /// Product ID filter (e.g. 0x8036). Omit to match any product.
    #[arg(long, global = true, value_parser = parse_u16)]
    pid: Option<u16>,

    /// Byte the device must echo back during the handshake.
    #[arg(long, global = true, value_parser = parse_u8)]
    ping_code: Option<u8>,

    /// Config file to read and write instead of the default location.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List HID devices matching the vendor/product filter.
    ListDevices,
    /// Run discovery and report which device answered the ping.
    Ping,
    /// Move the pointer by a relative amount.
    Move {
        #[arg(allow_negative_numbers = true)]
        dx: i32,
        #[arg(allow_negative_numbers = true)]
        dy: i32,
    },
    /// Press and release a button.
    Click {
        /// Button: left, right, middle, all.
        #[arg(long, default_value = "left")]
        button: Buttons,
    },
    /// Hold a button down for a while, then let go.
    Hold {
        /// Button: left, right, middle, all.
        #[arg(long, default_value = "left")]
        button: Buttons,
        /// How long to hold, in milliseconds.
        #[arg(long, default_value_t = 100)]
        duration_ms: u64,
    },
    /// Move out and straight back with a button held on the way out.
    Flick {
        #[arg(allow_negative_numbers = true)]
        dx: i32,
        #[arg(allow_negative_numbers = true)]
        dy: i32,
        /// Button: left, right, middle, all.
        #[arg(long, default_value = "left")]
        button: Buttons,
    },
    /// Save the given --vid/--pid/--ping-code as the default device.
    SaveConfig,
    /// Print the saved device config.
    ShowConfig,
}

fn config_location(cli: &Cli) -> Result<PathBuf> {
    match &cli.config {
        Some(path) => Ok(path.clone()),
        None => Ok(config::config_path()?),
    }
}

/// Saved config, if there is one. Flags alone are enough to run, so a
/// missing file or unresolvable default location is not an error.
fn saved_config(cli: &Cli) -> Result<Option<DeviceConfig>> {
    let path = match config_location(cli) {
        Ok(path) => path,
        Err(e) => {
            debug!(error = %e, "No config location");
            return Ok(None);
        }
    };
    if !path.exists() {
        debug!(path = %path.display(), "No saved config");
        return Ok(None);
    }
    Ok(Some(config::load_config(&path)?))
}

fn resolve_filter(cli: &Cli, saved: Option<&DeviceConfig>) -> DeviceFilter {
    DeviceFilter {
        vendor_id: cli.vid.or(saved.and_then(|c| c.vendor_id)),
        product_id: cli.pid.or(saved.and_then(|c| c.product_id)),
    }
}

/// Flags override the saved config field by field.
fn resolve_identity(cli: &Cli) -> Result<DeviceIdentity> {
    let saved = match saved_config(cli) {
        Ok(saved) => saved,
        // A ping code on the command line is enough to run discovery.
        Err(e) if cli.ping_code.is_some() => {
            warn!(error = %e, "Ignoring unreadable config, using command-line flags");
            None
        }
        Err(e) => return Err(e),
    };
    let filter = resolve_filter(cli, saved.as_ref());
    let ping_code = cli
        .ping_code
        .or(saved.map(|c| c.ping_code))
        .ok_or_else(|| anyhow!("No ping code given. Pass --ping-code or run save-config first"))?;
    let layered = DeviceConfig {
        vendor_id: filter.vendor_id,
        product_id: filter.product_id,
        ping_code,
    };
    Ok(layered.identity())
}

fn open_session(cli: &Cli) -> Result<MouseSession<HidapiDevice>> {
    let identity = resolve_identity(cli)?;
    let mut backend = HidapiBackend::new()?;
    Ok(discovery::connect(&mut backend, &identity)?)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ListDevices => {
            let saved = saved_config(&cli)?;
            let filter = resolve_filter(&cli, saved.as_ref());
            let mut backend = HidapiBackend::new()?;
            let devices = discovery::list_candidates(&mut backend, &filter)?;
            if devices.is_empty() {
                println!("No matching HID devices found.");
            } else {
                for dev in &devices {
                    println!(
                        "{} (VID: 0x{:04X}, PID: 0x{:04X}, path: {})",
                        dev.product.as_deref().unwrap_or("Unknown"),
                        dev.vid,
                        dev.pid,
                        dev.display_path()
                    );
                }
            }
        }
        Commands::Ping => {
            let identity = resolve_identity(&cli)?;
            let mut backend = HidapiBackend::new()?;
            let (info, _device) = discovery::find_device_with_info(&mut backend, &identity)?;
            println!(
                "Device answered ping 0x{:02X}: VID 0x{:04X}, PID 0x{:04X}, path {}",
                identity.ping_code,
                info.vid,
                info.pid,
                info.display_path()
            );
        }
        Commands::Move { dx, dy } => {
            let mut session = open_session(&cli)?;
            session.move_by(dx, dy)?;
            println!("Moved by ({dx}, {dy})");
        }
        Commands::Click { button } => {
            let mut session = open_session(&cli)?;
            session.click(button)?;
            println!("Clicked {}", button.label());
        }
        Commands::Hold {
            button,
            duration_ms,
        } => {
            let mut session = open_session(&cli)?;
            session.press(button)?;
            thread::sleep(Duration::from_millis(duration_ms));
            session.release(button)?;
            println!("Held {} for {duration_ms} ms", button.label());
        }
        Commands::Flick { dx, dy, button } => {
            let mut session = open_session(&cli)?;
            session.silent_flick(dx, dy, button)?;
            println!("Flicked ({dx}, {dy}) with {}", button.label());
        }
        Commands::SaveConfig => {
            let ping_code = cli
                .ping_code
                .ok_or_else(|| anyhow!("save-config needs --ping-code"))?;
            let saved = DeviceConfig::from(DeviceIdentity::new(cli.vid, cli.pid, ping_code));
            let path = config_location(&cli)?;
            config::save_config(&path, &saved)?;
            println!("Config saved to {}", path.display());
        }
        Commands::ShowConfig => match saved_config(&cli)? {
            Some(saved) => {
                let show = |id: Option<u16>| match id {
                    Some(v) => format!("0x{v:04X}"),
                    None => "Unspecified".to_string(),
                };
                println!("VID: {}", show(saved.vendor_id));
                println!("PID: {}", show(saved.product_id));
                println!("Ping code: 0x{:02X}", saved.ping_code);
            }
            None => println!("No saved config."),
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hidmouse-cli-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("hidmouse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn corrupt_config_is_ignored_when_ping_code_is_given() {
        let path = temp_file("corrupt-with-flag.json", "{ not json");
        let cli = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--vid",
            "0x2341",
            "--ping-code",
            "5",
            "move",
            "1",
            "2",
        ]);

        let identity = resolve_identity(&cli).unwrap();
        assert_eq!(identity, DeviceIdentity::new(Some(0x2341), None, 0x05));
    }

    #[test]
    fn corrupt_config_fails_without_ping_code() {
        let path = temp_file("corrupt-no-flag.json", "{ not json");
        let cli = parse(&["--config", path.to_str().unwrap(), "ping"]);
        assert!(resolve_identity(&cli).is_err());
    }

    #[test]
    fn flags_override_saved_config() {
        let path = temp_file(
            "saved.json",
            r#"{"vendor_id": 9025, "product_id": 32822, "ping_code": 7}"#,
        );
        let cli = parse(&[
            "--config",
            path.to_str().unwrap(),
            "--pid",
            "0x8037",
            "click",
            "--button",
            "right",
        ]);

        let identity = resolve_identity(&cli).unwrap();
        assert_eq!(identity, DeviceIdentity::new(Some(0x2341), Some(0x8037), 0x07));
    }

    #[test]
    fn negative_move_deltas_parse() {
        let cli = parse(&["--ping-code", "0x05", "move", "-3", "4"]);
        assert!(matches!(cli.command, Commands::Move { dx: -3, dy: 4 }));
    }
}
