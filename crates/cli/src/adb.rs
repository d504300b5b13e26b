//! ADB integration: local device discovery and cloud-phone tethering.

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::device::{Connectivity, DeviceDescriptor};
use crate::error::{CliError, Result};

async fn adb(args: &[&str]) -> Result<String> {
	debug!(target = "swipr.adb", ?args, "adb");
	let output = Command::new("adb")
		.args(args)
		.output()
		.await
		.map_err(|e| CliError::Adb(format!("failed to run adb: {e}")))?;
	if !output.status.success() {
		let stderr = String::from_utf8_lossy(&output.stderr);
		return Err(CliError::Adb(format!("adb {} failed: {}", args.join(" "), stderr.trim())));
	}
	Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub async fn kill_server() -> Result<()> {
	adb(&["kill-server"]).await?;
	info!(target = "swipr.adb", "adb server killed");
	Ok(())
}

pub async fn start_server() -> Result<()> {
	adb(&["start-server"]).await?;
	info!(target = "swipr.adb", "adb server started");
	Ok(())
}

/// Restarts the ADB server to clear stale device registrations.
pub async fn restart_server() -> Result<()> {
	kill_server().await?;
	start_server().await
}

/// Serials of devices currently in the `device` state.
///
/// Pure parser split out from the command for testability.
pub fn parse_devices_output(output: &str) -> Vec<String> {
	output
		.lines()
		.skip(1) // header line
		.filter_map(|line| {
			let mut parts = line.split_whitespace();
			let serial = parts.next()?;
			let state = parts.next()?;
			(state == "device").then(|| serial.to_string())
		})
		.collect()
}

/// Lists locally tethered devices with brand/model details.
pub async fn list_local_devices() -> Result<Vec<DeviceDescriptor>> {
	let output = adb(&["devices", "-l"]).await?;
	let serials = parse_devices_output(&output);

	let mut devices = Vec::with_capacity(serials.len());
	for serial in serials {
		let brand = getprop(&serial, "ro.product.brand").await.unwrap_or_default();
		let model = getprop(&serial, "ro.product.model").await.unwrap_or_default();
		let name = if brand.is_empty() && model.is_empty() {
			serial.clone()
		} else {
			format!("{brand} {model}").trim().to_string()
		};
		devices.push(DeviceDescriptor {
			id: serial,
			name,
			brand: or_unknown(brand),
			model: or_unknown(model),
			connectivity: Connectivity::Local,
		});
	}
	Ok(devices)
}

/// Connects to a cloud phone's forwarded ADB endpoint.
pub async fn connect(address: &str) -> Result<()> {
	let output = adb(&["connect", address]).await?;
	if !output.to_lowercase().contains("connected") {
		return Err(CliError::Adb(format!("connect to {address} failed: {}", output.trim())));
	}
	info!(target = "swipr.adb", address, "connected");
	Ok(())
}

/// Authenticates on a cloud phone with its one-time password.
pub async fn cloud_login(address: &str, password: &str) -> Result<()> {
	adb(&["-s", address, "shell", "glogin", password]).await?;
	info!(target = "swipr.adb", address, "logged in");
	Ok(())
}

/// Android release version of the device, defaulting to "12" when the
/// property cannot be read.
pub async fn platform_version(serial: &str) -> String {
	match getprop(serial, "ro.build.version.release").await {
		Ok(version) if !version.is_empty() => version,
		_ => {
			warn!(target = "swipr.adb", serial, "could not read platform version; assuming 12");
			"12".to_string()
		}
	}
}

async fn getprop(serial: &str, property: &str) -> Result<String> {
	let output = adb(&["-s", serial, "shell", "getprop", property]).await?;
	Ok(output.trim().to_string())
}

fn or_unknown(value: String) -> String {
	if value.is_empty() { "Unknown".to_string() } else { value }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_device_list() {
		let output = "List of devices attached\n\
			emulator-5554          device product:sdk model:sdk_gphone64 device:emu64x\n\
			10.0.0.5:5555          device product:lineage model:Pixel transport_id:2\n\
			RZ8W90Q3Q2A            offline\n\
			\n";
		let serials = parse_devices_output(output);
		assert_eq!(serials, vec!["emulator-5554".to_string(), "10.0.0.5:5555".to_string()]);
	}

	#[test]
	fn empty_listing_yields_no_devices() {
		assert!(parse_devices_output("List of devices attached\n\n").is_empty());
	}

	#[test]
	fn unknown_fills_empty_fields() {
		assert_eq!(or_unknown(String::new()), "Unknown");
		assert_eq!(or_unknown("samsung".into()), "samsung");
	}
}
