//! List available phones.

use colored::Colorize;

use crate::adb;
use crate::cli::DevicesArgs;
use crate::config::ProvisionConfig;
use crate::device::DeviceDescriptor;
use crate::error::Result;
use crate::provision::ProvisionClient;

pub async fn execute(args: DevicesArgs) -> Result<()> {
	let mut devices: Vec<DeviceDescriptor> = Vec::new();

	match ProvisionConfig::from_env() {
		Ok(config) => {
			let client = ProvisionClient::new(config)?;
			devices.extend(client.available_devices().await?);
		}
		Err(err) => {
			eprintln!("{} {err} (cloud phones skipped)", "note:".yellow());
		}
	}

	if args.local {
		devices.extend(adb::list_local_devices().await?);
	}

	if devices.is_empty() {
		println!("{}", "no devices available".red());
		return Ok(());
	}

	print_table(&devices);
	Ok(())
}

fn print_table(devices: &[DeviceDescriptor]) {
	println!(
		"{:<4} {:<24} {:<8} {:<12} {:<20} {}",
		"No.".cyan(),
		"Name".cyan(),
		"Kind".cyan(),
		"Brand".cyan(),
		"Model".cyan(),
		"Id".cyan()
	);
	for (index, device) in devices.iter().enumerate() {
		println!(
			"{:<4} {:<24} {:<8} {:<12} {:<20} {}",
			index + 1,
			device.name.green(),
			device.connectivity,
			device.brand,
			device.model,
			device.id.dimmed()
		);
	}
}
