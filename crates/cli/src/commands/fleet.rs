//! Multi-device fan-out: one OS process per phone.
//!
//! Every child gets its own automation-server port and device system port
//! so concurrent sessions cannot collide. There is no shared state between
//! children; each runs the same single-device command this binary already
//! provides.

use std::process::Stdio;

use colored::Colorize;
use tokio::process::Command;
use tracing::{info, warn};

use crate::cli::{FleetArgs, FleetTask};
use crate::config::ProvisionConfig;
use crate::device::DeviceDescriptor;
use crate::error::{CliError, Result};
use crate::provision::ProvisionClient;

pub async fn execute(args: FleetArgs) -> Result<()> {
	let client = ProvisionClient::new(ProvisionConfig::from_env()?)?;
	let devices = client.available_devices().await?;
	if devices.is_empty() {
		return Err(CliError::NoDevice {
			hint: Some("no active cloud phone on the account".to_string()),
		});
	}

	let binary = std::env::current_exe()?;
	info!(target = "swipr.fleet", devices = devices.len(), task = %args.task, "fanning out");

	let mut children = Vec::with_capacity(devices.len());
	for (index, device) in devices.iter().enumerate() {
		let server_port = args.base_server_port + index as u16;
		let system_port = args.base_system_port + index as u16;
		let argv = child_args(&args, device, server_port, system_port);

		info!(
			target = "swipr.fleet",
			device = %device.name,
			server_port,
			system_port,
			"spawning worker"
		);
		let child = Command::new(&binary)
			.args(&argv)
			.stdout(Stdio::inherit())
			.stderr(Stdio::inherit())
			.spawn()?;
		children.push((device.name.clone(), child));
	}

	let mut failures = 0usize;
	for (name, mut child) in children {
		let status = child.wait().await?;
		if status.success() {
			println!("{} {name}", "done:".green());
		} else {
			failures += 1;
			warn!(target = "swipr.fleet", device = %name, code = ?status.code(), "worker failed");
			println!("{} {name} (exit {:?})", "failed:".red(), status.code());
		}
	}

	if failures > 0 {
		return Err(CliError::Config(format!("{failures} fleet worker(s) failed")));
	}
	Ok(())
}

/// Argument vector for one fleet worker.
fn child_args(
	args: &FleetArgs,
	device: &DeviceDescriptor,
	server_port: u16,
	system_port: u16,
) -> Vec<String> {
	let mut argv = vec![
		args.task.to_string(),
		"--device".into(),
		device.id.clone(),
		"--server".into(),
		format!("http://127.0.0.1:{server_port}"),
		"--system-port".into(),
		system_port.to_string(),
	];
	match args.task {
		FleetTask::Swipe => {
			argv.extend([
				"--right-probability".into(),
				args.right_probability.to_string(),
				"--duration".into(),
				args.duration.to_string(),
			]);
		}
		FleetTask::Matches => {
			argv.extend([
				"--max".into(),
				args.max.to_string(),
				"--percent".into(),
				args.percent.to_string(),
			]);
		}
		FleetTask::Auto => {
			argv.extend([
				"--right-probability".into(),
				args.right_probability.to_string(),
				"--duration".into(),
				args.duration.to_string(),
				"--max".into(),
				args.max.to_string(),
				"--percent".into(),
				args.percent.to_string(),
			]);
		}
	}
	argv
}
