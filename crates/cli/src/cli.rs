use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Root CLI for swipr.
#[derive(Parser, Debug)]
#[command(name = "swipr")]
#[command(about = "Automation bot for a dating app's Android client")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v debug, -vv trace)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// List available phones (cloud and locally tethered).
	Devices(DevicesArgs),
	/// Run the swipe loop on one phone.
	Swipe(SwipeArgs),
	/// Reply to new matches on one phone.
	Matches(MatchesArgs),
	/// Swipe first, then process new matches.
	Auto(AutoArgs),
	/// Fan automation out across every available phone, one process each.
	Fleet(FleetArgs),
}

/// Device selection and driver addressing, shared by all run commands.
#[derive(Args, Debug, Clone)]
pub struct DeviceOpts {
	/// Device id (cloud phone id or local serial); first available when omitted
	#[arg(long, short = 'd', value_name = "ID")]
	pub device: Option<String>,

	/// Use a locally tethered device instead of a cloud phone
	#[arg(long)]
	pub local: bool,

	/// Automation server URL
	#[arg(long, value_name = "URL", default_value = "http://127.0.0.1:4723")]
	pub server: String,

	/// Per-device system port for the on-device automation agent
	#[arg(long, value_name = "PORT")]
	pub system_port: Option<u16>,

	/// Directory for failure screenshots and hierarchy dumps
	#[arg(long, value_name = "DIR")]
	pub artifacts_dir: Option<PathBuf>,

	/// Keep the cloud phone running after the session ends
	#[arg(long)]
	pub keep_phone_running: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DevicesArgs {
	/// Include locally tethered ADB devices
	#[arg(long)]
	pub local: bool,
}

#[derive(Args, Debug, Clone)]
pub struct SwipeArgs {
	#[command(flatten)]
	pub device: DeviceOpts,

	/// Right-swipe probability in tenths (0 = never, 10 = always)
	#[arg(long, short = 'p', default_value_t = 5)]
	pub right_probability: u8,

	/// Session length in minutes
	#[arg(long, short = 't', default_value_t = 5)]
	pub duration: u64,
}

#[derive(Args, Debug, Clone)]
pub struct MatchesArgs {
	#[command(flatten)]
	pub device: DeviceOpts,

	/// Stop after this many matches have been messaged
	#[arg(long, default_value_t = 10)]
	pub max: usize,

	/// Percentage of visible new matches to open per scan
	#[arg(long, default_value_t = 50)]
	pub percent: u8,
}

#[derive(Args, Debug, Clone)]
pub struct AutoArgs {
	#[command(flatten)]
	pub device: DeviceOpts,

	/// Right-swipe probability in tenths (0 = never, 10 = always)
	#[arg(long, short = 'p', default_value_t = 5)]
	pub right_probability: u8,

	/// Swipe phase length in minutes
	#[arg(long, short = 't', default_value_t = 5)]
	pub duration: u64,

	/// Stop after this many matches have been messaged
	#[arg(long, default_value_t = 10)]
	pub max: usize,

	/// Percentage of visible new matches to open per scan
	#[arg(long, default_value_t = 50)]
	pub percent: u8,
}

/// Which automation each fleet member runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FleetTask {
	Swipe,
	Matches,
	Auto,
}

impl std::fmt::Display for FleetTask {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FleetTask::Swipe => f.write_str("swipe"),
			FleetTask::Matches => f.write_str("matches"),
			FleetTask::Auto => f.write_str("auto"),
		}
	}
}

#[derive(Args, Debug, Clone)]
pub struct FleetArgs {
	/// Automation to run on every phone
	#[arg(long, value_enum, default_value_t = FleetTask::Swipe)]
	pub task: FleetTask,

	/// First automation-server port; device N uses base + N
	#[arg(long, default_value_t = 4723)]
	pub base_server_port: u16,

	/// First system port; device N uses base + N
	#[arg(long, default_value_t = 8200)]
	pub base_system_port: u16,

	/// Right-swipe probability in tenths (swipe/auto tasks)
	#[arg(long, short = 'p', default_value_t = 5)]
	pub right_probability: u8,

	/// Swipe phase length in minutes (swipe/auto tasks)
	#[arg(long, short = 't', default_value_t = 5)]
	pub duration: u64,

	/// Match budget per phone (matches/auto tasks)
	#[arg(long, default_value_t = 10)]
	pub max: usize,

	/// Percentage of visible new matches to open per scan
	#[arg(long, default_value_t = 50)]
	pub percent: u8,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_swipe_with_defaults() {
		let cli = Cli::try_parse_from(["swipr", "swipe"]).unwrap();
		match cli.command {
			Commands::Swipe(args) => {
				assert_eq!(args.right_probability, 5);
				assert_eq!(args.duration, 5);
				assert_eq!(args.device.server, "http://127.0.0.1:4723");
				assert!(!args.device.local);
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn parses_fleet_task() {
		let cli = Cli::try_parse_from(["swipr", "fleet", "--task", "auto", "-p", "8"]).unwrap();
		match cli.command {
			Commands::Fleet(args) => {
				assert_eq!(args.task, FleetTask::Auto);
				assert_eq!(args.right_probability, 8);
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn verbose_flag_counts() {
		let cli = Cli::try_parse_from(["swipr", "-vv", "devices"]).unwrap();
		assert_eq!(cli.verbose, 2);
	}
}
