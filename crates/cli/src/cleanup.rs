//! Best-effort session teardown.
//!
//! Runs after a completed automation, after a failure, and on ctrl-c. Every
//! step is attempted even when an earlier one fails; a hard kill of the
//! process skips all of this (acknowledged limitation).

use colored::Colorize;
use tracing::{info, warn};

use crate::adb;
use crate::session_setup::PreparedSession;

/// Quits the driver session, stops the cloud phone (unless asked to keep it
/// running), and kills the ADB server.
pub async fn teardown(prepared: PreparedSession) {
	let PreparedSession { session, descriptor, cloud } = prepared;

	info!(target = "swipr.cleanup", device = %descriptor.name, "tearing down session");
	if let Err(err) = session.into_driver().quit().await {
		warn!(target = "swipr.cleanup", error = %err, "driver teardown failed");
	}

	if let Some(cloud) = cloud {
		if cloud.keep_running {
			info!(target = "swipr.cleanup", phone = %cloud.phone_id, "leaving cloud phone running");
		} else if let Err(err) = cloud.client.stop_phone(&[&cloud.phone_id]).await {
			warn!(target = "swipr.cleanup", phone = %cloud.phone_id, error = %err, "phone stop failed");
		}
		if let Err(err) = adb::kill_server().await {
			warn!(target = "swipr.cleanup", error = %err, "adb kill-server failed");
		}
	}
}

/// Teardown after a ctrl-c, then exit with the conventional code.
pub async fn interrupted(prepared: PreparedSession) -> ! {
	eprintln!("\n{}", "interrupted; cleaning up...".yellow());
	teardown(prepared).await;
	std::process::exit(130);
}
