//! Run the swipe loop on one phone.

use std::time::Duration;

use colored::Colorize;
use swipr::swipe::{SwipeConfig, SwipeOutcome, SwipeReport};
use tracing::info;

use crate::cleanup;
use crate::cli::SwipeArgs;
use crate::error::Result;
use crate::session_setup;

pub async fn execute(args: SwipeArgs) -> Result<()> {
	let prepared = session_setup::prepare(&args.device).await?;
	let config = SwipeConfig::new(args.right_probability, Duration::from_secs(args.duration * 60));
	let mut rng = rand::rng();

	info!(target = "swipr", device = %prepared.descriptor.name, "starting swipe automation");

	let result = tokio::select! {
		result = swipr::swipe::run(&prepared.session, &config, &mut rng) => Some(result),
		_ = tokio::signal::ctrl_c() => None,
	};
	let Some(result) = result else {
		cleanup::interrupted(prepared).await
	};

	match &result {
		Ok(report) => print_report(report),
		Err(err) if !err.is_session_gone() => {
			prepared.session.capture_failure_artifacts("swipe").await;
			eprintln!("{} swipe loop failed: {err}", "error:".red());
		}
		Err(err) => eprintln!("{} swipe loop failed: {err}", "error:".red()),
	}

	cleanup::teardown(prepared).await;
	result?;
	Ok(())
}

pub fn print_report(report: &SwipeReport) {
	let outcome = match report.outcome {
		SwipeOutcome::TimeExpired => "time expired".green(),
		SwipeOutcome::AppClosed => "app closed".red(),
		SwipeOutcome::UnrecoverablePopup => "unrecoverable popup".red(),
		SwipeOutcome::ProfilesStuck => "profiles stuck".red(),
	};
	println!(
		"swipe session done ({outcome}): {} swipes ({} right / {} left), {} scrolls, {} popups dismissed",
		report.swipes.to_string().bold(),
		report.right_swipes,
		report.left_swipes,
		report.scrolls,
		report.popups_dismissed
	);
}
