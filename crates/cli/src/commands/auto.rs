//! Swipe first, then process new matches, in one session.

use std::time::Duration;

use colored::Colorize;
use swipr::matches::MatchConfig;
use swipr::swipe::{SwipeConfig, SwipeOutcome};
use tracing::info;

use crate::cleanup;
use crate::cli::AutoArgs;
use crate::error::Result;
use crate::session_setup;

use super::{matches, swipe};

pub async fn execute(args: AutoArgs) -> Result<()> {
	let prepared = session_setup::prepare(&args.device).await?;
	let swipe_config = SwipeConfig::new(args.right_probability, Duration::from_secs(args.duration * 60));
	let match_config = MatchConfig::new(args.max, args.percent);
	let mut rng = rand::rng();

	info!(target = "swipr", device = %prepared.descriptor.name, "starting auto run");

	let result = tokio::select! {
		result = run_both(&prepared.session, &swipe_config, &match_config, &mut rng) => Some(result),
		_ = tokio::signal::ctrl_c() => None,
	};
	let Some(result) = result else {
		cleanup::interrupted(prepared).await
	};

	if let Err(err) = &result {
		if !err.is_session_gone() {
			prepared.session.capture_failure_artifacts("auto").await;
		}
		eprintln!("{} auto run failed: {err}", "error:".red());
	}

	cleanup::teardown(prepared).await;
	result?;
	Ok(())
}

async fn run_both<R: rand::Rng>(
	session: &swipr::Session<swipr_runtime::DriverSession>,
	swipe_config: &SwipeConfig,
	match_config: &MatchConfig,
	rng: &mut R,
) -> swipr::Result<()> {
	let swipe_report = swipr::swipe::run(session, swipe_config, rng).await?;
	swipe::print_report(&swipe_report);

	// a session that died mid-swipe is not worth driving into the chats tab
	if matches!(swipe_report.outcome, SwipeOutcome::AppClosed) {
		return Ok(());
	}

	let match_report = swipr::matches::run(session, match_config, rng).await?;
	matches::print_report(&match_report);
	Ok(())
}
