//! Reply to new matches on one phone.

use colored::Colorize;
use swipr::matches::{MatchConfig, MatchOutcome, MatchReport};
use tracing::info;

use crate::cleanup;
use crate::cli::MatchesArgs;
use crate::error::Result;
use crate::session_setup;

pub async fn execute(args: MatchesArgs) -> Result<()> {
	let prepared = session_setup::prepare(&args.device).await?;
	let config = MatchConfig::new(args.max, args.percent);
	let mut rng = rand::rng();

	info!(target = "swipr", device = %prepared.descriptor.name, "starting match processing");

	let result = tokio::select! {
		result = swipr::matches::run(&prepared.session, &config, &mut rng) => Some(result),
		_ = tokio::signal::ctrl_c() => None,
	};
	let Some(result) = result else {
		cleanup::interrupted(prepared).await
	};

	match &result {
		Ok(report) => {
			print_report(report);
			if report.outcome == MatchOutcome::NavigationLost {
				// screen state is unknown; capture evidence before teardown
				prepared.session.capture_failure_artifacts("matches-nav-lost").await;
			}
		}
		Err(err) if !err.is_session_gone() => {
			prepared.session.capture_failure_artifacts("matches").await;
			eprintln!("{} match loop failed: {err}", "error:".red());
		}
		Err(err) => eprintln!("{} match loop failed: {err}", "error:".red()),
	}

	cleanup::teardown(prepared).await;
	result?;
	Ok(())
}

pub fn print_report(report: &MatchReport) {
	let outcome = match report.outcome {
		MatchOutcome::NoNewMatches => "no new matches".green(),
		MatchOutcome::PromoReached => "promo reached".green(),
		MatchOutcome::BudgetReached => "budget reached".green(),
		MatchOutcome::ScansExhausted => "scan limit reached".yellow(),
		MatchOutcome::NavigationLost => "navigation lost".red(),
		MatchOutcome::ChatsUnavailable => "chats unavailable".red(),
	};
	println!(
		"match session done ({outcome}): {} messaged of {} opened, {} scans",
		report.processed.to_string().bold(),
		report.attempted,
		report.scans
	);
}
