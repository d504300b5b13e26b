//! The swipe loop: timed profile browsing with popup awareness.

use std::time::Duration;

use rand::Rng;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::driver::UiDriver;
use crate::error::Result;
use crate::filters;
use crate::gesture::{self, ScrollKind, SwipeDirection};
use crate::popups::PopupDispatcher;
use crate::screens;
use crate::session::Session;

/// Parameters of one swipe session.
#[derive(Debug, Clone)]
pub struct SwipeConfig {
	/// Probability of swiping right, in tenths: 0 = never, 10 = always.
	pub right_probability: u8,
	/// Wall-clock budget; the loop exits when it elapses.
	pub duration: Duration,
}

impl SwipeConfig {
	pub fn new(right_probability: u8, duration: Duration) -> Self {
		Self {
			right_probability: right_probability.min(10),
			duration,
		}
	}
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
	/// Wall-clock budget elapsed; the normal exit.
	TimeExpired,
	/// The automated app left the foreground.
	AppClosed,
	/// A blocking screen appeared that the bot cannot clear.
	UnrecoverablePopup,
	/// No profile card appeared within the retry budget.
	ProfilesStuck,
}

/// Counters and outcome of a swipe session.
#[derive(Debug, Clone)]
pub struct SwipeReport {
	pub outcome: SwipeOutcome,
	pub swipes: u32,
	pub right_swipes: u32,
	pub left_swipes: u32,
	pub scrolls: u32,
	pub popups_dismissed: u32,
}

impl SwipeReport {
	fn new(outcome: SwipeOutcome) -> Self {
		Self {
			outcome,
			swipes: 0,
			right_swipes: 0,
			left_swipes: 0,
			scrolls: 0,
			popups_dismissed: 0,
		}
	}
}

/// Budget for the profile-card indicator to appear each iteration.
const PROFILE_CARD_TIMEOUT: Duration = Duration::from_secs(10);

/// Probe budget for the terminal blocking overlay.
const OVERLAY_PROBE: Duration = Duration::from_secs(1);

/// Chance (in tenths) of reading profile details before swiping.
const SCROLL_CHANCE: u8 = 6;

/// Runs the swipe loop until the deadline or a terminal condition.
///
/// Each iteration: verify the app is foregrounded, dismiss one pending
/// interstitial (and restart the iteration), recover from the exhausted-deck
/// prompt, verify a profile card is on screen, maybe scroll through the
/// profile, then swipe once with the configured direction bias.
pub async fn run<D: UiDriver, R: Rng>(
	session: &Session<D>,
	config: &SwipeConfig,
	rng: &mut R,
) -> Result<SwipeReport> {
	let dispatcher = PopupDispatcher::default();
	let deadline = Instant::now() + config.duration;
	let mut report = SwipeReport::new(SwipeOutcome::TimeExpired);

	info!(
		target = "swipr.swipe",
		right_probability = config.right_probability,
		duration_secs = config.duration.as_secs(),
		"swipe session started"
	);

	loop {
		if Instant::now() >= deadline {
			report.outcome = SwipeOutcome::TimeExpired;
			break;
		}

		if !session.is_app_foreground().await? {
			warn!(target = "swipr.swipe", "app left the foreground; stopping");
			report.outcome = SwipeOutcome::AppClosed;
			break;
		}

		if let Some(rule) = dispatcher.try_dismiss_next(session, rng).await? {
			debug!(target = "swipr.swipe", rule, "interstitial dismissed; restarting iteration");
			report.popups_dismissed += 1;
			continue;
		}

		if filters::prompt_present(session).await? {
			info!(target = "swipr.swipe", "deck exhausted; adjusting filters");
			if filters::handle_everyone_seen_prompt(session, rng).await? {
				tokio::time::sleep(Duration::from_millis(rng.random_range(1000..2000))).await;
				continue;
			}
			warn!(target = "swipr.swipe", "filter adjustment failed; stopping");
			report.outcome = SwipeOutcome::UnrecoverablePopup;
			break;
		}

		if session.is_present(&screens::BLOCKING_OVERLAY, OVERLAY_PROBE).await? {
			warn!(target = "swipr.swipe", "blocking overlay detected; stopping");
			report.outcome = SwipeOutcome::UnrecoverablePopup;
			break;
		}

		if !session.is_present(&screens::PROFILE_CARD, PROFILE_CARD_TIMEOUT).await? {
			warn!(target = "swipr.swipe", "no profile card on screen; stopping");
			report.outcome = SwipeOutcome::ProfilesStuck;
			break;
		}

		// linger on the profile like a human would
		tokio::time::sleep(Duration::from_millis(rng.random_range(2000..3000))).await;

		if rng.random_range(1..=10u8) <= SCROLL_CHANCE {
			let scroll_count = rng.random_range(2..=4u32);
			for i in 0..scroll_count {
				let kind = if i == 0 { ScrollKind::Initial } else { ScrollKind::FollowUp };
				gesture::vertical_scroll(session, kind, rng).await?;
				report.scrolls += 1;
			}
		}

		let direction = if rng.random_range(1..=10u8) <= config.right_probability {
			SwipeDirection::Right
		} else {
			SwipeDirection::Left
		};
		gesture::horizontal_swipe(session, direction, rng).await?;
		report.swipes += 1;
		match direction {
			SwipeDirection::Right => report.right_swipes += 1,
			SwipeDirection::Left => report.left_swipes += 1,
		}
		debug!(target = "swipr.swipe", total = report.swipes, direction = ?direction, "swiped");
	}

	info!(
		target = "swipr.swipe",
		outcome = ?report.outcome,
		swipes = report.swipes,
		right = report.right_swipes,
		left = report.left_swipes,
		popups = report.popups_dismissed,
		"swipe session finished"
	);
	Ok(report)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::gesture::MIN_SWIPE_FRACTION;
	use crate::testing::FakeDriver;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use swipr_protocol::AppState;

	fn profile_screen(driver: &FakeDriver) {
		driver.place(&screens::PROFILE_CARD, "card");
	}

	#[tokio::test(start_paused = true)]
	async fn zero_duration_returns_immediately_without_swiping() {
		let driver = FakeDriver::new();
		profile_screen(&driver);
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(21);

		let report = run(&session, &SwipeConfig::new(10, Duration::ZERO), &mut rng)
			.await
			.unwrap();

		assert_eq!(report.outcome, SwipeOutcome::TimeExpired);
		assert_eq!(report.swipes, 0);
		assert!(session.driver().performed().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn sticky_popup_is_dismissed_every_iteration_and_nothing_swipes() {
		let driver = FakeDriver::new();
		profile_screen(&driver);
		// interstitial that reappears no matter how often it is dismissed
		driver.place(&screens::INTERESTED_PANEL, "panel");
		driver.place(&screens::DIALOG_POSITIVE, "yes");
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(22);

		let report = run(&session, &SwipeConfig::new(5, Duration::from_secs(20)), &mut rng)
			.await
			.unwrap();

		assert_eq!(report.outcome, SwipeOutcome::TimeExpired);
		assert_eq!(report.swipes, 0);
		assert!(report.popups_dismissed > 0);
		assert!(session.driver().performed().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn full_right_probability_never_swipes_left() {
		let driver = FakeDriver::new();
		profile_screen(&driver);
		driver.set_window(1080, 2400);
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(23);

		let report = run(&session, &SwipeConfig::new(10, Duration::from_secs(300)), &mut rng)
			.await
			.unwrap();

		assert_eq!(report.outcome, SwipeOutcome::TimeExpired);
		assert!(report.swipes >= 3, "expected several swipes, got {}", report.swipes);
		assert_eq!(report.left_swipes, 0);
		assert_eq!(report.right_swipes, report.swipes);

		// every long horizontal gesture must travel rightward
		let min_travel = (MIN_SWIPE_FRACTION * 1080.0) as i32;
		for sequence in session.driver().performed() {
			let points = sequence.points();
			let dx = points.last().unwrap().0 - points[0].0;
			if dx.abs() >= min_travel {
				assert!(dx > 0, "left swipe slipped through: dx={dx}");
			}
		}
	}

	#[tokio::test(start_paused = true)]
	async fn missing_profile_card_terminates_stuck() {
		let driver = FakeDriver::new();
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(24);

		let report = run(&session, &SwipeConfig::new(5, Duration::from_secs(60)), &mut rng)
			.await
			.unwrap();

		assert_eq!(report.outcome, SwipeOutcome::ProfilesStuck);
		assert_eq!(report.swipes, 0);
	}

	#[tokio::test(start_paused = true)]
	async fn backgrounded_app_terminates_closed() {
		let driver = FakeDriver::new();
		profile_screen(&driver);
		driver.set_app_state(AppState::Background);
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(25);

		let report = run(&session, &SwipeConfig::new(5, Duration::from_secs(60)), &mut rng)
			.await
			.unwrap();

		assert_eq!(report.outcome, SwipeOutcome::AppClosed);
	}

	#[tokio::test(start_paused = true)]
	async fn blocking_overlay_terminates_unrecoverable() {
		let driver = FakeDriver::new();
		profile_screen(&driver);
		driver.place(&screens::BLOCKING_OVERLAY, "overlay");
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(26);

		let report = run(&session, &SwipeConfig::new(5, Duration::from_secs(60)), &mut rng)
			.await
			.unwrap();

		assert_eq!(report.outcome, SwipeOutcome::UnrecoverablePopup);
		assert_eq!(report.swipes, 0);
	}

	#[test]
	fn config_clamps_probability() {
		assert_eq!(SwipeConfig::new(15, Duration::ZERO).right_probability, 10);
	}
}
