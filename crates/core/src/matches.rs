//! The match-processing loop: open new matches, send one greeting each.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;
use rand::seq::index::sample;
use swipr_protocol::ElementRef;
use tracing::{debug, info, warn};

use crate::driver::UiDriver;
use crate::error::{Error, Result};
use crate::greetings;
use crate::nav::{self, NavOptions, Tab};
use crate::screens;
use crate::session::Session;

/// Parameters of one match-processing session.
#[derive(Debug, Clone)]
pub struct MatchConfig {
	/// Global budget: stop after this many matches have been messaged.
	pub max_total: usize,
	/// Percentage of freshly visible matches to open per scan (1-100).
	pub sample_pct: u8,
	/// Bound on rail scans; the loop never spins indefinitely.
	pub max_scans: u32,
}

impl MatchConfig {
	pub fn new(max_total: usize, sample_pct: u8) -> Self {
		Self {
			max_total,
			sample_pct: sample_pct.clamp(1, 100),
			max_scans: 10,
		}
	}
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
	/// No unattempted match entries remain visible.
	NoNewMatches,
	/// A promotional placeholder occupies the rail; nothing new to open.
	PromoReached,
	/// The global `max_total` budget was spent.
	BudgetReached,
	/// The scan bound was hit with matches still pending.
	ScansExhausted,
	/// Back-navigation could not return to the chat list; the session is in
	/// an unknown screen state and should be torn down.
	NavigationLost,
	/// The chats tab or its list never became available.
	ChatsUnavailable,
}

/// Counters and outcome of a match-processing session.
#[derive(Debug, Clone)]
pub struct MatchReport {
	pub outcome: MatchOutcome,
	/// Matches that received a greeting.
	pub processed: usize,
	/// Matches that were opened (greeted or not); never re-clicked.
	pub attempted: usize,
	pub scans: u32,
}

/// Back presses needed to reach the chat list from inside a conversation.
const BACK_PRESSES_TO_LIST: u32 = 3;

/// Processes new matches from the "Your matches" rail.
///
/// Navigates to the chats tab, then scans the rail a bounded number of
/// times: skips promotional placeholders, samples a percentage of the
/// not-yet-attempted entries (rounded up, capped by the remaining budget),
/// opens each, sends one templated greeting, and navigates back. A match's
/// accessibility description is its de-duplication key for the session; an
/// attempted entry is never clicked again.
pub async fn run<D: UiDriver, R: Rng>(
	session: &Session<D>,
	config: &MatchConfig,
	rng: &mut R,
) -> Result<MatchReport> {
	let nav_options = NavOptions::default();
	let mut report = MatchReport {
		outcome: MatchOutcome::ScansExhausted,
		processed: 0,
		attempted: 0,
		scans: 0,
	};

	if !nav::open_tab(session, Tab::Chats, &nav_options).await? {
		warn!(target = "swipr.matches", "could not open the chats tab");
		report.outcome = MatchOutcome::ChatsUnavailable;
		return Ok(report);
	}
	if !on_chats_list(session, Duration::from_secs(7)).await? {
		warn!(target = "swipr.matches", "chats tab open but list not verified");
		report.outcome = MatchOutcome::ChatsUnavailable;
		return Ok(report);
	}

	info!(
		target = "swipr.matches",
		max_total = config.max_total,
		sample_pct = config.sample_pct,
		"match processing started"
	);
	let mut attempted: HashSet<String> = HashSet::new();

	'scan: while report.scans < config.max_scans {
		report.scans += 1;

		if promo_present(session).await? {
			info!(target = "swipr.matches", "promo placeholder in rail; no new matches");
			report.outcome = MatchOutcome::PromoReached;
			break;
		}

		if report.processed >= config.max_total {
			report.outcome = MatchOutcome::BudgetReached;
			break;
		}

		let Some(rail) = session.find(&screens::MATCHES_RAIL, Duration::from_secs(10)).await? else {
			debug!(target = "swipr.matches", "matches rail not found");
			report.outcome = MatchOutcome::NoNewMatches;
			break;
		};

		let candidates = fresh_candidates(session, &rail, &attempted).await?;
		if candidates.is_empty() {
			report.outcome = MatchOutcome::NoNewMatches;
			break;
		}

		let remaining = config.max_total - report.processed;
		let want = (candidates.len() * config.sample_pct as usize).div_ceil(100);
		let take = want.clamp(1, remaining.min(candidates.len()));
		let picked = sample(rng, candidates.len(), take);
		debug!(
			target = "swipr.matches",
			visible = candidates.len(),
			take,
			scan = report.scans,
			"sampled matches to open"
		);

		for index in picked.iter() {
			let (description, element) = &candidates[index];
			attempted.insert(description.clone());
			report.attempted += 1;

			info!(target = "swipr.matches", match_entry = %description, "opening match");
			if let Err(err) = session.driver().click(element).await {
				if matches!(&err, Error::Driver(d) if d.is_stale_element()) {
					debug!(target = "swipr.matches", "match entry went stale; rescanning");
					continue 'scan;
				}
				return Err(err);
			}
			tokio::time::sleep(Duration::from_millis(rng.random_range(1500..2500))).await;

			if open_chat_and_greet(session, description, rng).await? {
				report.processed += 1;
			} else {
				warn!(target = "swipr.matches", match_entry = %description, "greeting not sent");
			}

			if !back_to_chat_list(session, rng, &nav_options).await? {
				warn!(target = "swipr.matches", "lost the chat list; aborting");
				report.outcome = MatchOutcome::NavigationLost;
				return Ok(report);
			}
			tokio::time::sleep(Duration::from_millis(rng.random_range(1000..2000))).await;
		}
	}

	info!(
		target = "swipr.matches",
		outcome = ?report.outcome,
		processed = report.processed,
		attempted = report.attempted,
		scans = report.scans,
		"match processing finished"
	);
	Ok(report)
}

/// Chat-list markers: the rail title plus the main conversation list.
async fn on_chats_list<D: UiDriver>(session: &Session<D>, timeout: Duration) -> Result<bool> {
	if !session.is_present(&screens::MATCHES_TITLE, timeout).await? {
		return Ok(false);
	}
	session.is_present(&screens::CHAT_LIST, Duration::from_secs(1)).await
}

/// Promotional placeholders that replace the rail when nothing is new.
async fn promo_present<D: UiDriver>(session: &Session<D>) -> Result<bool> {
	let probe = Duration::from_secs(1);
	if session.is_present(&screens::SPOTLIGHT_PROMO, probe).await? {
		return Ok(true);
	}
	session.is_present(&screens::OPENING_MOVES_PROMO, probe).await
}

/// Visible rail entries not yet attempted this session, keyed by their
/// accessibility description.
async fn fresh_candidates<D: UiDriver>(
	session: &Session<D>,
	rail: &ElementRef,
	attempted: &HashSet<String>,
) -> Result<Vec<(String, ElementRef)>> {
	let buttons = session.driver().find_all_within(rail, &screens::MATCH_ITEM).await?;
	let mut fresh = Vec::new();
	for button in buttons {
		let Some(description) = session.driver().attribute(&button, "content-desc").await? else {
			continue;
		};
		if description.is_empty() || attempted.contains(&description) {
			continue;
		}
		fresh.push((description, button));
	}
	Ok(fresh)
}

/// From a just-clicked match entry to a sent greeting.
///
/// Dismisses the "Opening Move" interstitial when it appears, verifies
/// arrival on the chat screen via the message input, cross-checks the
/// toolbar name when one is shown, then types and sends one templated
/// greeting. `Ok(false)` on any soft failure.
async fn open_chat_and_greet<D: UiDriver, R: Rng>(
	session: &Session<D>,
	description: &str,
	rng: &mut R,
) -> Result<bool> {
	if session.is_present(&screens::OPENING_MOVE_SCREEN, Duration::from_secs(5)).await? {
		debug!(target = "swipr.matches", "opening-move interstitial detected");
		if session
			.click_if_present(&screens::OPENING_MOVE_REPLY, Duration::from_secs(5))
			.await?
		{
			tokio::time::sleep(Duration::from_millis(rng.random_range(1000..2000))).await;
		}
	}

	let Some(input) = session.find(&screens::CHAT_INPUT, Duration::from_secs(10)).await? else {
		warn!(target = "swipr.matches", "chat input never appeared");
		return Ok(false);
	};

	// soft cross-check against the toolbar title
	let expected = greetings::first_name(description);
	if let Some(title) = session.text_of(&screens::CHAT_TITLE, Duration::from_secs(2)).await? {
		if !expected.is_empty() && !title.to_lowercase().contains(&expected.to_lowercase()) {
			warn!(
				target = "swipr.matches",
				expected,
				title = %title,
				"chat toolbar name does not match; continuing anyway"
			);
		}
	}

	session.driver().click(&input).await?;
	tokio::time::sleep(Duration::from_millis(500)).await;

	// the input ships with placeholder text on fresh chats
	let current = session.driver().text(&input).await?;
	if current.eq_ignore_ascii_case("aa") {
		session.driver().clear(&input).await?;
		tokio::time::sleep(Duration::from_millis(300)).await;
	}

	let message = greetings::compose(description, rng);
	debug!(target = "swipr.matches", message = %message, "typing greeting");
	session.driver().send_keys(&input, &message).await?;
	tokio::time::sleep(Duration::from_millis(rng.random_range(800..1800))).await;

	if !session.click_if_present(&screens::CHAT_SEND, Duration::from_secs(7)).await? {
		warn!(target = "swipr.matches", "send button not found");
		return Ok(false);
	}
	tokio::time::sleep(Duration::from_millis(rng.random_range(1000..2500))).await;
	info!(target = "swipr.matches", match_entry = %description, "greeting sent");
	Ok(true)
}

/// Back-gestures to the chat list, with a tab re-open fallback.
async fn back_to_chat_list<D: UiDriver, R: Rng>(
	session: &Session<D>,
	rng: &mut R,
	nav_options: &NavOptions,
) -> Result<bool> {
	for i in 0..BACK_PRESSES_TO_LIST {
		session.back().await?;
		let pause = if i + 1 < BACK_PRESSES_TO_LIST {
			rng.random_range(300..700)
		} else {
			rng.random_range(1000..1500)
		};
		tokio::time::sleep(Duration::from_millis(pause)).await;
	}

	if on_chats_list(session, Duration::from_secs(5)).await? {
		return Ok(true);
	}

	debug!(target = "swipr.matches", "back presses missed the list; reopening chats tab");
	if !nav::open_tab(session, Tab::Chats, nav_options).await? {
		return Ok(false);
	}
	on_chats_list(session, Duration::from_secs(5)).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::FakeDriver;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn chats_screen(driver: &FakeDriver) {
		driver.place(&screens::NAV_BAR, "nav");
		driver.place(&screens::NAV_SELECTED_TAB, "selected");
		driver.set_attr("selected", "content-desc", "Chats");
		driver.place(&screens::MATCHES_TITLE, "title");
		driver.place(&screens::CHAT_LIST, "list");
		driver.place(&screens::MATCHES_RAIL, "rail");
	}

	fn add_match(driver: &FakeDriver, id: &str, description: &str) {
		driver.place_child("rail", &screens::MATCH_ITEM, id);
		driver.set_attr(id, "content-desc", description);
		// opening any match lands on a chat screen with input and send
		driver.on_click(id, |state| {
			state
				.elements
				.entry(screens::CHAT_INPUT.to_string())
				.or_default()
				.push("input".into());
			state
				.elements
				.entry(screens::CHAT_SEND.to_string())
				.or_default()
				.push("send".into());
		});
	}

	#[tokio::test(start_paused = true)]
	async fn zero_visible_matches_is_not_an_error() {
		let driver = FakeDriver::new();
		chats_screen(&driver);
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(31);

		let report = run(&session, &MatchConfig::new(5, 100), &mut rng).await.unwrap();

		assert_eq!(report.outcome, MatchOutcome::NoNewMatches);
		assert_eq!(report.processed, 0);
	}

	#[tokio::test(start_paused = true)]
	async fn promo_placeholder_stops_processing() {
		let driver = FakeDriver::new();
		chats_screen(&driver);
		driver.place(&screens::SPOTLIGHT_PROMO, "promo");
		add_match(&driver, "m1", "Alex, 24");
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(32);

		let report = run(&session, &MatchConfig::new(5, 100), &mut rng).await.unwrap();

		assert_eq!(report.outcome, MatchOutcome::PromoReached);
		assert_eq!(report.processed, 0);
		assert!(session.driver().click_count("m1") == 0);
	}

	#[tokio::test(start_paused = true)]
	async fn matches_are_greeted_and_never_clicked_twice() {
		let driver = FakeDriver::new();
		chats_screen(&driver);
		add_match(&driver, "m1", "Alex, 24");
		add_match(&driver, "m2", "Sam, 27");
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(33);

		let report = run(&session, &MatchConfig::new(10, 100), &mut rng).await.unwrap();

		assert_eq!(report.outcome, MatchOutcome::NoNewMatches);
		assert_eq!(report.processed, 2);
		assert_eq!(report.attempted, 2);
		// de-duplication: the rail still shows both entries on rescans, but
		// each was opened exactly once
		assert_eq!(session.driver().click_count("m1"), 1);
		assert_eq!(session.driver().click_count("m2"), 1);

		let typed = session.driver().typed();
		assert_eq!(typed.len(), 2);
		let names: Vec<&str> = typed.iter().map(|(_, text)| text.as_str()).collect();
		assert!(names.iter().any(|m| m.contains("Alex")));
		assert!(names.iter().any(|m| m.contains("Sam")));
		// every greeting was submitted
		assert_eq!(session.driver().click_count("send"), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn global_budget_caps_processing() {
		let driver = FakeDriver::new();
		chats_screen(&driver);
		add_match(&driver, "m1", "Alex, 24");
		add_match(&driver, "m2", "Sam, 27");
		add_match(&driver, "m3", "Ida, 29");
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(34);

		let report = run(&session, &MatchConfig::new(1, 100), &mut rng).await.unwrap();

		assert_eq!(report.outcome, MatchOutcome::BudgetReached);
		assert_eq!(report.processed, 1);
		let opened: usize = ["m1", "m2", "m3"]
			.iter()
			.map(|id| session.driver().click_count(id))
			.sum();
		assert_eq!(opened, 1);
	}

	#[tokio::test(start_paused = true)]
	async fn unrecoverable_back_navigation_aborts() {
		let driver = FakeDriver::new();
		chats_screen(&driver);
		driver.place_child("rail", &screens::MATCH_ITEM, "m1");
		driver.set_attr("m1", "content-desc", "Alex, 24");
		// opening the match tears down the whole chats screen and the nav
		// bar, and nothing brings them back
		driver.on_click("m1", |state| {
			state.elements.remove(&screens::MATCHES_TITLE.to_string());
			state.elements.remove(&screens::CHAT_LIST.to_string());
			state.elements.remove(&screens::NAV_BAR.to_string());
			state
				.elements
				.entry(screens::CHAT_INPUT.to_string())
				.or_default()
				.push("input".into());
			state
				.elements
				.entry(screens::CHAT_SEND.to_string())
				.or_default()
				.push("send".into());
		});
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(35);

		let report = run(&session, &MatchConfig::new(5, 100), &mut rng).await.unwrap();

		assert_eq!(report.outcome, MatchOutcome::NavigationLost);
	}

	#[tokio::test(start_paused = true)]
	async fn chats_tab_unavailable_reports_cleanly() {
		let driver = FakeDriver::new();
		// no nav bar at all, and backing out doesn't help
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(36);

		let report = run(&session, &MatchConfig::new(5, 100), &mut rng).await.unwrap();

		assert_eq!(report.outcome, MatchOutcome::ChatsUnavailable);
		assert_eq!(report.processed, 0);
	}

	#[tokio::test(start_paused = true)]
	async fn mismatched_toolbar_name_is_soft() {
		let driver = FakeDriver::new();
		chats_screen(&driver);
		add_match(&driver, "m1", "Alex, 24");
		driver.place(&screens::CHAT_TITLE, "title-el");
		driver.set_text("title-el", "Someone Else");
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(37);

		let report = run(&session, &MatchConfig::new(5, 100), &mut rng).await.unwrap();

		// name mismatch is logged, not fatal
		assert_eq!(report.processed, 1);
	}
}
