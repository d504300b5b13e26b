//! Search-filter adjustment.
//!
//! When the deck runs dry the app shows a "seen everyone nearby" prompt with
//! an "Adjust your filters" button. The recovery is to widen the upper age
//! bound: drag the slider thumb into a high-but-not-maximum zone and apply.
//! Landing exactly on the maximum is avoided on purpose; it reads as a bot
//! and sometimes fails to register as a change at all.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use crate::driver::UiDriver;
use crate::error::Result;
use crate::gesture;
use crate::screens;
use crate::session::Session;

/// Budget for locating slider elements on the filter screen.
const ELEMENT_TIMEOUT: Duration = Duration::from_secs(15);

/// Safety margin (px) kept between the thumb center and the track's right
/// edge even at "absolute maximum".
const EDGE_MARGIN: i32 = 10;

/// Minimum drag distance (px) that reliably registers as a slider change.
const MIN_MEANINGFUL_MOVE: i32 = 15;

/// True when the "seen everyone nearby" prompt is covering the deck.
pub async fn prompt_present<D: UiDriver>(session: &Session<D>) -> Result<bool> {
	session.is_present(&screens::FILTERS_PROMPT, Duration::from_secs(3)).await
}

/// Handles the prompt end to end: open the filter screen, widen the age
/// range, apply. `Ok(false)` when any step could not be completed.
pub async fn handle_everyone_seen_prompt<D: UiDriver, R: Rng>(
	session: &Session<D>,
	rng: &mut R,
) -> Result<bool> {
	if !session
		.click_if_present(&screens::FILTERS_ADJUST_BUTTON, Duration::from_secs(3))
		.await?
	{
		warn!(target = "swipr.filters", "adjust-filters button not found");
		return Ok(false);
	}
	info!(target = "swipr.filters", "opened filter screen");
	tokio::time::sleep(Duration::from_secs(2)).await;

	adjust_age_filter(session, rng).await
}

/// Drags the upper-age thumb to a high random position and clicks Apply.
///
/// Assumes the filter screen is already open. `Ok(false)` when the slider
/// or the Apply button cannot be found in time.
pub async fn adjust_age_filter<D: UiDriver, R: Rng>(session: &Session<D>, rng: &mut R) -> Result<bool> {
	let Some(thumb) = session.find(&screens::AGE_UPPER_THUMB, ELEMENT_TIMEOUT).await? else {
		warn!(target = "swipr.filters", "age slider thumb not found");
		return Ok(false);
	};
	let Some(track) = session.find(&screens::AGE_SLIDER_TRACK, ELEMENT_TIMEOUT).await? else {
		warn!(target = "swipr.filters", "age slider track not found");
		return Ok(false);
	};

	let thumb_rect = session.driver().rect(&thumb).await?;
	let track_rect = session.driver().rect(&track).await?;

	let (start_x, start_y) = thumb_rect.center();
	let half_thumb = thumb_rect.width as i32 / 2;
	let track_right = track_rect.x + track_rect.width as i32;
	let max_center_x = track_right - half_thumb - EDGE_MARGIN;

	// land in a zone 25-75px short of the maximum
	let offset_from_max = rng.random_range(25..=75);
	let mut target_x = max_center_x - offset_from_max;

	// a sub-threshold move may not register; force a real one
	if (target_x - start_x).abs() < MIN_MEANINGFUL_MOVE {
		if start_x >= max_center_x - (offset_from_max + MIN_MEANINGFUL_MOVE) {
			target_x = start_x - MIN_MEANINGFUL_MOVE;
		} else {
			target_x = start_x + MIN_MEANINGFUL_MOVE;
		}
	}

	let min_center_x = track_rect.x + half_thumb + 5;
	target_x = target_x.clamp(min_center_x, max_center_x - 20);

	if target_x == start_x {
		debug!(target = "swipr.filters", x = start_x, "thumb already at target; skipping drag");
	} else {
		debug!(
			target = "swipr.filters",
			from = start_x,
			to = target_x,
			max = max_center_x,
			"dragging upper-age thumb"
		);
		gesture::drag(session, (start_x, start_y), (target_x, start_y), Duration::from_millis(250)).await?;
	}
	tokio::time::sleep(Duration::from_secs(2)).await;

	if !session.click_if_present(&screens::FILTERS_APPLY, ELEMENT_TIMEOUT).await? {
		warn!(target = "swipr.filters", "apply button not found after slider drag");
		return Ok(false);
	}
	info!(target = "swipr.filters", "age filter widened and applied");
	tokio::time::sleep(Duration::from_secs(3)).await;

	Ok(true)
}
