//! Gesture synthesis: humanized scrolls, swipes, and drags.
//!
//! Paths are planned as pure functions over the live screen size and an RNG
//! so their geometry is testable; executors read dimensions fresh on every
//! call (device rotation/resize is tolerated) and send one touch-pointer
//! sequence. Start/end points are percentage-of-screen with a little jitter
//! and 2-4 intermediate waypoints, and the gesture duration itself is
//! randomized, so no two swipes trace the same line at the same speed.

use std::time::Duration;

use rand::Rng;
use swipr_protocol::{PointerAction, PointerSequence};
use tracing::trace;

use crate::driver::UiDriver;
use crate::error::Result;
use crate::session::Session;

/// Screen dimensions a gesture is planned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
	pub width: u32,
	pub height: u32,
}

impl From<(u32, u32)> for ScreenSize {
	fn from((width, height): (u32, u32)) -> Self {
		Self { width, height }
	}
}

/// Vertical scroll flavor: the first scroll on a profile travels further.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollKind {
	Initial,
	FollowUp,
}

/// Horizontal swipe direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
	Left,
	Right,
}

/// A horizontal swipe always covers at least this fraction of the screen
/// width; anything shorter risks registering as a no-op tap.
pub const MIN_SWIPE_FRACTION: f64 = 0.40;

/// Bounds for the randomized gesture travel time, in milliseconds.
const GESTURE_DURATION_MS: std::ops::RangeInclusive<u64> = 150..=600;

/// Waypoint jitter amplitude as a fraction of the screen axis.
const JITTER_FRACTION: f64 = 0.015;

/// Plans a vertical profile-reading scroll.
pub fn plan_vertical_scroll<R: Rng>(size: ScreenSize, kind: ScrollKind, rng: &mut R) -> PointerSequence {
	let w = size.width as f64;
	let h = size.height as f64;

	let start_x = w * rng.random_range(0.28..0.65);
	let start_y = h * rng.random_range(0.42..0.58);
	let travel = match kind {
		ScrollKind::Initial => h * rng.random_range(0.33..0.46),
		ScrollKind::FollowUp => h * rng.random_range(0.25..0.38),
	};
	let end_x = start_x + jitter(w, rng);
	let end_y = (start_y - travel).max(h * 0.04);

	build_path(size, (start_x, start_y), (end_x, end_y), rng)
}

/// Plans a horizontal like/pass swipe.
pub fn plan_swipe<R: Rng>(size: ScreenSize, direction: SwipeDirection, rng: &mut R) -> PointerSequence {
	let w = size.width as f64;
	let h = size.height as f64;

	// travel drawn above the minimum so end-point jitter cannot drop a
	// swipe below MIN_SWIPE_FRACTION
	let travel = w * rng.random_range(0.44..0.70);
	let start_y = h * rng.random_range(0.38..0.62);
	let (start_x, end_x) = match direction {
		SwipeDirection::Right => {
			let start = w * rng.random_range(0.12..0.26);
			(start, start + travel + jitter(w, rng))
		}
		SwipeDirection::Left => {
			let start = w * rng.random_range(0.74..0.88);
			(start, start - travel + jitter(w, rng))
		}
	};
	let end_y = start_y + h * rng.random_range(-0.06..0.06);

	build_path(size, (start_x, start_y), (end_x, end_y), rng)
}

/// Plans a straight drag between two known points (slider adjustment).
pub fn plan_drag(size: ScreenSize, from: (i32, i32), to: (i32, i32), duration: Duration) -> PointerSequence {
	let (fx, fy) = clamp_point(size, from.0 as f64, from.1 as f64);
	let (tx, ty) = clamp_point(size, to.0 as f64, to.1 as f64);
	PointerSequence::new(vec![
		PointerAction::Move { duration: 0, x: fx, y: fy },
		PointerAction::Down { button: 0 },
		PointerAction::Pause { duration: 100 },
		PointerAction::Move { duration: duration.as_millis() as u64, x: tx, y: ty },
		PointerAction::Up { button: 0 },
	])
}

/// Shared path builder: down at start, 2-4 timed waypoints toward the end,
/// release. All coordinates clamped to the screen.
fn build_path<R: Rng>(
	size: ScreenSize,
	start: (f64, f64),
	end: (f64, f64),
	rng: &mut R,
) -> PointerSequence {
	let (sx, sy) = clamp_point(size, start.0, start.1);
	let (ex, ey) = clamp_point(size, end.0, end.1);

	let mut steps = vec![
		PointerAction::Move { duration: 0, x: sx, y: sy },
		PointerAction::Down { button: 0 },
		PointerAction::Pause { duration: rng.random_range(20..60) },
	];

	let total_ms = rng.random_range(GESTURE_DURATION_MS);
	let waypoints = rng.random_range(2..=4u32);
	let per_leg = total_ms / waypoints as u64;

	for i in 1..=waypoints {
		let progress = i as f64 / waypoints as f64;
		let (mut x, mut y) = (
			start.0 + (ex as f64 - start.0) * progress,
			start.1 + (ey as f64 - start.1) * progress,
		);
		if i < waypoints {
			x += jitter(size.width as f64, rng);
			y += jitter(size.height as f64, rng);
		} else {
			// land exactly on the planned end point
			x = ex as f64;
			y = ey as f64;
		}
		let (x, y) = clamp_point(size, x, y);
		steps.push(PointerAction::Move { duration: per_leg.max(1), x, y });
	}

	steps.push(PointerAction::Up { button: 0 });
	PointerSequence::new(steps)
}

fn jitter<R: Rng>(axis: f64, rng: &mut R) -> f64 {
	axis * rng.random_range(-JITTER_FRACTION..JITTER_FRACTION)
}

fn clamp_point(size: ScreenSize, x: f64, y: f64) -> (i32, i32) {
	let max_x = (size.width as i32 - 1).max(0);
	let max_y = (size.height as i32 - 1).max(0);
	((x as i32).clamp(0, max_x), (y as i32).clamp(0, max_y))
}

// --- executors -----------------------------------------------------------

/// Performs one vertical profile-reading scroll.
pub async fn vertical_scroll<D: UiDriver, R: Rng>(
	session: &Session<D>,
	kind: ScrollKind,
	rng: &mut R,
) -> Result<()> {
	tokio::time::sleep(Duration::from_millis(rng.random_range(200..800))).await;

	let size = ScreenSize::from(session.screen_size().await?);
	let sequence = plan_vertical_scroll(size, kind, rng);
	trace!(target = "swipr.gesture", kind = ?kind, points = sequence.points().len(), "vertical scroll");
	session.driver().perform(sequence).await?;

	tokio::time::sleep(Duration::from_millis(rng.random_range(300..1200))).await;
	Ok(())
}

/// Performs one horizontal like/pass swipe.
pub async fn horizontal_swipe<D: UiDriver, R: Rng>(
	session: &Session<D>,
	direction: SwipeDirection,
	rng: &mut R,
) -> Result<()> {
	tokio::time::sleep(Duration::from_millis(rng.random_range(20..80))).await;

	let size = ScreenSize::from(session.screen_size().await?);
	let sequence = plan_swipe(size, direction, rng);
	trace!(target = "swipr.gesture", direction = ?direction, duration_ms = sequence.duration_ms(), "swipe");
	session.driver().perform(sequence).await?;

	tokio::time::sleep(Duration::from_millis(rng.random_range(300..800))).await;
	Ok(())
}

/// Performs a straight drag between two points.
pub async fn drag<D: UiDriver>(
	session: &Session<D>,
	from: (i32, i32),
	to: (i32, i32),
	duration: Duration,
) -> Result<()> {
	let size = ScreenSize::from(session.screen_size().await?);
	session.driver().perform(plan_drag(size, from, to, duration)).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use swipr_protocol::PointerAction;

	const SIZE: ScreenSize = ScreenSize { width: 1080, height: 2400 };

	fn assert_in_bounds(sequence: &PointerSequence, size: ScreenSize) {
		for (x, y) in sequence.points() {
			assert!((0..size.width as i32).contains(&x), "x {x} out of [0, {})", size.width);
			assert!((0..size.height as i32).contains(&y), "y {y} out of [0, {})", size.height);
		}
	}

	fn travel_ms(sequence: &PointerSequence) -> u64 {
		sequence
			.steps
			.iter()
			.map(|s| match s {
				PointerAction::Move { duration, .. } => *duration,
				_ => 0,
			})
			.sum()
	}

	#[test]
	fn scroll_paths_stay_on_screen_and_move_up() {
		for seed in 0..200 {
			let mut rng = StdRng::seed_from_u64(seed);
			let kind = if seed % 2 == 0 { ScrollKind::Initial } else { ScrollKind::FollowUp };
			let sequence = plan_vertical_scroll(SIZE, kind, &mut rng);

			assert_in_bounds(&sequence, SIZE);
			let points = sequence.points();
			let (_, start_y) = points[0];
			let (_, end_y) = *points.last().unwrap();
			assert!(end_y < start_y, "scroll must move upward (seed {seed})");
		}
	}

	#[test]
	fn swipe_paths_stay_on_screen_and_cover_min_distance() {
		for seed in 0..200 {
			let mut rng = StdRng::seed_from_u64(seed);
			let direction = if seed % 2 == 0 { SwipeDirection::Right } else { SwipeDirection::Left };
			let sequence = plan_swipe(SIZE, direction, &mut rng);

			assert_in_bounds(&sequence, SIZE);
			let points = sequence.points();
			let (start_x, _) = points[0];
			let (end_x, _) = *points.last().unwrap();
			let distance = (end_x - start_x).abs() as f64;
			assert!(
				distance >= MIN_SWIPE_FRACTION * SIZE.width as f64,
				"swipe too short: {distance} (seed {seed})"
			);
			match direction {
				SwipeDirection::Right => assert!(end_x > start_x),
				SwipeDirection::Left => assert!(end_x < start_x),
			}
		}
	}

	#[test]
	fn swipe_duration_is_randomized_within_bounds() {
		let mut seen = std::collections::HashSet::new();
		for seed in 0..50 {
			let mut rng = StdRng::seed_from_u64(seed);
			let sequence = plan_swipe(SIZE, SwipeDirection::Right, &mut rng);
			let ms = travel_ms(&sequence);
			// per-leg integer division may shave a few ms off the total
			assert!((100..=600).contains(&ms), "duration {ms}ms out of range");
			seen.insert(ms);
		}
		assert!(seen.len() > 10, "durations should vary across seeds");
	}

	#[test]
	fn waypoint_count_is_between_two_and_four() {
		for seed in 0..50 {
			let mut rng = StdRng::seed_from_u64(seed);
			let sequence = plan_swipe(SIZE, SwipeDirection::Left, &mut rng);
			// points = start + waypoints
			let waypoints = sequence.points().len() - 1;
			assert!((2..=4).contains(&waypoints), "{waypoints} waypoints (seed {seed})");
		}
	}

	#[test]
	fn drag_is_straight_and_clamped() {
		let sequence = plan_drag(SIZE, (-50, 100), (5000, 100), Duration::from_millis(250));
		assert_in_bounds(&sequence, SIZE);
		let points = sequence.points();
		assert_eq!(points[0], (0, 100));
		assert_eq!(*points.last().unwrap(), (1079, 100));
	}

	#[test]
	fn tiny_screens_do_not_panic() {
		let size = ScreenSize { width: 1, height: 1 };
		let mut rng = StdRng::seed_from_u64(9);
		let sequence = plan_swipe(size, SwipeDirection::Right, &mut rng);
		assert_in_bounds(&sequence, size);
	}
}
