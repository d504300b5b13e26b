//! Bounded polling.
//!
//! Every wait in the bot is a bounded poll: probe, sleep a fixed interval,
//! re-probe, give up at the deadline. Nothing retries indefinitely.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

/// Polls `probe` every `interval` until it yields a value or `timeout`
/// elapses.
///
/// The probe always runs at least once, so a zero timeout degenerates to a
/// single check. Returns `None` on deadline.
pub async fn until<T, F, Fut>(interval: Duration, timeout: Duration, mut probe: F) -> Option<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Option<T>>,
{
	let deadline = Instant::now() + timeout;
	loop {
		if let Some(value) = probe().await {
			return Some(value);
		}
		if Instant::now() + interval > deadline {
			return None;
		}
		tokio::time::sleep(interval).await;
	}
}

/// Fallible variant of [`until`]: a probe error aborts the poll immediately.
pub async fn try_until<T, E, F, Fut>(
	interval: Duration,
	timeout: Duration,
	mut probe: F,
) -> std::result::Result<Option<T>, E>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = std::result::Result<Option<T>, E>>,
{
	let deadline = Instant::now() + timeout;
	loop {
		if let Some(value) = probe().await? {
			return Ok(Some(value));
		}
		if Instant::now() + interval > deadline {
			return Ok(None);
		}
		tokio::time::sleep(interval).await;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn returns_first_success() {
		let mut calls = 0;
		let found = until(Duration::from_millis(100), Duration::from_secs(1), || {
			calls += 1;
			let current = calls;
			async move { (current >= 3).then_some(current) }
		})
		.await;
		assert_eq!(found, Some(3));
	}

	#[tokio::test(start_paused = true)]
	async fn gives_up_at_deadline() {
		let mut calls = 0u32;
		let found: Option<()> = until(Duration::from_millis(250), Duration::from_secs(1), || {
			calls += 1;
			async { None }
		})
		.await;
		assert_eq!(found, None);
		// 0ms, 250ms, 500ms, 750ms, 1000ms
		assert_eq!(calls, 5);
	}

	#[tokio::test(start_paused = true)]
	async fn zero_timeout_probes_once() {
		let mut calls = 0u32;
		let found: Option<()> = until(Duration::from_millis(100), Duration::ZERO, || {
			calls += 1;
			async { None }
		})
		.await;
		assert_eq!(found, None);
		assert_eq!(calls, 1);
	}

	#[tokio::test(start_paused = true)]
	async fn try_until_propagates_errors() {
		let result: Result<Option<()>, &str> =
			try_until(Duration::from_millis(50), Duration::from_secs(5), || async { Err("boom") }).await;
		assert_eq!(result, Err("boom"));
	}

	#[tokio::test(start_paused = true)]
	async fn try_until_finds_value() {
		let mut calls = 0;
		let result: Result<Option<u32>, ()> =
			try_until(Duration::from_millis(50), Duration::from_secs(5), || {
				calls += 1;
				let hit = calls >= 2;
				async move { Ok(hit.then_some(7)) }
			})
			.await;
		assert_eq!(result, Ok(Some(7)));
	}
}
