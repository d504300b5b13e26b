//! Popup dispatcher: fixed-priority dismissal of known interstitials.

use std::ops::Range;
use std::time::Duration;

use rand::Rng;
use swipr_protocol::Locator;
use tracing::{debug, info, warn};

use crate::driver::UiDriver;
use crate::error::Result;
use crate::screens;
use crate::session::Session;

/// One known interstitial: how to recognize it and how to close it.
#[derive(Debug, Clone)]
pub struct PopupRule {
	pub name: &'static str,
	/// Presence of this element means the popup is covering the screen.
	pub trigger: Locator,
	/// Element to click to dismiss it.
	pub dismiss: Locator,
}

/// Dismisses interstitials in fixed priority order.
///
/// Callers loop: while a dismissal is reported, re-invoke before doing real
/// work, so stacked interstitials drain one per pass.
pub struct PopupDispatcher {
	rules: Vec<PopupRule>,
	probe_timeout: Duration,
}

/// Delay before clicking a dismiss affordance, to read less mechanical.
const PRE_CLICK_DELAY_MS: Range<u64> = 400..1200;
/// Settle time after a dismissal click.
const POST_CLICK_DELAY_MS: Range<u64> = 300..800;
/// Hard cap on dismissals per [`PopupDispatcher::drain`] call.
const DRAIN_CAP: u32 = 8;

impl Default for PopupDispatcher {
	fn default() -> Self {
		Self::new(default_rules(), Duration::from_secs(3))
	}
}

impl PopupDispatcher {
	pub fn new(rules: Vec<PopupRule>, probe_timeout: Duration) -> Self {
		Self { rules, probe_timeout }
	}

	/// Dismisses the highest-priority interstitial currently present.
	///
	/// Returns the matched rule's name, or `None` when no rule matched. A
	/// matched trigger whose dismiss element cannot be found is logged and
	/// reported as not handled; the caller proceeds as if no popup existed.
	/// (Known gap: if that popup truly blocks the screen the loop is stuck
	/// until its overall deadline.)
	pub async fn try_dismiss_next<D: UiDriver, R: Rng>(
		&self,
		session: &Session<D>,
		rng: &mut R,
	) -> Result<Option<&'static str>> {
		for rule in &self.rules {
			if session.find(&rule.trigger, self.probe_timeout).await?.is_none() {
				continue;
			}
			debug!(target = "swipr.popup", rule = rule.name, "interstitial detected");

			let Some(dismiss) = session.find(&rule.dismiss, self.probe_timeout).await? else {
				warn!(
					target = "swipr.popup",
					rule = rule.name,
					dismiss = %rule.dismiss,
					"trigger matched but dismiss element missing; leaving unhandled"
				);
				return Ok(None);
			};

			tokio::time::sleep(Duration::from_millis(rng.random_range(PRE_CLICK_DELAY_MS))).await;
			session.driver().click(&dismiss).await?;
			tokio::time::sleep(Duration::from_millis(rng.random_range(POST_CLICK_DELAY_MS))).await;

			info!(target = "swipr.popup", rule = rule.name, "interstitial dismissed");
			return Ok(Some(rule.name));
		}
		Ok(None)
	}

	/// Dismisses stacked interstitials until none match, with a hard cap.
	///
	/// Returns how many were dismissed.
	pub async fn drain<D: UiDriver, R: Rng>(&self, session: &Session<D>, rng: &mut R) -> Result<u32> {
		let mut dismissed = 0;
		while dismissed < DRAIN_CAP {
			if self.try_dismiss_next(session, rng).await?.is_none() {
				break;
			}
			dismissed += 1;
		}
		Ok(dismissed)
	}
}

/// The hand-ordered interstitial list: confirmation dialogs first (they sit
/// above everything), promo sheets after.
pub fn default_rules() -> Vec<PopupRule> {
	vec![
		PopupRule {
			name: "interested-confirm",
			trigger: screens::INTERESTED_PANEL,
			dismiss: screens::DIALOG_POSITIVE,
		},
		PopupRule {
			name: "premium-upsell",
			trigger: screens::PREMIUM_UPSELL,
			dismiss: screens::PROMO_CLOSE,
		},
	]
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::FakeDriver;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn dispatcher() -> PopupDispatcher {
		PopupDispatcher::new(default_rules(), Duration::ZERO)
	}

	#[tokio::test(start_paused = true)]
	async fn no_trigger_means_no_click() {
		let driver = FakeDriver::new();
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(1);

		let handled = dispatcher().try_dismiss_next(&session, &mut rng).await.unwrap();
		assert_eq!(handled, None);
		assert!(session.driver().clicks().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn first_matching_rule_wins() {
		let driver = FakeDriver::new();
		driver.place(&screens::INTERESTED_PANEL, "panel");
		driver.place(&screens::DIALOG_POSITIVE, "yes");
		driver.place(&screens::PREMIUM_UPSELL, "upsell");
		driver.place(&screens::PROMO_CLOSE, "close");
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(2);

		let handled = dispatcher().try_dismiss_next(&session, &mut rng).await.unwrap();
		assert_eq!(handled, Some("interested-confirm"));
		assert_eq!(session.driver().clicks(), vec!["yes".to_string()]);
	}

	#[tokio::test(start_paused = true)]
	async fn missing_dismiss_is_logged_not_clicked() {
		let driver = FakeDriver::new();
		driver.place(&screens::INTERESTED_PANEL, "panel");
		// no positive button placed
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(3);

		let handled = dispatcher().try_dismiss_next(&session, &mut rng).await.unwrap();
		assert_eq!(handled, None);
		assert!(session.driver().clicks().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn drain_clears_stacked_interstitials() {
		let driver = FakeDriver::new();
		driver.place(&screens::INTERESTED_PANEL, "panel");
		driver.place(&screens::DIALOG_POSITIVE, "yes");
		// clicking YES removes the dialog
		driver.on_click("yes", |state| {
			state.elements.remove(&screens::INTERESTED_PANEL.to_string());
			state.elements.remove(&screens::DIALOG_POSITIVE.to_string());
		});
		driver.place(&screens::PREMIUM_UPSELL, "upsell");
		driver.place(&screens::PROMO_CLOSE, "close");
		driver.on_click("close", |state| {
			state.elements.remove(&screens::PREMIUM_UPSELL.to_string());
			state.elements.remove(&screens::PROMO_CLOSE.to_string());
		});
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(4);

		let dismissed = dispatcher().drain(&session, &mut rng).await.unwrap();
		assert_eq!(dismissed, 2);
		assert_eq!(session.driver().clicks(), vec!["yes".to_string(), "close".to_string()]);
	}

	#[tokio::test(start_paused = true)]
	async fn drain_is_capped_against_sticky_popups() {
		let driver = FakeDriver::new();
		// dialog that never goes away no matter how often YES is clicked
		driver.place(&screens::INTERESTED_PANEL, "panel");
		driver.place(&screens::DIALOG_POSITIVE, "yes");
		let session = Session::new(driver, screens::APP_PACKAGE);
		let mut rng = StdRng::seed_from_u64(5);

		let dismissed = dispatcher().drain(&session, &mut rng).await.unwrap();
		assert_eq!(dismissed, DRAIN_CAP);
	}
}
