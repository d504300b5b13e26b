//! Tab navigation via the bottom navigation bar.
//!
//! Screen identity is an enumerated [`Tab`] derived by a pure function over
//! the selected nav item's label; nothing is cached between probes.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::driver::UiDriver;
use crate::error::Result;
use crate::poll;
use crate::screens;
use crate::session::Session;

/// Top-level tabs of the app's main screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
	People,
	LikedYou,
	Chats,
	Profile,
}

impl Tab {
	/// The content description the nav bar uses for this tab.
	pub fn label(self) -> &'static str {
		match self {
			Tab::People => "People",
			Tab::LikedYou => "Liked You",
			Tab::Chats => "Chats",
			Tab::Profile => "Profile",
		}
	}

	/// Pure derivation of a tab from an observed nav-bar label.
	pub fn from_label(label: &str) -> Option<Tab> {
		let label = label.trim();
		[Tab::People, Tab::LikedYou, Tab::Chats, Tab::Profile]
			.into_iter()
			.find(|tab| tab.label().eq_ignore_ascii_case(label))
	}
}

impl std::fmt::Display for Tab {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.label())
	}
}

/// Outcome of probing the nav bar for the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabProbe {
	/// Nav bar visible, selected tab recognized.
	Selected(Tab),
	/// Nav bar visible but the selected item's label is not a known tab.
	UnknownLabel(String),
	/// Nav bar visible, no item marked selected.
	NoSelection,
	/// Nav bar not on screen (a modal or full-screen view is covering it).
	Hidden,
}

/// Timeouts for navigation operations.
#[derive(Debug, Clone)]
pub struct NavOptions {
	/// Budget for the nav bar and the target tab to become clickable.
	pub navigation_timeout: Duration,
	/// Budget for post-click verification of arrival.
	pub verification_timeout: Duration,
	/// Budget for a single presence probe.
	pub probe_timeout: Duration,
}

impl Default for NavOptions {
	fn default() -> Self {
		Self {
			navigation_timeout: Duration::from_secs(10),
			verification_timeout: Duration::from_secs(5),
			probe_timeout: Duration::from_secs(3),
		}
	}
}

/// Probes which tab is currently selected, without any recovery.
pub async fn probe_current<D: UiDriver>(session: &Session<D>, probe_timeout: Duration) -> Result<TabProbe> {
	if !session.is_visible(&screens::NAV_BAR, probe_timeout).await? {
		return Ok(TabProbe::Hidden);
	}

	let Some(selected) = session.find(&screens::NAV_SELECTED_TAB, probe_timeout).await? else {
		return Ok(TabProbe::NoSelection);
	};

	let Some(label) = session.driver().attribute(&selected, "content-desc").await? else {
		return Ok(TabProbe::NoSelection);
	};

	Ok(match Tab::from_label(&label) {
		Some(tab) => TabProbe::Selected(tab),
		None => TabProbe::UnknownLabel(label),
	})
}

/// Probes the current tab, backing out of a covering modal once if needed.
pub async fn current_tab<D: UiDriver>(session: &Session<D>, options: &NavOptions) -> Result<TabProbe> {
	let probe = probe_current(session, options.probe_timeout).await?;
	if probe != TabProbe::Hidden {
		return Ok(probe);
	}

	debug!(target = "swipr.nav", "nav bar hidden; backing out once");
	session.back().await?;
	probe_current(session, options.probe_timeout).await
}

/// Navigates to `tab` via the bottom nav bar.
///
/// Idempotent: already on `tab` means `Ok(true)` with zero clicks. Returns
/// `Ok(false)` when the tab cannot be reached within the bounded budget.
pub async fn open_tab<D: UiDriver>(session: &Session<D>, tab: Tab, options: &NavOptions) -> Result<bool> {
	match current_tab(session, options).await? {
		TabProbe::Selected(current) if current == tab => {
			debug!(target = "swipr.nav", tab = %tab, "already on target tab");
			return Ok(true);
		}
		probe => {
			debug!(target = "swipr.nav", tab = %tab, current = ?probe, "navigating");
		}
	}

	if !session.is_present(&screens::NAV_BAR, options.navigation_timeout).await? {
		warn!(target = "swipr.nav", tab = %tab, "nav bar never appeared");
		return Ok(false);
	}

	let tab_locator = screens::nav_tab(tab.label());
	if !session.click_if_present(&tab_locator, options.navigation_timeout).await? {
		warn!(target = "swipr.nav", tab = %tab, "tab element not found");
		return Ok(false);
	}

	let arrived = poll::try_until(
		Duration::from_millis(500),
		options.verification_timeout,
		|| async move {
			let probe = probe_current(session, Duration::from_secs(1)).await?;
			Ok::<_, crate::Error>((probe == TabProbe::Selected(tab)).then_some(()))
		},
	)
	.await?
	.is_some();

	if arrived {
		info!(target = "swipr.nav", tab = %tab, "navigation verified");
	} else {
		warn!(target = "swipr.nav", tab = %tab, "navigation verification timed out");
	}
	Ok(arrived)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::FakeDriver;

	fn options() -> NavOptions {
		NavOptions {
			navigation_timeout: Duration::from_secs(2),
			verification_timeout: Duration::from_secs(2),
			probe_timeout: Duration::ZERO,
		}
	}

	fn select_tab(driver: &FakeDriver, label: &'static str) {
		driver.remove(&screens::NAV_SELECTED_TAB);
		driver.place(&screens::NAV_SELECTED_TAB, "selected");
		driver.set_attr("selected", "content-desc", label);
	}

	#[test]
	fn label_derivation_is_pure_and_case_insensitive() {
		assert_eq!(Tab::from_label("Chats"), Some(Tab::Chats));
		assert_eq!(Tab::from_label("liked you"), Some(Tab::LikedYou));
		assert_eq!(Tab::from_label(" People "), Some(Tab::People));
		assert_eq!(Tab::from_label("Payments"), None);
	}

	#[tokio::test(start_paused = true)]
	async fn open_tab_is_idempotent() {
		let driver = FakeDriver::new();
		driver.place(&screens::NAV_BAR, "nav");
		select_tab(&driver, "Chats");
		let session = Session::new(driver, screens::APP_PACKAGE);

		assert!(open_tab(&session, Tab::Chats, &options()).await.unwrap());
		assert!(open_tab(&session, Tab::Chats, &options()).await.unwrap());
		// both calls were no-ops
		assert!(session.driver().clicks().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn open_tab_clicks_and_verifies() {
		let driver = FakeDriver::new();
		driver.place(&screens::NAV_BAR, "nav");
		select_tab(&driver, "People");
		driver.place(&screens::nav_tab("Chats"), "chats-tab");
		driver.on_click("chats-tab", |state| {
			let key = screens::NAV_SELECTED_TAB.to_string();
			state.elements.remove(&key);
			state.elements.entry(key).or_default().push("selected-chats".into());
			state
				.attrs
				.insert(("selected-chats".into(), "content-desc".into()), "Chats".into());
		});
		let session = Session::new(driver, screens::APP_PACKAGE);

		assert!(open_tab(&session, Tab::Chats, &options()).await.unwrap());
		assert_eq!(session.driver().clicks(), vec!["chats-tab".to_string()]);
	}

	#[tokio::test(start_paused = true)]
	async fn open_tab_times_out_when_selection_never_changes() {
		let driver = FakeDriver::new();
		driver.place(&screens::NAV_BAR, "nav");
		select_tab(&driver, "People");
		driver.place(&screens::nav_tab("Chats"), "chats-tab");
		// click has no effect on the selected tab
		let session = Session::new(driver, screens::APP_PACKAGE);

		assert!(!open_tab(&session, Tab::Chats, &options()).await.unwrap());
	}

	#[tokio::test(start_paused = true)]
	async fn hidden_nav_bar_triggers_one_back_press() {
		let driver = FakeDriver::new();
		// nav bar hidden behind a modal until back is pressed
		driver.on_back(|state| {
			state
				.elements
				.entry(screens::NAV_BAR.to_string())
				.or_default()
				.push("nav".into());
			let key = screens::NAV_SELECTED_TAB.to_string();
			state.elements.entry(key).or_default().push("selected".into());
			state
				.attrs
				.insert(("selected".into(), "content-desc".into()), "Chats".into());
		});
		let session = Session::new(driver, screens::APP_PACKAGE);

		let probe = current_tab(&session, &options()).await.unwrap();
		assert_eq!(probe, TabProbe::Selected(Tab::Chats));
		assert_eq!(session.driver().back_presses(), 1);
	}
}
