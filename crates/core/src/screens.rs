//! Screen locator table.
//!
//! Static mapping from named UI states to element-lookup queries, recovered
//! from the app's UI hierarchy dumps. Everything here is data; screen state
//! itself is never stored, it is derived on demand by probing for presence.

use swipr_protocol::Locator;

/// Package of the automated app.
pub const APP_PACKAGE: &str = "com.bumble.app";

/// Launcher activity used when the app has to be (re)started.
pub const APP_ACTIVITY: &str = ".ui.launcher.BumbleLauncherActivity";

/// Bottom navigation bar of the main screen.
pub const NAV_BAR: Locator = Locator::id("com.bumble.app:id/mainApp_navigationTabBar");

/// The nav-bar child currently marked selected (carries the tab label in its
/// content description).
pub const NAV_SELECTED_TAB: Locator = Locator::xpath(
	"//*[@resource-id='com.bumble.app:id/mainApp_navigationTabBar']\
	 //android.view.ViewGroup[@selected='true' and @content-desc]",
);

/// Clickable nav-bar tab with the given label.
pub fn nav_tab(label: &str) -> Locator {
	Locator::xpath_owned(format!(
		"//*[@resource-id='com.bumble.app:id/mainApp_navigationTabBar']\
		 //android.view.ViewGroup[@content-desc='{label}']"
	))
}

/// Profile card stack shown on the swiping screen.
pub const PROFILE_CARD: Locator = Locator::id("com.bumble.app:id/encountersCard");

// --- interstitials -------------------------------------------------------

/// Dialog panel of the "Interested?" right-swipe confirmation.
pub const INTERESTED_PANEL: Locator = Locator::id("com.bumble.app:id/parentPanel");

/// Positive button of a standard Android dialog.
pub const DIALOG_POSITIVE: Locator = Locator::id("android:id/button1");

/// Premium upsell sheet.
pub const PREMIUM_UPSELL: Locator =
	Locator::xpath("//android.widget.TextView[contains(@text, 'Premium')]");

/// Close affordance of full-screen promo sheets.
pub const PROMO_CLOSE: Locator = Locator::accessibility("Close");

/// Generic blocking overlay stack ("out of likes" and friends). Presence is
/// terminal for the swipe loop; there is no known dismiss affordance.
pub const BLOCKING_OVERLAY: Locator =
	Locator::xpath("//android.view.ViewGroup/android.view.View/android.view.View/android.view.View");

// --- filter adjustment ---------------------------------------------------

/// Identifying text of the "seen everyone nearby" prompt.
pub const FILTERS_PROMPT: Locator =
	Locator::xpath("//android.widget.TextView[contains(@text, \"You\u{2019}ve seen everyone nearby\")]");

/// Clickable container of the "Adjust your filters" button.
pub const FILTERS_ADJUST_BUTTON: Locator = Locator::xpath(
	"//android.view.View[@clickable='true' and .//android.widget.TextView[@text='Adjust your filters']]",
);

/// Draggable upper-age slider thumb on the filter screen.
pub const AGE_UPPER_THUMB: Locator =
	Locator::xpath("//com.badoo.mobile.component.rangebar.RangeBarItem[@content-desc='Higher age']");

/// Track the age slider thumbs ride on.
pub const AGE_SLIDER_TRACK: Locator = Locator::id("com.bumble.app:id/range_bar_item");

/// Apply button of the filter screen (several render variants).
pub const FILTERS_APPLY: Locator = Locator::xpath(
	"//android.widget.Button[contains(@text, 'Apply') or contains(@text, 'APPLY')] | \
	 //android.widget.TextView[@clickable='true' and (contains(@text, 'Apply') or contains(@text, 'APPLY'))] | \
	 //android.view.View[@clickable='true' and .//android.widget.TextView[contains(@text, 'Apply') or contains(@text, 'APPLY')]]",
);

// --- chats / matches -----------------------------------------------------

/// Title above the expiring "Your matches" rail.
pub const MATCHES_TITLE: Locator = Locator::id("com.bumble.app:id/connections_expiringConnectionsTitle");

/// Horizontal rail of new (expiring) matches.
pub const MATCHES_RAIL: Locator = Locator::id("com.bumble.app:id/connections_connectionsListExpiring");

/// One match entry inside the rail (content-desc carries the match name).
pub const MATCH_ITEM: Locator =
	Locator::xpath(".//android.widget.Button[@resource-id='com.bumble.app:id/connectionItem_ringView']");

/// Main conversation list below the rail.
pub const CHAT_LIST: Locator = Locator::id("com.bumble.app:id/connections_connectionsList");

/// Spotlight promo card that replaces the rail when no new matches exist.
pub const SPOTLIGHT_PROMO: Locator =
	Locator::xpath("//*[contains(@text, 'Spotlight is the easiest way')]");

/// "Opening Moves" setup promo card, same placement.
pub const OPENING_MOVES_PROMO: Locator =
	Locator::xpath("//*[contains(@text, 'Get to good conversation, faster')]");

/// Container of the "Opening Move" interstitial shown before a first chat.
pub const OPENING_MOVE_SCREEN: Locator = Locator::id("com.bumble.app:id/initialChatV3_container");

/// Reply affordance on the "Opening Move" interstitial.
pub const OPENING_MOVE_REPLY: Locator = Locator::xpath(
	"//android.view.View[@clickable='true' and .//android.widget.TextView[@text='Reply']]",
);

/// Message input field of an individual chat.
pub const CHAT_INPUT: Locator = Locator::id("com.bumble.app:id/chatInput_text");

/// Send button (appears once the input is non-empty).
pub const CHAT_SEND: Locator = Locator::xpath("//*[@content-desc='Send' and @clickable='true']");

/// Toolbar title of an individual chat (the match's name).
pub const CHAT_TITLE: Locator = Locator::id("com.bumble.app:id/chatToolbar_title");

#[cfg(test)]
mod tests {
	use super::*;
	use swipr_protocol::Strategy;

	#[test]
	fn nav_tab_embeds_label() {
		let locator = nav_tab("Liked You");
		assert_eq!(locator.strategy, Strategy::XPath);
		assert!(locator.selector.contains("@content-desc='Liked You'"));
	}

	#[test]
	fn table_entries_are_static() {
		assert_eq!(NAV_BAR.strategy, Strategy::Id);
		assert_eq!(PROMO_CLOSE.strategy, Strategy::AccessibilityId);
		assert!(FILTERS_PROMPT.selector.contains("seen everyone nearby"));
	}
}
