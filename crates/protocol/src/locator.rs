//! Element-lookup queries.
//!
//! A [`Locator`] pairs a lookup [`Strategy`] with a selector string. Static
//! screen tables hold borrowed selectors in `const` context; selectors built
//! at runtime (e.g. an XPath parameterized by a tab label) are owned.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Element-lookup strategy understood by the automation server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
	/// Android resource id, e.g. `com.example.app:id/toolbar`.
	#[serde(rename = "id")]
	Id,
	/// Accessibility id (`content-desc` on Android).
	#[serde(rename = "accessibility id")]
	AccessibilityId,
	/// XPath over the UI hierarchy dump.
	#[serde(rename = "xpath")]
	XPath,
	/// Widget class name, e.g. `android.widget.Button`.
	#[serde(rename = "class name")]
	ClassName,
}

/// A query selecting a UI element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
	pub strategy: Strategy,
	pub selector: Cow<'static, str>,
}

impl Locator {
	/// Resource-id locator.
	pub const fn id(selector: &'static str) -> Self {
		Self { strategy: Strategy::Id, selector: Cow::Borrowed(selector) }
	}

	/// Accessibility-id locator.
	pub const fn accessibility(selector: &'static str) -> Self {
		Self { strategy: Strategy::AccessibilityId, selector: Cow::Borrowed(selector) }
	}

	/// XPath locator.
	pub const fn xpath(selector: &'static str) -> Self {
		Self { strategy: Strategy::XPath, selector: Cow::Borrowed(selector) }
	}

	/// Class-name locator.
	pub const fn class_name(selector: &'static str) -> Self {
		Self { strategy: Strategy::ClassName, selector: Cow::Borrowed(selector) }
	}

	/// XPath locator built at runtime.
	pub fn xpath_owned(selector: String) -> Self {
		Self { strategy: Strategy::XPath, selector: Cow::Owned(selector) }
	}

	/// Wire form of a find-element request body.
	pub fn to_request(&self) -> FindRequest {
		FindRequest {
			using: self.strategy,
			value: self.selector.clone().into_owned(),
		}
	}
}

impl std::fmt::Display for Locator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let strategy = match self.strategy {
			Strategy::Id => "id",
			Strategy::AccessibilityId => "accessibility id",
			Strategy::XPath => "xpath",
			Strategy::ClassName => "class name",
		};
		write!(f, "{strategy}={}", self.selector)
	}
}

/// Body of `POST /session/{id}/element`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindRequest {
	pub using: Strategy,
	pub value: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn find_request_wire_shape() {
		let locator = Locator::accessibility("Chats");
		let json = serde_json::to_value(locator.to_request()).unwrap();
		assert_eq!(json, serde_json::json!({ "using": "accessibility id", "value": "Chats" }));
	}

	#[test]
	fn locator_is_const_constructible() {
		const NAV: Locator = Locator::id("com.example:id/navBar");
		assert_eq!(NAV.strategy, Strategy::Id);
	}

	#[test]
	fn owned_xpath_round_trips() {
		let locator = Locator::xpath_owned(format!("//*[@content-desc='{}']", "Chats"));
		assert_eq!(locator.to_request().value, "//*[@content-desc='Chats']");
	}

	#[test]
	fn display_includes_strategy_and_selector() {
		let locator = Locator::xpath("//android.widget.Button");
		assert_eq!(locator.to_string(), "xpath=//android.widget.Button");
	}
}
