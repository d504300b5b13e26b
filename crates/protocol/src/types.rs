//! Core protocol types used across the wire.
//!
//! These types represent primitive values and envelopes used by the
//! automation server's HTTP endpoints.

use serde::{Deserialize, Serialize};

/// Identifier of a live driver session, as returned by session creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl std::fmt::Display for SessionId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// The W3C element-identifier key used in element responses.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Reference to a UI element located within a session.
///
/// The wire form is an object with the single W3C element key; older servers
/// additionally echo a legacy `ELEMENT` key, which is ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
	#[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
	pub id: String,
}

/// Every endpoint wraps its payload in a `value` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueEnvelope<T> {
	pub value: T,
}

/// Error payload the server returns inside the `value` envelope on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireError {
	/// Stable error code, e.g. `"no such element"` or `"invalid session id"`.
	pub error: String,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stacktrace: Option<String>,
}

/// Window (screen) rectangle in physical pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowRect {
	pub x: i32,
	pub y: i32,
	pub width: u32,
	pub height: u32,
}

/// Element rectangle in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementRect {
	pub x: i32,
	pub y: i32,
	pub width: u32,
	pub height: u32,
}

impl ElementRect {
	/// Center point of the rectangle.
	pub fn center(&self) -> (i32, i32) {
		(self.x + self.width as i32 / 2, self.y + self.height as i32 / 2)
	}
}

/// Application run state as reported by the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum AppState {
	/// Not installed.
	NotInstalled,
	/// Installed but not running.
	#[default]
	NotRunning,
	/// Running in background (suspended).
	BackgroundSuspended,
	/// Running in background.
	Background,
	/// Running in foreground.
	Foreground,
}

impl From<u8> for AppState {
	fn from(v: u8) -> Self {
		match v {
			0 => AppState::NotInstalled,
			1 => AppState::NotRunning,
			2 => AppState::BackgroundSuspended,
			3 => AppState::Background,
			_ => AppState::Foreground,
		}
	}
}

impl From<AppState> for u8 {
	fn from(v: AppState) -> u8 {
		match v {
			AppState::NotInstalled => 0,
			AppState::NotRunning => 1,
			AppState::BackgroundSuspended => 2,
			AppState::Background => 3,
			AppState::Foreground => 4,
		}
	}
}

impl AppState {
	/// True when the app is the foreground activity.
	pub fn is_foreground(self) -> bool {
		matches!(self, AppState::Foreground)
	}
}

/// Android key codes used by the bot.
pub mod keycode {
	/// Hardware back key.
	pub const BACK: u32 = 4;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn element_ref_deserializes_w3c_key() {
		let json = r#"{"element-6066-11e4-a52e-4f735466cecf": "42.17"}"#;
		let el: ElementRef = serde_json::from_str(json).unwrap();
		assert_eq!(el.id, "42.17");
	}

	#[test]
	fn app_state_round_trip() {
		let state: AppState = serde_json::from_str("4").unwrap();
		assert!(state.is_foreground());
		let state: AppState = serde_json::from_str("1").unwrap();
		assert_eq!(state, AppState::NotRunning);
	}

	#[test]
	fn wire_error_decodes_without_stacktrace() {
		let json = r#"{"error": "no such element", "message": "not found"}"#;
		let err: WireError = serde_json::from_str(json).unwrap();
		assert_eq!(err.error, "no such element");
		assert!(err.stacktrace.is_none());
	}

	#[test]
	fn element_rect_center() {
		let rect = ElementRect { x: 100, y: 200, width: 40, height: 20 };
		assert_eq!(rect.center(), (120, 210));
	}
}
