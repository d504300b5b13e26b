//! Driver session: one live automation connection to one phone.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::json;
use swipr_protocol::{
	ActionsRequest, AppState, Capabilities, ElementRect, ElementRef, Locator, NewSessionRequest,
	NewSessionValue, PointerSequence, SessionId, WindowRect, keycode,
};
use tracing::{debug, warn};

use crate::connection::Connection;
use crate::error::{Error, Result};

/// A live driver session bound to one device.
///
/// Owns the session id for its lifetime; [`DriverSession::quit`] consumes
/// the handle so a torn-down session cannot be reused. Element lookups are
/// single-shot: absence comes back as `Ok(None)` rather than an error, per
/// the expected-absence error taxonomy.
#[derive(Debug)]
pub struct DriverSession {
	conn: Connection,
	id: SessionId,
}

impl DriverSession {
	/// Creates a session on the server at `server_url` with the given
	/// capabilities.
	pub async fn create(server_url: &str, capabilities: &Capabilities) -> Result<Self> {
		let conn = Connection::new(server_url)?;
		let request = NewSessionRequest::new(capabilities.clone());
		let value: NewSessionValue = conn.post("session", &request).await?;
		debug!(
			target = "swipr.session",
			session = %value.session_id,
			server = %conn.base_url(),
			"driver session created"
		);
		Ok(Self { conn, id: value.session_id })
	}

	/// Session id assigned by the server.
	pub fn id(&self) -> &SessionId {
		&self.id
	}

	/// Finds the first element matching `locator`.
	///
	/// Returns `Ok(None)` when nothing matches; every other driver failure
	/// is an error.
	pub async fn find_element(&self, locator: &Locator) -> Result<Option<ElementRef>> {
		let path = format!("session/{}/element", self.id);
		match self.conn.post::<_, ElementRef>(&path, &locator.to_request()).await {
			Ok(element) => Ok(Some(element)),
			Err(err) if err.is_no_such_element() => Ok(None),
			Err(err) => Err(err),
		}
	}

	/// Finds all elements matching `locator` (empty when none match).
	pub async fn find_elements(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
		let path = format!("session/{}/elements", self.id);
		self.conn.post(&path, &locator.to_request()).await
	}

	/// Finds all elements matching `locator` beneath `parent`.
	pub async fn find_elements_within(
		&self,
		parent: &ElementRef,
		locator: &Locator,
	) -> Result<Vec<ElementRef>> {
		let path = format!("session/{}/element/{}/elements", self.id, parent.id);
		self.conn.post(&path, &locator.to_request()).await
	}

	pub async fn click(&self, element: &ElementRef) -> Result<()> {
		let path = format!("session/{}/element/{}/click", self.id, element.id);
		let _: serde_json::Value = self.conn.post(&path, &json!({})).await?;
		Ok(())
	}

	pub async fn text(&self, element: &ElementRef) -> Result<String> {
		let path = format!("session/{}/element/{}/text", self.id, element.id);
		self.conn.get(&path).await
	}

	/// Reads an attribute; `None` when the attribute is unset.
	pub async fn attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>> {
		let path = format!("session/{}/element/{}/attribute/{name}", self.id, element.id);
		self.conn.get(&path).await
	}

	pub async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
		let path = format!("session/{}/element/{}/displayed", self.id, element.id);
		self.conn.get(&path).await
	}

	pub async fn rect(&self, element: &ElementRef) -> Result<ElementRect> {
		let path = format!("session/{}/element/{}/rect", self.id, element.id);
		self.conn.get(&path).await
	}

	/// Types `text` into the element.
	pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
		let path = format!("session/{}/element/{}/value", self.id, element.id);
		let _: serde_json::Value = self.conn.post(&path, &json!({ "text": text })).await?;
		Ok(())
	}

	pub async fn clear(&self, element: &ElementRef) -> Result<()> {
		let path = format!("session/{}/element/{}/clear", self.id, element.id);
		let _: serde_json::Value = self.conn.post(&path, &json!({})).await?;
		Ok(())
	}

	/// Performs a synthesized touch gesture.
	pub async fn perform(&self, sequence: PointerSequence) -> Result<()> {
		let path = format!("session/{}/actions", self.id);
		let request: ActionsRequest = sequence.into_request();
		let _: serde_json::Value = self.conn.post(&path, &request).await?;
		Ok(())
	}

	/// Current window (screen) rectangle.
	pub async fn window_rect(&self) -> Result<WindowRect> {
		let path = format!("session/{}/window/rect", self.id);
		self.conn.get(&path).await
	}

	/// Queries the run state of `package` on the device.
	pub async fn app_state(&self, package: &str) -> Result<AppState> {
		let path = format!("session/{}/appium/device/app_state", self.id);
		self.conn.post(&path, &json!({ "appId": package })).await
	}

	/// Brings `package` to the foreground.
	pub async fn activate_app(&self, package: &str) -> Result<()> {
		let path = format!("session/{}/appium/device/activate_app", self.id);
		let _: serde_json::Value = self.conn.post(&path, &json!({ "appId": package })).await?;
		Ok(())
	}

	/// Presses the hardware back key.
	pub async fn press_back(&self) -> Result<()> {
		self.press_keycode(keycode::BACK).await
	}

	pub async fn press_keycode(&self, code: u32) -> Result<()> {
		let path = format!("session/{}/appium/device/press_keycode", self.id);
		let _: serde_json::Value = self.conn.post(&path, &json!({ "keycode": code })).await?;
		Ok(())
	}

	/// Captures a PNG screenshot of the current screen.
	pub async fn screenshot(&self) -> Result<Vec<u8>> {
		let path = format!("session/{}/screenshot", self.id);
		let encoded: String = self.conn.get(&path).await?;
		Ok(BASE64.decode(encoded.as_bytes())?)
	}

	/// Dumps the current UI hierarchy as XML.
	pub async fn page_source(&self) -> Result<String> {
		let path = format!("session/{}/source", self.id);
		self.conn.get(&path).await
	}

	/// Tears the session down on the server.
	///
	/// Consumes the handle; a failure is logged and returned but the handle
	/// is gone either way.
	pub async fn quit(self) -> Result<()> {
		let path = format!("session/{}", self.id);
		match self.conn.delete::<serde_json::Value>(&path).await {
			Ok(_) => {
				debug!(target = "swipr.session", session = %self.id, "driver session deleted");
				Ok(())
			}
			Err(err) if err.is_session_gone() => Ok(()),
			Err(err) => {
				warn!(target = "swipr.session", session = %self.id, error = %err, "session teardown failed");
				Err(err)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn base64_screenshot_decoding() {
		let encoded = BASE64.encode(b"\x89PNG\r\n");
		let decoded = BASE64.decode(encoded.as_bytes()).unwrap();
		assert_eq!(&decoded, b"\x89PNG\r\n");
	}

	#[test]
	fn keycode_back_is_android_back() {
		assert_eq!(keycode::BACK, 4);
	}
}
