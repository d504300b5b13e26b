//! Session capability payloads.

use serde::{Deserialize, Serialize};

/// Capabilities sent when creating an automation session.
///
/// Vendor-specific entries carry the `appium:` prefix on the wire, matching
/// what the UiAutomator2 server expects. Everything here is static
/// configuration resolved before the session starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
	pub platform_name: String,
	#[serde(rename = "appium:automationName")]
	pub automation_name: String,
	#[serde(rename = "appium:platformVersion", skip_serializing_if = "Option::is_none")]
	pub platform_version: Option<String>,
	#[serde(rename = "appium:deviceName", skip_serializing_if = "Option::is_none")]
	pub device_name: Option<String>,
	#[serde(rename = "appium:udid", skip_serializing_if = "Option::is_none")]
	pub udid: Option<String>,
	#[serde(rename = "appium:appPackage")]
	pub app_package: String,
	#[serde(rename = "appium:appActivity", skip_serializing_if = "Option::is_none")]
	pub app_activity: Option<String>,
	#[serde(rename = "appium:noReset")]
	pub no_reset: bool,
	#[serde(rename = "appium:autoGrantPermissions")]
	pub auto_grant_permissions: bool,
	#[serde(rename = "appium:newCommandTimeout", skip_serializing_if = "Option::is_none")]
	pub new_command_timeout: Option<u64>,
	#[serde(rename = "appium:systemPort", skip_serializing_if = "Option::is_none")]
	pub system_port: Option<u16>,
	#[serde(
		rename = "appium:uiautomator2ServerInstallTimeout",
		skip_serializing_if = "Option::is_none"
	)]
	pub server_install_timeout: Option<u64>,
}

impl Capabilities {
	/// Baseline Android capabilities for automating `app_package`.
	pub fn android(app_package: impl Into<String>) -> Self {
		Self {
			platform_name: "Android".into(),
			automation_name: "UiAutomator2".into(),
			platform_version: None,
			device_name: None,
			udid: None,
			app_package: app_package.into(),
			app_activity: None,
			no_reset: true,
			auto_grant_permissions: true,
			new_command_timeout: Some(300),
			system_port: None,
			server_install_timeout: Some(220_000),
		}
	}

	pub fn with_platform_version(mut self, version: impl Into<String>) -> Self {
		self.platform_version = Some(version.into());
		self
	}

	pub fn with_device(mut self, name: impl Into<String>) -> Self {
		let name = name.into();
		self.udid = Some(name.clone());
		self.device_name = Some(name);
		self
	}

	pub fn with_app_activity(mut self, activity: impl Into<String>) -> Self {
		self.app_activity = Some(activity.into());
		self
	}

	/// Per-device server port, required when several sessions share a host.
	pub fn with_system_port(mut self, port: u16) -> Self {
		self.system_port = Some(port);
		self
	}
}

/// Body of `POST /session`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSessionRequest {
	pub capabilities: CapabilitiesWrapper,
}

/// W3C `alwaysMatch`/`firstMatch` wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilitiesWrapper {
	#[serde(rename = "alwaysMatch")]
	pub always_match: Capabilities,
	#[serde(rename = "firstMatch")]
	pub first_match: Vec<serde_json::Value>,
}

impl NewSessionRequest {
	pub fn new(capabilities: Capabilities) -> Self {
		Self {
			capabilities: CapabilitiesWrapper {
				always_match: capabilities,
				first_match: vec![serde_json::json!({})],
			},
		}
	}
}

/// `value` payload of a successful session creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionValue {
	pub session_id: super::SessionId,
	#[serde(default)]
	pub capabilities: serde_json::Value,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn capabilities_wire_shape_uses_vendor_prefix() {
		let caps = Capabilities::android("com.example.app")
			.with_device("emulator-5554")
			.with_platform_version("13")
			.with_system_port(8201);
		let json = serde_json::to_value(&caps).unwrap();

		assert_eq!(json["platformName"], "Android");
		assert_eq!(json["appium:automationName"], "UiAutomator2");
		assert_eq!(json["appium:appPackage"], "com.example.app");
		assert_eq!(json["appium:udid"], "emulator-5554");
		assert_eq!(json["appium:systemPort"], 8201);
		assert_eq!(json["appium:noReset"], true);
		// unset optionals stay off the wire
		assert!(json.get("appium:appActivity").is_none());
	}

	#[test]
	fn new_session_request_wraps_always_match() {
		let request = NewSessionRequest::new(Capabilities::android("com.example.app"));
		let json = serde_json::to_value(&request).unwrap();
		assert!(json["capabilities"]["alwaysMatch"].is_object());
		assert_eq!(json["capabilities"]["firstMatch"], serde_json::json!([{}]));
	}

	#[test]
	fn new_session_value_decodes() {
		let json = r#"{"sessionId": "abc-123", "capabilities": {}}"#;
		let value: NewSessionValue = serde_json::from_str(json).unwrap();
		assert_eq!(value.session_id.0, "abc-123");
	}
}
