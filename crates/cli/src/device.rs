//! Device descriptors.

use serde::Serialize;

/// How a phone is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
	/// Remote cloud phone from the provisioning API.
	Cloud,
	/// Locally tethered ADB device.
	Local,
}

impl std::fmt::Display for Connectivity {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Connectivity::Cloud => f.write_str("cloud"),
			Connectivity::Local => f.write_str("local"),
		}
	}
}

/// One phone as presented to the user and the run commands.
///
/// Read-only during a session; sourced from the provisioning API or from
/// `adb devices`.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceDescriptor {
	pub id: String,
	pub name: String,
	pub brand: String,
	pub model: String,
	pub connectivity: Connectivity,
}

impl DeviceDescriptor {
	/// Picks the requested device from `devices`, or the first one when no
	/// id was requested.
	pub fn select(devices: Vec<DeviceDescriptor>, requested: Option<&str>) -> Option<DeviceDescriptor> {
		match requested {
			Some(id) => devices.into_iter().find(|d| d.id == id),
			None => devices.into_iter().next(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn device(id: &str) -> DeviceDescriptor {
		DeviceDescriptor {
			id: id.into(),
			name: format!("Phone {id}"),
			brand: "samsung".into(),
			model: "SM-S901B".into(),
			connectivity: Connectivity::Cloud,
		}
	}

	#[test]
	fn select_by_id() {
		let picked = DeviceDescriptor::select(vec![device("a"), device("b")], Some("b")).unwrap();
		assert_eq!(picked.id, "b");
	}

	#[test]
	fn select_first_when_unspecified() {
		let picked = DeviceDescriptor::select(vec![device("a"), device("b")], None).unwrap();
		assert_eq!(picked.id, "a");
	}

	#[test]
	fn select_unknown_id_is_none() {
		assert!(DeviceDescriptor::select(vec![device("a")], Some("zz")).is_none());
	}
}
