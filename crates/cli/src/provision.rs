//! Cloud-phone provisioning client.
//!
//! JSON over HTTPS with signed headers: every request carries a UUIDv4
//! trace id, a millisecond timestamp, a nonce (first six characters of the
//! trace id), and an uppercase hex SHA-256 over
//! `app_id + trace_id + ts + nonce + api_key`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::ProvisionConfig;
use crate::device::{Connectivity, DeviceDescriptor};
use crate::error::{CliError, Result};

/// Phone status codes reported by the provisioning API.
pub mod status {
	pub const STARTED: i64 = 0;
	pub const STARTING: i64 = 1;
	pub const SHUT_DOWN: i64 = 2;
	pub const EXPIRED: i64 = 3;
}

/// Signed-request client for the provisioning API.
#[derive(Debug, Clone)]
pub struct ProvisionClient {
	http: reqwest::Client,
	config: ProvisionConfig,
}

/// Response envelope every endpoint uses.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ApiResponse<T> {
	code: i64,
	#[serde(default)]
	msg: Option<String>,
	#[serde(default)]
	data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PhonePage {
	#[serde(default)]
	items: Vec<CloudPhone>,
}

/// One cloud phone as listed by the API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudPhone {
	pub id: String,
	#[serde(default)]
	pub serial_name: Option<String>,
	#[serde(default)]
	pub remark: Option<String>,
	#[serde(default)]
	pub equipment_info: Option<EquipmentInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentInfo {
	#[serde(default)]
	pub device_brand: Option<String>,
	#[serde(default)]
	pub device_model: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusPage {
	#[serde(default)]
	success_details: Vec<PhoneStatus>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhoneStatus {
	pub id: String,
	pub status: i64,
}

#[derive(Debug, Deserialize)]
struct AdbPage {
	#[serde(default)]
	items: Vec<AdbInfo>,
}

/// ADB connection credentials for one cloud phone.
#[derive(Debug, Clone, Deserialize)]
pub struct AdbInfo {
	/// 0 when the record is ready.
	pub code: i64,
	pub id: String,
	#[serde(default)]
	pub ip: Option<String>,
	#[serde(default)]
	pub port: Option<String>,
	#[serde(default)]
	pub pwd: Option<String>,
}

impl AdbInfo {
	pub fn is_ready(&self) -> bool {
		self.code == 0 && self.ip.is_some() && self.port.is_some()
	}

	/// `ip:port` connect address.
	pub fn address(&self) -> Option<String> {
		Some(format!("{}:{}", self.ip.as_deref()?, self.port.as_deref()?))
	}
}

/// Uppercase hex SHA-256 over the concatenated signing material.
pub fn sign(app_id: &str, trace_id: &str, ts: &str, nonce: &str, api_key: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(app_id.as_bytes());
	hasher.update(trace_id.as_bytes());
	hasher.update(ts.as_bytes());
	hasher.update(nonce.as_bytes());
	hasher.update(api_key.as_bytes());
	format!("{:X}", hasher.finalize())
}

impl ProvisionClient {
	pub fn new(config: ProvisionConfig) -> Result<Self> {
		let http = reqwest::Client::builder()
			.connect_timeout(Duration::from_secs(10))
			.timeout(Duration::from_secs(60))
			.build()?;
		Ok(Self { http, config })
	}

	fn signed_headers(&self) -> HeaderMap {
		let trace_id = uuid::Uuid::new_v4().to_string();
		let ts = std::time::SystemTime::now()
			.duration_since(std::time::UNIX_EPOCH)
			.map(|d| d.as_millis())
			.unwrap_or(0)
			.to_string();
		let nonce: String = trace_id.chars().take(6).collect();
		let signature = sign(&self.config.app_id, &trace_id, &ts, &nonce, &self.config.api_key);

		let mut headers = HeaderMap::new();
		let mut put = |name: &'static str, value: &str| {
			if let Ok(value) = HeaderValue::from_str(value) {
				headers.insert(name, value);
			}
		};
		put("appId", &self.config.app_id);
		put("traceId", &trace_id);
		put("ts", &ts);
		put("nonce", &nonce);
		put("sign", &signature);
		headers
	}

	async fn call<T: DeserializeOwned>(&self, path: &str, body: serde_json::Value) -> Result<T> {
		let url = format!("{}{path}", self.config.base_url.trim_end_matches('/'));
		debug!(target = "swipr.provision", %url, "provisioning request");

		let response = self
			.http
			.post(&url)
			.headers(self.signed_headers())
			.json(&body)
			.send()
			.await?
			.error_for_status()?;

		let envelope: ApiResponse<T> = response.json().await?;
		if envelope.code != 0 {
			return Err(CliError::Provision {
				code: envelope.code,
				message: envelope.msg.unwrap_or_else(|| "unknown error".to_string()),
			});
		}
		envelope.data.ok_or(CliError::Provision {
			code: 0,
			message: "response carried no data".to_string(),
		})
	}

	/// All phones on the account (first page, up to 100).
	pub async fn list_phones(&self) -> Result<Vec<CloudPhone>> {
		let page: PhonePage = self
			.call("/open/v1/phone/list", json!({ "page": 1, "pageSize": 100 }))
			.await?;
		Ok(page.items)
	}

	/// Phones not remarked as inactive, as device descriptors.
	pub async fn available_devices(&self) -> Result<Vec<DeviceDescriptor>> {
		let phones = self.list_phones().await?;
		Ok(phones
			.into_iter()
			.filter(|phone| {
				!phone
					.remark
					.as_deref()
					.unwrap_or_default()
					.to_lowercase()
					.contains("inactive")
			})
			.map(describe)
			.collect())
	}

	pub async fn start_phone(&self, ids: &[&str]) -> Result<()> {
		let _: serde_json::Value = self.call("/open/v1/phone/start", json!({ "ids": ids })).await?;
		info!(target = "swipr.provision", ?ids, "phone start requested");
		Ok(())
	}

	pub async fn stop_phone(&self, ids: &[&str]) -> Result<()> {
		let _: serde_json::Value = self.call("/open/v1/phone/stop", json!({ "ids": ids })).await?;
		info!(target = "swipr.provision", ?ids, "phone stop requested");
		Ok(())
	}

	pub async fn phone_status(&self, ids: &[&str]) -> Result<Vec<PhoneStatus>> {
		let page: StatusPage = self.call("/open/v1/phone/status", json!({ "ids": ids })).await?;
		Ok(page.success_details)
	}

	pub async fn adb_info(&self, ids: &[&str]) -> Result<Vec<AdbInfo>> {
		let page: AdbPage = self.call("/open/v1/adb/getData", json!({ "ids": ids })).await?;
		Ok(page.items)
	}

	/// Starts the phone and polls until it reports started.
	///
	/// Shut-down and expired phones abort immediately; anything else keeps
	/// polling on a fixed interval until `timeout`.
	pub async fn wait_until_started(&self, id: &str, timeout: Duration) -> Result<()> {
		self.start_phone(&[id]).await?;

		let poll_interval = Duration::from_secs(3);
		let deadline = tokio::time::Instant::now() + timeout;
		loop {
			let statuses = self.phone_status(&[id]).await?;
			let Some(current) = statuses.first() else {
				return Err(CliError::PhoneUnavailable { id: id.to_string(), status: -1 });
			};
			match current.status {
				status::STARTED => {
					info!(target = "swipr.provision", id, "phone started");
					return Ok(());
				}
				status::SHUT_DOWN | status::EXPIRED => {
					return Err(CliError::PhoneUnavailable {
						id: id.to_string(),
						status: current.status,
					});
				}
				other => {
					debug!(target = "swipr.provision", id, status = other, "waiting for phone to start");
				}
			}
			if tokio::time::Instant::now() + poll_interval > deadline {
				warn!(target = "swipr.provision", id, "phone did not start in time");
				return Err(CliError::PhoneUnavailable { id: id.to_string(), status: status::STARTING });
			}
			tokio::time::sleep(poll_interval).await;
		}
	}

	/// ADB credentials for one phone, erroring when not yet ready.
	pub async fn ready_adb_info(&self, id: &str) -> Result<AdbInfo> {
		let infos = self.adb_info(&[id]).await?;
		let info = infos
			.into_iter()
			.find(|info| info.id == id)
			.ok_or_else(|| CliError::Provision {
				code: -1,
				message: format!("no adb record for phone {id}"),
			})?;
		if !info.is_ready() {
			return Err(CliError::Provision {
				code: info.code,
				message: format!("adb information for phone {id} not ready"),
			});
		}
		Ok(info)
	}
}

fn describe(phone: CloudPhone) -> DeviceDescriptor {
	let equipment = phone.equipment_info.unwrap_or(EquipmentInfo {
		device_brand: None,
		device_model: None,
	});
	DeviceDescriptor {
		name: phone.serial_name.unwrap_or_else(|| "Unknown".to_string()),
		brand: equipment.device_brand.unwrap_or_else(|| "Unknown".to_string()),
		model: equipment.device_model.unwrap_or_else(|| "Unknown".to_string()),
		id: phone.id,
		connectivity: Connectivity::Cloud,
	}
}
