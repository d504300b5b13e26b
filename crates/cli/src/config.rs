//! Environment-sourced configuration.

use crate::error::{CliError, Result};

/// Default provisioning API endpoint.
const DEFAULT_PROVISION_URL: &str = "https://openapi.geelark.com";

/// Credentials and endpoint for the cloud-phone provisioning API.
///
/// Sourced from the environment: `SWIPR_APP_ID`, `SWIPR_API_KEY`, and
/// optionally `SWIPR_PROVISION_URL`.
#[derive(Debug, Clone)]
pub struct ProvisionConfig {
	pub app_id: String,
	pub api_key: String,
	pub base_url: String,
}

impl ProvisionConfig {
	pub fn from_env() -> Result<Self> {
		let app_id = require_env("SWIPR_APP_ID")?;
		let api_key = require_env("SWIPR_API_KEY")?;
		let base_url =
			std::env::var("SWIPR_PROVISION_URL").unwrap_or_else(|_| DEFAULT_PROVISION_URL.to_string());
		Ok(Self { app_id, api_key, base_url })
	}
}

fn require_env(name: &str) -> Result<String> {
	match std::env::var(name) {
		Ok(value) if !value.trim().is_empty() => Ok(value),
		_ => Err(CliError::Config(format!("{name} is not set"))),
	}
}
