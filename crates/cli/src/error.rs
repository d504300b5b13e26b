use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("configuration error: {0}")]
	Config(String),

	#[error("no usable device found{}", match hint { Some(h) => format!(": {h}"), None => String::new() })]
	NoDevice { hint: Option<String> },

	#[error("provisioning API error (code {code}): {message}")]
	Provision { code: i64, message: String },

	#[error("provisioning request failed: {0}")]
	ProvisionTransport(#[from] reqwest::Error),

	#[error("adb failed: {0}")]
	Adb(String),

	#[error("phone {id} is not available (status {status})")]
	PhoneUnavailable { id: String, status: i64 },

	#[error(transparent)]
	Bot(#[from] swipr::Error),

	#[error(transparent)]
	Runtime(#[from] swipr_runtime::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),
}
