//! HTTP connection to the automation server.
//!
//! One [`Connection`] per server: it owns the `reqwest` client and the base
//! URL, and decodes the `value` envelope every endpoint wraps its payload
//! in. Driver-reported failures are surfaced as [`Error::Driver`] (or
//! [`Error::SessionClosed`]) so callers can classify them without touching
//! HTTP status codes.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use swipr_protocol::{ValueEnvelope, WireError};
use tracing::trace;
use url::Url;

use crate::error::{Error, Result};

/// HTTP client bound to one automation server.
#[derive(Debug, Clone)]
pub struct Connection {
	http: reqwest::Client,
	base: Url,
}

impl Connection {
	/// Creates a connection to the server at `base_url`, e.g.
	/// `http://127.0.0.1:4723`.
	pub fn new(base_url: &str) -> Result<Self> {
		let base = Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{base_url}: {e}")))?;
		let http = reqwest::Client::builder()
			.connect_timeout(Duration::from_secs(10))
			.timeout(Duration::from_secs(300))
			.build()?;
		Ok(Self { http, base })
	}

	/// Base URL this connection talks to.
	pub fn base_url(&self) -> &Url {
		&self.base
	}

	pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
		let url = self.endpoint(path)?;
		trace!(target = "swipr.wire", %url, "GET");
		let response = self.http.get(url).send().await.map_err(classify_send_error)?;
		decode(response).await
	}

	pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
		let url = self.endpoint(path)?;
		trace!(target = "swipr.wire", %url, "POST");
		let response = self
			.http
			.post(url)
			.json(body)
			.send()
			.await
			.map_err(classify_send_error)?;
		decode(response).await
	}

	pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
		let url = self.endpoint(path)?;
		trace!(target = "swipr.wire", %url, "DELETE");
		let response = self.http.delete(url).send().await.map_err(classify_send_error)?;
		decode(response).await
	}

	fn endpoint(&self, path: &str) -> Result<Url> {
		self.base
			.join(path)
			.map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))
	}
}

fn classify_send_error(err: reqwest::Error) -> Error {
	if err.is_connect() {
		Error::ConnectionFailed(err.to_string())
	} else {
		Error::Transport(err)
	}
}

/// Unwraps the `value` envelope, mapping error payloads to [`Error`].
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
	let status = response.status();
	let body = response.bytes().await?;

	if status.is_success() {
		let envelope: ValueEnvelope<T> = serde_json::from_slice(&body)
			.map_err(|e| Error::UnexpectedResponse(format!("status {status}: {e}")))?;
		return Ok(envelope.value);
	}

	match serde_json::from_slice::<ValueEnvelope<WireError>>(&body) {
		Ok(envelope) => Err(Error::from_wire(envelope.value)),
		Err(_) => Err(Error::UnexpectedResponse(format!(
			"status {status}: {}",
			String::from_utf8_lossy(&body)
		))),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn endpoint_joins_relative_paths() {
		let conn = Connection::new("http://127.0.0.1:4723").unwrap();
		let url = conn.endpoint("session/abc/element").unwrap();
		assert_eq!(url.as_str(), "http://127.0.0.1:4723/session/abc/element");
	}

	#[test]
	fn invalid_base_url_is_rejected() {
		assert!(matches!(Connection::new("not a url"), Err(Error::InvalidUrl(_))));
	}
}
