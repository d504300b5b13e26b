//! Error types for the automation-driver runtime.

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the automation server.
#[derive(Debug, Error)]
pub enum Error {
	/// The automation server base URL could not be parsed.
	#[error("Invalid automation server URL: {0}")]
	InvalidUrl(String),

	/// Failed to reach the automation server at all.
	#[error("Failed to connect to automation server: {0}")]
	ConnectionFailed(String),

	/// Transport-level HTTP error.
	#[error("Transport error: {0}")]
	Transport(#[from] reqwest::Error),

	/// Error payload reported by the automation server.
	#[error("{code}: {message}")]
	Driver {
		/// Stable wire error code, e.g. `"no such element"`.
		code: String,
		/// Human-readable message from the server.
		message: String,
		/// Server-side stacktrace when provided.
		stacktrace: Option<String>,
	},

	/// The session no longer exists on the server.
	#[error("Session closed: {0}")]
	SessionClosed(String),

	/// Response body did not match the expected envelope shape.
	#[error("Unexpected response: {0}")]
	UnexpectedResponse(String),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// Screenshot payload was not valid base64.
	#[error("Screenshot decode failed: {0}")]
	ScreenshotDecode(#[from] base64::DecodeError),
}

impl Error {
	/// Builds a [`Error::Driver`] or [`Error::SessionClosed`] from a wire
	/// error payload.
	pub(crate) fn from_wire(err: swipr_protocol::WireError) -> Self {
		if err.error == "invalid session id" {
			return Error::SessionClosed(err.message);
		}
		Error::Driver {
			code: err.error,
			message: err.message,
			stacktrace: err.stacktrace,
		}
	}

	/// True when the server reported that no element matched a locator.
	///
	/// Callers treat this as expected absence, not a failure.
	pub fn is_no_such_element(&self) -> bool {
		matches!(self, Error::Driver { code, .. } if code == "no such element")
	}

	/// True when the element reference went stale between lookup and use.
	pub fn is_stale_element(&self) -> bool {
		matches!(self, Error::Driver { code, .. } if code == "stale element reference")
	}

	/// True when the session is gone and every further call will fail.
	pub fn is_session_gone(&self) -> bool {
		matches!(self, Error::SessionClosed(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use swipr_protocol::WireError;

	#[test]
	fn no_such_element_is_classified() {
		let err = Error::from_wire(WireError {
			error: "no such element".into(),
			message: "could not locate".into(),
			stacktrace: None,
		});
		assert!(err.is_no_such_element());
		assert!(!err.is_session_gone());
	}

	#[test]
	fn invalid_session_maps_to_session_closed() {
		let err = Error::from_wire(WireError {
			error: "invalid session id".into(),
			message: "session deleted".into(),
			stacktrace: None,
		});
		assert!(err.is_session_gone());
	}

	#[test]
	fn stale_element_is_classified() {
		let err = Error::from_wire(WireError {
			error: "stale element reference".into(),
			message: "element is detached".into(),
			stacktrace: Some("trace".into()),
		});
		assert!(err.is_stale_element());
		assert!(!err.is_no_such_element());
	}
}
