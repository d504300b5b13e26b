use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions that abort an automation loop.
///
/// Recoverable situations (element absent, navigation verify failed, popup
/// unhandled) are expressed as `Option`/`bool`/outcome values, not errors.
#[derive(Debug, Error)]
pub enum Error {
	/// The automation driver failed underneath us (connection loss, invalid
	/// session, unexpected payloads).
	#[error(transparent)]
	Driver(#[from] swipr_runtime::Error),

	/// The automated app could not be brought to the foreground.
	#[error("app not in foreground: {package}")]
	AppNotForeground { package: String },

	/// Writing failure artifacts to disk failed.
	#[error("artifact capture failed: {0}")]
	Artifact(#[from] std::io::Error),
}

impl Error {
	/// True when the underlying driver session is gone and the caller
	/// should stop issuing commands entirely.
	pub fn is_session_gone(&self) -> bool {
		matches!(self, Error::Driver(e) if e.is_session_gone())
	}
}
