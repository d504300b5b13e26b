//! Device session: one live driver handle bound to one phone.

use std::path::{Path, PathBuf};
use std::time::Duration;

use swipr_protocol::{ElementRef, Locator};
use tracing::{debug, warn};

use crate::driver::UiDriver;
use crate::error::{Error, Result};
use crate::poll;
use crate::screens;

/// How often presence probes re-check the screen.
const PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// One live automation session, owned exclusively by its creator.
///
/// Wraps the transport-level driver with the bot's probing conventions:
/// bounded waits, absence-is-not-an-error lookups, and failure artifact
/// capture. The driver handle is surrendered with [`Session::into_driver`]
/// at teardown.
pub struct Session<D> {
	driver: D,
	package: String,
	artifacts_dir: Option<PathBuf>,
}

impl<D: UiDriver> Session<D> {
	pub fn new(driver: D, package: impl Into<String>) -> Self {
		Self {
			driver,
			package: package.into(),
			artifacts_dir: None,
		}
	}

	/// Directory for screenshots and hierarchy dumps on fatal errors.
	pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.artifacts_dir = Some(dir.into());
		self
	}

	pub fn driver(&self) -> &D {
		&self.driver
	}

	/// Package of the automated app.
	pub fn package(&self) -> &str {
		&self.package
	}

	/// Surrenders the driver handle for teardown.
	pub fn into_driver(self) -> D {
		self.driver
	}

	/// True when the automated app is the foreground activity.
	pub async fn is_app_foreground(&self) -> Result<bool> {
		Ok(self.driver.app_state(&self.package).await?.is_foreground())
	}

	/// Brings the app to the foreground, polling until it arrives.
	///
	/// Called once at session start; loops only *verify* foreground state
	/// and terminate instead of re-activating.
	pub async fn ensure_foreground(&self, timeout: Duration) -> Result<()> {
		if self.is_app_foreground().await? {
			return Ok(());
		}
		debug!(target = "swipr.session", package = %self.package, "activating app");
		self.driver.activate_app(&self.package).await?;

		let foreground = poll::try_until(PROBE_INTERVAL, timeout, || async move {
			Ok::<_, Error>(self.is_app_foreground().await?.then_some(()))
		})
		.await?;

		match foreground {
			Some(()) => Ok(()),
			None => Err(Error::AppNotForeground { package: self.package.clone() }),
		}
	}

	/// Finds an element, polling until present or `timeout` elapses.
	///
	/// `Ok(None)` means expected absence, not failure.
	pub async fn find(&self, locator: &Locator, timeout: Duration) -> Result<Option<ElementRef>> {
		poll::try_until(PROBE_INTERVAL, timeout, || async move {
			self.driver.find(locator).await
		})
		.await
	}

	/// Presence check with a bounded wait.
	pub async fn is_present(&self, locator: &Locator, timeout: Duration) -> Result<bool> {
		Ok(self.find(locator, timeout).await?.is_some())
	}

	/// Presence check that also requires the element to be displayed.
	pub async fn is_visible(&self, locator: &Locator, timeout: Duration) -> Result<bool> {
		match self.find(locator, timeout).await? {
			Some(element) => self.driver.is_displayed(&element).await,
			None => Ok(false),
		}
	}

	/// Finds and clicks; `Ok(false)` when the element never appeared.
	pub async fn click_if_present(&self, locator: &Locator, timeout: Duration) -> Result<bool> {
		match self.find(locator, timeout).await? {
			Some(element) => {
				self.driver.click(&element).await?;
				Ok(true)
			}
			None => Ok(false),
		}
	}

	/// Text content of an element, when it appears within `timeout`.
	pub async fn text_of(&self, locator: &Locator, timeout: Duration) -> Result<Option<String>> {
		match self.find(locator, timeout).await? {
			Some(element) => Ok(Some(self.driver.text(&element).await?)),
			None => Ok(None),
		}
	}

	/// Live screen dimensions; read on every gesture, never cached.
	pub async fn screen_size(&self) -> Result<(u32, u32)> {
		let rect = self.driver.window_rect().await?;
		Ok((rect.width, rect.height))
	}

	/// One hardware back press.
	pub async fn back(&self) -> Result<()> {
		self.driver.press_back().await
	}

	/// Saves a screenshot and UI hierarchy dump for post-mortem debugging.
	///
	/// Best-effort: capture failures are logged, never propagated, so a
	/// crashing loop can still report its own error.
	pub async fn capture_failure_artifacts(&self, tag: &str) -> Option<PathBuf> {
		let dir = self.artifacts_dir.as_deref()?;
		match self.try_capture(dir, tag).await {
			Ok(path) => Some(path),
			Err(err) => {
				warn!(target = "swipr.session", error = %err, "failed to capture artifacts");
				None
			}
		}
	}

	async fn try_capture(&self, dir: &Path, tag: &str) -> Result<PathBuf> {
		let ts = std::time::SystemTime::now()
			.duration_since(std::time::UNIX_EPOCH)
			.map(|d| d.as_secs())
			.unwrap_or(0);
		tokio::fs::create_dir_all(dir).await?;

		let screenshot = self.driver.screenshot().await?;
		let png = dir.join(format!("{tag}-{ts}.png"));
		tokio::fs::write(&png, screenshot).await?;

		let source = self.driver.page_source().await?;
		let xml = dir.join(format!("{tag}-{ts}.xml"));
		tokio::fs::write(&xml, source).await?;

		debug!(target = "swipr.session", path = %png.display(), "saved failure artifacts");
		Ok(png)
	}
}

/// Default launch check: app foregrounded within this budget.
pub const FOREGROUND_TIMEOUT: Duration = Duration::from_secs(15);

/// Convenience: verify the target app is up, front, and automatable.
pub async fn verify_ready<D: UiDriver>(session: &Session<D>) -> Result<()> {
	session.ensure_foreground(FOREGROUND_TIMEOUT).await?;
	// a window rect confirms the driver answers real queries
	let (w, h) = session.screen_size().await?;
	debug!(target = "swipr.session", width = w, height = h, package = %session.package(), "session ready");
	Ok(())
}

// re-exported for callers building sessions against the real driver
pub use crate::screens::{APP_ACTIVITY, APP_PACKAGE};
