//! The seam between bot logic and the automation transport.

use async_trait::async_trait;
use swipr_protocol::{AppState, ElementRect, ElementRef, Locator, PointerSequence, WindowRect};
use swipr_runtime::DriverSession;

use crate::error::Result;

/// Single-shot driver operations the bot is written against.
///
/// [`DriverSession`] implements this over HTTP; tests substitute a scripted
/// fake. Lookups here do not wait: bounded polling is layered on top by
/// [`Session`](crate::Session). Absence of an element is `Ok(None)`, never
/// an error.
#[async_trait]
pub trait UiDriver: Send + Sync {
	async fn find(&self, locator: &Locator) -> Result<Option<ElementRef>>;
	async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>>;
	async fn find_all_within(&self, parent: &ElementRef, locator: &Locator) -> Result<Vec<ElementRef>>;
	async fn click(&self, element: &ElementRef) -> Result<()>;
	async fn text(&self, element: &ElementRef) -> Result<String>;
	async fn attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>>;
	async fn is_displayed(&self, element: &ElementRef) -> Result<bool>;
	async fn rect(&self, element: &ElementRef) -> Result<ElementRect>;
	async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()>;
	async fn clear(&self, element: &ElementRef) -> Result<()>;
	async fn perform(&self, sequence: PointerSequence) -> Result<()>;
	async fn window_rect(&self) -> Result<WindowRect>;
	async fn app_state(&self, package: &str) -> Result<AppState>;
	async fn activate_app(&self, package: &str) -> Result<()>;
	async fn press_back(&self) -> Result<()>;
	async fn screenshot(&self) -> Result<Vec<u8>>;
	async fn page_source(&self) -> Result<String>;
}

#[async_trait]
impl UiDriver for DriverSession {
	async fn find(&self, locator: &Locator) -> Result<Option<ElementRef>> {
		Ok(DriverSession::find_element(self, locator).await?)
	}

	async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
		Ok(DriverSession::find_elements(self, locator).await?)
	}

	async fn find_all_within(&self, parent: &ElementRef, locator: &Locator) -> Result<Vec<ElementRef>> {
		Ok(DriverSession::find_elements_within(self, parent, locator).await?)
	}

	async fn click(&self, element: &ElementRef) -> Result<()> {
		Ok(DriverSession::click(self, element).await?)
	}

	async fn text(&self, element: &ElementRef) -> Result<String> {
		Ok(DriverSession::text(self, element).await?)
	}

	async fn attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>> {
		Ok(DriverSession::attribute(self, element, name).await?)
	}

	async fn is_displayed(&self, element: &ElementRef) -> Result<bool> {
		Ok(DriverSession::is_displayed(self, element).await?)
	}

	async fn rect(&self, element: &ElementRef) -> Result<ElementRect> {
		Ok(DriverSession::rect(self, element).await?)
	}

	async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
		Ok(DriverSession::send_keys(self, element, text).await?)
	}

	async fn clear(&self, element: &ElementRef) -> Result<()> {
		Ok(DriverSession::clear(self, element).await?)
	}

	async fn perform(&self, sequence: PointerSequence) -> Result<()> {
		Ok(DriverSession::perform(self, sequence).await?)
	}

	async fn window_rect(&self) -> Result<WindowRect> {
		Ok(DriverSession::window_rect(self).await?)
	}

	async fn app_state(&self, package: &str) -> Result<AppState> {
		Ok(DriverSession::app_state(self, package).await?)
	}

	async fn activate_app(&self, package: &str) -> Result<()> {
		Ok(DriverSession::activate_app(self, package).await?)
	}

	async fn press_back(&self) -> Result<()> {
		Ok(DriverSession::press_back(self).await?)
	}

	async fn screenshot(&self) -> Result<Vec<u8>> {
		Ok(DriverSession::screenshot(self).await?)
	}

	async fn page_source(&self) -> Result<String> {
		Ok(DriverSession::page_source(self).await?)
	}
}
