//! Scripted in-memory driver for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use swipr_protocol::{AppState, ElementRect, ElementRef, Locator, PointerSequence, WindowRect};

use crate::driver::UiDriver;
use crate::error::Result;

type Effect = Box<dyn FnMut(&mut State) + Send>;

#[derive(Default)]
pub struct State {
	/// locator display form -> element ids currently present
	pub elements: HashMap<String, Vec<String>>,
	/// locator display form -> (element id, remaining misses before it appears)
	pub pending: HashMap<String, (String, u32)>,
	/// (parent id, locator display form) -> child element ids
	pub children: HashMap<(String, String), Vec<String>>,
	pub texts: HashMap<String, String>,
	pub attrs: HashMap<(String, String), String>,
	pub rects: HashMap<String, ElementRect>,
	pub clicks: Vec<String>,
	pub typed: Vec<(String, String)>,
	pub cleared: Vec<String>,
	pub performed: Vec<PointerSequence>,
	pub back_presses: u32,
	pub app_state: AppState,
	pub window: WindowRect,
	pub activate_brings_foreground: bool,
}

/// Scripted [`UiDriver`] whose screen contents are mutated by the test (or
/// by click/back effects) between probes.
pub struct FakeDriver {
	state: Mutex<State>,
	click_effects: Mutex<HashMap<String, Effect>>,
	back_effects: Mutex<Vec<Effect>>,
}

impl FakeDriver {
	pub fn new() -> Self {
		Self {
			state: Mutex::new(State {
				app_state: AppState::Foreground,
				window: WindowRect { x: 0, y: 0, width: 1080, height: 2400 },
				..State::default()
			}),
			click_effects: Mutex::new(HashMap::new()),
			back_effects: Mutex::new(Vec::new()),
		}
	}

	/// Puts an element on the screen immediately.
	pub fn place(&self, locator: &Locator, id: &str) {
		self.state
			.lock()
			.unwrap()
			.elements
			.entry(locator.to_string())
			.or_default()
			.push(id.to_string());
	}

	/// Element appears only after `misses` failed lookups.
	pub fn place_after(&self, locator: &Locator, id: &str, misses: u32) {
		self.state
			.lock()
			.unwrap()
			.pending
			.insert(locator.to_string(), (id.to_string(), misses));
	}

	pub fn remove(&self, locator: &Locator) {
		self.state.lock().unwrap().elements.remove(&locator.to_string());
	}

	pub fn place_child(&self, parent_id: &str, locator: &Locator, id: &str) {
		self.state
			.lock()
			.unwrap()
			.children
			.entry((parent_id.to_string(), locator.to_string()))
			.or_default()
			.push(id.to_string());
	}

	pub fn set_text(&self, id: &str, text: &str) {
		self.state.lock().unwrap().texts.insert(id.to_string(), text.to_string());
	}

	pub fn set_attr(&self, id: &str, name: &str, value: &str) {
		self.state
			.lock()
			.unwrap()
			.attrs
			.insert((id.to_string(), name.to_string()), value.to_string());
	}

	pub fn set_rect(&self, id: &str, rect: ElementRect) {
		self.state.lock().unwrap().rects.insert(id.to_string(), rect);
	}

	pub fn set_app_state(&self, state: AppState) {
		self.state.lock().unwrap().app_state = state;
	}

	pub fn foreground_on_activate(&self) {
		self.state.lock().unwrap().activate_brings_foreground = true;
	}

	pub fn set_window(&self, width: u32, height: u32) {
		self.state.lock().unwrap().window = WindowRect { x: 0, y: 0, width, height };
	}

	/// Runs `effect` against the screen state whenever `id` is clicked.
	pub fn on_click(&self, id: &str, effect: impl FnMut(&mut State) + Send + 'static) {
		self.click_effects.lock().unwrap().insert(id.to_string(), Box::new(effect));
	}

	/// Runs `effect` on every back press.
	pub fn on_back(&self, effect: impl FnMut(&mut State) + Send + 'static) {
		self.back_effects.lock().unwrap().push(Box::new(effect));
	}

	pub fn clicks(&self) -> Vec<String> {
		self.state.lock().unwrap().clicks.clone()
	}

	pub fn click_count(&self, id: &str) -> usize {
		self.state.lock().unwrap().clicks.iter().filter(|c| *c == id).count()
	}

	pub fn typed(&self) -> Vec<(String, String)> {
		self.state.lock().unwrap().typed.clone()
	}

	pub fn performed(&self) -> Vec<PointerSequence> {
		self.state.lock().unwrap().performed.clone()
	}

	pub fn back_presses(&self) -> u32 {
		self.state.lock().unwrap().back_presses
	}
}

fn make_ref(id: &str) -> ElementRef {
	ElementRef { id: id.to_string() }
}

#[async_trait]
impl UiDriver for FakeDriver {
	async fn find(&self, locator: &Locator) -> Result<Option<ElementRef>> {
		let key = locator.to_string();
		let mut state = self.state.lock().unwrap();

		if let Some(ids) = state.elements.get(&key) {
			if let Some(id) = ids.first() {
				return Ok(Some(make_ref(id)));
			}
		}
		if let Some((id, misses)) = state.pending.get_mut(&key) {
			if *misses == 0 {
				let id = id.clone();
				state.pending.remove(&key);
				state.elements.entry(key).or_default().push(id.clone());
				return Ok(Some(make_ref(&id)));
			}
			*misses -= 1;
		}
		Ok(None)
	}

	async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>> {
		let state = self.state.lock().unwrap();
		Ok(state
			.elements
			.get(&locator.to_string())
			.map(|ids| ids.iter().map(|id| make_ref(id)).collect())
			.unwrap_or_default())
	}

	async fn find_all_within(&self, parent: &ElementRef, locator: &Locator) -> Result<Vec<ElementRef>> {
		let state = self.state.lock().unwrap();
		Ok(state
			.children
			.get(&(parent.id.clone(), locator.to_string()))
			.map(|ids| ids.iter().map(|id| make_ref(id)).collect())
			.unwrap_or_default())
	}

	async fn click(&self, element: &ElementRef) -> Result<()> {
		self.state.lock().unwrap().clicks.push(element.id.clone());
		if let Some(effect) = self.click_effects.lock().unwrap().get_mut(&element.id) {
			effect(&mut self.state.lock().unwrap());
		}
		Ok(())
	}

	async fn text(&self, element: &ElementRef) -> Result<String> {
		Ok(self
			.state
			.lock()
			.unwrap()
			.texts
			.get(&element.id)
			.cloned()
			.unwrap_or_default())
	}

	async fn attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>> {
		Ok(self
			.state
			.lock()
			.unwrap()
			.attrs
			.get(&(element.id.clone(), name.to_string()))
			.cloned())
	}

	async fn is_displayed(&self, _element: &ElementRef) -> Result<bool> {
		Ok(true)
	}

	async fn rect(&self, element: &ElementRef) -> Result<ElementRect> {
		Ok(self
			.state
			.lock()
			.unwrap()
			.rects
			.get(&element.id)
			.copied()
			.unwrap_or(ElementRect { x: 0, y: 0, width: 100, height: 100 }))
	}

	async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		state.typed.push((element.id.clone(), text.to_string()));
		state.texts.insert(element.id.clone(), text.to_string());
		Ok(())
	}

	async fn clear(&self, element: &ElementRef) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		state.cleared.push(element.id.clone());
		state.texts.remove(&element.id);
		Ok(())
	}

	async fn perform(&self, sequence: PointerSequence) -> Result<()> {
		self.state.lock().unwrap().performed.push(sequence);
		Ok(())
	}

	async fn window_rect(&self) -> Result<WindowRect> {
		Ok(self.state.lock().unwrap().window)
	}

	async fn app_state(&self, _package: &str) -> Result<AppState> {
		Ok(self.state.lock().unwrap().app_state)
	}

	async fn activate_app(&self, _package: &str) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		if state.activate_brings_foreground {
			state.app_state = AppState::Foreground;
		}
		Ok(())
	}

	async fn press_back(&self) -> Result<()> {
		self.state.lock().unwrap().back_presses += 1;
		let mut effects = self.back_effects.lock().unwrap();
		for effect in effects.iter_mut() {
			effect(&mut self.state.lock().unwrap());
		}
		Ok(())
	}

	async fn screenshot(&self) -> Result<Vec<u8>> {
		Ok(b"\x89PNG".to_vec())
	}

	async fn page_source(&self) -> Result<String> {
		Ok("<hierarchy/>".to_string())
	}
}
