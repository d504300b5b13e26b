//! W3C input-action sequences.
//!
//! Gestures are sent to `POST /session/{id}/actions` as one touch-pointer
//! sequence: a move to the start point, pointer down, timed moves through
//! intermediate waypoints, pointer up.

use serde::{Deserialize, Serialize};

/// One step of a pointer sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PointerAction {
	#[serde(rename = "pointerMove")]
	Move {
		/// Time to spend travelling to the target, in milliseconds.
		duration: u64,
		x: i32,
		y: i32,
	},
	#[serde(rename = "pointerDown")]
	Down { button: u8 },
	#[serde(rename = "pointerUp")]
	Up { button: u8 },
	#[serde(rename = "pause")]
	Pause { duration: u64 },
}

/// Parameters object identifying the pointer type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointerParameters {
	#[serde(rename = "pointerType")]
	pub pointer_type: String,
}

/// A full input source: id, kind, and its action steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSource {
	#[serde(rename = "type")]
	pub kind: String,
	pub id: String,
	pub parameters: PointerParameters,
	pub actions: Vec<PointerAction>,
}

/// Body of `POST /session/{id}/actions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsRequest {
	pub actions: Vec<InputSource>,
}

/// A synthesized touch gesture ready to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerSequence {
	pub steps: Vec<PointerAction>,
}

impl PointerSequence {
	pub fn new(steps: Vec<PointerAction>) -> Self {
		Self { steps }
	}

	/// Total duration of all timed steps, in milliseconds.
	pub fn duration_ms(&self) -> u64 {
		self.steps
			.iter()
			.map(|step| match step {
				PointerAction::Move { duration, .. } | PointerAction::Pause { duration } => *duration,
				_ => 0,
			})
			.sum()
	}

	/// Every coordinate the pointer visits, in order.
	pub fn points(&self) -> Vec<(i32, i32)> {
		self.steps
			.iter()
			.filter_map(|step| match step {
				PointerAction::Move { x, y, .. } => Some((*x, *y)),
				_ => None,
			})
			.collect()
	}

	/// Wraps the steps as a single touch input source.
	pub fn into_request(self) -> ActionsRequest {
		ActionsRequest {
			actions: vec![InputSource {
				kind: "pointer".into(),
				id: "finger1".into(),
				parameters: PointerParameters { pointer_type: "touch".into() },
				actions: self.steps,
			}],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pointer_actions_serialize_tagged() {
		let json = serde_json::to_value(PointerAction::Move { duration: 120, x: 10, y: 20 }).unwrap();
		assert_eq!(json, serde_json::json!({ "type": "pointerMove", "duration": 120, "x": 10, "y": 20 }));

		let json = serde_json::to_value(PointerAction::Down { button: 0 }).unwrap();
		assert_eq!(json, serde_json::json!({ "type": "pointerDown", "button": 0 }));
	}

	#[test]
	fn sequence_request_is_single_touch_source() {
		let seq = PointerSequence::new(vec![
			PointerAction::Move { duration: 0, x: 5, y: 5 },
			PointerAction::Down { button: 0 },
			PointerAction::Move { duration: 90, x: 50, y: 5 },
			PointerAction::Up { button: 0 },
		]);
		let json = serde_json::to_value(seq.into_request()).unwrap();

		assert_eq!(json["actions"].as_array().unwrap().len(), 1);
		assert_eq!(json["actions"][0]["type"], "pointer");
		assert_eq!(json["actions"][0]["parameters"]["pointerType"], "touch");
		assert_eq!(json["actions"][0]["actions"].as_array().unwrap().len(), 4);
	}

	#[test]
	fn duration_sums_moves_and_pauses() {
		let seq = PointerSequence::new(vec![
			PointerAction::Move { duration: 0, x: 0, y: 0 },
			PointerAction::Down { button: 0 },
			PointerAction::Pause { duration: 40 },
			PointerAction::Move { duration: 160, x: 9, y: 9 },
			PointerAction::Up { button: 0 },
		]);
		assert_eq!(seq.duration_ms(), 200);
	}

	#[test]
	fn points_lists_visited_coordinates() {
		let seq = PointerSequence::new(vec![
			PointerAction::Move { duration: 0, x: 1, y: 2 },
			PointerAction::Down { button: 0 },
			PointerAction::Move { duration: 50, x: 3, y: 4 },
			PointerAction::Up { button: 0 },
		]);
		assert_eq!(seq.points(), vec![(1, 2), (3, 4)]);
	}
}
