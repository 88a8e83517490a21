//! Typed tool arguments.
//!
//! Each tool's argument object is a tagged union with one concrete record
//! per action, validated at the dispatch boundary. Invalid or missing fields
//! produce a typed argument error instead of an untyped field access.

use serde::Deserialize;

use crate::adapter::ScrollDirection;

pub const DEFAULT_SCROLL_AMOUNT: u32 = 3;
pub const DEFAULT_WAIT_MS: u64 = 1000;

fn default_scroll_amount() -> u32 {
	DEFAULT_SCROLL_AMOUNT
}

fn default_wait_ms() -> u64 {
	DEFAULT_WAIT_MS
}

/// Arguments for the `computer` tool, discriminated by `action`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ComputerAction {
	Screenshot,
	MouseMove {
		x: i32,
		y: i32,
	},
	LeftClick {
		x: Option<i32>,
		y: Option<i32>,
	},
	RightClick {
		x: Option<i32>,
		y: Option<i32>,
	},
	MiddleClick {
		x: Option<i32>,
		y: Option<i32>,
	},
	DoubleClick {
		x: Option<i32>,
		y: Option<i32>,
	},
	TripleClick {
		x: Option<i32>,
		y: Option<i32>,
	},
	LeftMouseDown {
		x: i32,
		y: i32,
	},
	LeftMouseUp {
		x: i32,
		y: i32,
	},
	LeftClickDrag {
		x: i32,
		y: i32,
		end_x: i32,
		end_y: i32,
	},
	Scroll {
		direction: ScrollDirection,
		#[serde(default = "default_scroll_amount")]
		amount: u32,
	},
	#[serde(rename = "type")]
	TypeText {
		text: String,
	},
	Key {
		key: String,
	},
	HoldKey {
		key: String,
		#[serde(default)]
		down: bool,
	},
	Wait {
		#[serde(default = "default_wait_ms")]
		duration_ms: u64,
	},
	CursorPosition,
}

/// Arguments for the `bash` tool.
#[derive(Clone, Debug, Deserialize)]
pub struct BashArgs {
	pub command: String,
	pub timeout_ms: Option<u64>,
	#[serde(default)]
	pub background: bool,
}

/// Arguments for the `edit` tool, discriminated by `action`.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EditAction {
	Read {
		path: String,
	},
	Write {
		path: String,
		content: String,
	},
	Append {
		path: String,
		content: String,
	},
	List {
		path: String,
	},
	Search {
		path: String,
		pattern: String,
	},
	Replace {
		path: String,
		pattern: String,
		replacement: String,
	},
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn scroll_amount_defaults_to_three() {
		let action: ComputerAction =
			serde_json::from_value(json!({"action": "scroll", "direction": "down"})).unwrap();
		match action {
			ComputerAction::Scroll { direction, amount } => {
				assert_eq!(direction, ScrollDirection::Down);
				assert_eq!(amount, DEFAULT_SCROLL_AMOUNT);
			}
			other => panic!("expected scroll, got {other:?}"),
		}
	}

	#[test]
	fn wait_duration_defaults_to_one_second() {
		let action: ComputerAction = serde_json::from_value(json!({"action": "wait"})).unwrap();
		assert!(matches!(
			action,
			ComputerAction::Wait {
				duration_ms: DEFAULT_WAIT_MS
			}
		));
	}

	#[test]
	fn type_action_uses_the_reserved_word() {
		let action: ComputerAction =
			serde_json::from_value(json!({"action": "type", "text": "hello"})).unwrap();
		assert!(matches!(action, ComputerAction::TypeText { text } if text == "hello"));
	}

	#[test]
	fn click_coordinates_are_optional() {
		let action: ComputerAction = serde_json::from_value(json!({"action": "left_click"})).unwrap();
		assert!(matches!(
			action,
			ComputerAction::LeftClick { x: None, y: None }
		));

		let action: ComputerAction =
			serde_json::from_value(json!({"action": "left_click", "x": 10, "y": 20})).unwrap();
		assert!(matches!(
			action,
			ComputerAction::LeftClick {
				x: Some(10),
				y: Some(20)
			}
		));
	}

	#[test]
	fn unknown_computer_action_is_rejected() {
		let result: Result<ComputerAction, _> =
			serde_json::from_value(json!({"action": "teleport", "x": 1, "y": 2}));
		assert!(result.is_err());
	}

	#[test]
	fn bash_background_defaults_to_false() {
		let args: BashArgs = serde_json::from_value(json!({"command": "echo hi"})).unwrap();
		assert_eq!(args.command, "echo hi");
		assert!(!args.background);
		assert!(args.timeout_ms.is_none());
	}

	#[test]
	fn edit_replace_requires_all_fields() {
		let result: Result<EditAction, _> =
			serde_json::from_value(json!({"action": "replace", "path": "/tmp/a"}));
		assert!(result.is_err());

		let action: EditAction = serde_json::from_value(json!({
			"action": "replace", "path": "/tmp/a", "pattern": "old", "replacement": "new"
		}))
		.unwrap();
		assert!(matches!(action, EditAction::Replace { .. }));
	}

	#[test]
	fn unknown_edit_action_is_rejected() {
		let result: Result<EditAction, _> =
			serde_json::from_value(json!({"action": "delete", "path": "/tmp/a"}));
		assert!(result.is_err());
	}
}
