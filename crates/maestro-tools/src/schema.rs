//! JSON schema definitions for the fixed tool set advertised to the model.

use maestro_core::ToolDefinition;
use serde_json::json;

pub const TOOL_COMPUTER: &str = "computer";
pub const TOOL_BASH: &str = "bash";
pub const TOOL_EDIT: &str = "edit";

/// The fixed tool-definition set sent with every completion request.
pub fn tool_definitions() -> Vec<ToolDefinition> {
	vec![
		ToolDefinition::new(
			TOOL_COMPUTER,
			"Control computer screen, mouse, and keyboard",
			json!({
				"type": "object",
				"properties": {
					"action": {
						"type": "string",
						"enum": [
							"screenshot",
							"mouse_move",
							"left_click",
							"right_click",
							"middle_click",
							"double_click",
							"triple_click",
							"left_mouse_down",
							"left_mouse_up",
							"left_click_drag",
							"scroll",
							"type",
							"key",
							"hold_key",
							"wait",
							"cursor_position"
						],
						"description": "Type of action to perform"
					},
					"x": { "type": "number", "description": "Mouse X coordinate" },
					"y": { "type": "number", "description": "Mouse Y coordinate" },
					"end_x": { "type": "number", "description": "Drag end X coordinate" },
					"end_y": { "type": "number", "description": "Drag end Y coordinate" },
					"text": { "type": "string", "description": "Text to type" },
					"key": { "type": "string", "description": "Key to press" },
					"down": { "type": "boolean", "description": "Hold the key down (true) or release it (false)" },
					"direction": {
						"type": "string",
						"enum": ["up", "down", "left", "right"],
						"description": "Scroll direction"
					},
					"amount": { "type": "number", "description": "Scroll amount" },
					"duration_ms": { "type": "number", "description": "Wait duration in milliseconds" }
				},
				"required": ["action"]
			}),
		),
		ToolDefinition::new(
			TOOL_BASH,
			"Execute system commands",
			json!({
				"type": "object",
				"properties": {
					"command": { "type": "string", "description": "Command to execute" },
					"timeout_ms": { "type": "number", "description": "Command timeout in milliseconds" },
					"background": { "type": "boolean", "description": "Whether to run in background" }
				},
				"required": ["command"]
			}),
		),
		ToolDefinition::new(
			TOOL_EDIT,
			"Read and edit files",
			json!({
				"type": "object",
				"properties": {
					"action": {
						"type": "string",
						"enum": ["read", "write", "append", "list", "search", "replace"],
						"description": "Type of action to perform"
					},
					"path": { "type": "string", "description": "File or directory path" },
					"content": { "type": "string", "description": "Content to write" },
					"pattern": { "type": "string", "description": "Search pattern" },
					"replacement": { "type": "string", "description": "Replacement text" }
				},
				"required": ["action", "path"]
			}),
		),
	]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn definitions_cover_the_fixed_tool_set() {
		let definitions = tool_definitions();
		let names: Vec<&str> = definitions.iter().map(|d| d.name.as_str()).collect();
		assert_eq!(names, vec![TOOL_COMPUTER, TOOL_BASH, TOOL_EDIT]);
	}

	#[test]
	fn schemas_mark_discriminators_required() {
		for definition in tool_definitions() {
			let required = definition.input_schema["required"]
				.as_array()
				.expect("required list");
			assert!(!required.is_empty(), "{} has required fields", definition.name);
		}
	}
}
