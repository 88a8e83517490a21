//! Tool call dispatch.
//!
//! Executes one model-issued tool call against the capability adapters and
//! returns one artifact per call. Failures inside a call are captured into
//! an error artifact; they never abort the batch or the sampling loop.

use std::sync::Arc;

use maestro_core::{ToolArtifact, ToolError};
use serde_json::Value;
use tracing::{debug, warn};

use crate::adapter::{BashAdapter, ComputerAdapter, EditAdapter, MouseButton};
use crate::args::{BashArgs, ComputerAction, EditAction};
use crate::schema::{TOOL_BASH, TOOL_COMPUTER, TOOL_EDIT};

/// Dispatches tool calls to the three capability adapters.
pub struct ToolDispatcher {
	computer: Arc<dyn ComputerAdapter>,
	bash: Arc<dyn BashAdapter>,
	edit: Arc<dyn EditAdapter>,
}

fn format_point(x: Option<i32>, y: Option<i32>) -> String {
	match (x, y) {
		(Some(x), Some(y)) => format!(" at ({x}, {y})"),
		_ => String::new(),
	}
}

impl ToolDispatcher {
	pub fn new(
		computer: Arc<dyn ComputerAdapter>,
		bash: Arc<dyn BashAdapter>,
		edit: Arc<dyn EditAdapter>,
	) -> Self {
		Self {
			computer,
			bash,
			edit,
		}
	}

	/// Executes one tool call, folding any failure into an error artifact.
	pub async fn execute(&self, tool_name: &str, args: &Value) -> ToolArtifact {
		debug!(tool = tool_name, "executing tool call");
		match self.try_execute(tool_name, args).await {
			Ok(artifact) => artifact,
			Err(err) => {
				warn!(tool = tool_name, error = %err, "tool call failed");
				ToolArtifact::error(
					format!("Failed to execute tool {tool_name}: {err}"),
					err.to_string(),
				)
			}
		}
	}

	async fn try_execute(&self, tool_name: &str, args: &Value) -> Result<ToolArtifact, ToolError> {
		match tool_name {
			TOOL_COMPUTER => {
				let action: ComputerAction = serde_json::from_value(args.clone())
					.map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
				self.run_computer(action).await
			}
			TOOL_BASH => {
				let args: BashArgs = serde_json::from_value(args.clone())
					.map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
				self.run_bash(args).await
			}
			TOOL_EDIT => {
				let action: EditAction = serde_json::from_value(args.clone())
					.map_err(|e| ToolError::InvalidArguments(e.to_string()))?;
				self.run_edit(action).await
			}
			other => Err(ToolError::UnknownTool(other.to_string())),
		}
	}

	async fn run_computer(&self, action: ComputerAction) -> Result<ToolArtifact, ToolError> {
		let artifact = match action {
			ComputerAction::Screenshot => ToolArtifact::image(self.computer.screenshot().await?),
			ComputerAction::MouseMove { x, y } => {
				self.computer.move_to(x, y).await?;
				ToolArtifact::text(format!("Moved mouse to ({x}, {y})"))
			}
			ComputerAction::LeftClick { x, y } => {
				self.computer.click(MouseButton::Left, x, y).await?;
				ToolArtifact::text(format!("Left clicked{}", format_point(x, y)))
			}
			ComputerAction::RightClick { x, y } => {
				self.computer.click(MouseButton::Right, x, y).await?;
				ToolArtifact::text(format!("Right clicked{}", format_point(x, y)))
			}
			ComputerAction::MiddleClick { x, y } => {
				self.computer.click(MouseButton::Middle, x, y).await?;
				ToolArtifact::text(format!("Middle clicked{}", format_point(x, y)))
			}
			ComputerAction::DoubleClick { x, y } => {
				self.computer.double_click(x, y).await?;
				ToolArtifact::text(format!("Double clicked{}", format_point(x, y)))
			}
			ComputerAction::TripleClick { x, y } => {
				self.computer.triple_click(x, y).await?;
				ToolArtifact::text(format!("Triple clicked{}", format_point(x, y)))
			}
			ComputerAction::LeftMouseDown { x, y } => {
				self.computer.mouse_down(x, y).await?;
				ToolArtifact::text(format!("Mouse down at ({x}, {y})"))
			}
			ComputerAction::LeftMouseUp { x, y } => {
				self.computer.mouse_up(x, y).await?;
				ToolArtifact::text(format!("Mouse up at ({x}, {y})"))
			}
			ComputerAction::LeftClickDrag { x, y, end_x, end_y } => {
				self.computer.drag(x, y, end_x, end_y).await?;
				ToolArtifact::text(format!("Dragged from ({x}, {y}) to ({end_x}, {end_y})"))
			}
			ComputerAction::Scroll { direction, amount } => {
				self.computer.scroll(direction, amount).await?;
				ToolArtifact::text(format!("Scrolled {direction} {amount} times"))
			}
			ComputerAction::TypeText { text } => {
				self.computer.type_text(&text).await?;
				let preview: String = text.chars().take(20).collect();
				let ellipsis = if text.chars().count() > 20 { "..." } else { "" };
				ToolArtifact::text(format!("Typed text: {preview}{ellipsis}"))
			}
			ComputerAction::Key { key } => {
				self.computer.press_key(&key).await?;
				ToolArtifact::text(format!("Pressed key: {key}"))
			}
			ComputerAction::HoldKey { key, down } => {
				if down {
					self.computer.key_down(&key).await?;
					ToolArtifact::text(format!("Key down: {key}"))
				} else {
					self.computer.key_up(&key).await?;
					ToolArtifact::text(format!("Key up: {key}"))
				}
			}
			ComputerAction::Wait { duration_ms } => {
				self.computer.wait(duration_ms).await?;
				ToolArtifact::text(format!("Waited for {duration_ms} ms"))
			}
			ComputerAction::CursorPosition => {
				let position = self.computer.cursor_position().await?;
				ToolArtifact::text(format!(
					"Cursor position: ({}, {})",
					position.x, position.y
				))
			}
		};
		Ok(artifact)
	}

	async fn run_bash(&self, args: BashArgs) -> Result<ToolArtifact, ToolError> {
		let output = if args.background {
			let process_id = self.bash.run_background(&args.command).await?;
			format!("Command started in background, process ID: {process_id}")
		} else {
			self.bash.run(&args.command, args.timeout_ms).await?
		};
		Ok(ToolArtifact::command_output(output))
	}

	async fn run_edit(&self, action: EditAction) -> Result<ToolArtifact, ToolError> {
		let artifact = match action {
			EditAction::Read { path } => ToolArtifact::text(self.edit.read(&path).await?),
			EditAction::Write { path, content } => {
				self.edit.write(&path, &content).await?;
				ToolArtifact::text(format!("File written: {path}"))
			}
			EditAction::Append { path, content } => {
				self.edit.append(&path, &content).await?;
				ToolArtifact::text(format!("Content appended to file: {path}"))
			}
			EditAction::List { path } => {
				let entries = self.edit.list(&path).await?;
				let listing = entries
					.iter()
					.map(|entry| {
						let suffix = if entry.is_directory { "/" } else { "" };
						format!("{}{} ({} bytes)", entry.name, suffix, entry.size)
					})
					.collect::<Vec<_>>()
					.join("\n");
				ToolArtifact::text(listing)
			}
			EditAction::Search { path, pattern } => {
				let matches = self.edit.search(&path, &pattern).await?;
				ToolArtifact::text(matches.join("\n"))
			}
			EditAction::Replace {
				path,
				pattern,
				replacement,
			} => {
				self.edit.replace(&path, &pattern, &replacement).await?;
				ToolArtifact::text(format!(
					"Replaced \"{pattern}\" with \"{replacement}\" in file {path}"
				))
			}
		};
		Ok(artifact)
	}
}
