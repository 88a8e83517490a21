//! Capability adapter contracts.
//!
//! How a click or a file write actually happens is an external concern;
//! the orchestrator only depends on these fixed method sets.

use async_trait::async_trait;
use maestro_core::ToolError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
	Left,
	Right,
	Middle,
}

impl fmt::Display for MouseButton {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			MouseButton::Left => write!(f, "left"),
			MouseButton::Right => write!(f, "right"),
			MouseButton::Middle => write!(f, "middle"),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
	Up,
	Down,
	Left,
	Right,
}

impl fmt::Display for ScrollDirection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ScrollDirection::Up => write!(f, "up"),
			ScrollDirection::Down => write!(f, "down"),
			ScrollDirection::Left => write!(f, "left"),
			ScrollDirection::Right => write!(f, "right"),
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorPosition {
	pub x: i32,
	pub y: i32,
}

/// One directory listing entry.
#[derive(Clone, Debug)]
pub struct DirEntry {
	pub name: String,
	pub is_directory: bool,
	pub size: u64,
}

/// Screen and input control.
#[async_trait]
pub trait ComputerAdapter: Send + Sync {
	/// Returns base64-encoded PNG bytes, no data-URI prefix.
	async fn screenshot(&self) -> Result<String, ToolError>;
	async fn move_to(&self, x: i32, y: i32) -> Result<(), ToolError>;
	/// Clicks the given button, optionally moving to the coordinates first.
	async fn click(&self, button: MouseButton, x: Option<i32>, y: Option<i32>)
		-> Result<(), ToolError>;
	async fn double_click(&self, x: Option<i32>, y: Option<i32>) -> Result<(), ToolError>;
	async fn triple_click(&self, x: Option<i32>, y: Option<i32>) -> Result<(), ToolError>;
	async fn mouse_down(&self, x: i32, y: i32) -> Result<(), ToolError>;
	async fn mouse_up(&self, x: i32, y: i32) -> Result<(), ToolError>;
	async fn drag(&self, x1: i32, y1: i32, x2: i32, y2: i32) -> Result<(), ToolError>;
	async fn scroll(&self, direction: ScrollDirection, amount: u32) -> Result<(), ToolError>;
	async fn type_text(&self, text: &str) -> Result<(), ToolError>;
	async fn press_key(&self, key: &str) -> Result<(), ToolError>;
	async fn key_down(&self, key: &str) -> Result<(), ToolError>;
	async fn key_up(&self, key: &str) -> Result<(), ToolError>;
	async fn wait(&self, ms: u64) -> Result<(), ToolError>;
	async fn cursor_position(&self) -> Result<CursorPosition, ToolError>;
}

/// Shell command execution.
#[async_trait]
pub trait BashAdapter: Send + Sync {
	/// Runs a command synchronously and returns its captured output. The
	/// timeout is advisory.
	async fn run(&self, command: &str, timeout_ms: Option<u64>) -> Result<String, ToolError>;
	/// Starts a command in the background and returns a process handle
	/// identifier immediately.
	async fn run_background(&self, command: &str) -> Result<String, ToolError>;
}

/// File reading and editing.
#[async_trait]
pub trait EditAdapter: Send + Sync {
	async fn read(&self, path: &str) -> Result<String, ToolError>;
	async fn write(&self, path: &str, content: &str) -> Result<(), ToolError>;
	async fn append(&self, path: &str, content: &str) -> Result<(), ToolError>;
	async fn list(&self, path: &str) -> Result<Vec<DirEntry>, ToolError>;
	async fn search(&self, dir: &str, pattern: &str) -> Result<Vec<String>, ToolError>;
	async fn replace(&self, path: &str, pattern: &str, replacement: &str) -> Result<(), ToolError>;
}
