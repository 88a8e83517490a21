//! Conversation state model: the ordered, append-only sequence of turns
//! exchanged between the user and the assistant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid7::Uuid;

use crate::retention;

/// Author of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Assistant,
}

/// Kind of output produced by one tool invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
	/// Base64-encoded PNG bytes, no data-URI prefix.
	Image,
	CommandOutput,
	Text,
}

/// The result of one tool invocation, attached to a turn.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolArtifact {
	pub kind: ArtifactKind,
	pub payload: String,
	/// When set, this artifact represents a failed tool call and the payload
	/// is diagnostic text rather than real output.
	#[serde(skip_serializing_if = "Option::is_none", default)]
	pub error_detail: Option<String>,
}

impl ToolArtifact {
	pub fn image(base64_png: impl Into<String>) -> Self {
		Self {
			kind: ArtifactKind::Image,
			payload: base64_png.into(),
			error_detail: None,
		}
	}

	pub fn command_output(output: impl Into<String>) -> Self {
		Self {
			kind: ArtifactKind::CommandOutput,
			payload: output.into(),
			error_detail: None,
		}
	}

	pub fn text(content: impl Into<String>) -> Self {
		Self {
			kind: ArtifactKind::Text,
			payload: content.into(),
			error_detail: None,
		}
	}

	pub fn error(diagnostic: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			kind: ArtifactKind::Text,
			payload: diagnostic.into(),
			error_detail: Some(detail.into()),
		}
	}

	pub fn is_image(&self) -> bool {
		self.kind == ArtifactKind::Image
	}

	pub fn is_error(&self) -> bool {
		self.error_detail.is_some()
	}
}

/// Opaque reasoning block the model may emit before its final answer.
///
/// Stored and forwarded, never interpreted, so the core stays decoupled from
/// any specific model's reasoning schema.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReasoningBlock {
	pub kind: String,
	pub text: String,
}

/// One exchange unit in the conversation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
	pub id: Uuid,
	pub role: Role,
	pub content: String,
	pub timestamp: DateTime<Utc>,
	#[serde(default)]
	pub tool_artifacts: Vec<ToolArtifact>,
	#[serde(default)]
	pub reasoning_trace: Vec<ReasoningBlock>,
}

impl Turn {
	fn new(role: Role, content: impl Into<String>) -> Self {
		Self {
			id: uuid7::uuid7(),
			role,
			content: content.into(),
			timestamp: Utc::now(),
			tool_artifacts: Vec::new(),
			reasoning_trace: Vec::new(),
		}
	}

	pub fn user(content: impl Into<String>) -> Self {
		Self::new(Role::User, content)
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self::new(Role::Assistant, content)
	}

	/// Assistant turn carrying the model's text plus its reasoning trace.
	pub fn assistant_with_reasoning(
		content: impl Into<String>,
		reasoning: Vec<ReasoningBlock>,
	) -> Self {
		let mut turn = Self::new(Role::Assistant, content);
		turn.reasoning_trace = reasoning;
		turn
	}

	/// User-role turn aggregating the ordered results of one round of tool
	/// calls; carries no text of its own.
	pub fn tool_results(artifacts: Vec<ToolArtifact>) -> Self {
		let mut turn = Self::new(Role::User, "");
		turn.tool_artifacts = artifacts;
		turn
	}

	pub fn image_count(&self) -> usize {
		self.tool_artifacts.iter().filter(|a| a.is_image()).count()
	}
}

/// The ordered, append-only turn sequence.
///
/// Turns are never mutated after creation except by the image retention
/// policy, which may remove image artifacts from past turns. The
/// conversation is owned exclusively by one `run` invocation for its
/// duration; observers take read-only snapshots.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
	turns: Vec<Turn>,
}

impl Conversation {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn append(&mut self, turn: Turn) {
		debug!(role = ?turn.role, artifacts = turn.tool_artifacts.len(), "appending turn");
		self.turns.push(turn);
	}

	/// Read-only ordered view of the turn sequence.
	pub fn snapshot(&self) -> &[Turn] {
		&self.turns
	}

	pub fn len(&self) -> usize {
		self.turns.len()
	}

	pub fn is_empty(&self) -> bool {
		self.turns.is_empty()
	}

	/// Total number of image artifacts across the whole conversation.
	pub fn image_count(&self) -> usize {
		self.turns.iter().map(Turn::image_count).sum()
	}

	/// Applies the image retention policy. `retain = 0` means unlimited and
	/// skips the pass entirely.
	pub fn prune_images(&mut self, retain: usize, block_size: usize) {
		retention::prune_images(&mut self.turns, retain, block_size);
	}

	/// Removes every image artifact from the conversation. Used by the
	/// prompt-caching override, which prefers a fully image-free prefix over
	/// a partial image window that keeps shifting.
	pub fn strip_images(&mut self) {
		retention::strip_images(&mut self.turns);
	}
}
