//! Wire-format translation between the conversation model and the model
//! transport's message shape.
//!
//! A turn with no tool artifacts becomes a plain role+text message. A turn
//! with tool artifacts becomes a role+content-block message: each image
//! artifact becomes a base64 PNG image block, every other artifact becomes a
//! text block.

use serde::{Deserialize, Serialize};

use crate::conversation::{Role, ToolArtifact, Turn};

pub const IMAGE_MEDIA_TYPE: &str = "image/png";

/// A message in the transport request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WireMessage {
	pub role: Role,
	pub content: WireContent,
}

/// Message content: plain text or a list of content blocks.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireContent {
	Text(String),
	Blocks(Vec<ContentBlock>),
}

/// A content block in a request message.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
	Text { text: String },
	Image { source: ImageSource },
}

/// Base64 image payload. The data carries no data-URI prefix; a data-URI is
/// only constructed at the UI boundary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImageSource {
	#[serde(rename = "type")]
	pub source_type: String,
	pub media_type: String,
	pub data: String,
}

impl ImageSource {
	pub fn base64_png(data: impl Into<String>) -> Self {
		Self {
			source_type: "base64".to_string(),
			media_type: IMAGE_MEDIA_TYPE.to_string(),
			data: data.into(),
		}
	}
}

impl WireMessage {
	pub fn text(role: Role, content: impl Into<String>) -> Self {
		Self {
			role,
			content: WireContent::Text(content.into()),
		}
	}

	/// User-role block message carrying one round of tool results in call
	/// order.
	pub fn tool_results(artifacts: &[ToolArtifact]) -> Self {
		Self {
			role: Role::User,
			content: WireContent::Blocks(artifacts.iter().map(ContentBlock::from).collect()),
		}
	}

	/// Back-translation for restoring locally cached history. Text content
	/// maps to a plain turn; blocks map to tool artifacts (image blocks to
	/// image artifacts, text blocks to text artifacts).
	pub fn into_turn(self) -> Turn {
		match self.content {
			WireContent::Text(text) => match self.role {
				Role::User => Turn::user(text),
				Role::Assistant => Turn::assistant(text),
			},
			WireContent::Blocks(blocks) => {
				let artifacts = blocks
					.into_iter()
					.map(|block| match block {
						ContentBlock::Text { text } => ToolArtifact::text(text),
						ContentBlock::Image { source } => ToolArtifact::image(source.data),
					})
					.collect();
				Turn::tool_results(artifacts)
			}
		}
	}
}

impl From<&ToolArtifact> for ContentBlock {
	fn from(artifact: &ToolArtifact) -> Self {
		if artifact.is_image() {
			ContentBlock::Image {
				source: ImageSource::base64_png(artifact.payload.clone()),
			}
		} else {
			ContentBlock::Text {
				text: artifact.payload.clone(),
			}
		}
	}
}

impl From<&Turn> for WireMessage {
	fn from(turn: &Turn) -> Self {
		if turn.tool_artifacts.is_empty() {
			WireMessage::text(turn.role, turn.content.clone())
		} else {
			WireMessage {
				role: turn.role,
				content: WireContent::Blocks(turn.tool_artifacts.iter().map(ContentBlock::from).collect()),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn text_turn_becomes_plain_message() {
		let turn = Turn::user("hello");
		let message = WireMessage::from(&turn);
		assert_eq!(message.role, Role::User);
		assert!(matches!(message.content, WireContent::Text(ref t) if t == "hello"));
	}

	#[test]
	fn artifact_turn_becomes_block_message() {
		let turn = Turn::tool_results(vec![
			ToolArtifact::image("aW1n"),
			ToolArtifact::command_output("hi\n"),
		]);
		let message = WireMessage::from(&turn);
		match message.content {
			WireContent::Blocks(blocks) => {
				assert_eq!(blocks.len(), 2);
				match &blocks[0] {
					ContentBlock::Image { source } => {
						assert_eq!(source.source_type, "base64");
						assert_eq!(source.media_type, IMAGE_MEDIA_TYPE);
						assert_eq!(source.data, "aW1n");
					}
					other => panic!("expected image block, got {other:?}"),
				}
				assert!(matches!(&blocks[1], ContentBlock::Text { text } if text == "hi\n"));
			}
			other => panic!("expected blocks, got {other:?}"),
		}
	}

	#[test]
	fn image_block_serializes_without_data_uri_prefix() {
		let message = WireMessage::tool_results(&[ToolArtifact::image("cGluZw==")]);
		let json = serde_json::to_value(&message).unwrap();
		assert_eq!(json["content"][0]["type"], "image");
		assert_eq!(json["content"][0]["source"]["type"], "base64");
		assert_eq!(json["content"][0]["source"]["media_type"], "image/png");
		assert_eq!(json["content"][0]["source"]["data"], "cGluZw==");
	}

	#[test]
	fn error_artifact_travels_as_text_block() {
		let message =
			WireMessage::tool_results(&[ToolArtifact::error("Failed to execute tool bash: boom", "boom")]);
		match message.content {
			WireContent::Blocks(blocks) => {
				assert!(
					matches!(&blocks[0], ContentBlock::Text { text } if text.contains("boom")),
					"model sees the diagnostic text"
				);
			}
			other => panic!("expected blocks, got {other:?}"),
		}
	}

	proptest! {
			/// Text-only turns survive a wire round trip with role and content
			/// preserved exactly.
			#[test]
			fn text_round_trip_preserves_role_and_content(
					content in "[ -~]{0,120}",
					is_user in proptest::bool::ANY,
			) {
					let turn = if is_user { Turn::user(&content) } else { Turn::assistant(&content) };
					let role = turn.role;

					let message = WireMessage::from(&turn);
					let json = serde_json::to_string(&message).unwrap();
					let parsed: WireMessage = serde_json::from_str(&json).unwrap();
					let restored = parsed.into_turn();

					prop_assert_eq!(restored.role, role);
					prop_assert_eq!(restored.content, content);
			}
	}
}
