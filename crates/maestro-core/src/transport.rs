//! Model transport contract.
//!
//! The core consumes a completion call returning structured content blocks;
//! request/response mechanics (HTTP, auth headers, beta flags) live behind
//! the [`ModelTransport`] trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conversation::ReasoningBlock;
use crate::error::TransportError;
use crate::wire::WireMessage;

/// Definition of a tool advertised to the model.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolDefinition {
	pub name: String,
	pub description: String,
	pub input_schema: Value,
}

impl ToolDefinition {
	pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
		Self {
			name: name.into(),
			description: description.into(),
			input_schema,
		}
	}
}

/// Reasoning ("thinking") request parameter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ThinkingConfig {
	pub budget: u32,
}

/// One completion request.
#[derive(Clone, Debug, Serialize)]
pub struct ModelRequest {
	pub model: String,
	pub messages: Vec<WireMessage>,
	pub system: String,
	pub max_tokens: u32,
	pub tools: Vec<ToolDefinition>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub thinking: Option<ThinkingConfig>,
}

/// A content block in the model's reply.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyBlock {
	Text {
		text: String,
	},
	ToolUse {
		id: String,
		name: String,
		input: Value,
	},
	Thinking {
		#[serde(default)]
		thinking: String,
	},
}

/// A model-issued request to invoke a named tool.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCall {
	pub id: String,
	pub tool_name: String,
	pub arguments_json: Value,
}

/// Token usage statistics reported by the transport.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Usage {
	pub input_tokens: u32,
	pub output_tokens: u32,
}

/// One completion response: the model's content blocks in emission order.
#[derive(Clone, Debug, Default)]
pub struct ModelResponse {
	pub blocks: Vec<ReplyBlock>,
	pub stop_reason: Option<String>,
	pub usage: Option<Usage>,
}

/// The response partitioned into the three buckets the orchestrator acts on.
#[derive(Clone, Debug, Default)]
pub struct ResponseParts {
	/// Concatenated plain text, in block order.
	pub text: String,
	/// Tool-call requests in emission order.
	pub tool_calls: Vec<ToolCall>,
	/// Opaque reasoning blocks in emission order.
	pub reasoning: Vec<ReasoningBlock>,
}

impl ModelResponse {
	pub fn partition(&self) -> ResponseParts {
		let mut parts = ResponseParts::default();
		for block in &self.blocks {
			match block {
				ReplyBlock::Text { text } => parts.text.push_str(text),
				ReplyBlock::ToolUse { id, name, input } => parts.tool_calls.push(ToolCall {
					id: id.clone(),
					tool_name: name.clone(),
					arguments_json: input.clone(),
				}),
				ReplyBlock::Thinking { thinking } => parts.reasoning.push(ReasoningBlock {
					kind: "thinking".to_string(),
					text: thinking.clone(),
				}),
			}
		}
		parts
	}
}

/// Trait for model transport implementations.
#[async_trait]
pub trait ModelTransport: Send + Sync {
	/// Sends a completion request and waits for the full response.
	async fn complete(&self, request: ModelRequest) -> Result<ModelResponse, TransportError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partition_buckets_blocks_in_order() {
		let response = ModelResponse {
			blocks: vec![
				ReplyBlock::Thinking {
					thinking: "pondering".to_string(),
				},
				ReplyBlock::Text {
					text: "I'll take a ".to_string(),
				},
				ReplyBlock::Text {
					text: "screenshot.".to_string(),
				},
				ReplyBlock::ToolUse {
					id: "toolu_1".to_string(),
					name: "computer".to_string(),
					input: serde_json::json!({"action": "screenshot"}),
				},
			],
			stop_reason: Some("tool_use".to_string()),
			usage: None,
		};

		let parts = response.partition();
		assert_eq!(parts.text, "I'll take a screenshot.");
		assert_eq!(parts.tool_calls.len(), 1);
		assert_eq!(parts.tool_calls[0].tool_name, "computer");
		assert_eq!(parts.reasoning.len(), 1);
		assert_eq!(parts.reasoning[0].kind, "thinking");
		assert_eq!(parts.reasoning[0].text, "pondering");
	}

	#[test]
	fn reply_blocks_deserialize_from_tagged_json() {
		let json = serde_json::json!([
			{"type": "text", "text": "hello"},
			{"type": "tool_use", "id": "toolu_2", "name": "bash", "input": {"command": "ls"}},
			{"type": "thinking", "thinking": "hmm"},
		]);
		let blocks: Vec<ReplyBlock> = serde_json::from_value(json).unwrap();
		assert!(matches!(blocks[0], ReplyBlock::Text { .. }));
		assert!(matches!(blocks[1], ReplyBlock::ToolUse { .. }));
		assert!(matches!(blocks[2], ReplyBlock::Thinking { .. }));
	}

	#[test]
	fn request_serializes_thinking_only_when_set() {
		let request = ModelRequest {
			model: "claude-3-7-sonnet-latest".to_string(),
			messages: vec![],
			system: "system".to_string(),
			max_tokens: 4000,
			tools: vec![],
			thinking: None,
		};
		let json = serde_json::to_value(&request).unwrap();
		assert!(json.get("thinking").is_none());

		let request = ModelRequest {
			thinking: Some(ThinkingConfig { budget: 1024 }),
			..request
		};
		let json = serde_json::to_value(&request).unwrap();
		assert_eq!(json["thinking"]["budget"], 1024);
	}
}
