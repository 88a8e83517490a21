//! Tool-use orchestrator: the sampling loop.
//!
//! Drives repeated round trips with the model: submit the conversation,
//! parse the reply into text / tool calls / reasoning, execute tool calls
//! against the adapters in emission order, append results, and repeat until
//! the model stops requesting tools.
//!
//! The conversation is owned exclusively by one `run` invocation for its
//! duration; only one model call or tool call is ever in flight.

use maestro_core::{
	AgentError, AgentResult, Conversation, ModelRequest, ModelTransport, Role, SessionConfig, Turn,
	WireMessage,
};
use maestro_tools::{tool_definitions, ToolDispatcher};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Runs the sampling loop to completion.
///
/// Appends the model's reply turns and tool-result turns to `conversation`
/// in happens-before order: the assistant text/reasoning turn of a round is
/// always appended before that round's tool-result turn, and tool results
/// appear in call-emission order.
///
/// Transport and configuration failures are fatal and propagate; turns
/// appended before the failing call remain in the conversation. Tool
/// execution failures are folded into error artifacts and the loop
/// continues. Cancellation is honored between rounds, never mid-call.
pub async fn run(
	conversation: &mut Conversation,
	config: &SessionConfig,
	transport: &dyn ModelTransport,
	tools: &ToolDispatcher,
	cancel: &CancellationToken,
) -> AgentResult<()> {
	config.validate()?;

	// Bound image payload growth before anything goes on the wire. With
	// prompt caching the partial image window is abandoned entirely: a
	// cache-eligible prefix that keeps shifting because images were
	// truncated costs more than resending no images at all.
	if config.prompt_caching {
		conversation.strip_images();
	} else if config.image_retention_count > 0 {
		conversation.prune_images(config.image_retention_count, config.image_removal_block);
	}

	let mut messages: Vec<WireMessage> = conversation.snapshot().iter().map(WireMessage::from).collect();
	let tool_set = tool_definitions();
	let mut round = 0u32;

	loop {
		if cancel.is_cancelled() {
			info!(round = round, "run cancelled between rounds");
			return Err(AgentError::Cancelled);
		}
		round += 1;

		let request = ModelRequest {
			model: config.model.clone(),
			messages: messages.clone(),
			system: config.system_instructions.clone(),
			max_tokens: config.max_tokens,
			tools: tool_set.clone(),
			thinking: config
				.reasoning_budget
				.map(|budget| maestro_core::ThinkingConfig { budget }),
		};

		debug!(round = round, messages = request.messages.len(), "calling model");
		let response = transport.complete(request).await?;
		let parts = response.partition();
		info!(
			round = round,
			text_len = parts.text.len(),
			tool_calls = parts.tool_calls.len(),
			reasoning_blocks = parts.reasoning.len(),
			"model response parsed"
		);

		conversation.append(Turn::assistant_with_reasoning(
			parts.text.clone(),
			parts.reasoning,
		));

		if parts.tool_calls.is_empty() {
			return Ok(());
		}

		// Strictly sequential, in emission order: later calls in the same
		// batch may target the same coordinates or files as earlier ones.
		let mut artifacts = Vec::with_capacity(parts.tool_calls.len());
		for call in &parts.tool_calls {
			debug!(round = round, tool = %call.tool_name, call_id = %call.id, "executing tool call");
			let artifact = tools.execute(&call.tool_name, &call.arguments_json).await;
			artifacts.push(artifact);
		}

		messages.push(WireMessage::text(Role::Assistant, parts.text));
		messages.push(WireMessage::tool_results(&artifacts));
		conversation.append(Turn::tool_results(artifacts));
	}
}
