//! Session configuration.
//!
//! An explicit struct passed into the orchestrator per call; there is no
//! process-wide singleton. The surrounding shell owns persistence of
//! user-edited values.

use chrono::Utc;

use crate::error::AgentError;
use crate::retention::DEFAULT_REMOVAL_BLOCK;

/// The single supported model identifier.
pub const DEFAULT_MODEL: &str = "claude-3-7-sonnet-latest";

/// Fixed tool-definition schema version.
pub const TOOL_VERSION: &str = "computer_use_20250124";

/// Beta capability flag for [`TOOL_VERSION`].
pub const COMPUTER_USE_BETA: &str = "computer-use-2025-01-24";

/// Beta capability flag for token-efficient tool use.
pub const TOKEN_EFFICIENT_TOOLS_BETA: &str = "token-efficient-tools-2025-02-19";

/// Baked-in capability description used when the user has not supplied their
/// own system instructions.
pub fn default_system_instructions() -> String {
	let date = Utc::now().format("%A, %B %-d, %Y");
	format!(
		"<SYSTEM_CAPABILITY>\n\
		* You are Maestro, an AI-powered computer control assistant. You can help users control \
		their computer, perform various tasks, including screen interactions, command execution, \
		and text editing.\n\
		* You are running in a cross-platform desktop application with access to the user's \
		computer system. Please use these permissions carefully and always ask for user \
		confirmation for potentially risky operations.\n\
		* You can utilize an operating system with internet access.\n\
		* You can feel free to install applications with your bash tool. Use curl instead of wget \
		when possible.\n\
		* To open browsers, please just click on the browser icon.\n\
		* Using bash tool you can start GUI applications, but you may need to set appropriate \
		display environment variables.\n\
		* When using your bash tool with commands that are expected to output very large \
		quantities of text, redirect into a tmp file and use edit tool or grep to confirm output.\n\
		* When viewing a page it can be helpful to zoom out so that you can see everything on the \
		page. Either that, or make sure you scroll down to see everything before deciding \
		something isn't available.\n\
		* When using your computer function calls, they take a while to run and send back to you. \
		Where possible/feasible, try to chain multiple of these calls all into one function calls \
		request.\n\
		* The current date is {date}.\n\
		</SYSTEM_CAPABILITY>\n\
		\n\
		<IMPORTANT>\n\
		* When using browsers, if a startup wizard appears, IGNORE IT. Do not even click \"skip \
		this step\". Instead, click on the address bar where it says \"Search or enter address\", \
		and enter the appropriate search term or URL there.\n\
		* If the item you are looking at is a pdf, if after taking a single screenshot of the pdf \
		it seems that you want to read the entire document instead of trying to continue to read \
		the pdf from your screenshots + navigation, determine the URL, use curl to download the \
		pdf, install and use appropriate tools to convert it to a text file, and then read that \
		text file directly with your edit tool.\n\
		</IMPORTANT>"
	)
}

/// Per-call parameters for the sampling loop.
#[derive(Clone, Debug)]
pub struct SessionConfig {
	pub api_key: String,
	pub model: String,
	pub tool_version: String,
	/// Adds the token-efficiency transport flag when true and the model
	/// supports it.
	pub token_efficient_tools: bool,
	pub system_instructions: String,
	pub max_tokens: u32,
	/// Number of most-recent image artifacts to keep when pruning.
	/// `0` means unlimited (no pruning); this inherited overload is
	/// intentional, documented behavior.
	pub image_retention_count: usize,
	/// Images are removed in blocks of this size to keep request prefixes
	/// stable.
	pub image_removal_block: usize,
	/// Token budget enabling the model's reasoning trace when set.
	pub reasoning_budget: Option<u32>,
	pub prompt_caching: bool,
}

impl Default for SessionConfig {
	fn default() -> Self {
		Self {
			api_key: String::new(),
			model: DEFAULT_MODEL.to_string(),
			tool_version: TOOL_VERSION.to_string(),
			token_efficient_tools: true,
			system_instructions: default_system_instructions(),
			max_tokens: 4000,
			image_retention_count: 0,
			image_removal_block: DEFAULT_REMOVAL_BLOCK,
			reasoning_budget: None,
			prompt_caching: false,
		}
	}
}

impl SessionConfig {
	pub fn new(api_key: impl Into<String>) -> Self {
		Self {
			api_key: api_key.into(),
			..Self::default()
		}
	}

	pub fn with_model(mut self, model: impl Into<String>) -> Self {
		self.model = model.into();
		self
	}

	pub fn with_system_instructions(mut self, instructions: impl Into<String>) -> Self {
		self.system_instructions = instructions.into();
		self
	}

	pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
		self.max_tokens = max_tokens;
		self
	}

	pub fn with_image_retention(mut self, count: usize) -> Self {
		self.image_retention_count = count;
		self
	}

	pub fn with_reasoning_budget(mut self, budget: u32) -> Self {
		self.reasoning_budget = Some(budget);
		self
	}

	pub fn with_prompt_caching(mut self, enabled: bool) -> Self {
		self.prompt_caching = enabled;
		self
	}

	pub fn with_token_efficient_tools(mut self, enabled: bool) -> Self {
		self.token_efficient_tools = enabled;
		self
	}

	/// Beta capability flags semantically required by this configuration:
	/// the tool-version flag, plus the token-efficiency flag when both the
	/// toggle and the matching model are active.
	pub fn beta_flags(&self) -> Vec<String> {
		let mut flags = vec![COMPUTER_USE_BETA.to_string()];
		if self.token_efficient_tools && self.model == DEFAULT_MODEL {
			flags.push(TOKEN_EFFICIENT_TOOLS_BETA.to_string());
		}
		flags
	}

	/// Raised before any transport call is attempted.
	pub fn validate(&self) -> Result<(), AgentError> {
		if self.api_key.trim().is_empty() {
			return Err(AgentError::Config("API key not set".to_string()));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_config_targets_the_fixed_model() {
		let config = SessionConfig::default();
		assert_eq!(config.model, DEFAULT_MODEL);
		assert_eq!(config.tool_version, TOOL_VERSION);
		assert_eq!(config.max_tokens, 4000);
		assert_eq!(config.image_retention_count, 0);
		assert!(config.system_instructions.contains("<SYSTEM_CAPABILITY>"));
	}

	#[test]
	fn default_instructions_carry_both_prompt_sections() {
		let instructions = default_system_instructions();
		assert!(instructions.contains("browser icon"));
		assert!(instructions.contains("GUI applications"));
		assert!(instructions.contains("zoom out"));
		assert!(instructions.contains("<IMPORTANT>"));
		assert!(instructions.contains("startup wizard"));
		assert!(instructions.contains("convert it to a text file"));
	}

	#[test]
	fn beta_flags_include_token_efficiency_for_matching_model() {
		let config = SessionConfig::new("sk-test");
		assert_eq!(
			config.beta_flags(),
			vec![
				COMPUTER_USE_BETA.to_string(),
				TOKEN_EFFICIENT_TOOLS_BETA.to_string()
			]
		);
	}

	#[test]
	fn beta_flags_omit_token_efficiency_when_disabled_or_model_differs() {
		let config = SessionConfig::new("sk-test").with_token_efficient_tools(false);
		assert_eq!(config.beta_flags(), vec![COMPUTER_USE_BETA.to_string()]);

		let config = SessionConfig::new("sk-test").with_model("claude-3-5-haiku-latest");
		assert_eq!(config.beta_flags(), vec![COMPUTER_USE_BETA.to_string()]);
	}

	#[test]
	fn validate_rejects_missing_api_key() {
		let config = SessionConfig::default();
		assert!(matches!(config.validate(), Err(AgentError::Config(_))));

		let config = SessionConfig::new("sk-test");
		assert!(config.validate().is_ok());
	}
}
