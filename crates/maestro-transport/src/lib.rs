//! Anthropic Messages API transport.
//!
//! Implements the [`ModelTransport`] contract over HTTP. Header construction
//! and beta-capability flags live here; the core only decides which flags
//! are semantically required (via `SessionConfig::beta_flags`).

use async_trait::async_trait;
use maestro_core::{
	ModelRequest, ModelResponse, ModelTransport, ReplyBlock, SessionConfig, TransportError, Usage,
};
use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// HTTP client for the Anthropic Messages API.
pub struct AnthropicTransport {
	http: reqwest::Client,
	base_url: String,
	api_key: String,
	beta_flags: String,
}

impl AnthropicTransport {
	pub fn new(config: &SessionConfig) -> Self {
		Self {
			http: reqwest::Client::new(),
			base_url: DEFAULT_BASE_URL.to_string(),
			api_key: config.api_key.clone(),
			beta_flags: config.beta_flags().join(","),
		}
	}

	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}
}

/// Response body of a successful Messages API call.
#[derive(Debug, Deserialize)]
struct ApiResponse {
	content: Vec<ReplyBlock>,
	stop_reason: Option<String>,
	usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
	input_tokens: u32,
	output_tokens: u32,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ApiError {
	error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
	message: String,
}

fn error_message(status: u16, body: &str) -> String {
	match serde_json::from_str::<ApiError>(body) {
		Ok(parsed) => parsed.error.message,
		Err(_) => format!("unexpected response with status {status}"),
	}
}

#[async_trait]
impl ModelTransport for AnthropicTransport {
	async fn complete(&self, request: ModelRequest) -> Result<ModelResponse, TransportError> {
		let url = format!("{}/v1/messages", self.base_url);
		debug!(
			model = %request.model,
			messages = request.messages.len(),
			tools = request.tools.len(),
			thinking = request.thinking.is_some(),
			"sending completion request"
		);

		let mut builder = self
			.http
			.post(&url)
			.header("x-api-key", &self.api_key)
			.header("anthropic-version", API_VERSION)
			.header("content-type", "application/json");
		if !self.beta_flags.is_empty() {
			builder = builder.header("anthropic-beta", &self.beta_flags);
		}

		let response = builder
			.json(&request)
			.send()
			.await
			.map_err(|e| TransportError::Http(e.to_string()))?;

		let status = response.status();
		if !status.is_success() {
			let retry_after = response
				.headers()
				.get("retry-after")
				.and_then(|v| v.to_str().ok())
				.and_then(|v| v.parse().ok());
			let body = response.text().await.unwrap_or_default();
			let message = error_message(status.as_u16(), &body);
			warn!(status = status.as_u16(), message = %message, "completion request failed");

			return Err(match status.as_u16() {
				401 | 403 => TransportError::Auth(message),
				429 => TransportError::RateLimited {
					retry_after_secs: retry_after,
				},
				code => TransportError::Api {
					status: code,
					message,
				},
			});
		}

		let body: ApiResponse = response
			.json()
			.await
			.map_err(|e| TransportError::InvalidResponse(e.to_string()))?;

		debug!(
			blocks = body.content.len(),
			stop_reason = ?body.stop_reason,
			"completion response received"
		);

		Ok(ModelResponse {
			blocks: body.content,
			stop_reason: body.stop_reason,
			usage: body.usage.map(|u| Usage {
				input_tokens: u.input_tokens,
				output_tokens: u.output_tokens,
			}),
		})
	}
}
