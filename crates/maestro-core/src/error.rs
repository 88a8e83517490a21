use thiserror::Error;

/// Result type alias for agent operations.
pub type AgentResult<T> = Result<T, AgentError>;

/// Top-level error type for a `run` invocation.
///
/// Only transport, configuration, and cancellation failures escape the
/// sampling loop. Tool execution failures never appear here; they are folded
/// into the conversation as artifacts with `error_detail` set.
#[derive(Error, Debug)]
pub enum AgentError {
	#[error("transport error: {0}")]
	Transport(#[from] TransportError),

	#[error("configuration error: {0}")]
	Config(String),

	#[error("run cancelled")]
	Cancelled,
}

/// Errors from the model transport.
#[derive(Clone, Error, Debug)]
pub enum TransportError {
	#[error("HTTP error: {0}")]
	Http(String),

	#[error("API error (status {status}): {message}")]
	Api { status: u16, message: String },

	#[error("authentication rejected: {0}")]
	Auth(String),

	#[error("rate limited: retry after {retry_after_secs:?} seconds")]
	RateLimited { retry_after_secs: Option<u64> },

	#[error("invalid response: {0}")]
	InvalidResponse(String),
}

/// Errors that can occur during tool execution.
///
/// These are recovered locally by the dispatcher and surfaced to the model
/// as error artifacts on the next round trip.
#[derive(Clone, Error, Debug)]
pub enum ToolError {
	#[error("unknown tool: {0}")]
	UnknownTool(String),

	#[error("invalid arguments: {0}")]
	InvalidArguments(String),

	#[error("IO error: {0}")]
	Io(String),

	#[error("tool execution timed out")]
	Timeout,

	#[error("adapter error: {0}")]
	Adapter(String),
}

impl From<std::io::Error> for ToolError {
	fn from(err: std::io::Error) -> Self {
		ToolError::Io(err.to_string())
	}
}
