// irbis-core/src/errors.rs
use thiserror::Error;

/// Errors that terminate a single responder invocation.
#[derive(Error, Debug)]
pub enum ResponderError {
    /// Configuration problem detected before any generation round ran.
    #[error("configuration error: {0}")]
    Config(String),

    /// The model API call failed after retries.
    #[error("model API error: {0}")]
    Api(#[source] anyhow::Error),

    /// The model returned a response with an empty choices array.
    #[error("model response contained no choices")]
    EmptyResponse,

    /// Every round up to the budget requested further tool calls.
    #[error("stopped after reaching the step budget of {limit} generation rounds")]
    StepBudgetExceeded { limit: usize },

    /// A requested tool call had no matching execution outcome. Indicates a
    /// contract violation; never expected in normal operation.
    #[error("no execution outcome matched tool call '{tool_call_id}'")]
    ToolResultMismatch { tool_call_id: String },
}

/// Failure of a single tool executor. Recoverable within a turn: the
/// message is fed back to the model as the tool's output and the model
/// decides whether to retry or answer without the data.
#[derive(Error, Debug)]
#[error("tool '{tool_name}' failed: {message}")]
pub struct ToolExecutionError {
    pub tool_name: String,
    pub message: String,
}

impl ToolExecutionError {
    pub fn new(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        ToolExecutionError {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }
}
