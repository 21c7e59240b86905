// irbis-core/src/responder.rs

//! The tool-augmented responder: repeated chat-completion rounds against a
//! fixed tool set, until the model answers without requesting tools or the
//! step budget runs out.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::{debug, error, info, trace, warn};

use crate::api;
use crate::config::ResponderConfig;
use crate::errors::ResponderError;
use crate::models::chat::{ChatMessage, Transcript};
use crate::models::tools::{ToolCall, ToolInput};
use crate::tools::ToolProvider;

/// Final payload of one [`Responder::respond`] invocation.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ResponderOutput {
    /// The model's answer from the round that requested no tools.
    pub final_text: String,
    /// Every tool call executed across the turn, in round order and call
    /// order within a round.
    pub tool_calls: Vec<ToolCallRecord>,
}

/// One executed tool call with its arguments and outcome, paired by call id.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolCallRecord {
    pub tool_call_id: String,
    pub tool_name: String,
    pub arguments: JsonValue,
    pub result: JsonValue,
    pub status: ToolExecutionStatus,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq)]
pub enum ToolExecutionStatus {
    Success,
    Failure,
}

/// Outcome of executing one requested call, before pairing into records.
struct ToolOutcome {
    tool_call_id: String,
    payload: JsonValue,
    status: ToolExecutionStatus,
}

impl ToolOutcome {
    /// Text body for the tool message appended to the transcript.
    fn content_text(&self) -> String {
        match &self.payload {
            JsonValue::String(s) => s.clone(),
            other => serde_json::to_string(other)
                .unwrap_or_else(|_| "<unserializable tool output>".to_string()),
        }
    }
}

/// Orchestrates the bounded generation loop. Holds no state across
/// invocations; a transcript is exclusively owned by one in-flight
/// [`respond`](Responder::respond) call.
pub struct Responder {
    config: ResponderConfig,
    tool_provider: Arc<dyn ToolProvider>,
    http_client: Client,
}

impl Responder {
    pub fn new(
        config: ResponderConfig,
        tool_provider: Arc<dyn ToolProvider>,
    ) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .build()
            .context("Failed to build HTTP client for responder")?;
        Ok(Responder {
            config,
            tool_provider,
            http_client,
        })
    }

    pub fn config(&self) -> &ResponderConfig {
        &self.config
    }

    /// Runs one turn: appends the user message, then loops generation
    /// rounds until the model stops requesting tools. Exceeding the step
    /// budget fails the whole invocation; no partial result is returned.
    pub async fn respond(
        &self,
        transcript: &mut Transcript,
        user_message: &str,
    ) -> Result<ResponderOutput, ResponderError> {
        transcript.push(ChatMessage {
            role: "user".to_string(),
            content: Some(user_message.to_string()),
            ..Default::default()
        });

        let tool_definitions = self.tool_provider.tool_definitions();
        let mut records: Vec<ToolCallRecord> = Vec::new();

        for step in 1..=self.config.max_steps {
            info!(
                step,
                max_steps = self.config.max_steps,
                num_messages = transcript.len(),
                "Starting generation round."
            );

            let api_response = api::get_chat_completion(
                &self.http_client,
                &self.config,
                transcript.messages(),
                &tool_definitions,
            )
            .await
            .map_err(|e| ResponderError::Api(e.context("chat completion request failed")))?;

            let choice = api_response
                .choices
                .into_iter()
                .next()
                .ok_or(ResponderError::EmptyResponse)?;
            let assistant = choice.message;
            trace!(message = ?assistant, "Assistant message received.");
            transcript.push(assistant.clone());

            let tool_calls = match assistant.tool_calls {
                Some(calls) if !calls.is_empty() => calls,
                _ => {
                    info!(
                        rounds = step,
                        tool_calls = records.len(),
                        "Model produced a final answer."
                    );
                    return Ok(ResponderOutput {
                        final_text: assistant.content.unwrap_or_default(),
                        tool_calls: records,
                    });
                }
            };

            info!(count = tool_calls.len(), "Model requested tool call(s).");
            let outcomes = self.execute_tool_calls(&tool_calls).await;
            for outcome in &outcomes {
                transcript.push(ChatMessage {
                    role: "tool".to_string(),
                    content: Some(outcome.content_text()),
                    tool_call_id: Some(outcome.tool_call_id.clone()),
                    ..Default::default()
                });
            }

            // Pair requests with outcomes by call id. Execution produces one
            // outcome per call, so a miss means the ids themselves are bad
            // (e.g. duplicates from the model) and the turn cannot be trusted.
            let mut by_id: HashMap<String, ToolOutcome> = outcomes
                .into_iter()
                .map(|o| (o.tool_call_id.clone(), o))
                .collect();
            for call in &tool_calls {
                let outcome = by_id.remove(&call.id).ok_or_else(|| {
                    error!(tool_call_id = %call.id, "Tool call has no matching execution outcome.");
                    ResponderError::ToolResultMismatch {
                        tool_call_id: call.id.clone(),
                    }
                })?;
                records.push(ToolCallRecord {
                    tool_call_id: outcome.tool_call_id,
                    tool_name: call.function.name.clone(),
                    arguments: serde_json::from_str(&call.function.arguments)
                        .unwrap_or(JsonValue::Null),
                    result: outcome.payload,
                    status: outcome.status,
                });
            }
        }

        error!(
            limit = self.config.max_steps,
            "Responder exhausted its step budget without a final answer."
        );
        Err(ResponderError::StepBudgetExceeded {
            limit: self.config.max_steps,
        })
    }

    /// Executes the round's requested calls sequentially, in request order.
    /// Failures become Failure outcomes; the error text goes back to the
    /// model, which decides whether to retry or answer without the data.
    async fn execute_tool_calls(&self, tool_calls: &[ToolCall]) -> Vec<ToolOutcome> {
        let mut outcomes = Vec::with_capacity(tool_calls.len());
        for call in tool_calls {
            let tool_name = &call.function.name;
            debug!(tool_call_id = %call.id, tool_name = %tool_name, "Executing tool.");
            trace!(arguments = %call.function.arguments, "Raw tool arguments.");

            let input = match serde_json::from_str::<HashMap<String, JsonValue>>(
                &call.function.arguments,
            ) {
                Ok(arguments) => ToolInput { arguments },
                Err(e) => {
                    warn!(tool_call_id = %call.id, tool_name = %tool_name, error = %e, "Failed to parse tool arguments.");
                    outcomes.push(ToolOutcome {
                        tool_call_id: call.id.clone(),
                        payload: JsonValue::String(format!(
                            "Error parsing arguments for tool '{}': {}",
                            tool_name, e
                        )),
                        status: ToolExecutionStatus::Failure,
                    });
                    continue;
                }
            };

            match self.tool_provider.execute(tool_name, input).await {
                Ok(payload) => {
                    info!(tool_call_id = %call.id, tool_name = %tool_name, "Tool executed successfully.");
                    outcomes.push(ToolOutcome {
                        tool_call_id: call.id.clone(),
                        payload,
                        status: ToolExecutionStatus::Success,
                    });
                }
                Err(e) => {
                    warn!(tool_call_id = %call.id, tool_name = %tool_name, error = %e, "Tool execution failed.");
                    outcomes.push(ToolOutcome {
                        tool_call_id: call.id.clone(),
                        payload: JsonValue::String(format!(
                            "Error executing tool '{}': {}",
                            tool_name, e
                        )),
                        status: ToolExecutionStatus::Failure,
                    });
                }
            }
        }
        outcomes
    }
}
