// irbis-core/src/api.rs

//! OpenAI-compatible chat-completions client used by the responder. One
//! function, with bounded retry on transient failures.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde_json::{json, to_value, Value};
use tokio::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::{ModelConfig, ResponderConfig};
use crate::models::chat::{ApiResponse, ChatMessage};
use crate::models::tools::ToolDefinition;

const MAX_RETRIES: u32 = 5;
const INITIAL_DELAY: Duration = Duration::from_secs(1);
const MAX_DELAY: Duration = Duration::from_secs(60);
const BACKOFF_FACTOR: f64 = 2.0;

pub async fn get_chat_completion(
    client: &Client,
    config: &ResponderConfig,
    messages: &[ChatMessage],
    tool_definitions: &[ToolDefinition],
) -> Result<ApiResponse> {
    let request_body = build_chat_request(&config.model, messages, tool_definitions)?;

    debug!(
        endpoint = %config.model.endpoint,
        model = %config.model.model_name,
        num_messages = messages.len(),
        "Sending chat completion request."
    );

    let mut retries = 0;
    let mut current_delay = INITIAL_DELAY;

    loop {
        let request = client
            .post(&config.model.endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", config.api_key));

        let response = match request.json(&request_body).send().await {
            Ok(resp) => resp,
            Err(e) => {
                if retries < MAX_RETRIES {
                    retries += 1;
                    warn!(
                        "Network error sending request: {}. Retrying in {:?} (attempt {}/{})",
                        e, current_delay, retries, MAX_RETRIES
                    );
                    tokio::time::sleep(current_delay).await;
                    current_delay = next_delay(current_delay);
                    continue;
                }
                return Err(anyhow!("Network error after {} retries: {}", MAX_RETRIES, e));
            }
        };

        let status = response.status();

        if (status.as_u16() == 429 || status.is_server_error()) && retries < MAX_RETRIES {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);

            let wait_time = retry_after.unwrap_or(current_delay);
            retries += 1;
            warn!(
                "API request failed with status {}. Retrying in {:?} (attempt {}/{})",
                status, wait_time, retries, MAX_RETRIES
            );
            tokio::time::sleep(wait_time).await;
            current_delay = next_delay(current_delay);
            continue;
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .context("Failed to read API error response body")?;
            return Err(anyhow!("API error: {} - {}", status, error_text));
        }

        let response_value: Value = response
            .json()
            .await
            .context("Failed to read API response body as JSON")?;

        let Value::Object(mut response_obj) = response_value else {
            return Err(anyhow!("API response was not a JSON object"));
        };

        // Some OpenAI-compatible backends omit the id; synthesize one so
        // deserialization stays uniform downstream.
        if !response_obj.contains_key("id") {
            response_obj.insert("id".to_string(), json!(format!("chatcmpl-{}", Uuid::new_v4())));
        }

        let api_response: ApiResponse = serde_json::from_value(Value::Object(response_obj))
            .context("Failed to deserialize API response")?;

        return Ok(api_response);
    }
}

fn next_delay(current: Duration) -> Duration {
    std::cmp::min(
        Duration::from_secs_f64(current.as_secs_f64() * BACKOFF_FACTOR),
        MAX_DELAY,
    )
}

fn build_chat_request(
    model: &ModelConfig,
    messages: &[ChatMessage],
    tool_definitions: &[ToolDefinition],
) -> Result<Value> {
    let mut request_map = serde_json::Map::new();
    request_map.insert("model".to_string(), json!(model.model_name));
    request_map.insert("messages".to_string(), to_value(messages)?);

    let tools_json: Vec<Value> = tool_definitions
        .iter()
        .map(|tool_def| {
            json!({
                "type": "function",
                "function": tool_def
            })
        })
        .collect();

    if !tools_json.is_empty() {
        request_map.insert("tools".to_string(), Value::Array(tools_json));
    }

    if let Some(parameters) = model.parameters.as_table() {
        for (key, value) in parameters {
            let json_value = to_value(value.clone())
                .with_context(|| format!("Failed to convert TOML parameter '{}' to JSON", key))?;
            request_map.insert(key.clone(), json_value);
        }
    }
    Ok(Value::Object(request_map))
}
