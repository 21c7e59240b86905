// irbis-core/src/tools/get_data.rs
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::info;

use super::{validate_input, ToolProvider};
use crate::errors::ToolExecutionError;
use crate::models::tools::{
    ToolDefinition, ToolInput, ToolParameter, ToolParameterType, ToolParametersDefinition,
};
use crate::retrieval::RetrievalClient;

pub const GET_DATA_TOOL_NAME: &str = "get_data";

const DESCRIPTION: &str = "Retrieve data from the \"Northwind\" dataset with natural language queries.\n\
This dataset includes information about orders, product categories, customer demographics, employees, and geographic regions.\n\
You can use this data to provide insights into sales performance, customer behavior, shipping efficiency, and supplier contributions.";

/// The single retrieval tool: forwards the model's question to the
/// retrieval service and returns the response unmodified.
pub struct GetDataTool {
    client: RetrievalClient,
}

impl GetDataTool {
    pub fn new(client: RetrievalClient) -> Self {
        GetDataTool { client }
    }

    fn definition() -> ToolDefinition {
        let mut properties = HashMap::new();
        properties.insert(
            "user_question".to_string(),
            ToolParameter {
                param_type: ToolParameterType::String,
                description: "the natural language query to answer".to_string(),
            },
        );
        ToolDefinition {
            name: GET_DATA_TOOL_NAME.to_string(),
            description: DESCRIPTION.to_string(),
            parameters: ToolParametersDefinition {
                param_type: "object".to_string(),
                properties,
                required: vec!["user_question".to_string()],
            },
        }
    }
}

#[async_trait]
impl ToolProvider for GetDataTool {
    fn tool_definitions(&self) -> Vec<ToolDefinition> {
        vec![Self::definition()]
    }

    async fn execute(&self, tool_name: &str, input: ToolInput) -> Result<JsonValue> {
        if tool_name != GET_DATA_TOOL_NAME {
            bail!("unknown tool '{}'", tool_name);
        }
        let definition = Self::definition();
        validate_input(&definition, &input)?;
        let user_question = input
            .str_arg("user_question")
            .ok_or_else(|| anyhow!("argument 'user_question' must be a string"))?;

        info!(user_question = %user_question, "Tool call: get_data.");
        let response = self
            .client
            .retrieve(user_question)
            .await
            .map_err(|e| ToolExecutionError::new(GET_DATA_TOOL_NAME, e.to_string()))?;
        serde_json::to_value(&response).context("Failed to serialize retrieval response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetrievalConfig;
    use httpmock::prelude::*;
    use serde_json::json;

    fn tool_against(server: &MockServer) -> GetDataTool {
        let config = RetrievalConfig {
            api_key: "key".to_string(),
            datafile_id: "df-1".to_string(),
            endpoint: format!("{}/retrieve", server.base_url()),
        };
        GetDataTool::new(RetrievalClient::new(config).unwrap())
    }

    fn question_input(question: &str) -> ToolInput {
        ToolInput {
            arguments: HashMap::from([("user_question".to_string(), json!(question))]),
        }
    }

    #[test]
    fn definition_requires_user_question() {
        let definition = GetDataTool::definition();
        assert_eq!(definition.name, GET_DATA_TOOL_NAME);
        assert_eq!(definition.parameters.required, vec!["user_question"]);
    }

    #[tokio::test]
    async fn execute_passes_response_through_unmodified() {
        let server = MockServer::start_async().await;
        let payload = json!({
            "responseStatus": "SUCCESS",
            "data": [{"query": "SELECT 1", "rows": [{"n": 1}]}]
        });
        let expected = payload.clone();
        server
            .mock_async(move |when, then| {
                when.method(POST).path("/retrieve");
                then.status(200).json_body(payload.clone());
            })
            .await;

        let tool = tool_against(&server);
        let result = tool
            .execute(GET_DATA_TOOL_NAME, question_input("how many?"))
            .await
            .unwrap();
        assert_eq!(result["responseStatus"], expected["responseStatus"]);
        assert_eq!(
            result["data"][0]["rows"],
            expected["data"][0]["rows"]
        );
    }

    #[tokio::test]
    async fn execute_rejects_unknown_tool_names() {
        let server = MockServer::start_async().await;
        let tool = tool_against(&server);
        let err = tool
            .execute("drop_tables", question_input("?"))
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("unknown tool"));
    }

    #[tokio::test]
    async fn execute_rejects_missing_argument() {
        let server = MockServer::start_async().await;
        let tool = tool_against(&server);
        let err = tool
            .execute(GET_DATA_TOOL_NAME, ToolInput::default())
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("missing required argument"));
    }

    #[tokio::test]
    async fn execute_wraps_service_failures_as_tool_errors() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/retrieve");
                then.status(500).body("backend exploded");
            })
            .await;

        let tool = tool_against(&server);
        let err = tool
            .execute(GET_DATA_TOOL_NAME, question_input("anything"))
            .await
            .err()
            .unwrap();
        let message = err.to_string();
        assert!(message.contains("tool 'get_data' failed"), "got: {}", message);
    }

    #[tokio::test]
    async fn execute_rejects_non_string_argument() {
        let server = MockServer::start_async().await;
        let tool = tool_against(&server);
        let input = ToolInput {
            arguments: HashMap::from([("user_question".to_string(), json!(42))]),
        };
        let err = tool
            .execute(GET_DATA_TOOL_NAME, input)
            .await
            .err()
            .unwrap();
        assert!(err.to_string().contains("must be a string"));
    }
}
