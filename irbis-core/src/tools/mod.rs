// irbis-core/src/tools/mod.rs
use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::models::tools::{ToolDefinition, ToolInput};

pub mod get_data;

/// Supplies tool definitions to the responder and executes the calls the
/// model requests against them.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Definitions of every tool this provider exposes.
    fn tool_definitions(&self) -> Vec<ToolDefinition>;

    /// Executes the named tool. An `Err` here is reported back to the model
    /// as the tool's output rather than ending the turn.
    async fn execute(&self, tool_name: &str, input: ToolInput) -> Result<JsonValue>;
}

/// Checks an input against a definition's required argument list. Runs at
/// the provider boundary so malformed calls never reach an executor.
pub fn validate_input(definition: &ToolDefinition, input: &ToolInput) -> Result<()> {
    for name in &definition.parameters.required {
        if !input.arguments.contains_key(name) {
            bail!(
                "missing required argument '{}' for tool '{}'",
                name,
                definition.name
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tools::{ToolParameter, ToolParameterType, ToolParametersDefinition};
    use serde_json::json;
    use std::collections::HashMap;

    fn definition_with_required(required: &[&str]) -> ToolDefinition {
        let mut properties = HashMap::new();
        for name in required {
            properties.insert(
                name.to_string(),
                ToolParameter {
                    param_type: ToolParameterType::String,
                    description: format!("argument {}", name),
                },
            );
        }
        ToolDefinition {
            name: "sample".to_string(),
            description: "A sample tool".to_string(),
            parameters: ToolParametersDefinition {
                param_type: "object".to_string(),
                properties,
                required: required.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    #[test]
    fn validate_input_accepts_complete_arguments() {
        let definition = definition_with_required(&["question"]);
        let input = ToolInput {
            arguments: HashMap::from([("question".to_string(), json!("hello"))]),
        };
        assert!(validate_input(&definition, &input).is_ok());
    }

    #[test]
    fn validate_input_rejects_missing_required_argument() {
        let definition = definition_with_required(&["question"]);
        let input = ToolInput::default();
        let err = validate_input(&definition, &input).err().unwrap();
        assert!(err.to_string().contains("missing required argument"));
    }
}
