// irbis-core/src/config.rs

//! Configuration structures for the responder and the retrieval client.
//!
//! Everything is resolved once at startup and passed in explicitly; the
//! library never reads the process environment at request time, so tests
//! construct these structs literally.

use anyhow::{anyhow, Context, Result};
use std::env;
use url::Url;

pub const DEFAULT_MODEL_NAME: &str = "gpt-4o";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_RETRIEVAL_ENDPOINT: &str = "https://api.irbis-data.dev/v1/retrieve";

/// Generation rounds permitted per turn before the responder gives up.
pub const DEFAULT_MAX_STEPS: usize = 10;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant who can retrieve real time data using your tools. \
When users ask data-related questions, use your tools to get the data to answer them. \
After retrieving data that answers user questions give a 1 or 2 sentence summary of the data and offer a potential follow up question. \
Never offer to perform data manipulation services or other capabilities that you do not have tools to perform.";

/// Which model to talk to and where.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_name: String,
    pub endpoint: String,
    /// Extra request parameters merged verbatim into the payload
    /// (temperature and friends), as a TOML table.
    pub parameters: toml::Value,
}

/// Everything a [`crate::Responder`] needs, built once at startup.
#[derive(Debug, Clone)]
pub struct ResponderConfig {
    pub system_prompt: String,
    pub model: ModelConfig,
    pub api_key: String,
    pub max_steps: usize,
}

impl ResponderConfig {
    /// Builds the config from the process environment, failing fast on
    /// anything missing or malformed. `model_override` (from a CLI flag)
    /// wins over `MODEL_NAME`, which wins over the default.
    pub fn from_env(model_override: Option<String>) -> Result<Self> {
        let api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable is required"))?;
        let model_name = model_override
            .or_else(|| env::var("MODEL_NAME").ok())
            .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string());
        let endpoint =
            env::var("OPENAI_ENDPOINT").unwrap_or_else(|_| DEFAULT_CHAT_ENDPOINT.to_string());
        Url::parse(&endpoint)
            .with_context(|| format!("Invalid URL in OPENAI_ENDPOINT: '{}'", endpoint))?;

        Ok(ResponderConfig {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            model: ModelConfig {
                model_name,
                endpoint,
                parameters: toml::Value::Table(Default::default()),
            },
            api_key,
            max_steps: DEFAULT_MAX_STEPS,
        })
    }
}

/// Credentials and dataset scope for the retrieval service.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    pub api_key: String,
    pub datafile_id: String,
    pub endpoint: String,
}

impl RetrievalConfig {
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("RETRIEVAL_API_KEY")
            .map_err(|_| anyhow!("RETRIEVAL_API_KEY environment variable is required"))?;
        let datafile_id = env::var("RETRIEVAL_DATAFILE_ID")
            .map_err(|_| anyhow!("RETRIEVAL_DATAFILE_ID environment variable is required"))?;
        let endpoint = env::var("RETRIEVAL_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_RETRIEVAL_ENDPOINT.to_string());
        Url::parse(&endpoint)
            .with_context(|| format!("Invalid URL in RETRIEVAL_ENDPOINT: '{}'", endpoint))?;

        Ok(RetrievalConfig {
            api_key,
            datafile_id,
            endpoint,
        })
    }
}
