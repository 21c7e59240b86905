// irbis-core/src/retrieval.rs

//! Thin client for the hosted natural-language retrieval service. The
//! service takes a question scoped to a datafile and returns rows together
//! with the query it generated; the client passes the response through
//! unmodified. Interpretation is the model's job.

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, trace};

use crate::config::RetrievalConfig;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RetrievalRequest<'a> {
    user_query: &'a str,
    datafile_id: &'a str,
}

/// Response envelope returned by the retrieval service.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResponse {
    pub response_status: String,
    #[serde(default)]
    pub data: Vec<RetrievedData>,
}

/// One result set: the generated query and the rows it produced.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RetrievedData {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub rows: Vec<Map<String, JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct RetrievalClient {
    config: RetrievalConfig,
    http_client: Client,
}

impl RetrievalClient {
    pub fn new(config: RetrievalConfig) -> Result<Self> {
        let http_client = Client::builder()
            .build()
            .context("Failed to build HTTP client for retrieval service")?;
        Ok(RetrievalClient {
            config,
            http_client,
        })
    }

    /// Sends one natural-language question to the retrieval service.
    pub async fn retrieve(&self, user_query: &str) -> Result<RetrievalResponse> {
        debug!(datafile_id = %self.config.datafile_id, "Sending retrieval request.");
        trace!(user_query = %user_query, "Retrieval question.");

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&RetrievalRequest {
                user_query,
                datafile_id: &self.config.datafile_id,
            })
            .send()
            .await
            .context("Failed to reach the retrieval service")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read retrieval response body")?;
        if !status.is_success() {
            return Err(anyhow!("Retrieval service error: {} - {}", status, body));
        }

        let parsed: RetrievalResponse =
            serde_json::from_str(&body).context("Failed to deserialize retrieval response")?;
        debug!(
            status = %parsed.response_status,
            result_sets = parsed.data.len(),
            "Retrieval response received."
        );
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn test_config(endpoint: String) -> RetrievalConfig {
        RetrievalConfig {
            api_key: "test-retrieval-key".to_string(),
            datafile_id: "df-123".to_string(),
            endpoint,
        }
    }

    #[tokio::test]
    async fn retrieve_posts_camel_case_body_and_decodes_response() {
        let server = MockServer::start_async().await;
        let config = test_config(format!("{}/v1/retrieve", server.base_url()));

        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/retrieve")
                    .header("Authorization", "Bearer test-retrieval-key")
                    .json_body(json!({
                        "userQuery": "top 5 products by revenue",
                        "datafileId": "df-123"
                    }));
                then.status(200).json_body(json!({
                    "responseStatus": "SUCCESS",
                    "data": [{
                        "query": "SELECT name, revenue FROM products ORDER BY revenue DESC LIMIT 5",
                        "rows": [
                            {"name": "Côte de Blaye", "revenue": 141396.74},
                            {"name": "Thüringer Rostbratwurst", "revenue": 80368.67}
                        ],
                        "querySummary": "Top products by revenue"
                    }]
                }));
            })
            .await;

        let client = RetrievalClient::new(config).unwrap();
        let response = client.retrieve("top 5 products by revenue").await.unwrap();
        mock.assert_async().await;

        assert_eq!(response.response_status, "SUCCESS");
        assert_eq!(response.data.len(), 1);
        let data = &response.data[0];
        assert_eq!(data.rows.len(), 2);
        assert_eq!(data.rows[0]["name"], json!("Côte de Blaye"));
        assert_eq!(
            data.query_summary.as_deref(),
            Some("Top products by revenue")
        );
    }

    #[tokio::test]
    async fn retrieve_surfaces_service_errors() {
        let server = MockServer::start_async().await;
        let config = test_config(format!("{}/v1/retrieve", server.base_url()));

        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1/retrieve");
                then.status(503).body("service unavailable");
            })
            .await;

        let client = RetrievalClient::new(config).unwrap();
        let err = client.retrieve("anything").await.err().unwrap();
        assert!(
            err.to_string().contains("Retrieval service error: 503"),
            "unexpected error: {}",
            err
        );
    }
}
