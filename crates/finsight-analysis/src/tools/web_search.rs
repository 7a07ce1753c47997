//! Tool for searching the web

use finsight_core::Result as AgentResult;
use finsight_tools::Tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::GoogleSearchClient;
use crate::cache::{CacheKey, ResponseCache};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};

/// Tool for running web searches
pub struct WebSearchTool {
    client: GoogleSearchClient,
    cache: ResponseCache,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    5
}

impl WebSearchTool {
    /// Create a new web search tool
    pub fn new(client: GoogleSearchClient, cache: ResponseCache) -> Self {
        Self { client, cache }
    }

    /// Create a web search tool from the analysis configuration
    ///
    /// Fails when the search credentials are not configured.
    pub fn from_config(config: &Arc<AnalysisConfig>) -> Result<Self> {
        let (api_key, engine_id) = config.search_credentials().ok_or_else(|| {
            AnalysisError::ConfigError(
                "web search requires GOOGLE_SEARCH_API_KEY and GOOGLE_SEARCH_ENGINE_ID".to_string(),
            )
        })?;

        let client = GoogleSearchClient::new(
            api_key,
            engine_id,
            config.search_rate_limit,
            config.request_timeout,
        )?;

        Ok(Self::new(client, ResponseCache::new(config.cache_ttl_search)))
    }

    /// Run a search with caching
    async fn run_search(&self, params: SearchParams) -> Result<Value> {
        let cache_key = CacheKey::new(&params.query, "web_search", json!({"limit": params.limit}));

        self.cache
            .get_or_fetch(cache_key, || async {
                let results = self.client.search(&params.query, params.limit).await?;

                Ok::<_, AnalysisError>(json!({
                    "query": params.query,
                    "result_count": results.len(),
                    "results": results,
                }))
            })
            .await
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: SearchParams = serde_json::from_value(params).map_err(|e| {
            finsight_core::Error::ProcessingFailed(format!("Invalid parameters: {e}"))
        })?;

        self.run_search(params)
            .await
            .map_err(|e| finsight_core::Error::ProcessingFailed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "web_search"
    }

    fn description(&self) -> &'static str {
        "Search the web for current information. \
         Returns a list of results with title, link, and snippet."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "limit": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "default": 5
                }
            },
            "required": ["query"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn tool() -> WebSearchTool {
        let client =
            GoogleSearchClient::new("key", "engine", 60, Duration::from_secs(30)).unwrap();
        WebSearchTool::new(client, ResponseCache::new(Duration::from_secs(60)))
    }

    #[test]
    fn test_tool_metadata() {
        let tool = tool();
        assert_eq!(tool.name(), "web_search");
        assert!(!tool.description().is_empty());

        let schema = tool.input_schema();
        assert_eq!(schema["type"], "object");
        assert!(schema["properties"]["query"].is_object());
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = Arc::new(AnalysisConfig::default());
        assert!(WebSearchTool::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_invalid_params_rejected() {
        let tool = tool();
        let result = tool.execute(json!({"limit": 5})).await;
        assert!(result.is_err());
    }
}
