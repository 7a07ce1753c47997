//! Google Programmable Search API client

use crate::error::{AnalysisError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// A single web search result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Result title
    pub title: String,
    /// Result URL
    pub link: String,
    /// Text snippet around the match
    pub snippet: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Client for the Google Programmable Search JSON API
pub struct GoogleSearchClient {
    client: Client,
    api_key: String,
    engine_id: String,
    rate_limiter: SharedRateLimiter,
}

impl GoogleSearchClient {
    /// Create a new search client with rate limiting
    ///
    /// # Arguments
    /// * `api_key` - Google API key
    /// * `engine_id` - Programmable Search engine ID (cx)
    /// * `rate_limit` - Requests per minute
    /// * `timeout` - Per-request timeout
    pub fn new(
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
        rate_limit: u32,
        timeout: Duration,
    ) -> Result<Self> {
        let quota = Quota::per_minute(
            NonZeroU32::new(rate_limit).unwrap_or_else(|| NonZeroU32::new(60).expect("nonzero")),
        );
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            engine_id: engine_id.into(),
            rate_limiter,
        })
    }

    /// Run a web search and return up to `limit` results
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchResult>> {
        self.rate_limiter.until_ready().await;

        // The API caps num at 10 per request
        let num = limit.clamp(1, 10);

        let response = self
            .client
            .get(SEARCH_ENDPOINT)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", &num.to_string()),
            ])
            .send()
            .await
            .map_err(|e| AnalysisError::SearchError(format!("search request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::SearchError(format!(
                "search API error {status}: {body}"
            )));
        }

        let parsed = response
            .json::<SearchResponse>()
            .await
            .map_err(|e| AnalysisError::SearchError(format!("failed to parse response: {e}")))?;

        Ok(parsed
            .items
            .into_iter()
            .take(limit)
            .map(|item| SearchResult {
                title: item.title,
                link: item.link,
                snippet: item.snippet,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client =
            GoogleSearchClient::new("test_key", "test_engine", 60, Duration::from_secs(30));
        assert!(client.is_ok());
        let client = client.unwrap();
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.engine_id, "test_engine");
    }

    #[test]
    fn test_response_parsing_without_items() {
        // Queries with no hits omit the items array entirely
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.items.is_empty());
    }

    #[test]
    fn test_response_parsing_with_items() {
        let body = r#"{
            "items": [
                {"title": "TCS Q4 results", "link": "https://example.com/a", "snippet": "Revenue up"},
                {"title": "TCS news", "link": "https://example.com/b"}
            ]
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].title, "TCS Q4 results");
        assert_eq!(parsed.items[1].snippet, "");
    }
}
