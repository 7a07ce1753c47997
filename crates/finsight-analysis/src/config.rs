//! Configuration for stock analysis operations

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for stock analysis operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Model used by the coordinating team agent
    pub coordinator_model: String,

    /// Model used by the news and portfolio specialists (and metric lookup)
    pub specialist_model: String,

    /// Model used by the financial data specialist
    pub financial_data_model: String,

    /// Max tokens per completion
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// Cache TTL for web search responses
    pub cache_ttl_search: Duration,

    /// Cache TTL for market data (quotes, prices)
    pub cache_ttl_market: Duration,

    /// Request timeout duration for outbound API calls
    pub request_timeout: Duration,

    /// Web search API key (Google Programmable Search)
    pub search_api_key: Option<String>,

    /// Web search engine ID (Google Programmable Search)
    pub search_engine_id: Option<String>,

    /// Search requests allowed per minute
    pub search_rate_limit: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            coordinator_model: "meta-llama/llama-4-maverick-17b-128e-instruct".to_string(),
            specialist_model: "meta-llama/llama-4-maverick-17b-128e-instruct".to_string(),
            financial_data_model: "meta-llama/llama-4-scout-17b-16e-instruct".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            cache_ttl_search: Duration::from_secs(300), // 5 minutes
            cache_ttl_market: Duration::from_secs(60),  // 1 minute
            request_timeout: Duration::from_secs(30),
            search_api_key: None,
            search_engine_id: None,
            search_rate_limit: 60,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Load search credentials from the environment
    ///
    /// Reads `GOOGLE_SEARCH_API_KEY` and `GOOGLE_SEARCH_ENGINE_ID` if set.
    pub fn with_env(mut self) -> Result<Self> {
        if let Ok(key) = std::env::var("GOOGLE_SEARCH_API_KEY") {
            self.search_api_key = Some(key);
        }
        if let Ok(id) = std::env::var("GOOGLE_SEARCH_ENGINE_ID") {
            self.search_engine_id = Some(id);
        }
        Ok(self)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.search_api_key.is_some() != self.search_engine_id.is_some() {
            return Err(AnalysisError::ConfigError(
                "search_api_key and search_engine_id must be set together".to_string(),
            ));
        }

        if self.search_rate_limit == 0 {
            return Err(AnalysisError::ConfigError(
                "search_rate_limit must be greater than 0".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(AnalysisError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured search credentials, if complete
    pub fn search_credentials(&self) -> Option<(&str, &str)> {
        match (&self.search_api_key, &self.search_engine_id) {
            (Some(key), Some(id)) => Some((key.as_str(), id.as_str())),
            _ => None,
        }
    }
}

/// Builder for AnalysisConfig
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    coordinator_model: Option<String>,
    specialist_model: Option<String>,
    financial_data_model: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    cache_ttl_search: Option<Duration>,
    cache_ttl_market: Option<Duration>,
    request_timeout: Option<Duration>,
    search_api_key: Option<String>,
    search_engine_id: Option<String>,
    search_rate_limit: Option<u32>,
}

impl AnalysisConfigBuilder {
    /// Set the coordinator model
    pub fn coordinator_model(mut self, model: impl Into<String>) -> Self {
        self.coordinator_model = Some(model.into());
        self
    }

    /// Set the specialist model
    pub fn specialist_model(mut self, model: impl Into<String>) -> Self {
        self.specialist_model = Some(model.into());
        self
    }

    /// Set the financial data model
    pub fn financial_data_model(mut self, model: impl Into<String>) -> Self {
        self.financial_data_model = Some(model.into());
        self
    }

    /// Set max tokens per completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set cache TTL for search responses
    pub fn cache_ttl_search(mut self, duration: Duration) -> Self {
        self.cache_ttl_search = Some(duration);
        self
    }

    /// Set cache TTL for market data
    pub fn cache_ttl_market(mut self, duration: Duration) -> Self {
        self.cache_ttl_market = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set search credentials
    pub fn search_credentials(
        mut self,
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Self {
        self.search_api_key = Some(api_key.into());
        self.search_engine_id = Some(engine_id.into());
        self
    }

    /// Set the search rate limit (requests per minute)
    pub fn search_rate_limit(mut self, limit: u32) -> Self {
        self.search_rate_limit = Some(limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalysisConfig> {
        let defaults = AnalysisConfig::default();

        let config = AnalysisConfig {
            coordinator_model: self.coordinator_model.unwrap_or(defaults.coordinator_model),
            specialist_model: self.specialist_model.unwrap_or(defaults.specialist_model),
            financial_data_model: self
                .financial_data_model
                .unwrap_or(defaults.financial_data_model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            cache_ttl_search: self.cache_ttl_search.unwrap_or(defaults.cache_ttl_search),
            cache_ttl_market: self.cache_ttl_market.unwrap_or(defaults.cache_ttl_market),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            search_api_key: self.search_api_key,
            search_engine_id: self.search_engine_id,
            search_rate_limit: self.search_rate_limit.unwrap_or(defaults.search_rate_limit),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(
            config.coordinator_model,
            "meta-llama/llama-4-maverick-17b-128e-instruct"
        );
        assert_eq!(
            config.financial_data_model,
            "meta-llama/llama-4-scout-17b-16e-instruct"
        );
        assert!(config.validate().is_ok());
        assert!(config.search_credentials().is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = AnalysisConfig::builder()
            .coordinator_model("test-model")
            .max_tokens(2048)
            .request_timeout(Duration::from_secs(60))
            .search_credentials("key", "engine")
            .build()
            .unwrap();

        assert_eq!(config.coordinator_model, "test-model");
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.search_credentials(), Some(("key", "engine")));
    }

    #[test]
    fn test_validation_partial_search_credentials() {
        let config = AnalysisConfig {
            search_api_key: Some("key".to_string()),
            search_engine_id: None,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_rate_limit() {
        let config = AnalysisConfig {
            search_rate_limit: 0,
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }
}
