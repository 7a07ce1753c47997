//! Portfolio analysis agent

use finsight_core::{Agent, Context, Result};
use finsight_runtime::{AgentRuntime, ExecutorConfig, ToolAgent};
use finsight_tools::ToolRegistry;
use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::config::AnalysisConfig;
use crate::prompts;
use crate::tools::{MarketDataTool, SectorMetricsTool, WebSearchTool};

/// Agent specialized in portfolio-level analysis and recommendations
pub struct PortfolioAgent {
    agent: ToolAgent,
}

impl PortfolioAgent {
    /// Create a new portfolio analysis agent
    pub fn new(runtime: Arc<AgentRuntime>, config: Arc<AnalysisConfig>) -> Result<Self> {
        let search_tool = Arc::new(WebSearchTool::from_config(&config)?);
        let metrics_tool = Arc::new(SectorMetricsTool::new(
            runtime.provider().clone(),
            &config,
            search_tool,
        ));
        let market_tool = Arc::new(MarketDataTool::new(ResponseCache::new(
            config.cache_ttl_market,
        )));

        let registry = Arc::new(ToolRegistry::new());
        registry.register(metrics_tool);
        registry.register(market_tool);

        let executor_config = ExecutorConfig {
            model: config.specialist_model.clone(),
            system_prompt: Some(prompts::portfolio()),
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
            max_iterations: 5,
        };

        let agent = runtime.create_tool_agent_with_registry(executor_config, registry, "portfolio");

        Ok(Self { agent })
    }
}

#[async_trait]
impl Agent for PortfolioAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        self.agent.process(input, context).await
    }

    fn name(&self) -> &str {
        "PortfolioAgent"
    }
}
