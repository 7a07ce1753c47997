//! Financial data analysis agent

use finsight_core::{Agent, Context, Result};
use finsight_runtime::{AgentRuntime, ExecutorConfig, ToolAgent};
use finsight_tools::ToolRegistry;
use async_trait::async_trait;
use std::sync::Arc;

use crate::cache::ResponseCache;
use crate::config::AnalysisConfig;
use crate::prompts;
use crate::tools::{MarketDataTool, SectorMetricsTool, WebSearchTool};

/// Agent specialized in analyzing individual stocks from financial data
pub struct FinancialDataAgent {
    agent: ToolAgent,
}

impl FinancialDataAgent {
    /// Create a new financial data agent
    pub fn new(runtime: Arc<AgentRuntime>, config: Arc<AnalysisConfig>) -> Result<Self> {
        // The metric lookup delegate gets its own web search capability
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
            model: config.financial_data_model.clone(),
            system_prompt: Some(prompts::financial_data()),
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
            max_iterations: 5,
        };

        let agent =
            runtime.create_tool_agent_with_registry(executor_config, registry, "financial-data");

        Ok(Self { agent })
    }
}

#[async_trait]
impl Agent for FinancialDataAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        self.agent.process(input, context).await
    }

    fn name(&self) -> &str {
        "FinancialDataAgent"
    }
}
