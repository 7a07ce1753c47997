//! News research agent

use finsight_core::{Agent, Context, Result};
use finsight_runtime::{AgentRuntime, ExecutorConfig, ToolAgent};
use finsight_tools::ToolRegistry;
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::AnalysisConfig;
use crate::prompts;
use crate::tools::WebSearchTool;

/// Agent specialized in researching news that moves stock prices
pub struct NewsSearchAgent {
    agent: ToolAgent,
}

impl NewsSearchAgent {
    /// Create a new news research agent
    pub fn new(runtime: Arc<AgentRuntime>, config: Arc<AnalysisConfig>) -> Result<Self> {
        // Private registry so this agent only sees its own tools
        let registry = Arc::new(ToolRegistry::new());
        registry.register(Arc::new(WebSearchTool::from_config(&config)?));

        let executor_config = ExecutorConfig {
            model: config.specialist_model.clone(),
            system_prompt: Some(prompts::NEWS_SEARCH.to_string()),
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
            max_iterations: 5,
        };

        let agent =
            runtime.create_tool_agent_with_registry(executor_config, registry, "news-search");

        Ok(Self { agent })
    }
}

#[async_trait]
impl Agent for NewsSearchAgent {
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        self.agent.process(input, context).await
    }

    fn name(&self) -> &str {
        "NewsSearchAgent"
    }
}
