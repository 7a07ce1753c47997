//! Tool for sector-aware financial metric lookup
//!
//! Unlike the plain data tools, this one runs its own delegate agent: a
//! metric-lookup model with web search, primed with the sector table. The
//! tool returns the delegate's free-text metric report.

use finsight_core::Result as AgentResult;
use finsight_llm::LLMProvider;
use finsight_runtime::{AgentExecutor, ExecutorConfig};
use finsight_tools::{Tool, ToolRegistry};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::info;

use crate::config::AnalysisConfig;
use crate::prompts;

/// Tool that asks a dedicated metric-lookup agent for sector-relevant
/// financial metrics of a stock
pub struct SectorMetricsTool {
    executor: AgentExecutor,
}

#[derive(Debug, Deserialize)]
struct SectorMetricsParams {
    stock: String,
}

impl SectorMetricsTool {
    /// Create a new sector metrics tool
    ///
    /// # Arguments
    ///
    /// * `provider` - LLM provider for the delegate agent
    /// * `config` - Analysis configuration
    /// * `search_tool` - Web search capability for the delegate agent
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        config: &AnalysisConfig,
        search_tool: Arc<dyn Tool>,
    ) -> Self {
        let registry = Arc::new(ToolRegistry::new());
        registry.register(search_tool);

        let executor_config = ExecutorConfig {
            model: config.specialist_model.clone(),
            system_prompt: Some(prompts::sector_metrics()),
            max_tokens: config.max_tokens,
            temperature: Some(config.temperature),
            max_iterations: 5,
        };

        Self {
            executor: AgentExecutor::new(provider, registry, executor_config),
        }
    }
}

#[async_trait]
impl Tool for SectorMetricsTool {
    async fn execute(&self, params: Value) -> AgentResult<Value> {
        let params: SectorMetricsParams = serde_json::from_value(params).map_err(|e| {
            finsight_core::Error::ProcessingFailed(format!("Invalid parameters: {e}"))
        })?;

        info!(stock = %params.stock, "Running metric lookup delegate");

        let report = self
            .executor
            .run(format!(
                "Fetch the key financial metrics for {} based on its sector.",
                params.stock
            ))
            .await?;

        Ok(json!({
            "stock": params.stock,
            "metrics_report": report,
        }))
    }

    fn name(&self) -> &'static str {
        "sector_financial_metrics"
    }

    fn description(&self) -> &'static str {
        "Fetch the key financial metrics for a given stock based on its sector."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "stock": {
                    "type": "string",
                    "description": "Company or stock name (e.g., 'TCS', 'Infosys')"
                }
            },
            "required": ["stock"]
        })
    }
}
