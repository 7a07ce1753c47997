//! Coordinator construction
//!
//! Assembles the specialist agents into a coordinating team agent and owns
//! the user-facing policy strings (market qualifier, generic error message).

use finsight_core::{Agent, Result};
use finsight_runtime::{AgentRuntime, ExecutorConfig, TeamAgent};
use std::sync::Arc;

use super::{FinancialDataAgent, NewsSearchAgent, PortfolioAgent};
use crate::config::AnalysisConfig;
use crate::prompts;

/// Qualifier appended to every user query before coordination
pub const MARKET_QUALIFIER: &str = "All stocks are from NSE India.";

/// The single user-facing message shown for any report generation failure
pub const GENERIC_ERROR_MESSAGE: &str =
    "Sorry! An error occurred while processing your request. Please try again later.";

/// Append the market qualifier to a user query
pub fn apply_market_qualifier(query: &str) -> String {
    format!("{}. {MARKET_QUALIFIER}", query.trim().trim_end_matches('.'))
}

/// Build the coordinating team agent from the specialist agents
///
/// The coordinator delegates to three members:
/// - `news-search`: news affecting valuations
/// - `financial-data`: metric-driven single-stock analysis
/// - `portfolio`: portfolio-level analysis and recommendations
pub fn build_coordinator(
    runtime: Arc<AgentRuntime>,
    config: Arc<AnalysisConfig>,
) -> Result<TeamAgent> {
    let news_search = Arc::new(NewsSearchAgent::new(
        Arc::clone(&runtime),
        Arc::clone(&config),
    )?);
    let financial_data = Arc::new(FinancialDataAgent::new(
        Arc::clone(&runtime),
        Arc::clone(&config),
    )?);
    let portfolio = Arc::new(PortfolioAgent::new(
        Arc::clone(&runtime),
        Arc::clone(&config),
    )?);

    let executor_config = ExecutorConfig {
        model: config.coordinator_model.clone(),
        system_prompt: Some(prompts::coordinator()),
        max_tokens: config.max_tokens,
        temperature: Some(config.temperature),
        max_iterations: 10,
    };

    TeamAgent::builder(runtime, "coordinator")
        .add_member(
            "news-search",
            "researcher for company news and information affecting stock valuations",
            news_search as Arc<dyn Agent>,
        )
        .add_member(
            "financial-data",
            "analyst for individual stocks using sector-relevant financial metrics",
            financial_data as Arc<dyn Agent>,
        )
        .add_member(
            "portfolio",
            "analyst for stock portfolios, diversification, and risk-return trade-offs",
            portfolio as Arc<dyn Agent>,
        )
        .config(executor_config)
        .build()
}
