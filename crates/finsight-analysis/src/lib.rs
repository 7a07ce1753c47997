//! Multi-agent stock analysis
//!
//! This crate wires the finsight agent stack into a narrative stock
//! analysis service:
//!
//! - A sector→metric reference table used as prompt context
//! - Tools for web search, market data, and sector-aware metric lookup
//! - Specialist agents (news research, financial data, portfolio analysis)
//! - A coordinating team agent that delegates to the specialists and
//!   synthesizes a structured markdown report
//!
//! # Architecture
//!
//! The coordinator is a `TeamAgent`: the coordinating model sees one
//! delegation tool per specialist, decides which to involve for a given
//! query (single stock, comparison, portfolio), and merges their answers
//! into the final report.
//!
//! # Example
//!
//! ```rust,ignore
//! use finsight_analysis::{AnalysisConfig, build_coordinator};
//! use finsight_core::{Agent, Context};
//! use finsight_llm::providers::GroqProvider;
//! use finsight_runtime::AgentRuntime;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let provider = Arc::new(GroqProvider::from_env()?);
//!     let runtime = Arc::new(AgentRuntime::builder().provider(provider).build()?);
//!     let config = Arc::new(AnalysisConfig::default().with_env()?);
//!
//!     let coordinator = build_coordinator(runtime, config)?;
//!
//!     let mut context = Context::new();
//!     let report = coordinator
//!         .process("Compare TCS and Infosys".to_string(), &mut context)
//!         .await?;
//!     println!("{report}");
//!
//!     Ok(())
//! }
//! ```

pub mod agents;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod prompts;
pub mod sectors;
pub mod tools;

// Re-export main types for convenience
pub use agents::{FinancialDataAgent, NewsSearchAgent, PortfolioAgent, build_coordinator};
pub use agents::coordinator::{GENERIC_ERROR_MESSAGE, apply_market_qualifier};
pub use config::AnalysisConfig;
pub use error::{AnalysisError, Result};
pub use sectors::{Metric, Sector, metric_table};
pub use tools::{MarketDataTool, SectorMetricsTool, WebSearchTool};
