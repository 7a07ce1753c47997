//! Analysis tools for LLM agents

pub mod market_data;
pub mod sector_metrics;
pub mod web_search;

pub use market_data::MarketDataTool;
pub use sector_metrics::SectorMetricsTool;
pub use web_search::WebSearchTool;
