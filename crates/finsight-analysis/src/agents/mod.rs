//! Analysis agents

pub mod coordinator;
pub mod financial_data;
pub mod news_search;
pub mod portfolio;

pub use coordinator::build_coordinator;
pub use financial_data::FinancialDataAgent;
pub use news_search::NewsSearchAgent;
pub use portfolio::PortfolioAgent;
