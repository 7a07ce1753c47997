//! Concrete agent implementations

pub mod team;
pub mod tool;

pub use team::{TeamAgent, TeamAgentBuilder};
pub use tool::ToolAgent;
