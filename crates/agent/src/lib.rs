//! Agent core for stocksense
//!
//! The orchestration loop that alternates model turns and tool execution
//! turns until the model produces a final answer, plus the tool registry,
//! the per-request usage tracker, and the domain tools themselves.

use thiserror::Error;

pub mod context;
pub mod orchestrator;
pub mod tools;
pub mod usage;

pub use context::ContextBuilder;
pub use orchestrator::{AgentResponse, Orchestrator};
pub use tools::{build_registry, ToolRegistry, ToolTrait};
pub use usage::{UsageRecord, UsageTracker};

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("tool execution failed: {0}")]
    ToolExecution(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("too many tool iterations (limit {0})")]
    TooManyIterations(u32),
}

pub type Result<T> = std::result::Result<T, AgentError>;
