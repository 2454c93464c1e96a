//! Orchestration loop - core processing engine
//!
//! Alternates model turns and tool-execution turns until the model produces
//! a final answer. A model turn either ends the run (no tool calls) or yields
//! a batch of tool calls, each of which is executed in request order, logged
//! in the usage tracker, and fed back into the conversation as a tool result
//! correlated by call id. The whole run sits under a wall-clock deadline.
//!
//! Failure handling follows one rule: tool-level problems (unknown tool,
//! tool error, unserializable result) are reported back to the model as
//! data and the run continues; provider failures and the iteration cap end
//! the run. Callers always get a well-formed [`AgentResponse`] either way.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use stocksense_config::Config;
use stocksense_provider::{ChatParams, Message, Provider, ToolCall, ToolCallDef, ToolChoice};

use crate::context::ContextBuilder;
use crate::tools::ToolRegistry;
use crate::usage::{UsageRecord, UsageTracker};
use crate::{AgentError, Result};

/// Shown to the user when the run itself failed
const FAILURE_APOLOGY: &str =
    "I'm sorry, I wasn't able to answer that question. Please try again.";

/// Shown to the user when the deadline expired
const TIMEOUT_APOLOGY: &str =
    "I'm sorry, that request took too long to answer. Please try again.";

/// Fallback iteration cap when not configured
const DEFAULT_MAX_ITERATIONS: u32 = 25;

/// Fallback deadline when not configured
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(25);

/// Final result of one query: answer text plus debug metadata
#[derive(Debug, Clone, Serialize)]
pub struct AgentResponse {
    pub response: String,
    pub tool_usage: Vec<UsageRecord>,
    pub message_count: usize,
    pub error: Option<String>,
}

/// Drives one conversation: model <-> tools until a final answer.
///
/// Cheap to share: provider and registry sit behind `Arc`s, and every
/// [`answer`](Self::answer) call builds its own conversation and usage
/// tracker, so concurrent queries never touch shared mutable state.
pub struct Orchestrator<P: Provider> {
    provider: Arc<P>,
    registry: Arc<ToolRegistry>,
    context: ContextBuilder,
    model: String,
    max_tokens: u32,
    temperature: f32,
    max_iterations: u32,
    timeout: Duration,
}

impl<P: Provider> Orchestrator<P> {
    /// Create an orchestrator with default limits
    pub fn new(provider: P, registry: Arc<ToolRegistry>, model: impl Into<String>) -> Self {
        Self {
            provider: Arc::new(provider),
            registry,
            context: ContextBuilder::new(),
            model: model.into(),
            max_tokens: 4096,
            temperature: 0.0,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create an orchestrator with limits taken from configuration
    pub fn with_config(provider: P, registry: Arc<ToolRegistry>, config: &Config) -> Self {
        Self {
            provider: Arc::new(provider),
            registry,
            context: ContextBuilder::new(),
            model: config.default_model(),
            max_tokens: config.agent.defaults.max_tokens,
            temperature: config.agent.defaults.temperature,
            max_iterations: config.max_tool_iterations(),
            timeout: config.answer_timeout(),
        }
    }

    /// Override the iteration cap
    pub fn set_max_iterations(&mut self, max_iterations: u32) {
        self.max_iterations = max_iterations;
    }

    /// Override the wall-clock deadline
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Answer one query.
    ///
    /// Never returns an error and never panics: failures and timeouts are
    /// folded into the response with the `error` field set and whatever
    /// usage records were captured before the run stopped.
    pub async fn answer(&self, query: &str) -> AgentResponse {
        let tracker = UsageTracker::new();
        tracker.reset();

        match tokio::time::timeout(self.timeout, self.run(query, &tracker)).await {
            Ok(Ok(outcome)) => AgentResponse {
                response: outcome.text,
                tool_usage: tracker.snapshot(),
                message_count: outcome.message_count,
                error: None,
            },
            Ok(Err(e)) => {
                error!(error = %e, "agent run failed");
                AgentResponse {
                    response: FAILURE_APOLOGY.to_string(),
                    tool_usage: tracker.snapshot(),
                    message_count: 0,
                    error: Some(e.to_string()),
                }
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "agent run timed out");
                AgentResponse {
                    response: TIMEOUT_APOLOGY.to_string(),
                    tool_usage: tracker.snapshot(),
                    message_count: 0,
                    error: Some(format!(
                        "timed out after {}s",
                        self.timeout.as_secs()
                    )),
                }
            }
        }
    }

    async fn run(&self, query: &str, tracker: &UsageTracker) -> Result<RunOutcome> {
        let mut messages = self.context.build_messages(&self.registry, query);

        for iteration in 1..=self.max_iterations {
            debug!(iteration, "model turn");

            let params = ChatParams {
                model: self.model.clone(),
                messages: messages.clone(),
                tools: self.registry.definitions(),
                max_tokens: self.max_tokens,
                temperature: self.temperature,
                tool_choice: ToolChoice::Auto,
            };

            let response = self
                .provider
                .chat(params)
                .await
                .map_err(|e| AgentError::Provider(e.to_string()))?;

            if !response.has_tool_calls() {
                let text = response.content.unwrap_or_default();
                messages.push(Message::assistant(text.clone()));
                return Ok(RunOutcome {
                    text,
                    // The system prompt is not part of the conversation.
                    message_count: messages.len().saturating_sub(1),
                });
            }

            let call_defs: Vec<ToolCallDef> = response
                .tool_calls
                .iter()
                .map(|tc| ToolCallDef::new(&tc.id, &tc.name, tc.arguments.clone()))
                .collect();
            ContextBuilder::add_assistant_message(
                &mut messages,
                response.content.as_deref(),
                Some(call_defs),
            );

            // Strictly in request order; every call gets its result appended
            // before the next model turn.
            for call in &response.tool_calls {
                let payload = self.execute_tool(call, tracker).await;
                ContextBuilder::add_tool_result(&mut messages, &call.id, &call.name, &payload);
            }
        }

        Err(AgentError::TooManyIterations(self.max_iterations))
    }

    /// Run one tool call and return the serialized payload for the
    /// conversation. Tool failures of any kind come back as an error
    /// payload, never as an `Err`.
    async fn execute_tool(&self, call: &ToolCall, tracker: &UsageTracker) -> String {
        debug!(tool = %call.name, id = %call.id, "executing tool");
        let record = tracker.begin(&call.name, call.arguments.clone());

        match self.registry.execute(&call.name, call.arguments.clone()).await {
            Ok(value) => {
                tracker.complete(record, Ok(value.clone()));
                render_payload(&value)
            }
            Err(e) => {
                let message = e.to_string();
                warn!(tool = %call.name, error = %message, "tool call failed");
                tracker.complete(record, Err(message.clone()));
                render_payload(&json!({ "error": message }))
            }
        }
    }
}

struct RunOutcome {
    text: String,
    message_count: usize,
}

/// Serialize a tool result for the conversation, degrading to the value's
/// display form rather than failing the call.
fn render_payload(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
}
