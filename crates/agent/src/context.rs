//! Context builder for assembling agent prompts

use stocksense_provider::{Message, ToolCallDef};

use crate::tools::ToolRegistry;

/// Builds the system prompt and conversation messages for the agent
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Render the system prompt with the registry's tool list.
    ///
    /// The tool list is emitted in registration order so the prompt is
    /// identical across runs against the same registry.
    pub fn system_prompt(&self, registry: &ToolRegistry) -> String {
        let tool_descriptions = registry
            .descriptions()
            .into_iter()
            .map(|(name, description)| format!("- {}: {}", name, description))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"You are an AI shopping operations assistant for an online merchant. Your job is to help the merchant understand their sales velocity and inventory levels.

You analyze sales, inventory, and product data to provide insights and answer operational questions.

You have access to the following tools:

{}

Always follow these guidelines:
1. Use the tools to answer questions accurately. Never make up information.
2. If you need specific product IDs or time periods that were not provided, ask for clarification.
3. Be precise and concise in your responses.
4. Format numbers clearly (use $ for dollar amounts, % for percentages).
5. Provide actionable insights where possible, such as noting critically low inventory.

Important: you must use tools to retrieve data before answering questions about inventory or sales."#,
            tool_descriptions
        )
    }

    /// Build the complete message list for one query
    pub fn build_messages(&self, registry: &ToolRegistry, query: &str) -> Vec<Message> {
        vec![
            Message::system(self.system_prompt(registry)),
            Message::user(query),
        ]
    }

    /// Append an assistant turn, with its tool calls if any
    pub fn add_assistant_message(
        messages: &mut Vec<Message>,
        content: Option<&str>,
        tool_calls: Option<Vec<ToolCallDef>>,
    ) {
        let mut msg = Message::assistant(content.unwrap_or(""));
        if let Some(calls) = tool_calls {
            msg.tool_calls = Some(calls);
        }
        messages.push(msg);
    }

    /// Append a tool result correlated to an earlier tool call
    pub fn add_tool_result(
        messages: &mut Vec<Message>,
        tool_call_id: &str,
        name: &str,
        result: &str,
    ) {
        messages.push(Message::tool(tool_call_id, name, result));
    }
}
