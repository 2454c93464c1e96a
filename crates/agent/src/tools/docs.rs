//! Retrieval tool over the internal document corpus

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use stocksense_kb::DocumentIndex;

use super::{ToolError, ToolTrait};

/// How many passages to hand back to the model per query
const DEFAULT_TOP_K: usize = 4;

/// Search the internal knowledge base and return relevant passages
pub struct DocsSearchTool {
    index: Arc<DocumentIndex>,
    top_k: usize,
}

impl DocsSearchTool {
    pub fn new(index: Arc<DocumentIndex>) -> Self {
        Self {
            index,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(index: Arc<DocumentIndex>, top_k: usize) -> Self {
        Self { index, top_k }
    }
}

#[derive(Deserialize)]
struct DocsSearchArgs {
    query: String,
}

#[async_trait]
impl ToolTrait for DocsSearchTool {
    fn name(&self) -> &str {
        "query_internal_documents"
    }

    fn description(&self) -> &str {
        "Search and retrieve information from internal knowledge base documents. \
         Use this tool when you need to answer questions based on proprietary or \
         specific internal data. Input should be a clear question or search query."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "A clear question or search query" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<Value, ToolError> {
        let args: DocsSearchArgs = serde_json::from_value(args)?;

        let hits = self.index.search(&args.query, self.top_k);
        if hits.is_empty() {
            return Ok(Value::String(
                "No relevant documents found for that query.".to_string(),
            ));
        }

        let passages: Vec<Value> = hits
            .into_iter()
            .map(|hit| json!({ "source": hit.source, "text": hit.text }))
            .collect();
        Ok(json!({ "passages": passages }))
    }
}
