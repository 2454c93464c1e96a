//! Per-request tool usage tracking
//!
//! One tracker is created for every top-level query and threaded through the
//! orchestration run explicitly. It is never process-global: concurrent
//! queries each own their tracker, so records cannot leak across requests.

use serde::Serialize;
use serde_json::Value;
use std::sync::Mutex;

/// One logged tool invocation
#[derive(Debug, Clone, Serialize)]
pub struct UsageRecord {
    /// 1-based position in invocation-start order
    pub step: usize,
    pub tool: String,
    pub input: Value,
    /// None until the call completes (or forever, if a timeout cut it off)
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Append-only log of tool invocations for one query.
///
/// Interior mutability so the timeout guard can still snapshot records after
/// the timed run future has been dropped mid-flight.
#[derive(Debug, Default)]
pub struct UsageTracker {
    records: Mutex<Vec<UsageRecord>>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all records for a fresh query
    pub fn reset(&self) {
        self.lock().clear();
    }

    /// Allocate the next step and log an in-flight invocation.
    ///
    /// Returns an id to pass to [`complete`](Self::complete).
    pub fn begin(&self, tool: &str, input: Value) -> usize {
        let mut records = self.lock();
        let step = records.len() + 1;
        records.push(UsageRecord {
            step,
            tool: tool.to_string(),
            input,
            output: None,
            error: None,
        });
        step
    }

    /// Fill in the outcome of a previously begun invocation.
    ///
    /// An unknown id is a no-op, not a fault.
    pub fn complete(&self, id: usize, outcome: std::result::Result<Value, String>) {
        let mut records = self.lock();
        let Some(record) = id.checked_sub(1).and_then(|i| records.get_mut(i)) else {
            return;
        };
        match outcome {
            Ok(output) => record.output = Some(output),
            Err(message) => {
                record.output = Some(Value::String(message.clone()));
                record.error = Some(message);
            }
        }
    }

    /// All records so far, in invocation-start order, in-flight ones included
    pub fn snapshot(&self) -> Vec<UsageRecord> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<UsageRecord>> {
        // A poisoned lock only means a panic elsewhere; the records are
        // still usable for debug output.
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}
