//! Poll response model

use serde_json::Value;

/// A validated response of the status endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct PollResponse {
    /// Raw homework records, in API order
    pub homeworks: Vec<Value>,
    /// New time cursor
    pub current_date: i64,
}

impl PollResponse {
    /// Whether the response carries no status changes
    pub fn is_empty(&self) -> bool {
        self.homeworks.is_empty()
    }
}
