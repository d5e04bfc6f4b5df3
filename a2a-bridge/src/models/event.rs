//! Events emitted by the agent runtime while it processes a turn.

use crate::models::content::Content;
use crate::models::content_part::{ContentPart, FunctionCall};
use serde::{Deserialize, Serialize};

/// One step of a runtime execution.
///
/// A well-formed stream ends with exactly one event whose `is_final` flag is
/// set. Tool invocations show up as [`FunctionCall`] parts in `content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub id: String,
    pub author: String,
    pub content: Option<Content>,
    pub is_final: bool,
}

impl ExecutionEvent {
    pub fn new(author: impl Into<String>, content: Option<Content>, is_final: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            author: author.into(),
            content,
            is_final,
        }
    }

    /// Non-final event carrying model content.
    pub fn intermediate(author: impl Into<String>, parts: Vec<ContentPart>) -> Self {
        Self::new(author, Some(Content::model(parts)), false)
    }

    /// Terminal event carrying the model's answer.
    pub fn final_response(author: impl Into<String>, parts: Vec<ContentPart>) -> Self {
        Self::new(author, Some(Content::model(parts)), true)
    }

    /// Non-final event in which the model requests tool invocations.
    pub fn tool_calls(author: impl Into<String>, calls: Vec<FunctionCall>) -> Self {
        let parts = calls.into_iter().map(ContentPart::FunctionCall).collect::<Vec<_>>();
        Self::new(author, Some(Content::model(parts)), false)
    }

    /// Function calls contained in this event, empty when there is no content.
    #[must_use]
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.content
            .as_ref()
            .map(Content::function_calls)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn parts(&self) -> &[ContentPart] {
        self.content.as_ref().map_or(&[][..], Content::parts)
    }

    #[must_use]
    pub fn into_parts(self) -> Vec<ContentPart> {
        self.content.map(Content::into_parts).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn function_calls_empty_without_content() {
        let event = ExecutionEvent::new("agent", None, false);
        assert!(event.function_calls().is_empty());
        assert!(event.parts().is_empty());
    }

    #[test]
    fn tool_call_event_exposes_calls() {
        let event =
            ExecutionEvent::tool_calls("agent", vec![FunctionCall::new("lookup", json!({}))]);
        let calls = event.function_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "lookup");
        assert!(!event.is_final);
    }
}
