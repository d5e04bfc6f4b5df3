use crate::models::{ContentPart, ExecutionEvent};

/// What an execution event means to the task lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// The model asked for tools; nothing is forwarded.
    ToolCall,
    /// Progress worth reporting as a working status update.
    Intermediate(Vec<ContentPart>),
    /// The answer that closes the task.
    Final(Vec<ContentPart>),
}

/// Classifies an execution event.
///
/// Finality wins over tool calls: a final event that also carries function
/// calls is still the terminal event.
#[must_use]
pub fn classify(event: ExecutionEvent) -> Classified {
    if event.is_final {
        return Classified::Final(event.into_parts());
    }
    if !event.function_calls().is_empty() {
        return Classified::ToolCall;
    }
    Classified::Intermediate(event.into_parts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Content, FunctionCall};
    use serde_json::json;

    #[test]
    fn final_takes_precedence_over_tool_calls() {
        let parts = vec![
            ContentPart::FunctionCall(FunctionCall::new("search", json!({}))),
            ContentPart::from_text("done"),
        ];
        let event = ExecutionEvent::new("agent", Some(Content::model(parts.clone())), true);
        assert_eq!(classify(event), Classified::Final(parts));
    }

    #[test]
    fn function_calls_are_suppressed() {
        let event = ExecutionEvent::tool_calls("agent", vec![FunctionCall::new("search", json!({}))]);
        assert_eq!(classify(event), Classified::ToolCall);
    }

    #[test]
    fn plain_content_is_intermediate() {
        let event = ExecutionEvent::intermediate("agent", vec![ContentPart::from_text("thinking...")]);
        assert_eq!(
            classify(event),
            Classified::Intermediate(vec![ContentPart::from_text("thinking...")])
        );
    }

    #[test]
    fn event_without_content_is_empty_intermediate() {
        let event = ExecutionEvent::new("agent", None, false);
        assert_eq!(classify(event), Classified::Intermediate(Vec::new()));
    }
}
