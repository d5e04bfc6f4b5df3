//! Translates bridge errors into the failure text a client sees.
//!
//! Runtime and backend error strings stay in the logs; the task's failure
//! message only says what kind of problem occurred.

use crate::errors::BridgeError;

/// Human-readable failure message for a task failed because of `error`.
#[must_use]
pub fn to_failure_message(error: &BridgeError) -> String {
    use BridgeError::{
        Cancelled, IncompleteResponse, InvalidInput, NotImplemented, RuntimeStream,
        SessionCreationFailed, SessionStore,
    };

    match error {
        IncompleteResponse => {
            "The agent finished without producing a final response.".to_string()
        }
        RuntimeStream { .. } => {
            "The agent encountered an error while processing the request.".to_string()
        }
        SessionCreationFailed { session_id, .. } | SessionStore { session_id, .. } => {
            format!("Could not open conversation session {session_id}.")
        }
        InvalidInput(message) => format!("Invalid request: {message}"),
        NotImplemented { feature } => format!("Not supported: {feature}"),
        Cancelled { .. } => "The request was cancelled.".to_string(),
        _ => "An internal error occurred while processing the request.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_details_are_not_exposed() {
        let message = to_failure_message(&BridgeError::runtime("grpc deadline exceeded at 10.0.0.3"));
        assert!(!message.contains("10.0.0.3"));
        assert!(message.contains("error"));
    }

    #[test]
    fn incomplete_response_message() {
        let message = to_failure_message(&BridgeError::IncompleteResponse);
        assert!(message.contains("final response"));
    }

    #[test]
    fn session_failure_names_session() {
        let message = to_failure_message(&BridgeError::SessionCreationFailed {
            session_id: "ctx-7".into(),
            reason: "disk full".into(),
        });
        assert!(message.contains("ctx-7"));
        assert!(!message.contains("disk full"));
    }
}
