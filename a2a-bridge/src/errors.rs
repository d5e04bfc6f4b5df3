/// Error type shared by every layer of the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    // === Content Errors ===
    /// Raised by part conversions that cannot represent a part. The codec
    /// drops such parts instead of propagating this.
    #[error("Unsupported part: {kind}")]
    UnsupportedPart { kind: String },

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(String),

    // === Session Errors ===
    #[error("Session creation failed: {session_id}: {reason}")]
    SessionCreationFailed { session_id: String, reason: String },

    #[error("Session store error: {session_id}: {reason}")]
    SessionStore { session_id: String, reason: String },

    // === Runtime Errors ===
    #[error("Agent runtime error: {reason}")]
    RuntimeStream { reason: String },

    #[error("Agent runtime ended without a final response")]
    IncompleteResponse,

    // === Task Lifecycle Errors ===
    #[error("Task already terminal: {task_id} is {state}")]
    TaskAlreadyTerminal { task_id: String, state: String },

    #[error("Invalid task state transition: {from} -> {to}")]
    InvalidTaskStateTransition { from: String, to: String },

    #[error("Task is not running: {task_id}")]
    TaskNotRunning { task_id: String },

    #[error("Task cancelled: {task_id}")]
    Cancelled { task_id: String },

    // === Request Errors ===
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Feature not implemented: {feature}")]
    NotImplemented { feature: String },

    // === Configuration Errors ===
    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Missing configuration: {field}")]
    MissingConfiguration { field: String },

    // === General Errors ===
    #[error("Serialization error: {format}: {reason}")]
    Serialization { format: String, reason: String },

    #[error("Internal error: {component}: {reason}")]
    Internal { component: String, reason: String },
}

/// Convenience type alias
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Errors raised by the agent runtime itself, as opposed to the bridge.
    pub fn runtime(reason: impl Into<String>) -> Self {
        Self::RuntimeStream {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            format: "json".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for BridgeError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::Serialization {
            format: "yaml".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<base64::DecodeError> for BridgeError {
    fn from(error: base64::DecodeError) -> Self {
        Self::InvalidBase64(error.to_string())
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(error: std::io::Error) -> Self {
        Self::Internal {
            component: "io".to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for BridgeError {
    fn from(error: tokio::task::JoinError) -> Self {
        let reason = if error.is_cancelled() {
            "task cancelled".to_string()
        } else if error.is_panic() {
            "task panicked".to_string()
        } else {
            error.to_string()
        };

        Self::Internal {
            component: "task".to_string(),
            reason,
        }
    }
}
