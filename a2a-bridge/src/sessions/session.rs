use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

use crate::models::Content;

/// A runtime conversation, keyed by a caller-supplied identifier.
///
/// The identifier is the A2A `contextId`, so every task in one context shares
/// a conversation history.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub app_name: String,
    pub user_id: String,
    /// Free-form state owned by the runtime.
    pub state: HashMap<String, Value>,
    /// Conversation history, oldest first.
    pub events: Vec<Content>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>, app_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            app_name: app_name.into(),
            user_id: user_id.into(),
            state: HashMap::new(),
            events: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn get_state(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    pub fn set_state(&mut self, key: impl Into<String>, value: Value) {
        self.state.insert(key.into(), value);
        self.last_activity = Utc::now();
    }

    pub fn append_event(&mut self, content: Content) {
        self.events.push(content);
        self.last_activity = Utc::now();
    }
}
