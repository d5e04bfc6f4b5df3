//! Shared setup for integration tests.

#![allow(dead_code)]

use a2a_bridge::a2a::{Message, MessageRole, MessageSendParams, Part};
use std::sync::Once;

static INIT: Once = Once::new();

/// Loads `.env` if present and installs the tracing subscriber once.
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = dotenvy::dotenv();
        a2a_bridge::logging::init_tracing();
    });
}

pub fn user_message(text: &str) -> Message {
    Message::new(
        uuid::Uuid::new_v4().to_string(),
        MessageRole::User,
        vec![Part::text(text)],
    )
}

pub fn send_params(message: Message) -> MessageSendParams {
    MessageSendParams {
        message,
        metadata: None,
    }
}
