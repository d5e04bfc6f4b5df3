//! The runtime's message type: a role plus an ordered list of parts.

use crate::models::content_part::{ContentPart, FunctionCall};
use serde::{Deserialize, Serialize};
use std::slice::Iter;

/// Who produced a piece of runtime content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Role {
    #[display("user")]
    User,
    #[display("model")]
    Model,
}

/// An immutable turn of runtime content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    role: Role,
    parts: Vec<ContentPart>,
}

impl Content {
    pub fn new(role: Role, parts: impl Into<Vec<ContentPart>>) -> Self {
        Self {
            role,
            parts: parts.into(),
        }
    }

    /// User content from a list of parts.
    pub fn user(parts: impl Into<Vec<ContentPart>>) -> Self {
        Self::new(Role::User, parts)
    }

    /// Model content from a list of parts.
    pub fn model(parts: impl Into<Vec<ContentPart>>) -> Self {
        Self::new(Role::Model, parts)
    }

    pub fn from_text(role: Role, text: impl Into<String>) -> Self {
        Self::new(role, vec![ContentPart::Text(text.into())])
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn parts(&self) -> &[ContentPart] {
        &self.parts
    }

    #[must_use]
    pub fn into_parts(self) -> Vec<ContentPart> {
        self.parts
    }

    pub fn iter(&self) -> Iter<'_, ContentPart> {
        self.parts.iter()
    }

    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.parts.iter().filter_map(ContentPart::as_text).collect()
    }

    /// Joins all text parts with newlines, or `None` if there are none.
    #[must_use]
    pub fn joined_texts(&self) -> Option<String> {
        let texts = self.texts();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }

    #[must_use]
    pub fn function_calls(&self) -> Vec<&FunctionCall> {
        self.parts
            .iter()
            .filter_map(ContentPart::as_function_call)
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }
}

impl<'a> IntoIterator for &'a Content {
    type Item = &'a ContentPart;
    type IntoIter = Iter<'a, ContentPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn texts_skip_non_text_parts() {
        let content = Content::model(vec![
            ContentPart::from_text("first"),
            ContentPart::FunctionCall(FunctionCall::new("search", json!({"q": "x"}))),
            ContentPart::from_text("second"),
        ]);

        assert_eq!(content.texts(), vec!["first", "second"]);
        assert_eq!(content.joined_texts().as_deref(), Some("first\nsecond"));
        assert_eq!(content.function_calls().len(), 1);
        assert_eq!(content.role().to_string(), "model");
    }

    #[test]
    fn empty_content_has_no_joined_text() {
        let content = Content::user(Vec::new());
        assert!(content.is_empty());
        assert_eq!(content.joined_texts(), None);
    }
}
