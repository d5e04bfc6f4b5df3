//! Content parts as the agent runtime represents them.
//!
//! [`ContentPart`] covers what can appear in a runtime event: text, binary
//! blobs (inline or by URI), and the function-call and function-response
//! descriptors the runtime produces while invoking tools.

use crate::errors::{BridgeError, BridgeResult};
use base64::Engine;
use derive_more::From;
use serde::{Deserialize, Serialize};

/// A segment of runtime content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, From)]
pub enum ContentPart {
    #[from(String, &String, &str)]
    Text(String),

    #[from]
    Data(Data),

    #[from]
    FunctionCall(FunctionCall),

    #[from]
    FunctionResponse(FunctionResponse),
}

/// Where the bytes of a [`Data`] part live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DataSource {
    Base64(String),
    Uri(String),
}

/// A binary blob with its MIME type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data {
    /// MIME type (e.g., "image/png").
    pub content_type: String,
    pub source: DataSource,
    /// Optional display name.
    pub name: Option<String>,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

/// The result of a tool invocation, fed back to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub response: serde_json::Value,
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            args,
        }
    }
}

impl ContentPart {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Inline blob part.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type is empty.
    pub fn from_base64(
        content_type: impl Into<String>,
        base64: impl Into<String>,
        name: Option<String>,
    ) -> BridgeResult<Self> {
        Ok(Self::Data(Data::new(
            content_type,
            DataSource::Base64(base64.into()),
            name,
        )?))
    }

    /// Blob part referenced by URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type is empty.
    pub fn from_uri(
        content_type: impl Into<String>,
        uri: impl Into<String>,
        name: Option<String>,
    ) -> BridgeResult<Self> {
        Ok(Self::Data(Data::new(
            content_type,
            DataSource::Uri(uri.into()),
            name,
        )?))
    }

    /// JSON value carried as an `application/json` blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn from_json(value: &serde_json::Value) -> BridgeResult<Self> {
        let bytes = serde_json::to_vec(value)?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self::from_base64("application/json", encoded, None)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(content) = self {
            Some(content.as_str())
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        if let Self::FunctionCall(call) = self {
            Some(call)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_data(&self) -> Option<&Data> {
        if let Self::Data(data) = self {
            Some(data)
        } else {
            None
        }
    }

    /// Short name of the variant, used in logs and errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Data(_) => "data",
            Self::FunctionCall(_) => "function_call",
            Self::FunctionResponse(_) => "function_response",
        }
    }

    /// True when the part carries nothing worth forwarding.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Data(data) => data.is_empty(),
            Self::FunctionCall(_) | Self::FunctionResponse(_) => false,
        }
    }
}

impl Data {
    /// # Errors
    ///
    /// Returns an error if `content_type` is empty.
    pub fn new(
        content_type: impl Into<String>,
        source: DataSource,
        name: Option<String>,
    ) -> BridgeResult<Self> {
        let content_type = content_type.into();
        if content_type.trim().is_empty() {
            return Err(BridgeError::InvalidInput(
                "data part requires a content type".to_string(),
            ));
        }
        Ok(Self {
            content_type,
            source,
            name,
        })
    }

    pub fn is_empty(&self) -> bool {
        match &self.source {
            DataSource::Base64(encoded) => encoded.is_empty(),
            DataSource::Uri(uri) => uri.is_empty(),
        }
    }

    /// Decodes an inline `application/json` blob.
    ///
    /// Returns `None` for URI sources, other MIME types, or malformed payloads.
    pub fn decode_json(&self) -> Option<serde_json::Value> {
        if self.content_type != "application/json" {
            return None;
        }
        let DataSource::Base64(encoded) = &self.source else {
            return None;
        };
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded)
            .ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}
