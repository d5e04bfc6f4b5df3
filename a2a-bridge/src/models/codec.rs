//! Conversion between A2A protocol parts and runtime content parts.
//!
//! Both directions are total: a part that has no counterpart on the other
//! side is dropped (and logged at debug level) rather than failing the whole
//! message. Order is preserved.

use crate::errors::{BridgeError, BridgeResult};
use crate::models::content::{Content, Role};
use crate::models::content_part::{ContentPart, Data, DataSource};
use a2a_types::{FileContent, FileWithBytes, FileWithUri, Message, MessageRole, Part};

/// Translates protocol parts into runtime parts.
pub fn to_runtime(parts: &[Part]) -> Vec<ContentPart> {
    parts
        .iter()
        .filter_map(|part| match part_to_runtime(part) {
            Ok(converted) => Some(converted),
            Err(err) => {
                tracing::debug!(error = %err, "dropping inbound part");
                None
            }
        })
        .collect()
}

/// Translates runtime parts into protocol parts.
pub fn to_protocol(parts: Vec<ContentPart>) -> Vec<Part> {
    parts
        .into_iter()
        .filter_map(|part| match part_to_protocol(part) {
            Ok(converted) => Some(converted),
            Err(err) => {
                tracing::debug!(error = %err, "dropping outbound part");
                None
            }
        })
        .collect()
}

/// Translates a protocol message into user content for the runtime.
pub fn message_to_content(message: &Message) -> Content {
    let role = match message.role {
        MessageRole::User => Role::User,
        MessageRole::Agent => Role::Model,
    };
    Content::new(role, to_runtime(&message.parts))
}

/// Converts a single protocol part.
///
/// # Errors
///
/// Returns [`BridgeError::UnsupportedPart`] for parts of unknown kind and
/// for files with neither bytes nor a URI.
pub fn part_to_runtime(part: &Part) -> BridgeResult<ContentPart> {
    match part {
        Part::Text { text, .. } => Ok(ContentPart::Text(text.clone())),
        Part::File { file, .. } => {
            let data = file_to_data(file);
            if data.is_empty() {
                return Err(BridgeError::UnsupportedPart {
                    kind: "empty file".to_string(),
                });
            }
            Ok(ContentPart::Data(data))
        }
        Part::Data { data, .. } => ContentPart::from_json(data),
        Part::Unknown => Err(BridgeError::UnsupportedPart {
            kind: "unknown".to_string(),
        }),
    }
}

/// Converts a single runtime part.
///
/// # Errors
///
/// Returns [`BridgeError::UnsupportedPart`] for function-call and
/// function-response parts and for parts with an empty payload.
pub fn part_to_protocol(part: ContentPart) -> BridgeResult<Part> {
    if part.is_empty() {
        return Err(BridgeError::UnsupportedPart {
            kind: format!("empty {}", part.kind()),
        });
    }
    match part {
        ContentPart::Text(text) => Ok(Part::text(text)),
        ContentPart::Data(data) => Ok(data_to_part(data)),
        other @ (ContentPart::FunctionCall(_) | ContentPart::FunctionResponse(_)) => {
            Err(BridgeError::UnsupportedPart {
                kind: other.kind().to_string(),
            })
        }
    }
}

fn file_to_data(file: &FileContent) -> Data {
    let (source, mime_type, name) = match file {
        FileContent::WithBytes(FileWithBytes {
            bytes,
            mime_type,
            name,
        }) => (DataSource::Base64(bytes.clone()), mime_type, name),
        FileContent::WithUri(FileWithUri {
            uri,
            mime_type,
            name,
        }) => (DataSource::Uri(uri.clone()), mime_type, name),
    };
    Data {
        content_type: mime_type
            .clone()
            .filter(|mime| !mime.is_empty())
            .unwrap_or_else(|| a2a_types::DEFAULT_FILE_MIME_TYPE.to_string()),
        source,
        name: name.clone(),
    }
}

/// Unnamed inline JSON becomes a structured data part; anything else,
/// including named JSON files, stays a file.
fn data_to_part(data: Data) -> Part {
    if data.name.is_none() {
        if let Some(value) = data.decode_json() {
            return Part::data(value);
        }
    }
    let Data {
        content_type,
        source,
        name,
    } = data;
    match source {
        DataSource::Base64(bytes) => Part::file(FileWithBytes {
            bytes,
            mime_type: Some(content_type),
            name,
        }),
        DataSource::Uri(uri) => Part::file(FileWithUri {
            uri,
            mime_type: Some(content_type),
            name,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content_part::FunctionCall;
    use serde_json::json;

    #[test]
    fn unknown_parts_are_dropped() {
        let parts = vec![Part::text("hi"), Part::Unknown];
        let runtime = to_runtime(&parts);
        assert_eq!(runtime, vec![ContentPart::from_text("hi")]);
        assert_eq!(to_protocol(runtime), vec![Part::text("hi")]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(to_runtime(&[]).is_empty());
        assert!(to_protocol(Vec::new()).is_empty());
    }

    #[test]
    fn text_translation_is_idempotent() {
        let parts = vec![Part::text("alpha"), Part::text(""), Part::text("beta")];
        let once = to_protocol(to_runtime(&parts));
        let twice = to_protocol(to_runtime(&once));
        assert_eq!(once, twice);
        assert_eq!(once, vec![Part::text("alpha"), Part::text("beta")]);
    }

    #[test]
    fn function_parts_never_reach_the_protocol() {
        let parts = vec![
            ContentPart::FunctionCall(FunctionCall::new("search", json!({"q": "rust"}))),
            ContentPart::from_text("result"),
        ];
        assert_eq!(to_protocol(parts), vec![Part::text("result")]);
    }

    #[test]
    fn file_without_mime_type_gets_default() {
        let part = Part::file(FileWithBytes {
            bytes: "aGVsbG8=".to_string(),
            mime_type: None,
            name: Some("greeting.txt".to_string()),
        });

        let runtime = to_runtime(&[part]);
        let data = runtime[0].as_data().expect("data part");
        assert_eq!(data.content_type, "application/octet-stream");
        assert_eq!(data.source, DataSource::Base64("aGVsbG8=".to_string()));
        assert_eq!(data.name.as_deref(), Some("greeting.txt"));
    }

    #[test]
    fn uri_file_maps_back_to_uri_file() {
        let part = Part::file(FileWithUri {
            uri: "gs://corpus/doc.pdf".to_string(),
            mime_type: Some("application/pdf".to_string()),
            name: None,
        });

        let back = to_protocol(to_runtime(&[part.clone()]));
        assert_eq!(back, vec![part]);
    }

    #[test]
    fn structured_data_survives_both_directions() {
        let part = Part::data(json!({"items": ["a", "b"]}));
        let back = to_protocol(to_runtime(&[part.clone()]));
        assert_eq!(back, vec![part]);
    }

    #[test]
    fn named_json_file_stays_a_file() {
        let part = Part::file(FileWithBytes {
            bytes: "eyJhIjoxfQ==".to_string(),
            mime_type: Some("application/json".to_string()),
            name: Some("manifest.json".to_string()),
        });

        let back = to_protocol(to_runtime(&[part.clone()]));
        assert_eq!(back, vec![part]);
    }

    #[test]
    fn empty_files_are_dropped_inbound() {
        let parts = vec![
            Part::file(FileWithBytes {
                bytes: String::new(),
                mime_type: Some("image/png".to_string()),
                name: None,
            }),
            Part::file(FileWithUri {
                uri: String::new(),
                mime_type: None,
                name: Some("missing.pdf".to_string()),
            }),
            Part::text("caption"),
        ];

        assert_eq!(to_runtime(&parts), vec![ContentPart::from_text("caption")]);
        assert!(matches!(
            part_to_runtime(&parts[0]),
            Err(BridgeError::UnsupportedPart { .. })
        ));
    }

    #[test]
    fn message_role_maps_to_runtime_role() {
        let message = Message::new("m1", MessageRole::User, vec![Part::text("list items")]);
        let content = message_to_content(&message);
        assert_eq!(content.role(), Role::User);
        assert_eq!(content.texts(), vec!["list items"]);
    }
}
