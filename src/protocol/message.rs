//! A2A message types

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A message in the A2A protocol
///
/// Messages are the primary unit of communication between agents.
/// Each message has a role, an ordered list of parts (text, file, or data),
/// and optional metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message identifier
    #[serde(default)]
    pub message_id: String,

    /// Optional context identifier (for multi-turn conversations)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Optional task identifier (for associating message with a task)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    /// Role of the message sender
    pub role: Role,

    /// Message content parts, in insertion order
    ///
    /// Parts with an unknown or missing `kind` are dropped on decode.
    #[serde(default, deserialize_with = "deserialize_parts")]
    pub parts: Vec<Part>,

    /// Optional metadata for the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl Message {
    /// Create an empty message with a fresh identifier
    pub fn new(role: Role) -> Self {
        Self {
            message_id: format!("msg-{}", Uuid::now_v7()),
            context_id: None,
            task_id: None,
            role,
            parts: Vec::new(),
            metadata: None,
        }
    }

    /// Create a user message with text content
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User).with_text(text)
    }

    /// Create an agent message with text content
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent).with_text(text)
    }

    /// Create a system message with text content
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System).with_text(text)
    }

    /// Create a new message builder
    pub fn builder(role: Role) -> MessageBuilder {
        MessageBuilder::new(role)
    }

    /// Set the message ID
    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = id.into();
        self
    }

    /// Set the context ID
    pub fn with_context_id(mut self, id: impl Into<String>) -> Self {
        self.context_id = Some(id.into());
        self
    }

    /// Set the task ID
    pub fn with_task_id(mut self, id: impl Into<String>) -> Self {
        self.task_id = Some(id.into());
        self
    }

    /// Append a text part
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_part(Part::text(text))
    }

    /// Append a file part
    pub fn with_file(
        self,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.with_part(Part::file(name, mime_type, bytes))
    }

    /// Append a structured data part
    pub fn with_data(self, data: Value) -> Self {
        self.with_part(Part::data(data))
    }

    /// Append a message part
    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    /// Add a metadata field to the message
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value);
        self
    }

    /// Content of the first text part, or an empty string if there is none
    pub fn get_text(&self) -> &str {
        self.parts
            .iter()
            .find_map(Part::as_text)
            .unwrap_or_default()
    }
}

/// Builder for constructing Message instances
#[derive(Debug)]
pub struct MessageBuilder {
    message: Message,
}

impl MessageBuilder {
    /// Create a new message builder for the given role
    pub fn new(role: Role) -> Self {
        Self {
            message: Message::new(role),
        }
    }

    /// Replace the message parts
    pub fn parts(mut self, parts: Vec<Part>) -> Self {
        self.message.parts = parts;
        self
    }

    /// Add a single part to the message
    pub fn part(mut self, part: Part) -> Self {
        self.message.parts.push(part);
        self
    }

    /// Set the message ID
    pub fn message_id(mut self, id: impl Into<String>) -> Self {
        self.message.message_id = id.into();
        self
    }

    /// Set the task ID
    pub fn task_id(mut self, id: impl Into<String>) -> Self {
        self.message.task_id = Some(id.into());
        self
    }

    /// Set the context ID
    pub fn context_id(mut self, id: impl Into<String>) -> Self {
        self.message.context_id = Some(id.into());
        self
    }

    /// Add a metadata field
    pub fn metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.message = self.message.with_metadata(key, value);
        self
    }

    /// Build the message
    pub fn build(self) -> Message {
        self.message
    }
}

/// Role of a message sender
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from a user
    User,

    /// Message from an AI agent
    Agent,

    /// System instruction
    System,
}

/// File content carried inline in a file part
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileContent {
    /// Name of the file
    #[serde(default, alias = "filename")]
    pub name: String,

    /// MIME type of the file
    #[serde(default = "default_mime_type")]
    pub mime_type: String,

    /// Raw file content, base64 encoded on the wire
    #[serde(default, with = "base64_bytes", alias = "data")]
    pub bytes: Vec<u8>,

    /// URI reference to the file, for content held elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

fn default_mime_type() -> String {
    "application/octet-stream".to_string()
}

/// A part of a message
///
/// Exactly one of text, file or structured data, discriminated by `kind` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Part {
    /// Text content
    Text {
        /// The text content
        text: String,
    },

    /// Inline or referenced file
    File {
        /// File content
        file: FileContent,
    },

    /// Structured data
    Data {
        /// The structured data
        data: Value,
    },
}

impl Part {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a file part with inline bytes
    pub fn file(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self::File {
            file: FileContent {
                name: name.into(),
                mime_type: mime_type.into(),
                bytes: bytes.into(),
                uri: None,
            },
        }
    }

    /// Create a file part referencing content by URI
    pub fn file_uri(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Self::File {
            file: FileContent {
                name: name.into(),
                mime_type: mime_type.into(),
                bytes: Vec::new(),
                uri: Some(uri.into()),
            },
        }
    }

    /// Create a data part
    pub fn data(data: Value) -> Self {
        Self::Data { data }
    }

    /// Text content if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Wire discriminant of this part
    pub fn kind(&self) -> &'static str {
        match self {
            Part::Text { .. } => "text",
            Part::File { .. } => "file",
            Part::Data { .. } => "data",
        }
    }
}

fn deserialize_parts<'de, D>(deserializer: D) -> Result<Vec<Part>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    let parts = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Part>(value) {
            Ok(part) => Some(part),
            Err(err) => {
                tracing::debug!(error = %err, "dropping unrecognized message part");
                None
            }
        })
        .collect();
    Ok(parts)
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
