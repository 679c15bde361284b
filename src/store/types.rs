//! Conversation and message records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// How an attachment is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    File,
}

impl AttachmentKind {
    /// `image/*` media types are images, everything else is a generic file
    pub fn from_media_type(media_type: &str) -> Self {
        if media_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        }
    }
}

/// A user-selected file held in memory only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    /// Opaque reference to the bytes (a `data:` URL when built from an upload)
    pub url: String,
    pub kind: AttachmentKind,
}

/// A single immutable chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Display string, not a machine timestamp
    pub timestamp: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn user(
        id: impl Into<String>,
        content: impl Into<String>,
        timestamp: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: content.into(),
            timestamp: timestamp.into(),
            attachments,
        }
    }

    pub fn assistant(
        id: impl Into<String>,
        content: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: content.into(),
            timestamp: timestamp.into(),
            attachments: Vec::new(),
        }
    }
}

/// A titled, append-only thread of messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: String,
}

impl Conversation {
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            messages: Vec::new(),
            created_at: created_at.into(),
        }
    }

    /// Sidebar entry for this conversation
    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at.clone(),
            message_count: self.messages.len(),
            last_message: self.messages.last().map(|m| m.content.clone()),
        }
    }
}

/// Lightweight listing of a conversation without its messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub title: String,
    pub created_at: String,
    pub message_count: usize,
    pub last_message: Option<String>,
}
