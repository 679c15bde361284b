//! API request and response types

use crate::state_machine::SessionView;
use crate::store::{Attachment, AttachmentKind, Conversation, ConversationSummary};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Request to log in
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Request to send a chat message to the active conversation
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentUpload>,
}

/// A file selected by the user, inlined as base64
#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentUpload {
    pub name: String,
    #[serde(default)]
    pub media_type: Option<String>,
    /// Base64-encoded file content
    pub data: String,
}

impl AttachmentUpload {
    /// Validate the payload and turn it into an in-memory attachment
    /// referenced by a `data:` URL
    pub fn into_attachment(self) -> Result<Attachment, String> {
        if self.name.trim().is_empty() {
            return Err("Attachment name is empty".to_string());
        }
        STANDARD
            .decode(self.data.as_bytes())
            .map_err(|e| format!("Attachment {} is not valid base64: {e}", self.name))?;

        let media_type = self.media_type.filter(|m| !m.is_empty()).unwrap_or_else(|| {
            mime_guess::from_path(&self.name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        });

        Ok(Attachment {
            kind: AttachmentKind::from_media_type(&media_type),
            url: format!("data:{media_type};base64,{}", self.data),
            name: self.name,
        })
    }
}

/// Response with the full session view
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub view: SessionView,
}

/// Response with a list of conversations
#[derive(Debug, Serialize)]
pub struct ConversationListResponse {
    pub conversations: Vec<ConversationSummary>,
    pub active_conversation_id: Option<String>,
}

/// Response with a single conversation
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation: Conversation,
}

/// Response for chat action
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Whether a reply is on its way
    pub queued: bool,
    pub conversation: Option<Conversation>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(name: &str, media_type: Option<&str>, data: &str) -> AttachmentUpload {
        AttachmentUpload {
            name: name.to_string(),
            media_type: media_type.map(String::from),
            data: data.to_string(),
        }
    }

    #[test]
    fn test_image_by_media_type() {
        let attachment = upload("scan", Some("image/jpeg"), "aGVsbG8=")
            .into_attachment()
            .unwrap();
        assert_eq!(attachment.kind, AttachmentKind::Image);
        assert_eq!(attachment.url, "data:image/jpeg;base64,aGVsbG8=");
    }

    #[test]
    fn test_media_type_guessed_from_name() {
        let image = upload("foto.png", None, "aGVsbG8=").into_attachment().unwrap();
        assert_eq!(image.kind, AttachmentKind::Image);
        assert!(image.url.starts_with("data:image/png;base64,"));

        let doc = upload("report.pdf", None, "aGVsbG8=").into_attachment().unwrap();
        assert_eq!(doc.kind, AttachmentKind::File);

        let unknown = upload("blob", None, "aGVsbG8=").into_attachment().unwrap();
        assert_eq!(unknown.kind, AttachmentKind::File);
        assert!(unknown.url.starts_with("data:application/octet-stream;base64,"));
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let err = upload("foto.png", None, "not base64!").into_attachment().unwrap_err();
        assert!(err.contains("foto.png"));
    }

    #[test]
    fn test_blank_name_rejected() {
        assert!(upload("  ", None, "aGVsbG8=").into_attachment().is_err());
    }
}
