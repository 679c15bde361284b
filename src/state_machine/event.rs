//! Events that can occur in a session

use crate::store::{Attachment, Message};

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User intents
    Login {
        username: String,
        password: String,
    },
    Logout,
    SelectConversation {
        conversation_id: String,
    },
    CreateConversation,
    DeleteConversation {
        conversation_id: String,
    },
    SendMessage {
        text: String,
        attachments: Vec<Attachment>,
    },

    // Timer events
    /// A deferred reply whose delay elapsed. Targets the conversation that
    /// was active when the user message was sent.
    ReplyDue {
        conversation_id: String,
        message: Message,
    },
}

impl Event {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Login { .. } => "login",
            Event::Logout => "logout",
            Event::SelectConversation { .. } => "select_conversation",
            Event::CreateConversation => "create_conversation",
            Event::DeleteConversation { .. } => "delete_conversation",
            Event::SendMessage { .. } => "send_message",
            Event::ReplyDue { .. } => "reply_due",
        }
    }
}
