//! Session state types

use crate::clock::Clock;
use crate::identity::IdentityStore;
use crate::store::{Conversation, ConversationStore, ConversationSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Delay between a user message and its canned reply
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(500);

/// Session state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionState {
    /// No user, no conversations
    #[default]
    LoggedOut,

    /// Authenticated user working with an in-memory set of conversations
    LoggedIn {
        user: String,
        store: ConversationStore,
        /// Always refers to a conversation in `store` when set
        active_conversation_id: Option<String>,
    },
}

impl SessionState {
    #[cfg(test)]
    pub fn is_logged_in(&self) -> bool {
        matches!(self, SessionState::LoggedIn { .. })
    }

    pub fn user(&self) -> Option<&str> {
        match self {
            SessionState::LoggedIn { user, .. } => Some(user),
            SessionState::LoggedOut => None,
        }
    }

    pub fn store(&self) -> Option<&ConversationStore> {
        match self {
            SessionState::LoggedIn { store, .. } => Some(store),
            SessionState::LoggedOut => None,
        }
    }

    pub fn active_conversation_id(&self) -> Option<&str> {
        match self {
            SessionState::LoggedIn {
                active_conversation_id,
                ..
            } => active_conversation_id.as_deref(),
            SessionState::LoggedOut => None,
        }
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        let id = self.active_conversation_id()?;
        self.store()?.get(id)
    }

    /// Read-only projection for rendering
    pub fn view(&self) -> SessionView {
        SessionView {
            user: self.user().map(String::from),
            conversations: self.store().map(ConversationStore::summaries).unwrap_or_default(),
            active_conversation: self.active_conversation().cloned(),
        }
    }
}

/// What a presentation layer renders after every mutation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub user: Option<String>,
    pub conversations: Vec<ConversationSummary>,
    pub active_conversation: Option<Conversation>,
}

impl SessionView {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn active_conversation_id(&self) -> Option<&str> {
        self.active_conversation.as_ref().map(|c| c.id.as_str())
    }
}

/// Context for a session (immutable configuration)
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub identity: IdentityStore,
    pub reply_delay: Duration,
    pub clock: Arc<dyn Clock>,
}

impl SessionContext {
    pub fn new(identity: IdentityStore, reply_delay: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            identity,
            reply_delay,
            clock,
        }
    }
}
