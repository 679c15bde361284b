//! In-memory conversation store
//!
//! Conversations are kept newest first. Nothing here is persisted; the store
//! lives inside the logged-in session state and is dropped on logout.

mod seed;
mod types;

pub use seed::seed_conversations;
#[cfg(test)]
pub use seed::SEED_COUNT;
pub use types::*;

use crate::clock::Clock;
use serde::{Deserialize, Serialize};

/// Ordered collection of conversations, most recent first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
}

impl ConversationStore {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the demonstration conversations
    pub fn seeded(clock: &dyn Clock) -> Self {
        Self {
            conversations: seed_conversations(clock),
        }
    }

    /// Create an empty conversation at the front of the list
    pub fn create_conversation(&mut self, title: impl Into<String>, clock: &dyn Clock) -> &Conversation {
        let conv = Conversation::new(clock.new_id(), title, clock.timestamp());
        self.conversations.insert(0, conv);
        &self.conversations[0]
    }

    /// Remove a conversation. Returns whether anything was removed; unknown ids are ignored.
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != id);
        self.conversations.len() != before
    }

    /// Append to a conversation's thread. Returns false (and does nothing)
    /// when the conversation no longer exists.
    pub fn append_message(&mut self, conversation_id: &str, message: Message) -> bool {
        match self.get_mut(conversation_id) {
            Some(conv) => {
                conv.messages.push(message);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn first_id(&self) -> Option<&str> {
        self.conversations.first().map(|c| c.id.as_str())
    }

    #[cfg(test)]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn summaries(&self) -> Vec<ConversationSummary> {
        self.conversations.iter().map(Conversation::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
