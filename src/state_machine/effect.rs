//! Effects produced by state transitions

use crate::store::Message;
use std::time::Duration;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Publish the new session snapshot to observers
    PublishState,

    /// A message was appended to a conversation
    PublishMessage {
        conversation_id: String,
        message: Message,
    },

    /// Deliver `message` to `conversation_id` once `delay` has elapsed
    ScheduleReply {
        conversation_id: String,
        message: Message,
        delay: Duration,
    },
}

impl Effect {
    pub fn publish_message(conversation_id: impl Into<String>, message: Message) -> Self {
        Effect::PublishMessage {
            conversation_id: conversation_id.into(),
            message,
        }
    }
}
