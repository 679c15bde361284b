//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! new state and effects. Ids and timestamps come from the context clock.

use super::{Effect, Event, SessionContext, SessionState};
use crate::responder;
use crate::store::{Attachment, ConversationStore, Message};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    /// State unchanged, nothing to do
    fn unchanged(state: &SessionState) -> Self {
        Self::new(state.clone())
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Input rejected before any state change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Inserire username e password")]
    EmptyCredentials,
    #[error("Scrivi un messaggio o allega un file")]
    EmptyMessage,
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Credenziali non valide")]
    InvalidCredentials,
    #[error("Not logged in")]
    NotLoggedIn,
    #[error("Unknown conversation: {0}")]
    UnknownConversation(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
#[allow(clippy::too_many_lines)]
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Login / Logout
        // ============================================================
        (SessionState::LoggedOut, Event::Login { username, password }) => {
            if username.is_empty() || password.is_empty() {
                return Err(ValidationError::EmptyCredentials.into());
            }
            if !context.identity.authenticate(&username, &password) {
                return Err(TransitionError::InvalidCredentials);
            }

            let store = ConversationStore::seeded(context.clock.as_ref());
            let active_conversation_id = store.first_id().map(String::from);
            Ok(TransitionResult::new(SessionState::LoggedIn {
                user: username,
                store,
                active_conversation_id,
            })
            .with_effect(Effect::PublishState))
        }

        (SessionState::LoggedIn { .. }, Event::Login { .. }) => Err(
            TransitionError::InvalidTransition("already logged in".to_string()),
        ),

        // Conversations are discarded; the next login seeds a fresh set
        (SessionState::LoggedIn { .. }, Event::Logout) => {
            Ok(TransitionResult::new(SessionState::LoggedOut).with_effect(Effect::PublishState))
        }

        // ============================================================
        // Conversation management
        // ============================================================
        (
            SessionState::LoggedIn { user, store, .. },
            Event::SelectConversation { conversation_id },
        ) => {
            if !store.contains(&conversation_id) {
                return Err(TransitionError::UnknownConversation(conversation_id));
            }
            Ok(TransitionResult::new(SessionState::LoggedIn {
                user: user.clone(),
                store: store.clone(),
                active_conversation_id: Some(conversation_id),
            })
            .with_effect(Effect::PublishState))
        }

        (SessionState::LoggedIn { user, store, .. }, Event::CreateConversation) => {
            let mut store = store.clone();
            let title = format!("Nuova Chat {}", store.len() + 1);
            let id = store
                .create_conversation(title, context.clock.as_ref())
                .id
                .clone();
            Ok(TransitionResult::new(SessionState::LoggedIn {
                user: user.clone(),
                store,
                active_conversation_id: Some(id),
            })
            .with_effect(Effect::PublishState))
        }

        (
            SessionState::LoggedIn {
                user,
                store,
                active_conversation_id,
            },
            Event::DeleteConversation { conversation_id },
        ) => {
            let mut store = store.clone();
            if !store.delete_conversation(&conversation_id) {
                return Ok(TransitionResult::unchanged(state));
            }
            // Repair the pointer when the active conversation went away
            let active_conversation_id =
                if active_conversation_id.as_deref() == Some(conversation_id.as_str()) {
                    store.first_id().map(String::from)
                } else {
                    active_conversation_id.clone()
                };
            Ok(TransitionResult::new(SessionState::LoggedIn {
                user: user.clone(),
                store,
                active_conversation_id,
            })
            .with_effect(Effect::PublishState))
        }

        // ============================================================
        // Message exchange
        // ============================================================
        (
            SessionState::LoggedIn {
                user,
                store,
                active_conversation_id,
            },
            Event::SendMessage { text, attachments },
        ) => {
            let Some(conversation_id) = active_conversation_id else {
                return Ok(TransitionResult::unchanged(state));
            };
            let text = text.trim();
            if text.is_empty() && attachments.is_empty() {
                return Err(ValidationError::EmptyMessage.into());
            }

            let (user_message, reply) = build_exchange(context, text, attachments);
            let mut store = store.clone();
            store.append_message(conversation_id, user_message.clone());

            Ok(TransitionResult::new(SessionState::LoggedIn {
                user: user.clone(),
                store,
                active_conversation_id: Some(conversation_id.clone()),
            })
            .with_effects([
                Effect::publish_message(conversation_id.as_str(), user_message),
                Effect::PublishState,
                Effect::ScheduleReply {
                    conversation_id: conversation_id.clone(),
                    message: reply,
                    delay: context.reply_delay,
                },
            ]))
        }

        // Deferred reply: delivered to the conversation captured at send
        // time, dropped if that conversation no longer exists
        (
            SessionState::LoggedIn {
                user,
                store,
                active_conversation_id,
            },
            Event::ReplyDue {
                conversation_id,
                message,
            },
        ) => {
            if !store.contains(&conversation_id) {
                return Ok(TransitionResult::unchanged(state));
            }
            let mut store = store.clone();
            store.append_message(&conversation_id, message.clone());
            Ok(TransitionResult::new(SessionState::LoggedIn {
                user: user.clone(),
                store,
                active_conversation_id: active_conversation_id.clone(),
            })
            .with_effects([
                Effect::publish_message(conversation_id, message),
                Effect::PublishState,
            ]))
        }

        // Pending replies outlive a logout; there is nowhere to deliver them
        (SessionState::LoggedOut, Event::ReplyDue { .. }) => {
            Ok(TransitionResult::unchanged(state))
        }

        (SessionState::LoggedOut, _) => Err(TransitionError::NotLoggedIn),
    }
}

/// Build the user message and its assistant reply. Both share the
/// timestamp captured at send time.
fn build_exchange(
    context: &SessionContext,
    text: &str,
    attachments: Vec<Attachment>,
) -> (Message, Message) {
    let clock = context.clock.as_ref();
    let timestamp = clock.display_time();
    let user_message = Message::user(clock.new_id(), text, timestamp.as_str(), attachments);
    let reply = Message::assistant(clock.new_id(), responder::generate(text), timestamp);
    (user_message, reply)
}
