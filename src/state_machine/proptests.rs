//! Property-based tests for the session state machine
//!
//! Random sequences of user intents and timer deliveries are replayed
//! against the transition function; invariants are checked after each step.

#![allow(clippy::collapsible_if)]

use super::state::*;
use super::transition::*;
use super::*;
use crate::clock::FixedClock;
use crate::identity::IdentityStore;
use crate::store::Message;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> SessionContext {
    SessionContext::new(
        IdentityStore::demo(),
        Duration::from_millis(500),
        Arc::new(FixedClock::new()),
    )
}

/// Operations are index-based so they can refer to whatever conversations
/// exist when the operation is replayed.
#[derive(Debug, Clone)]
enum Op {
    Login { valid: bool },
    Logout,
    Select(usize),
    Create,
    Delete(usize),
    DeleteUnknown,
    Send(String),
    DeliverReply(usize),
}

/// A reply scheduled but not yet delivered
#[derive(Debug, Clone)]
struct PendingReply {
    conversation_id: String,
    message: Message,
}

fn conversation_id_at(state: &SessionState, index: usize) -> Option<String> {
    let store = state.store()?;
    if store.is_empty() {
        return None;
    }
    Some(store.conversations()[index % store.len()].id.clone())
}

fn to_event(state: &SessionState, op: &Op, pending: &mut Vec<PendingReply>) -> Option<Event> {
    match op {
        Op::Login { valid } => Some(Event::Login {
            username: "admin".to_string(),
            password: if *valid { "admin" } else { "wrong" }.to_string(),
        }),
        Op::Logout => Some(Event::Logout),
        Op::Select(i) => conversation_id_at(state, *i)
            .map(|conversation_id| Event::SelectConversation { conversation_id }),
        Op::Create => Some(Event::CreateConversation),
        Op::Delete(i) => conversation_id_at(state, *i)
            .map(|conversation_id| Event::DeleteConversation { conversation_id }),
        Op::DeleteUnknown => Some(Event::DeleteConversation {
            conversation_id: "no-such-conversation".to_string(),
        }),
        Op::Send(text) => Some(Event::SendMessage {
            text: text.clone(),
            attachments: vec![],
        }),
        Op::DeliverReply(i) => {
            if pending.is_empty() {
                return None;
            }
            let reply = pending.remove(i % pending.len());
            Some(Event::ReplyDue {
                conversation_id: reply.conversation_id,
                message: reply.message,
            })
        }
    }
}

fn message_counts(state: &SessionState) -> Vec<(String, usize)> {
    state
        .store()
        .map(|s| {
            s.conversations()
                .iter()
                .map(|c| (c.id.clone(), c.messages.len()))
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("ciao".to_string()),
        Just("come stai".to_string()),
        Just("python".to_string()),
        Just("   ".to_string()),
        Just(String::new()),
        "[a-zA-Z ?]{0,20}",
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<bool>().prop_map(|valid| Op::Login { valid }),
        Just(Op::Logout),
        (0usize..10).prop_map(Op::Select),
        Just(Op::Create),
        (0usize..10).prop_map(Op::Delete),
        Just(Op::DeleteUnknown),
        arb_text().prop_map(Op::Send),
        (0usize..10).prop_map(Op::DeliverReply),
    ]
}

// ============================================================================
// State Validity Checkers
// ============================================================================

/// The active pointer, when set, names a conversation in the store
fn active_pointer_is_valid(state: &SessionState) -> bool {
    match state {
        SessionState::LoggedOut => true,
        SessionState::LoggedIn {
            store,
            active_conversation_id,
            ..
        } => active_conversation_id
            .as_deref()
            .map_or(true, |id| store.contains(id)),
    }
}

/// Conversation ids are unique within the store
fn ids_are_unique(state: &SessionState) -> bool {
    let counts = message_counts(state);
    let mut ids: Vec<&String> = counts.iter().map(|(id, _)| id).collect();
    let len = ids.len();
    ids.sort();
    ids.dedup();
    ids.len() == len
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: the active pointer is repaired after every transition
    #[test]
    fn prop_active_pointer_always_valid(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let ctx = test_context();
        let mut state = SessionState::LoggedOut;
        let mut pending = Vec::new();

        for op in ops {
            let Some(event) = to_event(&state, &op, &mut pending) else { continue };
            if let Ok(result) = transition(&state, &ctx, event) {
                for effect in &result.effects {
                    if let Effect::ScheduleReply { conversation_id, message, .. } = effect {
                        pending.push(PendingReply {
                            conversation_id: conversation_id.clone(),
                            message: message.clone(),
                        });
                    }
                }
                state = result.new_state;
            }
            prop_assert!(active_pointer_is_valid(&state), "Dangling active pointer: {:?}", state);
            prop_assert!(ids_are_unique(&state), "Duplicate conversation ids: {:?}", state);
        }
    }

    // Invariant 2: a reply only ever lands in the conversation it was sent from
    #[test]
    fn prop_reply_never_misrouted(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let ctx = test_context();
        let mut state = SessionState::LoggedOut;
        let mut pending = Vec::new();

        for op in ops {
            let Some(event) = to_event(&state, &op, &mut pending) else { continue };
            let target = match &event {
                Event::ReplyDue { conversation_id, .. } => Some(conversation_id.clone()),
                _ => None,
            };
            let before = message_counts(&state);

            let Ok(result) = transition(&state, &ctx, event) else { continue };
            for effect in &result.effects {
                if let Effect::ScheduleReply { conversation_id, message, .. } = effect {
                    pending.push(PendingReply {
                        conversation_id: conversation_id.clone(),
                        message: message.clone(),
                    });
                }
            }

            if let Some(target) = target {
                let after = message_counts(&result.new_state);
                for ((id, old), (_, new)) in before.iter().zip(after.iter()) {
                    if *id == target {
                        prop_assert_eq!(*new, old + 1);
                    } else {
                        prop_assert_eq!(new, old, "Reply for {} landed in {}", target, id);
                    }
                }
            }
            state = result.new_state;
        }
    }

    // Invariant 3: every state change is published
    #[test]
    fn prop_state_changes_publish(ops in proptest::collection::vec(arb_op(), 0..30)) {
        let ctx = test_context();
        let mut state = SessionState::LoggedOut;
        let mut pending = Vec::new();

        for op in ops {
            let Some(event) = to_event(&state, &op, &mut pending) else { continue };
            if let Ok(result) = transition(&state, &ctx, event) {
                if result.new_state != state {
                    prop_assert!(
                        result.effects.iter().any(|e| matches!(e, Effect::PublishState)),
                        "State changed without PublishState: {:?}",
                        result.effects
                    );
                }
                state = result.new_state;
            }
        }
    }

    // Invariant 4: blank sends never change message counts
    #[test]
    fn prop_blank_send_is_noop(blank in "[ \t\n]{0,8}", ops in proptest::collection::vec(arb_op(), 0..20)) {
        let ctx = test_context();
        let mut state = SessionState::LoggedOut;
        let mut pending = Vec::new();
        for op in ops {
            let Some(event) = to_event(&state, &op, &mut pending) else { continue };
            if let Ok(result) = transition(&state, &ctx, event) {
                state = result.new_state;
            }
        }

        let before = message_counts(&state);
        let event = Event::SendMessage { text: blank, attachments: vec![] };
        if let Ok(result) = transition(&state, &ctx, event) {
            prop_assert_eq!(message_counts(&result.new_state), before);
            prop_assert!(result.effects.is_empty());
        }
    }

    // Invariant 5: transitions are deterministic for identical inputs
    #[test]
    fn prop_transition_is_deterministic(ops in proptest::collection::vec(arb_op(), 0..20)) {
        let replay = |ctx: &SessionContext| {
            let mut state = SessionState::LoggedOut;
            let mut pending = Vec::new();
            for op in &ops {
                let Some(event) = to_event(&state, op, &mut pending) else { continue };
                if let Ok(result) = transition(&state, ctx, event) {
                    for effect in &result.effects {
                        if let Effect::ScheduleReply { conversation_id, message, .. } = effect {
                            pending.push(PendingReply {
                                conversation_id: conversation_id.clone(),
                                message: message.clone(),
                            });
                        }
                    }
                    state = result.new_state;
                }
            }
            state
        };

        prop_assert_eq!(replay(&test_context()), replay(&test_context()));
    }

    // Invariant 6: logout always empties the session
    #[test]
    fn prop_logout_clears(ops in proptest::collection::vec(arb_op(), 0..20)) {
        let ctx = test_context();
        let mut state = SessionState::LoggedOut;
        let mut pending = Vec::new();
        for op in ops {
            let Some(event) = to_event(&state, &op, &mut pending) else { continue };
            if let Ok(result) = transition(&state, &ctx, event) {
                state = result.new_state;
            }
        }

        if state.is_logged_in() {
            let result = transition(&state, &ctx, Event::Logout).unwrap();
            let view = result.new_state.view();
            prop_assert!(view.user.is_none());
            prop_assert!(view.conversations.is_empty());
            prop_assert!(view.active_conversation.is_none());
        }
    }
}
