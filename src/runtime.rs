//! Runtime for the session controller
//!
//! A single task owns the session state. Every mutation is an [`Event`]
//! sent over a channel, so user intents and deferred replies are applied
//! one at a time in arrival order.

mod executor;

pub use executor::SessionRuntime;

use crate::state_machine::{Event, SessionContext, SessionState, SessionView, TransitionError};
use crate::store::{Conversation, Message};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Init {
        view: SessionView,
    },
    Session {
        view: SessionView,
    },
    Message {
        conversation_id: String,
        message: Message,
    },
    Error {
        message: String,
    },
}

/// An event plus, for caller-initiated events, where to send the outcome
#[derive(Debug)]
pub struct Envelope {
    pub event: Event,
    pub reply: Option<oneshot::Sender<Result<SessionView, TransitionError>>>,
}

impl Envelope {
    /// Event with nobody waiting on the outcome (timer deliveries)
    pub fn detached(event: Event) -> Self {
        Self { event, reply: None }
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Session runtime is not running")]
    RuntimeStopped,
}

/// Handle to interact with the running session
#[derive(Clone)]
pub struct SessionHandle {
    event_tx: mpsc::Sender<Envelope>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    state_rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Start a logged-out session runtime on the current tokio runtime
    pub fn spawn(context: SessionContext) -> Self {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);
        let (state_tx, state_rx) = watch::channel(SessionState::LoggedOut);

        let runtime = SessionRuntime::new(
            context,
            SessionState::LoggedOut,
            event_rx,
            event_tx.downgrade(),
            broadcast_tx.clone(),
            state_tx,
        );
        tokio::spawn(runtime.run());

        Self {
            event_tx,
            broadcast_tx,
            state_rx,
        }
    }

    /// Apply an event and wait for the resulting session view
    pub async fn dispatch(&self, event: Event) -> Result<SessionView, DispatchError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.event_tx
            .send(Envelope {
                event,
                reply: Some(reply_tx),
            })
            .await
            .map_err(|_| DispatchError::RuntimeStopped)?;

        let outcome = reply_rx.await.map_err(|_| DispatchError::RuntimeStopped)?;
        Ok(outcome?)
    }

    /// Latest published session view
    pub fn snapshot(&self) -> SessionView {
        self.state_rx.borrow().view()
    }

    /// Full copy of one conversation from the latest published state
    pub fn conversation(&self, conversation_id: &str) -> Option<Conversation> {
        self.state_rx
            .borrow()
            .store()
            .and_then(|store| store.get(conversation_id))
            .cloned()
    }

    /// Subscribe to session updates
    pub fn subscribe(&self) -> broadcast::Receiver<SseEvent> {
        self.broadcast_tx.subscribe()
    }
}
