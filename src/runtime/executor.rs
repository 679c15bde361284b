//! Session runtime executor

use super::{Envelope, SseEvent};
use crate::state_machine::{
    transition, Effect, Event, SessionContext, SessionState, SessionView, TransitionError,
};
use tokio::sync::{broadcast, mpsc, watch};

/// Owns the session state and executes the effects of each transition
pub struct SessionRuntime {
    context: SessionContext,
    state: SessionState,
    event_rx: mpsc::Receiver<Envelope>,
    /// Weak so that dropping every handle stops the runtime once pending
    /// replies have been delivered
    event_tx: mpsc::WeakSender<Envelope>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    state_tx: watch::Sender<SessionState>,
}

impl SessionRuntime {
    pub fn new(
        context: SessionContext,
        state: SessionState,
        event_rx: mpsc::Receiver<Envelope>,
        event_tx: mpsc::WeakSender<Envelope>,
        broadcast_tx: broadcast::Sender<SseEvent>,
        state_tx: watch::Sender<SessionState>,
    ) -> Self {
        Self {
            context,
            state,
            event_rx,
            event_tx,
            broadcast_tx,
            state_tx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            reply_delay_ms = %self.context.reply_delay.as_millis(),
            "Starting session runtime"
        );
        self.state_tx.send_replace(self.state.clone());

        while let Some(Envelope { event, reply }) = self.event_rx.recv().await {
            let outcome = self.process_event(event);
            if let Some(reply) = reply {
                // Caller may have gone away; the state change stands regardless
                let _ = reply.send(outcome);
            }
        }

        tracing::info!("Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) -> Result<SessionView, TransitionError> {
        let kind = event.kind();

        // Pure state transition
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::info!(event = kind, error = %e, "Transition rejected");
                let _ = self.broadcast_tx.send(SseEvent::Error {
                    message: e.to_string(),
                });
                return Err(e);
            }
        };

        if result.effects.is_empty() {
            tracing::debug!(event = kind, "Transition had no effect");
        } else {
            tracing::debug!(event = kind, effects = result.effects.len(), "Transition applied");
        }

        self.state = result.new_state;
        for effect in result.effects {
            self.execute_effect(effect);
        }

        Ok(self.state.view())
    }

    fn execute_effect(&self, effect: Effect) {
        match effect {
            Effect::PublishState => {
                self.state_tx.send_replace(self.state.clone());
                let _ = self.broadcast_tx.send(SseEvent::Session {
                    view: self.state.view(),
                });
            }

            Effect::PublishMessage {
                conversation_id,
                message,
            } => {
                tracing::info!(
                    conversation_id = %conversation_id,
                    message_id = %message.id,
                    role = %message.role,
                    "Message appended"
                );
                let _ = self.broadcast_tx.send(SseEvent::Message {
                    conversation_id,
                    message,
                });
            }

            Effect::ScheduleReply {
                conversation_id,
                message,
                delay,
            } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::warn!(conversation_id = %conversation_id, "Runtime shutting down, reply dropped");
                    return;
                };

                // Fire-and-forget: staleness is checked when the reply is applied
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    tracing::debug!(conversation_id = %conversation_id, "Reply due");
                    let event = Event::ReplyDue {
                        conversation_id,
                        message,
                    };
                    if event_tx.send(Envelope::detached(event)).await.is_err() {
                        tracing::debug!("Runtime stopped before reply delivery");
                    }
                });
            }
        }
    }
}
