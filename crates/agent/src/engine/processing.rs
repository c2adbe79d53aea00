//! Turn entry point and short-circuit resolvers

use std::time::Instant;

use tracing::Instrument;

use travel_desk_core::{HistoryRole, Session};
use travel_desk_text_processing::strip_emojis;

use super::{DialogueEngine, TURN_LANG};
use crate::routine::routine_reply;
use crate::{texts, AgentError, TurnOutcome};

/// Sender ids containing this come from group chats
const GROUP_MARKER: &str = "g.us";

impl DialogueEngine {
    /// Process one inbound message end to end
    ///
    /// Never fails: dispatch errors end in a technical handoff, store errors
    /// are logged.
    pub async fn handle_incoming_message(&self, sender_id: &str, raw_text: &str) -> TurnOutcome {
        let start = Instant::now();
        let span = tracing::info_span!("turn", sender = %sender_id);

        let outcome = self.run_turn(sender_id, raw_text).instrument(span).await;

        metrics::counter!("travel_desk_turns_total", "outcome" => outcome.as_str()).increment(1);
        metrics::histogram!("travel_desk_turn_duration_seconds")
            .record(start.elapsed().as_secs_f64());
        outcome
    }

    async fn run_turn(&self, sender_id: &str, raw_text: &str) -> TurnOutcome {
        if sender_id.contains(GROUP_MARKER) {
            tracing::debug!("Ignoring group message");
            return TurnOutcome::Ignored;
        }

        let stripped = strip_emojis(raw_text);
        let body = stripped.trim();
        if body.is_empty() {
            tracing::debug!("Ignoring empty message");
            return TurnOutcome::Ignored;
        }

        let _guard = self.locks.acquire(sender_id).await;

        let session = match self.begin_turn(sender_id, body).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                tracing::info!("Sender is with a human operator, message recorded only");
                return TurnOutcome::Recorded;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load or record turn");
                return TurnOutcome::StoreFailed;
            }
        };

        match self.resolve(session, body).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Turn failed, handing off to a human");
                if let Err(e) = self
                    .initiate_handoff(sender_id, TURN_LANG, texts::TECHNICAL_FAILURE_REASON, None)
                    .await
                {
                    tracing::error!(error = %e, "Technical handoff failed");
                }
                TurnOutcome::Failed
            }
        }
    }

    /// Load the session, pin the turn language and record the user message
    ///
    /// Returns `None` when the sender is in human handoff.
    async fn begin_turn(&self, sender_id: &str, body: &str) -> Result<Option<Session>, AgentError> {
        let mut session = self.sessions.get(sender_id).await?;
        session.context.lang = TURN_LANG;
        self.sessions.update(&session).await?;

        self.history.append(sender_id, HistoryRole::User, body).await?;

        Ok((!session.is_handoff()).then_some(session))
    }

    async fn resolve(&self, session: Session, body: &str) -> Result<TurnOutcome, AgentError> {
        if session.pending().is_some() && is_choice(body) {
            return self.resolve_choice(session, body).await;
        }

        if let Some(reply) = routine_reply(body) {
            tracing::debug!("Routine reply");
            self.reply(&session, reply).await?;
            return Ok(TurnOutcome::Routine);
        }

        self.dispatch_with_model(session).await
    }
}

fn is_choice(body: &str) -> bool {
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_choice() {
        assert!(is_choice("2"));
        assert!(is_choice("007"));
        assert!(!is_choice("2 "));
        assert!(!is_choice("٢"));
        assert!(!is_choice("-1"));
        assert!(!is_choice(""));
    }
}
