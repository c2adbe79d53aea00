//! Translation, delivery and history bookkeeping

use travel_desk_core::{HistoryRole, Lang, PendingSelection, SelectableItem, Session, StepKind};

use super::DialogueEngine;
use crate::translate::localize;
use crate::{format, texts, AgentError};

impl DialogueEngine {
    pub(super) async fn localize(&self, text: &str, lang: Lang) -> String {
        localize(self.translator.as_ref(), text, lang).await
    }

    /// Send to the sender and append to their history
    pub(super) async fn send_and_record(&self, sender_id: &str, text: &str) -> Result<(), AgentError> {
        self.sender.send(sender_id, text).await?;
        self.history
            .append(sender_id, HistoryRole::Assistant, text)
            .await?;
        Ok(())
    }

    /// Reply without touching the stored session
    pub(super) async fn reply(&self, session: &Session, text: &str) -> Result<(), AgentError> {
        let text = self.localize(text, session.context.lang).await;
        self.send_and_record(&session.sender_id, &text).await
    }

    /// Store the session with `pending` (or none), then reply
    pub(super) async fn respond(
        &self,
        mut session: Session,
        text: &str,
        pending: Option<PendingSelection>,
    ) -> Result<(), AgentError> {
        let text = self.localize(text, session.context.lang).await;

        session.context.pending = pending;
        self.sessions.update(&session).await?;

        self.send_and_record(&session.sender_id, &text).await
    }

    /// Numbered list awaiting a choice, or the "nothing available" reply
    pub(super) async fn send_summary_list(
        &self,
        session: Session,
        title: &str,
        step: StepKind,
        items: Vec<SelectableItem>,
    ) -> Result<(), AgentError> {
        let text = if items.is_empty() {
            texts::empty_list(title)
        } else {
            format::summary_list(title, &items)
        };
        tracing::debug!(?step, items = items.len(), "Sending summary list");

        self.respond(session, &text, PendingSelection::new(step, items))
            .await
    }
}
