//! Numeric replies against a pending selection

use travel_desk_core::{PendingSelection, SelectableItem, Session, StepKind, VisaRecord};

use super::DialogueEngine;
use crate::search::{visas_for_country, visas_of_type};
use crate::{format, texts, AgentError, TurnOutcome};

impl DialogueEngine {
    pub(super) async fn resolve_choice(
        &self,
        mut session: Session,
        body: &str,
    ) -> Result<TurnOutcome, AgentError> {
        let Some(pending) = session.context.pending.take() else {
            return Err(AgentError::Internal("no pending selection".to_string()));
        };

        // Digits too long for usize are just another out-of-range choice
        let Some(item) = body.parse::<usize>().ok().and_then(|n| pending.choose(n)) else {
            tracing::debug!(choice = %body, options = pending.len(), "Choice out of range");
            self.sender
                .send(&session.sender_id, texts::INVALID_CHOICE)
                .await?;
            return Ok(TurnOutcome::InvalidChoice);
        };

        let step = pending.step();
        tracing::debug!(?step, choice = %body, "Resolving choice");

        if step.is_cascade() {
            let key = item.as_label().ok_or_else(|| {
                AgentError::Internal(format!("{:?} item is not a label", step))
            })?;
            self.cascade_visa(session, step, key).await?;
        } else {
            let text = format::details(item);
            self.respond(session, &text, None).await?;
        }

        Ok(TurnOutcome::Choice)
    }

    /// Narrow the visa catalog by the chosen country or type
    async fn cascade_visa(
        &self,
        session: Session,
        step: StepKind,
        key: &str,
    ) -> Result<(), AgentError> {
        let visas = self.search.visas().await;

        let (matches, text): (Vec<VisaRecord>, String) = match step {
            StepKind::AwaitingVisaCountryChoice => {
                let matches: Vec<_> = visas_for_country(&visas, key).cloned().collect();
                let text = if matches.is_empty() {
                    texts::no_visa_for_country(key)
                } else {
                    format::visa_types_menu(key, &matches)
                };
                (matches, text)
            }
            _ => {
                let matches: Vec<_> = visas_of_type(&visas, key).cloned().collect();
                let text = if matches.is_empty() {
                    texts::no_visa_of_type(key)
                } else {
                    format::visa_countries_menu(key, &matches)
                };
                (matches, text)
            }
        };

        let pending = PendingSelection::new(
            StepKind::AwaitingVisaDetailsChoice,
            matches.into_iter().map(SelectableItem::Visa).collect(),
        );
        self.respond(session, &text, pending).await
    }
}
