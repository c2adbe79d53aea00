//! Human handoff and operator control
//!
//! The state change is stored before any message goes out; failures while
//! announcing the handoff are logged and never undo it.

use travel_desk_core::{GenerateRequest, Lang, Session};

use super::DialogueEngine;
use crate::{prompts, texts, AgentError};

impl DialogueEngine {
    /// Move the sender to a human operator
    ///
    /// Only fails when the new state cannot be stored.
    pub async fn initiate_handoff(
        &self,
        sender_id: &str,
        lang: Lang,
        reason: &str,
        details: Option<&str>,
    ) -> Result<(), AgentError> {
        tracing::info!(reason = %reason, details = ?details, "Initiating human handoff");

        let mut session = Session::new(sender_id);
        session.hand_off();
        self.sessions.update(&session).await?;
        metrics::counter!("travel_desk_handoffs_total").increment(1);

        if let Err(e) = self.reassure(sender_id, lang, reason, details).await {
            tracing::error!(error = %e, "Failed to send handoff message");
        }

        let alert_reason = match details {
            Some(details) => format!("{}: {}", reason, details),
            None => reason.to_string(),
        };
        if let Err(e) = self.alert_operator(sender_id, &alert_reason).await {
            tracing::error!(error = %e, "Failed to notify operator");
        }

        Ok(())
    }

    /// Short model-written message telling the user a person will follow up
    async fn reassure(
        &self,
        sender_id: &str,
        lang: Lang,
        reason: &str,
        details: Option<&str>,
    ) -> Result<(), AgentError> {
        let request = GenerateRequest::new(prompts::handoff_message(
            &self.config.company_name,
            reason,
            details,
        ))
        .with_temperature(prompts::HANDOFF_TEMPERATURE)
        .with_max_tokens(prompts::HANDOFF_MAX_TOKENS);

        let response = self.llm.generate(request).await?;
        let message = response.text.trim();
        if message.is_empty() {
            return Err(AgentError::Llm("empty handoff message".to_string()));
        }

        let message = self.localize(message, lang).await;
        self.sender.send(sender_id, &message).await?;
        Ok(())
    }

    async fn alert_operator(&self, sender_id: &str, reason: &str) -> Result<(), AgentError> {
        let Some(operator) = self.config.employee_number.as_deref() else {
            tracing::warn!("No operator number configured, skipping handoff alert");
            return Ok(());
        };

        self.sender
            .send(operator, &texts::operator_alert(sender_id, reason))
            .await?;
        tracing::info!(operator = %operator, "Operator notified");
        Ok(())
    }

    /// Stop automated replies for a sender
    pub async fn pause(&self, sender_id: &str) -> Result<(), AgentError> {
        let _guard = self.locks.acquire(sender_id).await;

        let mut session = Session::new(sender_id);
        session.hand_off();
        self.sessions.update(&session).await?;
        tracing::info!(sender = %sender_id, "Automation paused");

        self.sender
            .send(sender_id, texts::PAUSE_CONFIRMATION)
            .await?;
        Ok(())
    }

    /// Hand a sender back to automation
    ///
    /// The notice follows the script of the sender's last message.
    pub async fn resume(&self, sender_id: &str) -> Result<(), AgentError> {
        let _guard = self.locks.acquire(sender_id).await;

        let mut session = Session::new(sender_id);
        session.reactivate();
        self.sessions.update(&session).await?;
        tracing::info!(sender = %sender_id, "Automation resumed");

        let last = self.history.last_user_message(sender_id).await?;
        let lang = self.detector.detect_lang(last.as_deref());
        let notice = self.localize(texts::RESUME_NOTICE, lang).await;

        self.sender.send(sender_id, &notice).await?;
        Ok(())
    }
}
