//! Model-driven tool dispatch
//!
//! One tool-selection call per turn. Only the first tool call in the answer
//! is honored; anything the model cannot express as a known tool with valid
//! arguments fails the turn.

use travel_desk_core::{
    GenerateRequest, HistoryEntry, Message, PendingSelection, SelectableItem, Session, StepKind,
    ToolCall, VisaRecord,
};
use travel_desk_tools::{tool_definitions, ToolInvocation, VisaTopic};

use super::DialogueEngine;
use crate::search::{distinct, visas_for_country};
use crate::texts::{self, titles};
use crate::{format, AgentError, TurnOutcome};

impl DialogueEngine {
    /// System prompt plus the most recent history
    async fn model_messages(&self, sender_id: &str) -> Result<Vec<Message>, AgentError> {
        let history = self
            .history
            .recent(sender_id, self.config.context_messages)
            .await?;

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(self.config.system_prompt.as_str()));
        messages.extend(history.iter().map(HistoryEntry::to_message));
        Ok(messages)
    }

    pub(super) async fn dispatch_with_model(
        &self,
        session: Session,
    ) -> Result<TurnOutcome, AgentError> {
        let request = GenerateRequest::from_messages(self.model_messages(&session.sender_id).await?)
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);

        let response = self
            .llm
            .generate_with_tools(request.clone(), tool_definitions())
            .await?;

        if let Some(call) = response.tool_calls.first() {
            if response.tool_calls.len() > 1 {
                tracing::warn!(
                    calls = response.tool_calls.len(),
                    "Model returned several tool calls, using the first"
                );
            }

            let invocation = ToolInvocation::parse(call)?;
            let kind = invocation.kind();
            tracing::info!(tool = ?kind, "Executing tool");
            metrics::counter!("travel_desk_tool_calls_total", "tool" => kind.as_str()).increment(1);

            self.execute_tool(session, invocation, request, call).await?;
            return Ok(TurnOutcome::Tool);
        }

        let text = response.text.trim();
        if text.is_empty() {
            return Err(AgentError::Llm("model returned neither text nor a tool call".to_string()));
        }

        self.reply(&session, text).await?;
        Ok(TurnOutcome::Reply)
    }

    async fn execute_tool(
        &self,
        session: Session,
        invocation: ToolInvocation,
        request: GenerateRequest,
        call: &ToolCall,
    ) -> Result<(), AgentError> {
        match invocation {
            ToolInvocation::ListServices => {
                let items = into_items(self.search.available_services().await);
                self.send_summary_list(session, titles::SERVICES, StepKind::AwaitingServiceChoice, items)
                    .await
            }
            ToolInvocation::FindService { query } => self.find_service(session, &query).await,
            ToolInvocation::ListOffers => {
                let items = into_items(self.search.offers().await);
                self.send_summary_list(session, titles::OFFERS, StepKind::AwaitingOfferChoice, items)
                    .await
            }
            ToolInvocation::ListUmrahPackages => {
                let items = into_items(self.search.umrah_packages().await);
                self.send_summary_list(session, titles::UMRAH, StepKind::AwaitingUmrahChoice, items)
                    .await
            }
            ToolInvocation::ListFlights => {
                let items = into_items(self.search.flights().await);
                self.send_summary_list(session, titles::FLIGHTS, StepKind::AwaitingFlightChoice, items)
                    .await
            }
            ToolInvocation::FindFlights {
                destination,
                origin,
                time_query,
            } => {
                let today = chrono::Local::now().date_naive();
                let flights = self
                    .search
                    .find_flights(&destination, origin.as_deref(), time_query.as_deref(), today)
                    .await;
                let title = titles::flight_search(&destination, origin.as_deref());
                self.send_summary_list(session, &title, StepKind::AwaitingFlightChoice, into_items(flights))
                    .await
            }
            ToolInvocation::GetAllCompanyInfo => self.answer_company_info(session, request, call).await,
            ToolInvocation::VisaDiscovery { topic } => self.visa_discovery(session, topic).await,
            ToolInvocation::FindVisaDetails { country } => {
                self.find_visa_details(session, &country).await
            }
            ToolInvocation::HumanHandoff { reason, details } => {
                self.initiate_handoff(
                    &session.sender_id,
                    session.context.lang,
                    &reason,
                    details.as_deref(),
                )
                .await
            }
        }
    }

    async fn find_service(&self, session: Session, query: &str) -> Result<(), AgentError> {
        let services = self.search.available_services().await;
        if services.is_empty() {
            return self.respond(session, texts::NO_SERVICES_AVAILABLE, None).await;
        }

        let mut matches = self.search.match_services(query, &services).await;
        tracing::debug!(query = %query, matches = matches.len(), "Service search");

        match matches.len() {
            0 => self.respond(session, texts::NO_MATCHING_SERVICE, None).await,
            1 => {
                let text = format::service_details(&matches.remove(0));
                self.respond(session, &text, None).await
            }
            _ => {
                self.send_summary_list(
                    session,
                    titles::MATCHING_SERVICES,
                    StepKind::AwaitingServiceChoice,
                    into_items(matches),
                )
                .await
            }
        }
    }

    async fn visa_discovery(&self, session: Session, topic: VisaTopic) -> Result<(), AgentError> {
        let visas = self.search.visas().await;

        let (values, title, step) = match topic {
            VisaTopic::Countries => (
                distinct(visas.iter().map(|v| v.country.as_deref())),
                titles::VISA_COUNTRIES,
                StepKind::AwaitingVisaCountryChoice,
            ),
            VisaTopic::Types => (
                distinct(visas.iter().map(|v| v.visa_type.as_deref())),
                titles::VISA_TYPES,
                StepKind::AwaitingVisaTypeChoice,
            ),
        };

        let items = values.into_iter().map(SelectableItem::Label).collect();
        self.send_summary_list(session, title, step, items).await
    }

    async fn find_visa_details(&self, session: Session, country: &str) -> Result<(), AgentError> {
        let visas = self.search.visas().await;
        let mut matches: Vec<VisaRecord> = visas_for_country(&visas, country).cloned().collect();

        match matches.len() {
            0 => {
                let text = texts::no_visa_for_country(country);
                self.respond(session, &text, None).await
            }
            1 => {
                let text = format::visa_details(&matches.remove(0));
                self.respond(session, &text, None).await
            }
            _ => {
                let text = format::visa_details_menu(country, &matches);
                let pending = PendingSelection::new(
                    StepKind::AwaitingVisaDetailsChoice,
                    into_items(matches),
                );
                self.respond(session, &text, pending).await
            }
        }
    }

    /// Feed the company sheet back as the tool result and relay the answer
    async fn answer_company_info(
        &self,
        session: Session,
        request: GenerateRequest,
        call: &ToolCall,
    ) -> Result<(), AgentError> {
        let info = self.search.company_info().await;
        let info_json = serde_json::to_string(&info)?;

        let mut request = request
            .with_message(Message::assistant_tool_calls(vec![call.clone()]))
            .with_message(Message::tool(info_json, call.id.as_str(), call.name.as_str()));
        // The tool-selection cap does not apply to the final answer
        request.max_tokens = None;

        let response = self.llm.generate(request).await?;
        let text = response.text.trim();
        if text.is_empty() {
            return Err(AgentError::Llm("empty company info answer".to_string()));
        }

        self.reply(&session, text).await
    }
}

fn into_items<T: Into<SelectableItem>>(records: Vec<T>) -> Vec<SelectableItem> {
    records.into_iter().map(Into::into).collect()
}
