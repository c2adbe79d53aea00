//! The dialogue engine
//!
//! The implementation is split into focused submodules:
//! - `processing`: turn entry point, filtering, short-circuit resolvers
//! - `choice`: numeric replies against a pending selection
//! - `tools`: model-driven tool dispatch and handlers
//! - `response`: translation, delivery and history bookkeeping
//! - `handoff`: human handoff, pause and resume

mod choice;
mod handoff;
mod processing;
mod response;
mod tools;


use std::sync::Arc;

use travel_desk_config::{constants, Settings};
use travel_desk_core::{
    CatalogSource, HistoryStore, LanguageModel, Lang, MessageSender, SessionStore,
};
use travel_desk_text_processing::ScriptDetector;

use crate::locks::SenderLocks;
use crate::search::CatalogSearch;
use crate::translate::{LlmTranslator, Translator};

/// Every turn is rendered in Arabic; English is only chosen on resume
const TURN_LANG: Lang = Lang::Ar;

/// Engine settings
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub system_prompt: String,
    pub company_name: String,
    /// Operator address alerted on handoff
    pub employee_number: Option<String>,
    /// History entries sent with each tool-selection call
    pub context_messages: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub serialize_per_sender: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system_prompt: constants::DEFAULT_SYSTEM_PROMPT.to_string(),
            company_name: constants::DEFAULT_COMPANY_NAME.to_string(),
            employee_number: None,
            context_messages: constants::llm::DEFAULT_CONTEXT_MESSAGES,
            max_tokens: constants::llm::DEFAULT_MAX_TOKENS,
            temperature: 0.0,
            serialize_per_sender: false,
        }
    }
}

impl From<&Settings> for EngineConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            system_prompt: settings.agent.system_prompt.clone(),
            company_name: settings.agent.company_name.clone(),
            employee_number: settings
                .agent
                .employee_number
                .clone()
                .filter(|n| !n.trim().is_empty()),
            context_messages: settings.llm.context_messages,
            max_tokens: settings.llm.max_tokens,
            temperature: settings.llm.temperature,
            serialize_per_sender: settings.agent.serialize_per_sender,
        }
    }
}

/// External collaborators the engine talks to
#[derive(Clone)]
pub struct EnginePorts {
    pub llm: Arc<dyn LanguageModel>,
    pub catalog: Arc<dyn CatalogSource>,
    pub sessions: Arc<dyn SessionStore>,
    pub history: Arc<dyn HistoryStore>,
    pub sender: Arc<dyn MessageSender>,
}

/// Per-sender conversation state machine
pub struct DialogueEngine {
    config: EngineConfig,
    llm: Arc<dyn LanguageModel>,
    sessions: Arc<dyn SessionStore>,
    history: Arc<dyn HistoryStore>,
    sender: Arc<dyn MessageSender>,
    search: CatalogSearch,
    translator: Arc<dyn Translator>,
    detector: ScriptDetector,
    locks: SenderLocks,
}

impl DialogueEngine {
    pub fn new(config: EngineConfig, ports: EnginePorts) -> Self {
        let locks = SenderLocks::new(config.serialize_per_sender);
        if locks.is_enabled() {
            tracing::info!("Per-sender turn serialization enabled");
        }

        Self {
            search: CatalogSearch::new(ports.catalog, ports.llm.clone()),
            translator: Arc::new(LlmTranslator::new(ports.llm.clone())),
            llm: ports.llm,
            sessions: ports.sessions,
            history: ports.history,
            sender: ports.sender,
            detector: ScriptDetector::new(),
            locks,
            config,
        }
    }

    /// Replace the model-backed translator
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    pub fn history(&self) -> &Arc<dyn HistoryStore> {
        &self.history
    }

    /// Release per-sender locks that are no longer in use
    pub fn prune_locks(&self) -> usize {
        self.locks.prune_idle()
    }
}
