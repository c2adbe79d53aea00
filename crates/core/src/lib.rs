//! Core traits and types for the travel desk assistant
//!
//! This crate provides the foundational types shared by every other crate:
//! - Port traits for pluggable backends (LLM, stores, catalog, messaging)
//! - LLM request/response types
//! - The conversational domain model (sessions, pending selections, catalog records)
//! - Error types

pub mod catalog;
pub mod error;
pub mod history;
pub mod llm_types;
pub mod session;
pub mod traits;

pub use catalog::{
    Category, Flight, Offer, Record, SelectableItem, Service, UmrahPackage, VisaRecord,
};
pub use error::{Error, Result};
pub use history::{HistoryEntry, HistoryRole};
pub use llm_types::{
    FinishReason, GenerateRequest, GenerateResponse, Message, Role, TokenUsage, ToolCall,
    ToolDefinition,
};
pub use session::{Context, Lang, PendingSelection, Session, SessionRecord, SessionState, StepKind};
pub use traits::{CatalogSource, HistoryStore, LanguageModel, MessageSender, SessionStore};
