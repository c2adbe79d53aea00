//! Port traits
//!
//! The dialogue engine depends only on these seams; concrete backends live in
//! the `llm`, `persistence`, `catalog` and `transport` crates.

mod catalog;
mod llm;
mod messaging;
mod stores;

pub use catalog::CatalogSource;
pub use llm::LanguageModel;
pub use messaging::MessageSender;
pub use stores::{HistoryStore, SessionStore};
