//! Tools exposed to the language model
//!
//! The model sees a fixed set of function descriptors (Arabic descriptions,
//! JSON-schema parameters). Whatever it calls is parsed immediately into a
//! closed [`ToolKind`] and a typed [`ToolInvocation`]; nothing downstream
//! dispatches on raw strings.

pub mod definitions;
pub mod invocation;
pub mod kind;
pub mod schema;

pub use definitions::{tool_definitions, HANDOFF_REASONS};
pub use invocation::{ToolInvocation, VisaTopic, DEFAULT_HANDOFF_REASON};
pub use kind::ToolKind;
pub use schema::{InputSchema, PropertySchema};

use thiserror::Error;

/// Tool call errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },
}

impl ToolError {
    pub fn invalid(tool: ToolKind, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.as_str().to_string(),
            message: message.into(),
        }
    }
}

impl From<ToolError> for travel_desk_core::Error {
    fn from(err: ToolError) -> Self {
        travel_desk_core::Error::Tool(err.to_string())
    }
}
