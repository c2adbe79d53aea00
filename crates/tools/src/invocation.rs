//! Typed tool invocations
//!
//! Optional string arguments that arrive empty are treated as absent.
//! Required arguments that are missing, or arguments of the wrong JSON type,
//! are rejected with [`ToolError::InvalidArguments`].

use serde_json::Value;
use travel_desk_core::ToolCall;

use crate::kind::ToolKind;
use crate::ToolError;

/// Reason used when the model calls the handoff tool without one
pub const DEFAULT_HANDOFF_REASON: &str = "طلب المستخدم التحدث إلى موظف";

/// What `initiate_visa_discovery` should list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisaTopic {
    Countries,
    Types,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    ListServices,
    FindService {
        query: String,
    },
    ListOffers,
    ListUmrahPackages,
    ListFlights,
    FindFlights {
        destination: String,
        origin: Option<String>,
        time_query: Option<String>,
    },
    GetAllCompanyInfo,
    VisaDiscovery {
        topic: VisaTopic,
    },
    FindVisaDetails {
        country: String,
    },
    HumanHandoff {
        reason: String,
        details: Option<String>,
    },
}

impl ToolInvocation {
    /// Parse a raw tool call from the model
    pub fn parse(call: &ToolCall) -> Result<Self, ToolError> {
        let kind = ToolKind::parse(&call.name)?;
        let args = Args { kind, call };

        Ok(match kind {
            ToolKind::ListServices => Self::ListServices,
            ToolKind::ListOffers => Self::ListOffers,
            ToolKind::ListUmrahPackages => Self::ListUmrahPackages,
            ToolKind::ListFlights => Self::ListFlights,
            ToolKind::GetAllCompanyInfo => Self::GetAllCompanyInfo,
            ToolKind::FindService => Self::FindService {
                query: args.required("query")?,
            },
            ToolKind::FindFlights => Self::FindFlights {
                destination: args.required("destination")?,
                origin: args.optional("origin")?,
                time_query: args.optional("time_query")?,
            },
            ToolKind::InitiateVisaDiscovery => {
                let topic = match args.required("topic")?.as_str() {
                    "countries" => VisaTopic::Countries,
                    "types" => VisaTopic::Types,
                    other => {
                        return Err(ToolError::invalid(kind, format!("unknown topic '{}'", other)))
                    }
                };
                Self::VisaDiscovery { topic }
            }
            ToolKind::FindVisaDetails => Self::FindVisaDetails {
                country: args.required("country")?,
            },
            ToolKind::InitiateHumanHandoff => Self::HumanHandoff {
                reason: args
                    .optional("reason")?
                    .unwrap_or_else(|| DEFAULT_HANDOFF_REASON.to_string()),
                details: args.optional("details")?,
            },
        })
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            Self::ListServices => ToolKind::ListServices,
            Self::FindService { .. } => ToolKind::FindService,
            Self::ListOffers => ToolKind::ListOffers,
            Self::ListUmrahPackages => ToolKind::ListUmrahPackages,
            Self::ListFlights => ToolKind::ListFlights,
            Self::FindFlights { .. } => ToolKind::FindFlights,
            Self::GetAllCompanyInfo => ToolKind::GetAllCompanyInfo,
            Self::VisaDiscovery { .. } => ToolKind::InitiateVisaDiscovery,
            Self::FindVisaDetails { .. } => ToolKind::FindVisaDetails,
            Self::HumanHandoff { .. } => ToolKind::InitiateHumanHandoff,
        }
    }
}

struct Args<'a> {
    kind: ToolKind,
    call: &'a ToolCall,
}

impl Args<'_> {
    fn optional(&self, key: &str) -> Result<Option<String>, ToolError> {
        match self.call.arguments.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
            Some(other) => Err(ToolError::invalid(
                self.kind,
                format!("'{}' must be a string, got {}", key, other),
            )),
        }
    }

    fn required(&self, key: &str) -> Result<String, ToolError> {
        self.optional(key)?
            .ok_or_else(|| ToolError::invalid(self.kind, format!("missing '{}'", key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn call(name: &str, args: Value) -> ToolCall {
        let arguments: HashMap<String, Value> = args
            .as_object()
            .map(|m| m.clone().into_iter().collect())
            .unwrap_or_default();
        ToolCall::new("call_1", name, arguments)
    }

    #[test]
    fn test_parse_find_flights() {
        let parsed = ToolInvocation::parse(&call(
            "find_flights",
            json!({"destination": "دبي", "origin": "", "time_query": "الأسبوع القادم"}),
        ))
        .unwrap();

        assert_eq!(
            parsed,
            ToolInvocation::FindFlights {
                destination: "دبي".to_string(),
                origin: None,
                time_query: Some("الأسبوع القادم".to_string()),
            }
        );
        assert_eq!(parsed.kind(), ToolKind::FindFlights);
    }

    #[test]
    fn test_parse_unit_tools_ignore_arguments() {
        let parsed = ToolInvocation::parse(&call("list_umrah_packages", json!({"x": 1}))).unwrap();
        assert_eq!(parsed, ToolInvocation::ListUmrahPackages);
    }

    #[test]
    fn test_visa_topic() {
        let parsed =
            ToolInvocation::parse(&call("initiate_visa_discovery", json!({"topic": "types"})))
                .unwrap();
        assert_eq!(parsed, ToolInvocation::VisaDiscovery { topic: VisaTopic::Types });

        let err = ToolInvocation::parse(&call("initiate_visa_discovery", json!({"topic": "all"})))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_handoff_defaults_reason() {
        let parsed = ToolInvocation::parse(&call("initiate_human_handoff", json!({}))).unwrap();
        assert_eq!(
            parsed,
            ToolInvocation::HumanHandoff {
                reason: DEFAULT_HANDOFF_REASON.to_string(),
                details: None,
            }
        );
    }

    #[test]
    fn test_missing_required_argument() {
        let err = ToolInvocation::parse(&call("find_visa_details", json!({}))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid arguments for find_visa_details: missing 'country'");
    }

    #[test]
    fn test_wrong_argument_type() {
        let err = ToolInvocation::parse(&call("find_service", json!({"query": 5}))).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }

    #[test]
    fn test_unknown_tool() {
        let err = ToolInvocation::parse(&call("book_hotel", json!({}))).unwrap_err();
        assert_eq!(err, ToolError::UnknownTool("book_hotel".to_string()));
    }
}
