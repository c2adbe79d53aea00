//! Closed set of tool names

use serde::{Deserialize, Serialize};

use crate::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    ListServices,
    FindService,
    ListOffers,
    ListUmrahPackages,
    ListFlights,
    FindFlights,
    GetAllCompanyInfo,
    InitiateVisaDiscovery,
    FindVisaDetails,
    InitiateHumanHandoff,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        Self::ListServices,
        Self::FindService,
        Self::ListOffers,
        Self::ListUmrahPackages,
        Self::GetAllCompanyInfo,
        Self::ListFlights,
        Self::FindFlights,
        Self::InitiateVisaDiscovery,
        Self::FindVisaDetails,
        Self::InitiateHumanHandoff,
    ];

    /// Function name on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListServices => "list_services",
            Self::FindService => "find_service",
            Self::ListOffers => "list_offers",
            Self::ListUmrahPackages => "list_umrah_packages",
            Self::ListFlights => "list_flights",
            Self::FindFlights => "find_flights",
            Self::GetAllCompanyInfo => "get_all_company_info",
            Self::InitiateVisaDiscovery => "initiate_visa_discovery",
            Self::FindVisaDetails => "find_visa_details",
            Self::InitiateHumanHandoff => "initiate_human_handoff",
        }
    }

    pub fn parse(name: &str) -> Result<Self, ToolError> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_names() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::parse(kind.as_str()), Ok(kind));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(
            ToolKind::parse("book_hotel"),
            Err(ToolError::UnknownTool("book_hotel".to_string()))
        );
    }
}
