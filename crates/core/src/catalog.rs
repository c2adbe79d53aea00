//! Catalog categories and typed records
//!
//! The catalog is a set of spreadsheet worksheets. Rows arrive as loose
//! `field -> value` maps ([`Record`]); the dialogue engine works with the
//! typed views below. Every field is optional text: numeric cells keep their
//! textual rendering and empty cells are treated as absent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One catalog row as delivered by a [`crate::CatalogSource`]
pub type Record = serde_json::Map<String, Value>;

/// Catalog categories (worksheet names)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Services,
    Offers,
    Umrah,
    Flights,
    Visas,
    Informations,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Offers => "offers",
            Self::Umrah => "umrah",
            Self::Flights => "flights",
            Self::Visas => "visas",
            Self::Informations => "informations",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Self::Services,
            Self::Offers,
            Self::Umrah,
            Self::Flights,
            Self::Visas,
            Self::Informations,
        ]
    }

    pub fn from_str_loose(s: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts strings, numbers and booleans; empty strings and nulls become `None`.
fn cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

macro_rules! catalog_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $( $(#[serde(rename = $rename:literal)])? pub $field:ident, )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            $(
                $(#[serde(rename = $rename)])?
                #[serde(default, deserialize_with = "cell", skip_serializing_if = "Option::is_none")]
                pub $field: Option<String>,
            )*
        }

        impl $name {
            /// Build the typed view of a catalog row
            pub fn from_record(record: &Record) -> Result<Self, serde_json::Error> {
                serde_json::from_value(Value::Object(record.clone()))
            }
        }
    };
}

catalog_record! {
    /// A scheduled flight
    pub struct Flight {
        #[serde(rename = "type")]
        pub kind,
        pub depart_airport,
        pub destination_airport,
        pub from_country,
        pub to_country,
        pub depart_date,
        pub return_date,
        pub time_of_depart,
        pub time_of_arrival,
        pub duration,
        pub usd_price,
        pub syp_price,
        pub airline,
        pub notes,
    }
}

catalog_record! {
    /// A packaged tourism offer
    pub struct Offer {
        pub name,
        pub depart,
        pub destination,
        pub usd_price,
        pub syp_price,
        pub details,
        pub valid_until,
        pub notes,
    }
}

catalog_record! {
    /// A bookable service (car rental, passport renewal, ...)
    pub struct Service {
        pub service,
        pub usd_price,
        pub syp_price,
        pub details,
        pub notes,
        pub is_it_available,
    }
}

catalog_record! {
    /// An umrah package
    pub struct UmrahPackage {
        pub name_and_type,
        pub usd_price,
        pub syp_price,
        pub duration,
        pub last_date_for_register,
        pub company_of_trasnport,
        pub estimated_time,
        pub type_of_hotel,
        pub hotel_category,
        pub details,
        pub notes,
    }
}

catalog_record! {
    /// Visa offering for one (country, type) pair
    pub struct VisaRecord {
        #[serde(rename = "type")]
        pub visa_type,
        pub country,
        pub usd_price,
        pub syp_price,
        pub estimated_time,
        pub required_papers,
        pub valid_until,
        pub notes,
    }
}

impl Service {
    /// Services are offered only when the sheet marks them available ("نعم")
    pub fn is_available(&self) -> bool {
        self.is_it_available
            .as_deref()
            .map(|v| v.trim().to_lowercase() == "نعم")
            .unwrap_or(false)
    }
}

/// An entry of a numbered list the user can pick from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "item", rename_all = "snake_case")]
pub enum SelectableItem {
    Flight(Flight),
    Offer(Offer),
    Service(Service),
    Umrah(UmrahPackage),
    Visa(VisaRecord),
    /// A bare country or visa-type name
    Label(String),
}

impl SelectableItem {
    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Label(label) => Some(label),
            _ => None,
        }
    }
}

impl From<Flight> for SelectableItem {
    fn from(v: Flight) -> Self {
        Self::Flight(v)
    }
}

impl From<Offer> for SelectableItem {
    fn from(v: Offer) -> Self {
        Self::Offer(v)
    }
}

impl From<Service> for SelectableItem {
    fn from(v: Service) -> Self {
        Self::Service(v)
    }
}

impl From<UmrahPackage> for SelectableItem {
    fn from(v: UmrahPackage) -> Self {
        Self::Umrah(v)
    }
}

impl From<VisaRecord> for SelectableItem {
    fn from(v: VisaRecord) -> Self {
        Self::Visa(v)
    }
}

impl From<String> for SelectableItem {
    fn from(v: String) -> Self {
        Self::Label(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_flight_from_record() {
        let flight = Flight::from_record(&record(json!({
            "type": "ذهاب وعودة",
            "depart_airport": "دمشق",
            "destination_airport": "دبي",
            "usd_price": 350,
            "notes": "",
            "unrelated_column": "x"
        })))
        .unwrap();

        assert_eq!(flight.kind.as_deref(), Some("ذهاب وعودة"));
        assert_eq!(flight.usd_price.as_deref(), Some("350"));
        assert_eq!(flight.notes, None);
        assert_eq!(flight.airline, None);
    }

    #[test]
    fn test_visa_type_rename() {
        let visa = VisaRecord::from_record(&record(json!({"type": "عمل", "country": "مصر"}))).unwrap();
        assert_eq!(visa.visa_type.as_deref(), Some("عمل"));

        let back = serde_json::to_value(&visa).unwrap();
        assert_eq!(back["type"], "عمل");
        assert!(back.get("notes").is_none());
    }

    #[test]
    fn test_service_availability() {
        let available = Service {
            is_it_available: Some("نعم".to_string()),
            ..Default::default()
        };
        let unavailable = Service {
            is_it_available: Some("لا".to_string()),
            ..Default::default()
        };
        assert!(available.is_available());
        assert!(!unavailable.is_available());
        assert!(!Service::default().is_available());
    }

    #[test]
    fn test_selectable_item_roundtrip_tagging() {
        let item = SelectableItem::Label("مصر".to_string());
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, json!({"kind": "label", "item": "مصر"}));
        assert_eq!(item.as_label(), Some("مصر"));
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!(Category::from_str_loose("Flights"), Some(Category::Flights));
        assert_eq!(Category::from_str_loose("unknown"), None);
        assert_eq!(Category::Informations.to_string(), "informations");
    }
}
