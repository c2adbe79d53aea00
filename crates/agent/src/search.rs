//! Catalog search and disambiguation
//!
//! Deterministic filters compare under Arabic normalization. Free-text
//! matching ("semantic filtering") hands the candidate rows to the model and
//! keeps whatever JSON array it answers with; any failure there means no
//! matches.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use travel_desk_core::{
    CatalogSource, Category, Flight, GenerateRequest, LanguageModel, Record, Service, VisaRecord,
};
use travel_desk_text_processing::{normalize_arabic, normalized_contains, normalized_eq};

use crate::prompts;

static ARRAY_LAZY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*?\]").unwrap());
static ARRAY_GREEDY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").unwrap());

/// Pull a JSON array out of a model answer that may carry prose around it
///
/// Tries the shortest bracket span first, then the widest one.
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    [&*ARRAY_LAZY, &*ARRAY_GREEDY]
        .into_iter()
        .filter_map(|re| re.find(text))
        .find_map(|m| serde_json::from_str::<Vec<Value>>(m.as_str()).ok())
}

/// Which side of a flight a search term applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEnd {
    Origin,
    Destination,
}

impl RouteEnd {
    fn airport(self, flight: &Flight) -> Option<&str> {
        match self {
            Self::Origin => flight.depart_airport.as_deref(),
            Self::Destination => flight.destination_airport.as_deref(),
        }
    }

    fn country(self, flight: &Flight) -> Option<&str> {
        match self {
            Self::Origin => flight.from_country.as_deref(),
            Self::Destination => flight.to_country.as_deref(),
        }
    }
}

/// Whether `term` names a country rather than an airport
///
/// An exact airport match always wins over a country match.
pub fn is_country_search(term: &str, flights: &[Flight], end: RouteEnd) -> bool {
    let term = normalize_arabic(term);
    let exact = |field: Option<&str>| field.map(normalize_arabic).as_deref() == Some(term.as_str());

    if flights.iter().any(|f| exact(end.airport(f))) {
        return false;
    }
    flights.iter().any(|f| exact(end.country(f)))
}

/// Narrow `flights` to those whose country or airport field contains `term`
pub fn filter_route(flights: Vec<Flight>, term: &str, end: RouteEnd, by_country: bool) -> Vec<Flight> {
    flights
        .into_iter()
        .filter(|f| {
            let field = if by_country { end.country(f) } else { end.airport(f) };
            normalized_contains(field.unwrap_or_default(), term)
        })
        .collect()
}

pub fn visas_for_country<'a>(visas: &'a [VisaRecord], country: &'a str) -> impl Iterator<Item = &'a VisaRecord> {
    visas
        .iter()
        .filter(move |v| normalized_eq(v.country.as_deref().unwrap_or_default(), country))
}

pub fn visas_of_type<'a>(visas: &'a [VisaRecord], visa_type: &'a str) -> impl Iterator<Item = &'a VisaRecord> {
    visas
        .iter()
        .filter(move |v| normalized_eq(v.visa_type.as_deref().unwrap_or_default(), visa_type))
}

/// Sorted distinct non-empty values
pub fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    values
        .flatten()
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn typed<T>(category: Category, records: Vec<Record>) -> Vec<T>
where
    T: serde::de::DeserializeOwned,
{
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value(Value::Object(record)) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(category = %category, error = %e, "Skipping malformed catalog row");
                None
            }
        })
        .collect()
}

/// Catalog lookups used by the tool handlers
#[derive(Clone)]
pub struct CatalogSearch {
    catalog: Arc<dyn CatalogSource>,
    llm: Arc<dyn LanguageModel>,
}

impl CatalogSearch {
    pub fn new(catalog: Arc<dyn CatalogSource>, llm: Arc<dyn LanguageModel>) -> Self {
        Self { catalog, llm }
    }

    async fn load<T: serde::de::DeserializeOwned>(&self, category: Category) -> Vec<T> {
        typed(category, self.catalog.get(category).await)
    }

    pub async fn flights(&self) -> Vec<Flight> {
        self.load(Category::Flights).await
    }

    pub async fn offers(&self) -> Vec<travel_desk_core::Offer> {
        self.load(Category::Offers).await
    }

    pub async fn umrah_packages(&self) -> Vec<travel_desk_core::UmrahPackage> {
        self.load(Category::Umrah).await
    }

    pub async fn visas(&self) -> Vec<VisaRecord> {
        self.load(Category::Visas).await
    }

    /// Raw `informations` rows, passed to the model as-is
    pub async fn company_info(&self) -> Vec<Record> {
        self.catalog.get(Category::Informations).await
    }

    /// Services marked available
    pub async fn available_services(&self) -> Vec<Service> {
        self.load::<Service>(Category::Services)
            .await
            .into_iter()
            .filter(Service::is_available)
            .collect()
    }

    /// Services the model judges to match `query`
    pub async fn match_services(&self, query: &str, services: &[Service]) -> Vec<Service> {
        let services_json = match serde_json::to_string(services) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize services for filtering");
                return Vec::new();
            }
        };
        self.semantic_filter("service", prompts::service_filter(query, &services_json))
            .await
    }

    /// Deterministic route filter followed, when a time expression is given,
    /// by a model pass grounded with `today`
    pub async fn find_flights(
        &self,
        destination: &str,
        origin: Option<&str>,
        time_query: Option<&str>,
        today: NaiveDate,
    ) -> Vec<Flight> {
        let all = self.flights().await;

        let by_country = is_country_search(destination, &all, RouteEnd::Destination);
        let mut flights = filter_route(all.clone(), destination, RouteEnd::Destination, by_country);

        if let Some(origin) = origin {
            let by_country = is_country_search(origin, &all, RouteEnd::Origin);
            flights = filter_route(flights, origin, RouteEnd::Origin, by_country);
        }

        tracing::debug!(
            destination = %destination,
            origin = ?origin,
            candidates = flights.len(),
            "Flight route filter applied"
        );

        match time_query {
            Some(time_query) if !flights.is_empty() => {
                let flights_json = match serde_json::to_string(&flights) {
                    Ok(json) => json,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to serialize flights for filtering");
                        return Vec::new();
                    }
                };
                self.semantic_filter(
                    "flight",
                    prompts::flight_time_filter(today, time_query, &flights_json),
                )
                .await
            }
            _ => flights,
        }
    }

    async fn semantic_filter<T: serde::de::DeserializeOwned>(
        &self,
        subject: &'static str,
        prompt: String,
    ) -> Vec<T> {
        let request = GenerateRequest::new(prompt).with_temperature(prompts::FILTER_TEMPERATURE);

        let response = match self.llm.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(subject, error = %e, "Semantic filtering call failed");
                return Vec::new();
            }
        };

        let Some(values) = extract_json_array(&response.text) else {
            tracing::warn!(subject, raw_response = %response.text, "Model did not return a JSON list");
            return Vec::new();
        };

        values
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flight(from: &str, from_country: &str, to: &str, to_country: &str) -> Flight {
        Flight {
            depart_airport: Some(from.to_string()),
            from_country: Some(from_country.to_string()),
            destination_airport: Some(to.to_string()),
            to_country: Some(to_country.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_json_array() {
        let text = "إليك النتائج:\n[{\"service\": \"تأجير سيارات\"}]\nشكراً";
        let values = extract_json_array(text).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[0]["service"], "تأجير سيارات");
    }

    #[test]
    fn test_extract_nested_array_falls_back_to_greedy() {
        let text = r#"{"result": [{"tags": ["a", "b"]}, {"tags": []}]}"#;
        let values = extract_json_array(text).unwrap();
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn test_extract_json_array_failures() {
        assert!(extract_json_array("no list here").is_none());
        assert!(extract_json_array("[not json").is_none());
        assert_eq!(extract_json_array("[]").unwrap().len(), 0);
    }

    #[test]
    fn test_airport_match_beats_country() {
        // "الكويت" is both a city and a country
        let flights = vec![
            flight("دمشق", "سوريا", "الكويت", "الكويت"),
            flight("دمشق", "سوريا", "دبي", "الإمارات"),
        ];
        assert!(!is_country_search("الكويت", &flights, RouteEnd::Destination));
        assert!(is_country_search("الامارات", &flights, RouteEnd::Destination));
        assert!(!is_country_search("أوروبا", &flights, RouteEnd::Destination));
        assert!(is_country_search("سوريا", &flights, RouteEnd::Origin));
    }

    #[test]
    fn test_filter_route() {
        let flights = vec![
            flight("دمشق", "سوريا", "دبي", "الإمارات"),
            flight("حلب", "سوريا", "أبو ظبي", "الإمارات"),
            flight("دمشق", "سوريا", "القاهرة", "مصر"),
        ];

        let by_country = filter_route(flights.clone(), "الامارات", RouteEnd::Destination, true);
        assert_eq!(by_country.len(), 2);

        let by_airport = filter_route(flights, "القاهره", RouteEnd::Destination, false);
        assert_eq!(by_airport.len(), 1);
        assert_eq!(by_airport[0].to_country.as_deref(), Some("مصر"));
    }

    #[test]
    fn test_visa_filters_and_distinct() {
        let visas: Vec<VisaRecord> = [("مصر", "سياحية"), ("مِصر", "عمل"), ("الأردن", "سياحيه")]
            .iter()
            .map(|(c, t)| VisaRecord {
                country: Some(c.to_string()),
                visa_type: Some(t.to_string()),
                ..Default::default()
            })
            .collect();

        assert_eq!(visas_for_country(&visas, "مصر").count(), 2);
        assert_eq!(visas_of_type(&visas, "سياحية").count(), 2);

        let countries = distinct(visas.iter().map(|v| v.country.as_deref()));
        assert_eq!(countries.len(), 3);
        assert_eq!(
            distinct(vec![Some("b"), Some("a"), None, Some("b"), Some(" ")].into_iter()),
            vec!["a", "b"]
        );
    }
}
