//! Google Sheets catalog
//!
//! Reads `GET {base}/spreadsheets/{id}/values/{worksheet}?key=...`. The first
//! row holds the column headers; each further row becomes a [`Record`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use travel_desk_config::CatalogConfig;
use travel_desk_core::{CatalogSource, Category, Record};

use crate::CatalogError;

/// Sheets client configuration
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub base_url: String,
    pub spreadsheet_id: String,
    pub api_key: Option<String>,
    pub cache_ttl: Duration,
    pub timeout: Duration,
}

impl From<&CatalogConfig> for SheetsConfig {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            api_key: config.api_key.clone(),
            cache_ttl: Duration::from_secs(config.cache_ttl_secs),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

struct CachedRows {
    rows: Vec<Record>,
    fetched_at: Instant,
}

/// Catalog backed by a Google spreadsheet
pub struct SheetsCatalog {
    config: SheetsConfig,
    client: Client,
    cache: DashMap<Category, CachedRows>,
}

impl SheetsCatalog {
    pub fn new(config: SheetsConfig) -> Result<Self, CatalogError> {
        if config.spreadsheet_id.is_empty() {
            return Err(CatalogError::Configuration(
                "spreadsheet_id is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            config,
            client,
            cache: DashMap::new(),
        })
    }

    fn values_url(&self, category: Category) -> String {
        format!(
            "{}/spreadsheets/{}/values/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.spreadsheet_id,
            category.as_str()
        )
    }

    fn cached(&self, category: Category) -> Option<Vec<Record>> {
        self.cache.get(&category).and_then(|entry| {
            (entry.fetched_at.elapsed() < self.config.cache_ttl).then(|| entry.rows.clone())
        })
    }

    /// Fetch a worksheet, bypassing the cache
    pub async fn fetch(&self, category: Category) -> Result<Vec<Record>, CatalogError> {
        let mut request = self.client.get(self.values_url(category));
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(format!("HTTP {}: {}", status, error_text)));
        }

        let range: ValueRange = response
            .json()
            .await
            .map_err(|e| CatalogError::InvalidData(e.to_string()))?;

        Ok(rows_to_records(range.values))
    }

    /// Drop all cached worksheets
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

#[async_trait]
impl CatalogSource for SheetsCatalog {
    async fn get(&self, category: Category) -> Vec<Record> {
        if let Some(rows) = self.cached(category) {
            return rows;
        }

        match self.fetch(category).await {
            Ok(rows) => {
                tracing::debug!(category = %category, rows = rows.len(), "Fetched worksheet");
                self.cache.insert(
                    category,
                    CachedRows {
                        rows: rows.clone(),
                        fetched_at: Instant::now(),
                    },
                );
                rows
            }
            Err(e) => {
                tracing::error!(category = %category, error = %e, "Failed to fetch worksheet");
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Map a header row plus data rows to records
///
/// Headers are trimmed; columns with an empty header are ignored. Short rows
/// leave the trailing columns absent and fully empty rows are skipped.
pub fn rows_to_records(values: Vec<Vec<Value>>) -> Vec<Record> {
    let mut rows = values.into_iter();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .into_iter()
            .map(|cell| match cell {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string(),
            })
            .collect(),
        None => return Vec::new(),
    };

    rows.filter_map(|row| {
        let record: Record = headers
            .iter()
            .zip(row)
            .filter(|(header, cell)| !header.is_empty() && !is_blank(cell))
            .map(|(header, cell)| (header.clone(), cell))
            .collect();
        (!record.is_empty()).then_some(record)
    })
    .collect()
}

fn is_blank(cell: &Value) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, routing::get, Json, Router};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_rows_to_records() {
        let values = vec![
            vec![json!("country"), json!(" type "), json!(""), json!("usd_price")],
            vec![json!("مصر"), json!("سياحية"), json!("ignored"), json!("150")],
            vec![json!("الأردن"), json!("عمل")],
            vec![json!(""), json!("")],
        ];

        let records = rows_to_records(values);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["country"], "مصر");
        assert_eq!(records[0]["type"], "سياحية");
        assert_eq!(records[0]["usd_price"], "150");
        assert_eq!(records[0].len(), 3);
        assert_eq!(records[1]["type"], "عمل");
        assert!(records[1].get("usd_price").is_none());
    }

    #[test]
    fn test_rows_to_records_empty_sheet() {
        assert!(rows_to_records(vec![]).is_empty());
        assert!(rows_to_records(vec![vec![json!("name")]]).is_empty());
    }

    async fn spawn_sheets_api(hits: Arc<AtomicUsize>) -> String {
        let app = Router::new().route(
            "/spreadsheets/:id/values/:sheet",
            get(move |Path((_id, sheet)): Path<(String, String)>| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    if sheet == "flights" {
                        Json(json!({
                            "range": "flights!A1:C3",
                            "values": [
                                ["depart_airport", "destination_airport", "usd_price"],
                                ["دمشق", "دبي", "250"]
                            ]
                        }))
                    } else {
                        Json(json!({"range": "x"}))
                    }
                }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(base_url: String, ttl: Duration) -> SheetsConfig {
        SheetsConfig {
            base_url,
            spreadsheet_id: "sheet-1".to_string(),
            api_key: Some("key".to_string()),
            cache_ttl: ttl,
            timeout: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_serves_from_cache_within_ttl() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base_url = spawn_sheets_api(hits.clone()).await;
        let catalog = SheetsCatalog::new(config(base_url, Duration::from_secs(300))).unwrap();

        let first = catalog.get(Category::Flights).await;
        let second = catalog.get(Category::Flights).await;

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(first[0]["destination_airport"], "دبي");
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        catalog.invalidate();
        catalog.get(Category::Flights).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_refetches_after_ttl() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base_url = spawn_sheets_api(hits.clone()).await;
        let catalog = SheetsCatalog::new(config(base_url, Duration::ZERO)).unwrap();

        catalog.get(Category::Flights).await;
        catalog.get(Category::Flights).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_values_is_empty() {
        let hits = Arc::new(AtomicUsize::new(0));
        let base_url = spawn_sheets_api(hits).await;
        let catalog = SheetsCatalog::new(config(base_url, Duration::from_secs(300))).unwrap();
        assert!(catalog.get(Category::Visas).await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_degrades_to_empty() {
        let catalog = SheetsCatalog::new(SheetsConfig {
            timeout: Duration::from_millis(500),
            ..config("http://127.0.0.1:1".to_string(), Duration::from_secs(300))
        })
        .unwrap();
        assert!(catalog.get(Category::Offers).await.is_empty());
        assert!(catalog.fetch(Category::Offers).await.is_err());
    }
}
