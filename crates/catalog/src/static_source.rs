//! In-memory catalog, optionally loaded from a JSON fixture
//!
//! Fixture format: `{"flights": [{...}, ...], "visas": [...], ...}`. Unknown
//! category keys are ignored with a warning.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;

use travel_desk_core::{CatalogSource, Category, Record};

use crate::CatalogError;

type Rows = HashMap<Category, Vec<Record>>;

/// Fixed catalog for development and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    rows: Rows,
}

impl StaticCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the rows of one category
    pub fn with_rows(mut self, category: Category, rows: Vec<Record>) -> Self {
        self.rows.insert(category, rows);
        self
    }

    /// Build from a `{category: [record, ...]}` JSON value
    pub fn from_value(value: Value) -> Result<Self, CatalogError> {
        let object = match value {
            Value::Object(object) => object,
            _ => {
                return Err(CatalogError::InvalidData(
                    "catalog fixture must be a JSON object".to_string(),
                ))
            }
        };

        let mut catalog = Self::empty();
        for (key, rows) in object {
            let Some(category) = Category::from_str_loose(&key) else {
                tracing::warn!(key = %key, "Ignoring unknown catalog category");
                continue;
            };
            let rows: Vec<Record> = serde_json::from_value(rows).map_err(|e| {
                CatalogError::InvalidData(format!("{}: {}", category, e))
            })?;
            catalog.rows.insert(category, rows);
        }

        Ok(catalog)
    }

    /// Load a JSON fixture file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let value: Value = serde_json::from_str(&content)
            .map_err(|e| CatalogError::InvalidData(format!("{}: {}", path.display(), e)))?;

        let catalog = Self::from_value(value)?;
        tracing::info!(
            path = %path.display(),
            categories = catalog.rows.len(),
            "Loaded catalog fixture"
        );
        Ok(catalog)
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn get(&self, category: Category) -> Vec<Record> {
        self.rows.get(&category).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[tokio::test]
    async fn test_from_value() {
        let catalog = StaticCatalog::from_value(json!({
            "visas": [{"country": "مصر", "type": "سياحية"}],
            "Offers": [],
            "hotels": [{"name": "x"}]
        }))
        .unwrap();

        assert_eq!(catalog.get(Category::Visas).await.len(), 1);
        assert!(catalog.get(Category::Offers).await.is_empty());
        assert!(catalog.get(Category::Flights).await.is_empty());
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(StaticCatalog::from_value(json!([1, 2])).is_err());
        assert!(StaticCatalog::from_value(json!({"visas": {"country": "مصر"}})).is_err());
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            json!({"services": [{"service": "تأجير سيارات", "is_it_available": "نعم"}]})
        )
        .unwrap();

        let catalog = StaticCatalog::from_file(file.path()).unwrap();
        let rows = catalog.get(Category::Services).await;
        assert_eq!(rows[0]["service"], "تأجير سيارات");
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            StaticCatalog::from_file("/nonexistent/catalog.json"),
            Err(CatalogError::Configuration(_))
        ));
    }
}
