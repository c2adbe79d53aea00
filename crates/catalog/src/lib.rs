//! Catalog sources
//!
//! - [`SheetsCatalog`]: Google Sheets values API, one worksheet per category,
//!   cached per category for a configurable window
//! - [`StaticCatalog`]: in-memory rows or a JSON fixture file
//!
//! Both degrade to an empty sequence instead of failing the turn.

pub mod sheets;
pub mod static_source;

pub use sheets::{rows_to_records, SheetsCatalog, SheetsConfig};
pub use static_source::StaticCatalog;

use std::sync::Arc;

use thiserror::Error;
use travel_desk_config::{CatalogConfig, CatalogProvider};
use travel_desk_core::CatalogSource;

/// Catalog errors
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network(err.to_string())
    }
}

impl From<CatalogError> for travel_desk_core::Error {
    fn from(err: CatalogError) -> Self {
        travel_desk_core::Error::Catalog(err.to_string())
    }
}

/// Build the configured catalog source
pub fn create_catalog(config: &CatalogConfig) -> Result<Arc<dyn CatalogSource>, CatalogError> {
    match config.provider {
        CatalogProvider::Sheets => {
            let catalog = SheetsCatalog::new(SheetsConfig::from(config))?;
            tracing::info!(spreadsheet = %config.spreadsheet_id, "Using Google Sheets catalog");
            Ok(Arc::new(catalog))
        }
        CatalogProvider::Static => {
            let catalog = match &config.fixture_path {
                Some(path) => StaticCatalog::from_file(path)?,
                None => {
                    tracing::warn!("No catalog fixture configured, serving an empty catalog");
                    StaticCatalog::empty()
                }
            };
            Ok(Arc::new(catalog))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use travel_desk_core::Category;

    #[tokio::test]
    async fn test_create_static_without_fixture() {
        let config = CatalogConfig::default();
        let catalog = create_catalog(&config).unwrap();
        assert!(catalog.get(Category::Flights).await.is_empty());
    }

    #[test]
    fn test_create_sheets_requires_spreadsheet() {
        let config = CatalogConfig {
            provider: CatalogProvider::Sheets,
            ..Default::default()
        };
        assert!(matches!(
            create_catalog(&config),
            Err(CatalogError::Configuration(_))
        ));
    }
}
