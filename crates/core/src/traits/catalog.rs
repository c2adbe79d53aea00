//! Catalog source trait

use async_trait::async_trait;

use crate::catalog::{Category, Record};

/// Read access to the travel catalog
///
/// Implementations own freshness (caching) and degrade to an empty sequence
/// when the backing store is unreachable.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// All rows of a category, in sheet order
    async fn get(&self, category: Category) -> Vec<Record>;
}
