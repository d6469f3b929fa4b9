//! Catalog access: query building and the MySQL-backed store.

pub mod query;
pub mod row;
pub mod store;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use shoefinder_common::CatalogTable;

pub use query::{CatalogQuery, QueryParam, TOP_SELLING_LIMIT};
pub use store::MySqlCatalog;

/// A catalog row passed through as a JSON object keyed by column name.
pub type CatalogRow = Map<String, Value>;

/// Read-only access to the product catalog.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Whether `table` has a `Type` column. One round trip per call.
    async fn has_type_column(&self, table: CatalogTable) -> Result<bool>;

    async fn fetch(&self, query: &CatalogQuery) -> Result<Vec<CatalogRow>>;
}
