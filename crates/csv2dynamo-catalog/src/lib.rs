// csv2dynamo-catalog - Schema catalog lookup
//
// The authoritative table shape comes from an external catalog, resolved
// by table-name prefix. The lookup is a trait so the loader can be tested
// against an in-memory catalog; production uses the Glue Data Catalog.

use async_trait::async_trait;
use csv2dynamo_core::TableShape;
use thiserror::Error;

mod glue;
mod memory;

pub use glue::GlueCatalog;
pub use memory::MemoryCatalog;

#[derive(Debug, Error)]
pub enum SchemaError {
    /// No catalog table name starts with the configured prefix
    #[error("no table in database {database:?} matches prefix {prefix:?}")]
    NotFound { database: String, prefix: String },

    /// The catalog itself could not be queried
    #[error("catalog request failed: {message}")]
    Catalog { message: String },
}

/// Prefix-matched shape lookup against an external schema catalog
///
/// Tables are considered in the catalog's listing order and the FIRST name
/// starting with `prefix` wins; implementations must preserve that order so
/// the tie-break stays deterministic.
#[async_trait]
pub trait SchemaCatalog: Send + Sync {
    async fn resolve_schema(&self, database: &str, prefix: &str)
        -> Result<TableShape, SchemaError>;
}
