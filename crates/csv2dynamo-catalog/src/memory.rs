// In-memory catalog for tests and local runs
//
// Tables keep insertion order so the first-match tie-break can be pinned
// in tests.

use crate::{SchemaCatalog, SchemaError};
use async_trait::async_trait;
use csv2dynamo_core::TableShape;

#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    tables: Vec<(String, TableShape)>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, database: impl Into<String>, shape: TableShape) -> Self {
        self.tables.push((database.into(), shape));
        self
    }
}

#[async_trait]
impl SchemaCatalog for MemoryCatalog {
    async fn resolve_schema(
        &self,
        database: &str,
        prefix: &str,
    ) -> Result<TableShape, SchemaError> {
        self.tables
            .iter()
            .filter(|(db, _)| db == database)
            .map(|(_, shape)| shape)
            .find(|shape| shape.table.starts_with(prefix))
            .cloned()
            .ok_or_else(|| SchemaError::NotFound {
                database: database.to_string(),
                prefix: prefix.to_string(),
            })
    }
}
