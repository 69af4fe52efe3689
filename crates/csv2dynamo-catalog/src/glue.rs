// Glue Data Catalog implementation
//
// Pages through get_tables in service order and keeps the first table
// whose name starts with the prefix. Filtering happens client-side so the
// first-match tie-break is ours, not the service's expression matcher.

use crate::{SchemaCatalog, SchemaError};
use async_trait::async_trait;
use aws_sdk_glue::error::DisplayErrorContext;
use csv2dynamo_core::{ColumnDef, FieldType, TableShape};

pub struct GlueCatalog {
    client: aws_sdk_glue::Client,
}

impl GlueCatalog {
    pub fn new(client: aws_sdk_glue::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SchemaCatalog for GlueCatalog {
    async fn resolve_schema(
        &self,
        database: &str,
        prefix: &str,
    ) -> Result<TableShape, SchemaError> {
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self.client.get_tables().database_name(database);
            if let Some(token) = next_token.take() {
                request = request.next_token(token);
            }

            let output = request.send().await.map_err(|e| SchemaError::Catalog {
                message: format!("{}", DisplayErrorContext(e)),
            })?;

            for table in output.table_list() {
                let name = table.name();
                if !name.starts_with(prefix) {
                    continue;
                }

                tracing::debug!(table = name, prefix, "resolved catalog table");

                let columns = table
                    .storage_descriptor()
                    .map(|sd| sd.columns())
                    .unwrap_or_default()
                    .iter()
                    .map(|col| {
                        let ty = col
                            .r#type()
                            .map(FieldType::from_catalog_type)
                            .unwrap_or(FieldType::Text);
                        ColumnDef::new(col.name(), ty)
                    })
                    .collect();

                return Ok(TableShape::new(name, columns));
            }

            match output.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        Err(SchemaError::NotFound {
            database: database.to_string(),
            prefix: prefix.to_string(),
        })
    }
}
