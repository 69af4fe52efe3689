// csv2dynamo-table - Key-value table writes
//
// One item per reconciled record, keyed by numeric `id`, overwriting any
// existing item. The batch write is sequential and non-transactional: the
// first rejected put aborts the remainder and whatever was already written
// stays written. Callers own that duplication/partial-write policy.

use async_trait::async_trait;
use csv2dynamo_core::Record;
use thiserror::Error;

mod dynamo;
mod memory;

pub use dynamo::DynamoTable;
pub use memory::MemoryTable;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("write to table {table:?} failed for id {id} after {written} records: {source}")]
    Write {
        table: String,
        id: i64,
        written: usize,
        #[source]
        source: PutError,
    },
}

/// Why one put was rejected by the backing store
#[derive(Debug, Error)]
#[error("{0}")]
pub struct PutError(pub String);

/// Single-item put into the destination table
#[async_trait]
pub trait TableWriter: Send + Sync {
    async fn put_record(&self, table: &str, record: &Record) -> Result<(), PutError>;
}

/// Write every record in order; abort on the first failure.
///
/// Returns the number of records written. On `Err`, the error carries how
/// many records were already durably written before the failing one -
/// they are NOT retracted.
pub async fn write_batch(
    writer: &dyn TableWriter,
    table: &str,
    records: &[Record],
) -> Result<usize, TableError> {
    let mut written = 0;
    for record in records {
        writer
            .put_record(table, record)
            .await
            .map_err(|source| TableError::Write {
                table: table.to_string(),
                id: record.id,
                written,
                source,
            })?;
        written += 1;
    }

    tracing::debug!(table, written, "batch write complete");
    Ok(written)
}
