// csv2dynamo-loader - The batch loader job
//
// One file per run: resolve the authoritative shape, read the file,
// reconcile, write to the table, then relocate the file - archive on
// success, failed prefix on any error. All file-level errors are caught at
// this boundary, logged with context, and re-raised after the best-effort
// relocation; the run then exits non-zero.

use csv2dynamo_catalog::{SchemaCatalog, SchemaError};
use csv2dynamo_config::LoaderConfig;
use csv2dynamo_core::{reconcile_csv, ReconcileError};
use csv2dynamo_storage::{join_key, ObjectStore, StorageError};
use csv2dynamo_table::{write_batch, TableError, TableWriter};
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("configuration error: {0}")]
    Config(#[source] anyhow::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Table(#[from] TableError),

    /// The post-processing move itself failed; the file may be stuck or
    /// duplicated. No further relocation is attempted.
    #[error("relocation to {to:?} failed: {source}")]
    Relocation {
        to: String,
        #[source]
        source: StorageError,
    },
}

/// What a successful run did
#[derive(Debug)]
pub struct RunSummary {
    /// Catalog table whose shape was applied
    pub schema_table: String,
    pub rows_loaded: usize,
    /// Key the source file was archived under
    pub archived_to: String,
    /// True when the archive copy succeeded but the source delete failed
    /// (the file now exists in both locations)
    pub source_duplicated: bool,
}

/// Process the configured file once.
///
/// The success path moves the file to the destination prefix; every
/// processing error routes it to the failed prefix and re-raises the
/// original error. Service clients come in as traits so runs can be
/// exercised end-to-end against in-memory fakes.
pub async fn run_once(
    config: &LoaderConfig,
    catalog: &dyn SchemaCatalog,
    store: &ObjectStore,
    table: &dyn TableWriter,
) -> Result<RunSummary, LoaderError> {
    let file_name = &config.data_file_name;
    let source_key = join_key(&config.source_folder, file_name);

    match process_file(config, catalog, store, table, &source_key).await {
        Ok((schema_table, rows_loaded)) => {
            let archive_key = join_key(&config.destination_folder, file_name);
            let outcome = store
                .move_object(&source_key, &archive_key)
                .await
                .map_err(|source| LoaderError::Relocation {
                    to: archive_key.clone(),
                    source,
                })?;

            info!(
                file = %file_name,
                table = %schema_table,
                rows = rows_loaded,
                archived_to = %archive_key,
                "file loaded and archived"
            );

            Ok(RunSummary {
                schema_table,
                rows_loaded,
                archived_to: archive_key,
                source_duplicated: !outcome.is_moved(),
            })
        }
        Err(err) => {
            error!(
                file = %file_name,
                error = %err,
                "processing failed, routing file to failed location"
            );

            let failed_key = join_key(&config.failed_folder, file_name);
            match store.move_object(&source_key, &failed_key).await {
                Ok(_) => info!(file = %file_name, failed_key = %failed_key, "file routed to failed location"),
                Err(move_err) => warn!(
                    file = %file_name,
                    error = %move_err,
                    "could not relocate file after processing error"
                ),
            }

            // The original error is what failed the run, not the cleanup.
            Err(err)
        }
    }
}

/// Read -> reconcile -> write. No relocation here; `run_once` owns that.
async fn process_file(
    config: &LoaderConfig,
    catalog: &dyn SchemaCatalog,
    store: &ObjectStore,
    table: &dyn TableWriter,
    source_key: &str,
) -> Result<(String, usize), LoaderError> {
    // Shape first: a missing schema must fail before any row processing.
    let shape = catalog
        .resolve_schema(&config.catalog_database, &config.table_prefix)
        .await?;

    let bytes = store.read(source_key).await?;
    let batch = reconcile_csv(&bytes, &shape)?;

    let rows = write_batch(table, &config.dynamodb_table_name, &batch.records).await?;
    Ok((batch.shape.table, rows))
}
