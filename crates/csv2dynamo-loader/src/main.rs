// Batch loader binary
//
// Invoked by the trigger platform with --key value job arguments. A
// configuration error aborts before any I/O; any processing error leaves
// the run with a non-zero exit after the file has been routed to the
// failed location.

use anyhow::Result;
use csv2dynamo_catalog::GlueCatalog;
use csv2dynamo_config::{JobArgs, LoaderConfig, StorageBackend};
use csv2dynamo_loader::{run_once, LoaderError};
use csv2dynamo_storage::ObjectStore;
use csv2dynamo_table::DynamoTable;
use tracing::info;

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Idempotent: ignore the error if a subscriber is already installed
    let _ = tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer()),
    );
}

fn build_store(config: &LoaderConfig) -> Result<ObjectStore, LoaderError> {
    let store = match config.storage.backend {
        StorageBackend::S3 => {
            info!(
                bucket = %config.storage.bucket,
                region = %config.storage.region,
                "using S3 storage"
            );
            ObjectStore::new_s3(&config.storage.bucket, &config.storage.region)?
        }
        StorageBackend::Fs => {
            info!(root = %config.storage.fs_root, "using filesystem storage");
            ObjectStore::new_fs(&config.storage.fs_root)?
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = JobArgs::from_env_args().map_err(LoaderError::Config)?;
    let config = LoaderConfig::load(&args).map_err(LoaderError::Config)?;

    info!(
        file = %config.data_file_name,
        table = %config.dynamodb_table_name,
        prefix = %config.table_prefix,
        "starting loader run"
    );

    let store = build_store(&config)?;

    let aws_config = aws_config::load_from_env().await;
    let catalog = GlueCatalog::new(aws_sdk_glue::Client::new(&aws_config));
    let table = DynamoTable::new(aws_sdk_dynamodb::Client::new(&aws_config));

    let summary = run_once(&config, &catalog, &store, &table).await?;

    info!(
        table = %summary.schema_table,
        rows = summary.rows_loaded,
        archived_to = %summary.archived_to,
        duplicated = summary.source_duplicated,
        "loader run complete"
    );

    Ok(())
}
