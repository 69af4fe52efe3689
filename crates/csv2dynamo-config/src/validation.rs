// Configuration validation
//
// Rejects missing required values before the loader opens any connection.

use crate::{LoaderConfig, StorageBackend};
use anyhow::{bail, Result};
use tracing::warn;

pub(crate) fn validate_loader_config(config: &LoaderConfig) -> Result<()> {
    let required = [
        ("data_file_name", &config.data_file_name),
        ("source_folder", &config.source_folder),
        ("destination_folder", &config.destination_folder),
        ("failed_folder", &config.failed_folder),
        ("dynamodb_table_name", &config.dynamodb_table_name),
        ("catalog_database", &config.catalog_database),
        ("table_prefix", &config.table_prefix),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            bail!("{} is required and must not be empty", name);
        }
    }

    if config.data_file_name.contains('/') {
        bail!(
            "data_file_name must be a bare file name, got {:?}",
            config.data_file_name
        );
    }

    // Relocation is copy-then-delete; a target equal to the source would
    // delete the file it just copied
    if config.destination_folder == config.source_folder
        || config.failed_folder == config.source_folder
    {
        warn!(
            source_folder = %config.source_folder,
            "a relocation folder equals the source folder; moves will remove the file in place"
        );
    }

    match config.storage.backend {
        StorageBackend::S3 => {
            if config.storage.bucket.trim().is_empty() {
                bail!("bucket is required for the s3 storage backend");
            }
            if config.storage.region.trim().is_empty() {
                bail!("region is required for the s3 storage backend");
            }
        }
        StorageBackend::Fs => {
            if config.storage.fs_root.trim().is_empty() {
                bail!("fs_root is required for the fs storage backend");
            }
        }
    }

    Ok(())
}
