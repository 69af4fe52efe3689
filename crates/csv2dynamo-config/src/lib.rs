// csv2dynamo-config - Configuration for the loader job and the dispatcher
//
// Loader configuration comes from multiple sources:
// 1. Job arguments (--key value pairs, highest priority)
// 2. Environment variables (CSV2DYNAMO_* prefix)
// 3. Config file (./csv2dynamo.toml or CSV2DYNAMO_CONFIG path, local runs)
// 4. Defaults (lowest priority)
//
// Every required field is validated before the loader does any I/O.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

mod args;
mod sources;
mod validation;

pub use args::JobArgs;

/// Environment variable prefix shared by both binaries.
pub const ENV_PREFIX: &str = "CSV2DYNAMO_";

/// Configuration for one loader run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Bare name of the file to process, relative to the source folder
    #[serde(default)]
    pub data_file_name: String,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Prefix the file is read from
    #[serde(default)]
    pub source_folder: String,

    /// Prefix the file is archived to on success
    #[serde(default)]
    pub destination_folder: String,

    /// Prefix the file is routed to on any processing error
    #[serde(default)]
    pub failed_folder: String,

    /// Destination key-value table
    #[serde(default)]
    pub dynamodb_table_name: String,

    /// Catalog database queried for the authoritative shape
    #[serde(default)]
    pub catalog_database: String,

    /// Table-name prefix; the first catalog table starting with this wins
    #[serde(default)]
    pub table_prefix: String,
}

impl LoaderConfig {
    /// Load configuration from all sources with priority.
    pub fn load(args: &JobArgs) -> Result<Self> {
        sources::load_loader_config(args)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate_loader_config(self)
    }
}

/// Object storage backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default)]
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Root directory for the fs backend (local runs)
    #[serde(default = "default_fs_root")]
    pub fs_root: String,
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_fs_root() -> String {
    "./data".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            bucket: String::new(),
            region: default_region(),
            fs_root: default_fs_root(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Fs,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Fs => write!(f, "fs"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "s3" | "aws" => Ok(StorageBackend::S3),
            "fs" | "filesystem" => Ok(StorageBackend::Fs),
            _ => bail!("Unsupported storage backend: {}. Supported: s3, fs", s),
        }
    }
}

/// Configuration for the dispatcher function
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Name of the batch job to start per object-created event
    pub job_name: String,
}

impl DispatcherConfig {
    /// Read dispatcher configuration from the environment.
    ///
    /// The job name is injected by the provisioning platform; a missing or
    /// empty value is a configuration error the caller turns into a 500.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let key = format!("{}JOB_NAME", ENV_PREFIX);
        let job_name = match lookup(&key) {
            Some(name) if !name.trim().is_empty() => name,
            _ => bail!("{} must be set to the batch job name", key),
        };
        Ok(Self { job_name })
    }
}
