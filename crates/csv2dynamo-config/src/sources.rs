// Configuration source loading
//
// Priority order:
// 1. Job arguments (--key value)
// 2. Environment variables (CSV2DYNAMO_* prefix)
// 3. Config file path from CSV2DYNAMO_CONFIG
// 4. Default config file (./csv2dynamo.toml)
// 5. Defaults

use crate::args::JobArgs;
use crate::{LoaderConfig, StorageBackend, ENV_PREFIX};
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

pub(crate) fn load_loader_config(args: &JobArgs) -> Result<LoaderConfig> {
    let mut config = load_from_file()?.unwrap_or_default();

    let env_source = StdEnvSource;
    apply_env_overrides(&mut config, &env_source)?;
    apply_arg_overrides(&mut config, args)?;

    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<LoaderConfig>> {
    if let Ok(path) = env::var(format!("{}CONFIG", ENV_PREFIX)) {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: LoaderConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        return Ok(Some(config));
    }

    let default_path = "./csv2dynamo.toml";
    if Path::new(default_path).exists() {
        let content = std::fs::read_to_string(default_path)
            .with_context(|| format!("Failed to read config file: {}", default_path))?;
        let config: LoaderConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", default_path))?;
        return Ok(Some(config));
    }

    Ok(None)
}

pub(crate) trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}

pub(crate) fn apply_env_overrides(
    config: &mut LoaderConfig,
    source: &dyn EnvSource,
) -> Result<()> {
    let overrides: [(&str, &mut String); 8] = [
        ("DATA_FILE_NAME", &mut config.data_file_name),
        ("SOURCE_FOLDER", &mut config.source_folder),
        ("DESTINATION_FOLDER", &mut config.destination_folder),
        ("FAILED_FOLDER", &mut config.failed_folder),
        ("DYNAMODB_TABLE_NAME", &mut config.dynamodb_table_name),
        ("CATALOG_DATABASE", &mut config.catalog_database),
        ("TABLE_PREFIX", &mut config.table_prefix),
        ("BUCKET", &mut config.storage.bucket),
    ];
    for (key, field) in overrides {
        if let Some(value) = source.get(key) {
            *field = value;
        }
    }

    if let Some(value) = source.get("REGION") {
        config.storage.region = value;
    }
    if let Some(value) = source.get("FS_ROOT") {
        config.storage.fs_root = value;
    }
    if let Some(value) = source.get("STORAGE") {
        config.storage.backend = value.parse::<StorageBackend>()?;
    }

    Ok(())
}

pub(crate) fn apply_arg_overrides(config: &mut LoaderConfig, args: &JobArgs) -> Result<()> {
    let overrides: [(&str, &mut String); 8] = [
        ("data_file_name", &mut config.data_file_name),
        ("source_folder", &mut config.source_folder),
        ("destination_folder", &mut config.destination_folder),
        ("failed_folder", &mut config.failed_folder),
        ("dynamodb_table_name", &mut config.dynamodb_table_name),
        ("catalog_database", &mut config.catalog_database),
        ("table_prefix", &mut config.table_prefix),
        ("bucket", &mut config.storage.bucket),
    ];
    for (key, field) in overrides {
        if let Some(value) = args.get(key) {
            *field = value.to_string();
        }
    }

    if let Some(value) = args.get("region") {
        config.storage.region = value.to_string();
    }
    if let Some(value) = args.get("fs_root") {
        config.storage.fs_root = value.to_string();
    }
    if let Some(value) = args.get("storage") {
        config.storage.backend = value.parse::<StorageBackend>()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapEnvSource(HashMap<&'static str, &'static str>);

    impl EnvSource for MapEnvSource {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).map(|v| v.to_string())
        }
    }

    fn full_args() -> JobArgs {
        JobArgs::parse(
            [
                "--data_file_name",
                "people.csv",
                "--bucket",
                "ingest-bucket",
                "--source_folder",
                "source-folder",
                "--destination_folder",
                "processed-folder",
                "--failed_folder",
                "failed-folder",
                "--dynamodb_table_name",
                "glue_poc_table",
                "--catalog_database",
                "glue_poc_db",
                "--table_prefix",
                "glue_poc_",
            ]
            .iter()
            .map(|s| s.to_string()),
        )
        .unwrap()
    }

    #[test]
    fn args_fill_every_required_field() {
        let mut config = LoaderConfig::default();
        apply_arg_overrides(&mut config, &full_args()).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.data_file_name, "people.csv");
        assert_eq!(config.storage.bucket, "ingest-bucket");
    }

    #[test]
    fn args_override_env() {
        let mut config = LoaderConfig::default();
        let env = MapEnvSource(HashMap::from([
            ("DATA_FILE_NAME", "from_env.csv"),
            ("REGION", "eu-west-1"),
        ]));
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.data_file_name, "from_env.csv");
        assert_eq!(config.storage.region, "eu-west-1");

        apply_arg_overrides(&mut config, &full_args()).unwrap();
        assert_eq!(config.data_file_name, "people.csv");
        // Region untouched by args, env value survives
        assert_eq!(config.storage.region, "eu-west-1");
    }

    #[test]
    fn storage_backend_override() {
        let mut config = LoaderConfig::default();
        let args = JobArgs::parse(
            ["--storage", "fs", "--fs_root", "/tmp/ingest"]
                .iter()
                .map(|s| s.to_string()),
        )
        .unwrap();
        apply_arg_overrides(&mut config, &args).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Fs);
        assert_eq!(config.storage.fs_root, "/tmp/ingest");
    }

    #[test]
    fn bad_backend_value_is_an_error() {
        let mut config = LoaderConfig::default();
        let env = MapEnvSource(HashMap::from([("STORAGE", "gcs")]));
        assert!(apply_env_overrides(&mut config, &env).is_err());
    }

    #[test]
    fn file_config_parses_nested_storage() {
        let toml_content = r#"
            data_file_name = "people.csv"
            source_folder = "source-folder"

            [storage]
            backend = "fs"
            fs_root = "/tmp/data"
        "#;
        let config: LoaderConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Fs);
        assert_eq!(config.storage.fs_root, "/tmp/data");
        assert_eq!(config.data_file_name, "people.csv");
        // Unset sections keep defaults
        assert_eq!(config.storage.region, "us-east-1");
    }
}
