// csv2dynamo-storage - Object store operations
//
// One OpenDAL-backed abstraction across platforms:
// - S3 (production)
// - Filesystem (local runs)
// - Memory (tests, via from_operator)
//
// Relocation is an explicit two-phase copy-then-delete. There is no atomic
// rename between prefixes, so the outcome type keeps the phases visible and
// lets callers pick a consistency policy.

use opendal::Operator;
use thiserror::Error;

mod relocate;

pub use relocate::MoveOutcome;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to initialize {backend} storage: {source}")]
    Init {
        backend: &'static str,
        source: opendal::Error,
    },

    #[error("failed to read object {path:?}: {source}")]
    Read {
        path: String,
        source: opendal::Error,
    },

    #[error("failed to write object {path:?}: {source}")]
    Write {
        path: String,
        source: opendal::Error,
    },

    #[error("failed to stat object {path:?}: {source}")]
    Stat {
        path: String,
        source: opendal::Error,
    },

    /// The copy phase of a move did not complete; the source is untouched.
    #[error("copy {from:?} -> {to:?} failed during {phase}: {source}")]
    CopyFailed {
        from: String,
        to: String,
        phase: &'static str,
        source: opendal::Error,
    },
}

#[derive(Clone)]
pub struct ObjectStore {
    operator: Operator,
}

impl ObjectStore {
    /// Create storage for S3.
    ///
    /// Credentials come from the ambient AWS environment (execution role,
    /// env vars, or the credentials file).
    pub fn new_s3(bucket: &str, region: &str) -> Result<Self, StorageError> {
        let builder = opendal::services::S3::default().bucket(bucket).region(region);

        let operator = Operator::new(builder)
            .map_err(|source| StorageError::Init {
                backend: "s3",
                source,
            })?
            .finish();
        Ok(Self { operator })
    }

    /// Create storage rooted at a local directory.
    pub fn new_fs(root: &str) -> Result<Self, StorageError> {
        let builder = opendal::services::Fs::default().root(root);

        let operator = Operator::new(builder)
            .map_err(|source| StorageError::Init {
                backend: "fs",
                source,
            })?
            .finish();
        Ok(Self { operator })
    }

    /// Wrap an existing operator (tests inject the memory service here).
    pub fn from_operator(operator: Operator) -> Self {
        Self { operator }
    }

    pub(crate) fn operator(&self) -> &Operator {
        &self.operator
    }

    pub async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let data = self
            .operator
            .read(path)
            .await
            .map_err(|source| StorageError::Read {
                path: path.to_string(),
                source,
            })?;
        Ok(data.to_vec())
    }

    pub async fn write(&self, path: &str, data: Vec<u8>) -> Result<(), StorageError> {
        self.operator
            .write(path, data)
            .await
            .map_err(|source| StorageError::Write {
                path: path.to_string(),
                source,
            })?;
        Ok(())
    }

    pub async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        match self.operator.stat(path).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StorageError::Stat {
                path: path.to_string(),
                source,
            }),
        }
    }
}

/// Join a folder prefix and a bare file name into an object key.
pub fn join_key(prefix: &str, name: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", trimmed, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> ObjectStore {
        let op = Operator::new(opendal::services::Memory::default())
            .unwrap()
            .finish();
        ObjectStore::from_operator(op)
    }

    #[test]
    fn join_key_normalizes_prefixes() {
        assert_eq!(join_key("source-folder", "a.csv"), "source-folder/a.csv");
        assert_eq!(join_key("source-folder/", "a.csv"), "source-folder/a.csv");
        assert_eq!(join_key("/nested/in/", "a.csv"), "nested/in/a.csv");
        assert_eq!(join_key("", "a.csv"), "a.csv");
    }

    #[tokio::test]
    async fn read_write_round_trip() {
        let store = memory_store();
        store
            .write("source-folder/a.csv", b"id\n1\n".to_vec())
            .await
            .unwrap();
        assert_eq!(store.read("source-folder/a.csv").await.unwrap(), b"id\n1\n");
    }

    #[tokio::test]
    async fn exists_distinguishes_missing() {
        let store = memory_store();
        store.write("here.csv", b"x".to_vec()).await.unwrap();
        assert!(store.exists("here.csv").await.unwrap());
        assert!(!store.exists("gone.csv").await.unwrap());
    }

    #[tokio::test]
    async fn read_missing_is_an_error() {
        let store = memory_store();
        let err = store.read("nope.csv").await.unwrap_err();
        assert!(matches!(err, StorageError::Read { .. }));
    }
}
