// Two-phase object relocation
//
// copy (read + write) -> verify (stat) -> delete. The verify step runs
// before the source delete so a silently-lost copy can never destroy the
// only replica. A failed delete after a verified copy leaves the object in
// both places; callers decide whether that duplication is acceptable.

use crate::{ObjectStore, StorageError};

/// Outcome of a completed copy phase
#[derive(Debug)]
pub enum MoveOutcome {
    /// Copy verified and source deleted
    Moved,
    /// Copy verified but the source delete failed; the object now exists
    /// at both keys
    CopiedButNotDeleted { delete_error: opendal::Error },
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved)
    }
}

impl ObjectStore {
    /// Move an object between keys via copy-then-delete.
    ///
    /// Any error before the delete phase means the source is still in
    /// place (the copy never became authoritative). `Ok` means the object
    /// is durably at `to`; inspect the outcome for leftover duplication.
    pub async fn move_object(&self, from: &str, to: &str) -> Result<MoveOutcome, StorageError> {
        let copy_err = |phase: &'static str| {
            let from = from.to_string();
            let to = to.to_string();
            move |source: opendal::Error| StorageError::CopyFailed {
                from,
                to,
                phase,
                source,
            }
        };

        let data = self
            .operator()
            .read(from)
            .await
            .map_err(copy_err("read source"))?;

        self.operator()
            .write(to, data)
            .await
            .map_err(copy_err("write destination"))?;

        self.operator()
            .stat(to)
            .await
            .map_err(copy_err("verify destination"))?;

        match self.operator().delete(from).await {
            Ok(()) => {
                tracing::debug!(from, to, "object moved");
                Ok(MoveOutcome::Moved)
            }
            Err(delete_error) => {
                tracing::warn!(
                    from,
                    to,
                    error = %delete_error,
                    "copy verified but source delete failed; object exists at both keys"
                );
                Ok(MoveOutcome::CopiedButNotDeleted { delete_error })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendal::Operator;

    fn memory_store() -> ObjectStore {
        let op = Operator::new(opendal::services::Memory::default())
            .unwrap()
            .finish();
        ObjectStore::from_operator(op)
    }

    #[tokio::test]
    async fn move_relocates_and_removes_source() {
        let store = memory_store();
        store
            .write("source-folder/a.csv", b"id\n1\n".to_vec())
            .await
            .unwrap();

        let outcome = store
            .move_object("source-folder/a.csv", "processed-folder/a.csv")
            .await
            .unwrap();

        assert!(outcome.is_moved());
        assert!(!store.exists("source-folder/a.csv").await.unwrap());
        assert_eq!(
            store.read("processed-folder/a.csv").await.unwrap(),
            b"id\n1\n"
        );
    }

    #[tokio::test]
    async fn move_missing_source_is_copy_failure() {
        let store = memory_store();
        let err = store
            .move_object("source-folder/gone.csv", "processed-folder/gone.csv")
            .await
            .unwrap_err();

        match err {
            StorageError::CopyFailed { phase, .. } => assert_eq!(phase, "read source"),
            other => panic!("expected CopyFailed, got {other:?}"),
        }
        // Nothing appeared at the destination
        assert!(!store.exists("processed-folder/gone.csv").await.unwrap());
    }

    #[tokio::test]
    async fn move_overwrites_existing_destination() {
        let store = memory_store();
        store.write("src/a.csv", b"new".to_vec()).await.unwrap();
        store.write("dst/a.csv", b"old".to_vec()).await.unwrap();

        let outcome = store.move_object("src/a.csv", "dst/a.csv").await.unwrap();
        assert!(outcome.is_moved());
        assert_eq!(store.read("dst/a.csv").await.unwrap(), b"new");
    }
}
