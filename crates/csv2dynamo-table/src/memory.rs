// In-memory table for tests
//
// Upsert-by-id map plus an optional injected failure point so partial-write
// behavior can be exercised deterministically.

use crate::{PutError, TableWriter};
use async_trait::async_trait;
use csv2dynamo_core::Record;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Inner {
    items: BTreeMap<i64, Record>,
    puts_attempted: usize,
    fail_after: Option<usize>,
}

#[derive(Clone, Default)]
pub struct MemoryTable {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every put after the first `n` succeed.
    pub fn with_failure_after(self, n: usize) -> Self {
        self.inner.lock().unwrap().fail_after = Some(n);
        self
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: i64) -> Option<Record> {
        self.inner.lock().unwrap().items.get(&id).cloned()
    }

    pub fn puts_attempted(&self) -> usize {
        self.inner.lock().unwrap().puts_attempted
    }
}

#[async_trait]
impl TableWriter for MemoryTable {
    async fn put_record(&self, _table: &str, record: &Record) -> Result<(), PutError> {
        let mut inner = self.inner.lock().unwrap();
        inner.puts_attempted += 1;

        if let Some(limit) = inner.fail_after {
            if inner.items.len() >= limit {
                return Err(PutError("injected write failure".to_string()));
            }
        }

        inner.items.insert(record.id, record.clone());
        Ok(())
    }
}
