// csv2dynamo-core - Platform-agnostic loader logic
//
// This crate contains the PURE processing logic for turning one CSV file
// into typed records matching an authoritative table shape. No I/O, no
// async, no service clients - those live in the storage/catalog/table
// crates and are injected by the loader.

pub mod decode;
pub mod reconcile;
pub mod types;

pub use decode::{DecodeError, RawTable};
pub use reconcile::{reconcile, ReconcileError};
pub use types::{CastError, ColumnDef, FieldType, FieldValue, Record, TableShape};

/// Result of reconciling one file against a table shape
///
/// Carries the typed records plus the shape they conform to. Every record
/// holds exactly the shape's column set, in shape order.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledBatch {
    pub shape: TableShape,
    pub records: Vec<Record>,
}

impl ReconciledBatch {
    pub fn row_count(&self) -> usize {
        self.records.len()
    }
}

/// Decode CSV bytes and reconcile them against `shape` in one step.
///
/// This is the loader's whole data path between "bytes read from the source
/// object" and "records handed to the table writer". Deterministic for the
/// same input bytes and shape, so re-running a file always yields the same
/// batch.
pub fn reconcile_csv(bytes: &[u8], shape: &TableShape) -> Result<ReconciledBatch, ReconcileError> {
    let raw = RawTable::from_csv_bytes(bytes)?;
    reconcile(&raw, shape)
}
