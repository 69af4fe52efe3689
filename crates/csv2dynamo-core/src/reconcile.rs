// Schema reconciliation
//
// Shapes one raw CSV table into typed records matching the authoritative
// column list. Invariants:
//   - every output row has exactly the shape's columns, in shape order
//   - empty/null cells and absent columns take the per-type default
//   - source columns outside the shape are dropped (logged, not fatal)
//   - `id` must come from the source and is coerced to integer no matter
//     what the catalog declares it as
//
// Any cast failure aborts the whole file; there is no partial output.

use crate::decode::{DecodeError, RawTable};
use crate::types::{CastError, FieldType, Record, TableShape};
use crate::ReconciledBatch;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("catalog table {table:?} does not declare the required `id` column")]
    IdNotInShape { table: String },

    #[error("source file is missing the required `id` column (found: {found:?})")]
    IdNotInSource { found: Vec<String> },

    #[error("row {row}, column {column:?}: {source}")]
    Coercion {
        row: usize,
        column: String,
        #[source]
        source: CastError,
    },
}

/// A cell counts as null when it is empty after trimming or spells "null".
fn is_null_marker(cell: &str) -> bool {
    let trimmed = cell.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("null")
}

/// Reconcile a raw table against the authoritative shape.
///
/// Pure function of its inputs: the same file and shape always produce the
/// same batch, so a re-presented file reloads identically.
pub fn reconcile(raw: &RawTable, shape: &TableShape) -> Result<ReconciledBatch, ReconcileError> {
    if !shape.has_column("id") {
        return Err(ReconcileError::IdNotInShape {
            table: shape.table.clone(),
        });
    }

    // `id` is never synthesized: a defaulted key would collide on every row.
    if raw.column_index("id").is_none() {
        return Err(ReconcileError::IdNotInSource {
            found: raw.headers().to_vec(),
        });
    }

    let dropped: Vec<&str> = raw
        .headers()
        .iter()
        .filter(|h| !shape.has_column(h))
        .map(|h| h.as_str())
        .collect();
    if !dropped.is_empty() {
        tracing::warn!(
            table = %shape.table,
            columns = ?dropped,
            "dropping source columns not present in the catalog shape"
        );
    }

    let mut records = Vec::with_capacity(raw.row_count());
    for (row_idx, row) in raw.rows().iter().enumerate() {
        let row_num = row_idx + 1;
        let mut id: i64 = 0;
        let mut fields = Vec::with_capacity(shape.columns.len());

        for col in &shape.columns {
            // The partition key is integer-typed regardless of catalog declaration.
            let ty = if col.name == "id" {
                FieldType::Integer
            } else {
                col.ty
            };

            let value = match raw.column_index(&col.name) {
                Some(idx) => {
                    let cell = &row[idx];
                    if is_null_marker(cell) {
                        ty.default_value()
                    } else {
                        ty.cast(cell).map_err(|source| ReconcileError::Coercion {
                            row: row_num,
                            column: col.name.clone(),
                            source,
                        })?
                    }
                }
                None => ty.default_value(),
            };

            if col.name == "id" {
                if let Some(n) = value.as_integer() {
                    id = n;
                }
            }
            fields.push((col.name.clone(), value));
        }

        records.push(Record::new(id, fields));
    }

    Ok(ReconciledBatch {
        shape: shape.clone(),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColumnDef, FieldValue};

    fn customers_shape() -> TableShape {
        TableShape::new(
            "glue_poc_customers",
            vec![
                ColumnDef::new("id", FieldType::Integer),
                ColumnDef::new("name", FieldType::Text),
                ColumnDef::new("age", FieldType::Integer),
            ],
        )
    }

    fn raw(csv: &[u8]) -> RawTable {
        RawTable::from_csv_bytes(csv).unwrap()
    }

    #[test]
    fn empty_cells_take_per_type_defaults() {
        // {id:"5", name:"", age:"7"} -> {id:5, name:"", age:7}
        let batch = reconcile(&raw(b"id,name,age\n5,,7\n"), &customers_shape()).unwrap();
        let rec = &batch.records[0];
        assert_eq!(rec.id, 5);
        assert_eq!(rec.get("name"), Some(&FieldValue::Text(String::new())));
        assert_eq!(rec.get("age"), Some(&FieldValue::Integer(7)));
    }

    #[test]
    fn absent_column_is_synthesized_with_defaults() {
        // Source missing `age` entirely -> age:0 on every row
        let batch = reconcile(&raw(b"id,name\n5,Bob\n"), &customers_shape()).unwrap();
        let rec = &batch.records[0];
        assert_eq!(rec.id, 5);
        assert_eq!(rec.get("name"), Some(&FieldValue::Text("Bob".into())));
        assert_eq!(rec.get("age"), Some(&FieldValue::Integer(0)));
    }

    #[test]
    fn missing_id_column_in_source_is_fatal() {
        let err = reconcile(&raw(b"name,age\nBob,7\n"), &customers_shape()).unwrap_err();
        assert!(matches!(err, ReconcileError::IdNotInSource { .. }));
    }

    #[test]
    fn missing_id_column_in_shape_is_fatal() {
        let shape = TableShape::new(
            "glue_poc_things",
            vec![ColumnDef::new("name", FieldType::Text)],
        );
        let err = reconcile(&raw(b"name\nBob\n"), &shape).unwrap_err();
        assert!(matches!(err, ReconcileError::IdNotInShape { .. }));
    }

    #[test]
    fn unknown_source_columns_are_dropped() {
        let batch = reconcile(
            &raw(b"id,name,age,mystery\n5,Bob,7,whatever\n"),
            &customers_shape(),
        )
        .unwrap();
        let rec = &batch.records[0];
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.get("mystery"), None);
    }

    #[test]
    fn output_columns_follow_shape_order() {
        // Source column order differs from the shape; output follows the shape.
        let batch = reconcile(&raw(b"age,id,name\n7,5,Bob\n"), &customers_shape()).unwrap();
        let names: Vec<&str> = batch.records[0].fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["id", "name", "age"]);
    }

    #[test]
    fn coercion_failure_aborts_the_file() {
        let err = reconcile(
            &raw(b"id,name,age\n5,Alice,7\n6,Bob,young\n"),
            &customers_shape(),
        )
        .unwrap_err();
        match err {
            ReconcileError::Coercion { row, column, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "age");
            }
            other => panic!("expected coercion error, got {other:?}"),
        }
    }

    #[test]
    fn id_is_coerced_to_integer_despite_declared_type() {
        let shape = TableShape::new(
            "glue_poc_customers",
            vec![
                ColumnDef::new("id", FieldType::Text),
                ColumnDef::new("name", FieldType::Text),
            ],
        );
        let batch = reconcile(&raw(b"id,name\n5,Bob\n"), &shape).unwrap();
        let rec = &batch.records[0];
        assert_eq!(rec.id, 5);
        assert_eq!(rec.get("id"), Some(&FieldValue::Integer(5)));
    }

    #[test]
    fn null_markers_match_defaults_for_every_type() {
        let shape = TableShape::new(
            "glue_poc_everything",
            vec![
                ColumnDef::new("id", FieldType::Integer),
                ColumnDef::new("label", FieldType::Text),
                ColumnDef::new("score", FieldType::Float),
                ColumnDef::new("active", FieldType::Bool),
                ColumnDef::new("payload", FieldType::Bytes),
                ColumnDef::new("seen_at", FieldType::Timestamp),
            ],
        );
        let batch = reconcile(
            &raw(b"id,label,score,active,payload,seen_at\n1,NULL,null, ,,\n"),
            &shape,
        )
        .unwrap();
        let rec = &batch.records[0];
        assert_eq!(rec.get("label"), Some(&FieldValue::Text(String::new())));
        assert_eq!(rec.get("score"), Some(&FieldValue::Float(0.0)));
        assert_eq!(rec.get("active"), Some(&FieldValue::Bool(false)));
        assert_eq!(rec.get("payload"), Some(&FieldValue::Bytes(Vec::new())));
        assert_eq!(
            rec.get("seen_at").unwrap().to_string(),
            "1970-01-01 00:00:00"
        );
    }

    #[test]
    fn empty_id_cell_defaults_to_zero() {
        // Defaulting is uniform across columns, the key included; the
        // original engine filled before casting in the same way.
        let batch = reconcile(&raw(b"id,name,age\n,Bob,7\n"), &customers_shape()).unwrap();
        assert_eq!(batch.records[0].id, 0);
    }
}
