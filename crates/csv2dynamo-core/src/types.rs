// Field types, values, and table shapes
//
// The declared type set is closed on purpose: defaults and casts are
// exhaustive matches, so adding a type is a compile error until every
// site handles it.

use chrono::NaiveDateTime;
use thiserror::Error;

/// Timestamp wire format used throughout the pipeline.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declared column type from the schema catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Bool,
    Bytes,
    Timestamp,
}

impl FieldType {
    /// Map a catalog type name onto the closed type set.
    ///
    /// Covers the Glue/Hive names the catalog actually emits. Anything
    /// unrecognized degrades to `Text` with a warning, matching the
    /// string-first coercion of the original engine.
    pub fn from_catalog_type(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" | "varchar" | "char" => FieldType::Text,
            "bigint" | "int" | "integer" | "smallint" | "tinyint" | "long" => FieldType::Integer,
            "double" | "float" | "decimal" => FieldType::Float,
            "boolean" | "bool" => FieldType::Bool,
            "binary" => FieldType::Bytes,
            "timestamp" | "date" | "datetime" => FieldType::Timestamp,
            other => {
                tracing::warn!(catalog_type = other, "unrecognized catalog type, treating as text");
                FieldType::Text
            }
        }
    }

    /// Fixed default used for empty/null cells and absent columns.
    pub fn default_value(&self) -> FieldValue {
        match self {
            FieldType::Text => FieldValue::Text(String::new()),
            FieldType::Integer => FieldValue::Integer(0),
            FieldType::Float => FieldValue::Float(0.0),
            FieldType::Bool => FieldValue::Bool(false),
            FieldType::Bytes => FieldValue::Bytes(Vec::new()),
            FieldType::Timestamp => FieldValue::Timestamp(NaiveDateTime::UNIX_EPOCH),
        }
    }

    /// Cast a raw textual cell to this type.
    pub fn cast(&self, raw: &str) -> Result<FieldValue, CastError> {
        let trimmed = raw.trim();
        let cast_err = || CastError {
            value: raw.to_string(),
            expected: *self,
        };

        match self {
            FieldType::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldType::Integer => trimmed
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| cast_err()),
            FieldType::Float => trimmed
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| cast_err()),
            FieldType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "0" => Ok(FieldValue::Bool(false)),
                _ => Err(cast_err()),
            },
            FieldType::Bytes => Ok(FieldValue::Bytes(raw.as_bytes().to_vec())),
            FieldType::Timestamp => NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
                .map(FieldValue::Timestamp)
                .map_err(|_| cast_err()),
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Bool => "boolean",
            FieldType::Bytes => "binary",
            FieldType::Timestamp => "timestamp",
        };
        write!(f, "{}", name)
    }
}

/// A cell value that could not be cast to its declared type
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot cast {value:?} to {expected}")]
pub struct CastError {
    pub value: String,
    pub expected: FieldType,
}

/// A typed cell value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Integer(_) => FieldType::Integer,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Bytes(_) => FieldType::Bytes,
            FieldValue::Timestamp(_) => FieldType::Timestamp,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Integer(n) => write!(f, "{}", n),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Bytes(b) => write!(f, "{} bytes", b.len()),
            FieldValue::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

/// One column of the authoritative shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: FieldType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Authoritative column list for one catalog table, in catalog order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableShape {
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

impl TableShape {
    pub fn new(table: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            table: table.into(),
            columns,
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// One fully-typed output row
///
/// `fields` holds exactly the shape's column set in shape order, `id`
/// included; `id` is duplicated as a plain integer because it is the
/// destination table's partition key.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: i64,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new(id: i64, fields: Vec<(String, FieldValue)>) -> Self {
        Self { id, fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
