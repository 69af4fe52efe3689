// CSV decoding into an untyped table
//
// First line is the header; every row must have the header's width
// (the reader's strict mode rejects ragged rows). Values stay textual
// until reconciliation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("source file is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("source file has no header row")]
    MissingHeader,
}

/// Uninterpreted file contents: header names plus rows of raw strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DecodeError::MissingHeader);
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
