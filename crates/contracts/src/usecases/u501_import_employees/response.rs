use serde::{Deserialize, Serialize};

/// Result of one spreadsheet upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    pub message: String,
    pub inserted_count: usize,
    pub skipped_records: Vec<SkippedRecord>,
    pub invalid_rows: Vec<InvalidRow>,
}

/// Row that passed validation but whose id is already taken
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Zero-based data row position (header excluded)
    pub row_index: usize,
    pub id: i64,
    pub reason: String,
}

/// Row rejected by validation, with the cells as they were read.
/// Non-finite numbers arrive as the strings "inf", "-inf" and "nan".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvalidRow {
    pub row_index: usize,
    pub row: serde_json::Value,
    pub error: String,
}

impl ImportResponse {
    /// Number of rows the upload contained
    pub fn total_rows(&self) -> usize {
        self.inserted_count + self.skipped_records.len() + self.invalid_rows.len()
    }
}
