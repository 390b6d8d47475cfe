use contracts::usecases::u501_import_employees::SkippedRecord;

use crate::shared::json_safe::{sanitize, JsonNode};
use crate::shared::spreadsheet::RawRow;

/// Terminal state of one uploaded row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Inserted {
        row_index: usize,
        id: i64,
    },
    Invalid {
        row_index: usize,
        reason: String,
        row: RawRow,
    },
    SkippedDuplicate {
        row_index: usize,
        id: i64,
        reason: &'static str,
    },
}

/// Row rejected by validation, with its cells as decoded
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRow {
    pub row_index: usize,
    pub row: RawRow,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportReport {
    pub inserted_count: usize,
    pub skipped_records: Vec<SkippedRecord>,
    pub invalid_rows: Vec<RejectedRow>,
}

impl ImportReport {
    /// `inserted_count` comes from the commit, outcomes keep input order
    pub fn from_outcomes(outcomes: Vec<RowOutcome>, inserted_count: usize) -> Self {
        let mut report = ImportReport {
            inserted_count,
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                RowOutcome::Inserted { .. } => {}
                RowOutcome::Invalid {
                    row_index,
                    reason,
                    row,
                } => report.invalid_rows.push(RejectedRow {
                    row_index,
                    row,
                    error: reason,
                }),
                RowOutcome::SkippedDuplicate {
                    row_index,
                    id,
                    reason,
                } => report.skipped_records.push(SkippedRecord {
                    row_index,
                    id,
                    reason: reason.to_string(),
                }),
            }
        }
        report
    }

    pub fn total_rows(&self) -> usize {
        self.inserted_count + self.skipped_records.len() + self.invalid_rows.len()
    }

    pub fn message(&self) -> String {
        format!("Uploaded {} new employees.", self.inserted_count)
    }

    /// Response body, already safe to serialize
    pub fn to_json(&self) -> JsonNode {
        sanitize(self.to_json_node())
    }

    fn to_json_node(&self) -> JsonNode {
        let skipped = self
            .skipped_records
            .iter()
            .map(|s| {
                JsonNode::map([
                    ("row_index", JsonNode::Int(s.row_index as i64)),
                    ("id", JsonNode::Int(s.id)),
                    ("reason", JsonNode::text(s.reason.as_str())),
                ])
            })
            .collect();

        let invalid = self
            .invalid_rows
            .iter()
            .map(|r| {
                JsonNode::map([
                    ("row_index", JsonNode::Int(r.row_index as i64)),
                    (
                        "row",
                        JsonNode::map(r.row.iter().map(|(name, cell)| (name, JsonNode::from(cell)))),
                    ),
                    ("error", JsonNode::text(r.error.as_str())),
                ])
            })
            .collect();

        JsonNode::map([
            ("message", JsonNode::text(self.message())),
            ("inserted_count", JsonNode::Int(self.inserted_count as i64)),
            ("skipped_records", JsonNode::List(skipped)),
            ("invalid_rows", JsonNode::List(invalid)),
        ])
    }
}
