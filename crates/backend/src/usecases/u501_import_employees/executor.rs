use std::time::Instant;

use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_import_employees::ImportEmployees;
use sea_orm::DatabaseConnection;
use thiserror::Error;

use super::committer::BatchCommitter;
use super::report::{ImportReport, RowOutcome};
use super::resolver::{DuplicateResolver, Resolution};
use super::store::{CommitError, EmployeeStore, ImportSession};
use super::validator::validate_row;
use crate::shared::spreadsheet::{decode, DecodeError, RawRow, SpreadsheetFormat};

/// Failures that end an upload without a report
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid spreadsheet: {0}")]
    Decode(#[from] DecodeError),

    #[error("Storage failure: {0}")]
    Commit(#[from] CommitError),
}

/// Decodes the upload and imports it inside one database transaction
pub async fn import_spreadsheet(
    db: &DatabaseConnection,
    bytes: Vec<u8>,
    format: SpreadsheetFormat,
) -> Result<ImportReport, ImportError> {
    let usecase = ImportEmployees::full_name();
    tracing::info!("{}: received {} bytes as {:?}", usecase, bytes.len(), format);

    let rows = decode(bytes, format).map_err(|e| {
        tracing::error!("{}: cannot decode upload: {}", usecase, e);
        ImportError::from(e)
    })?;
    let session = ImportSession::begin(db).await?;
    run_import(session, rows).await
}

/// Classifies every row and commits the insertable ones.
///
/// Either every row gets an outcome and the batch is committed, or the
/// first fatal error is returned and nothing is written.
pub async fn run_import<S, I>(store: S, rows: I) -> Result<ImportReport, ImportError>
where
    S: EmployeeStore,
    I: IntoIterator<Item = Result<RawRow, DecodeError>>,
{
    let usecase = ImportEmployees::full_name();
    let started = Instant::now();
    let mut committer = BatchCommitter::new(store);
    let mut resolver = DuplicateResolver::new();
    let mut outcomes = Vec::new();

    for (row_index, row) in rows.into_iter().enumerate() {
        let row = row.map_err(|e| {
            tracing::error!("{}: decoding failed at row {}: {}", usecase, row_index, e);
            ImportError::from(e)
        })?;

        let employee = match validate_row(&row) {
            Ok(employee) => employee,
            Err(e) => {
                tracing::warn!("{}: row {} rejected: {}", usecase, row_index, e);
                outcomes.push(RowOutcome::Invalid {
                    row_index,
                    reason: e.to_string(),
                    row,
                });
                continue;
            }
        };

        let id = employee.id;
        match resolver.resolve(committer.store(), id).await {
            Ok(Resolution::Insert) => {
                committer.queue(employee);
                outcomes.push(RowOutcome::Inserted { row_index, id });
            }
            Ok(Resolution::Duplicate(reason)) => {
                tracing::warn!("{}: row {} skipped, id {}: {}", usecase, row_index, id, reason);
                outcomes.push(RowOutcome::SkippedDuplicate {
                    row_index,
                    id,
                    reason,
                });
            }
            Err(e) => {
                tracing::error!("{}: {}", usecase, e);
                return Err(e.into());
            }
        }
    }

    let inserted_count = committer.commit().await.map_err(|e| {
        tracing::error!("{}: {}", usecase, e);
        ImportError::from(e)
    })?;
    let report = ImportReport::from_outcomes(outcomes, inserted_count);

    tracing::info!(
        "{}: {} rows, {} inserted, {} skipped, {} invalid in {} ms",
        usecase,
        report.total_rows(),
        report.inserted_count,
        report.skipped_records.len(),
        report.invalid_rows.len(),
        started.elapsed().as_millis()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::a001_employee::repository;
    use crate::shared::data::db::memory_database;
    use crate::shared::spreadsheet::CellValue;
    use crate::usecases::u501_import_employees::testing::FakeStore;

    fn num(value: f64) -> CellValue {
        CellValue::Number(value)
    }

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    fn employee_row(id: CellValue, name: &str, age: CellValue, salary: f64) -> RawRow {
        RawRow::new(vec![
            ("id".to_string(), id),
            ("name".to_string(), text(name)),
            ("age".to_string(), age),
            ("position".to_string(), text("Eng")),
            ("salary".to_string(), num(salary)),
        ])
    }

    fn scenario_rows() -> Vec<Result<RawRow, DecodeError>> {
        vec![
            Ok(employee_row(num(1.0), "A", num(30.0), 50000.0)),
            Ok(employee_row(num(1.0), "B", num(25.0), 60000.0)),
            Ok(employee_row(num(2.0), "C", text("x"), 40000.0)),
        ]
    }

    #[tokio::test]
    async fn test_scenario_on_empty_store() {
        let store = FakeStore::default();
        let committed = store.committed_handle();

        let report = run_import(store, scenario_rows()).await.unwrap();

        assert_eq!(report.inserted_count, 1);
        assert_eq!(report.skipped_records.len(), 1);
        assert_eq!(report.skipped_records[0].row_index, 1);
        assert_eq!(report.skipped_records[0].id, 1);
        assert_eq!(report.skipped_records[0].reason, "Duplicate ID within upload");
        assert_eq!(report.invalid_rows.len(), 1);
        assert_eq!(report.invalid_rows[0].row_index, 2);
        assert_eq!(report.invalid_rows[0].error, "Invalid age type");
        assert_eq!(report.invalid_rows[0].row.get("age"), &text("x"));

        let stored = committed.lock().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].name, "A");
    }

    #[tokio::test]
    async fn test_partition_and_reimport() {
        let rows = || -> Vec<Result<RawRow, DecodeError>> {
            vec![
                Ok(employee_row(num(1.0), "A", num(30.0), 1.0)),
                Ok(employee_row(text("2"), "B", num(31.0), 2.0)),
                Ok(employee_row(num(3.0), "C", CellValue::Boolean(true), 3.0)),
                Ok(employee_row(num(4.0), "D", num(33.0), 4.0)),
            ]
        };

        let first = FakeStore::default();
        let committed = first.committed_handle();
        let report = run_import(first, rows()).await.unwrap();
        assert_eq!(report.inserted_count, 3);
        assert_eq!(report.total_rows(), 4);
        assert_eq!(report.invalid_rows[0].error, "Invalid age type");

        let report = run_import(FakeStore::sharing(committed.clone()), rows())
            .await
            .unwrap();
        assert_eq!(report.inserted_count, 0);
        assert_eq!(report.total_rows(), 4);
        let reasons: Vec<&str> = report
            .skipped_records
            .iter()
            .map(|s| s.reason.as_str())
            .collect();
        assert_eq!(reasons, vec!["ID already exists"; 3]);
        let skipped_ids: Vec<i64> = report.skipped_records.iter().map(|s| s.id).collect();
        assert_eq!(skipped_ids, vec![1, 2, 4]);
        assert_eq!(committed.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_commit_failure_gives_no_report() {
        let store = FakeStore::failing_commit();
        let committed = store.committed_handle();

        let err = run_import(store, scenario_rows()).await.unwrap_err();
        assert!(matches!(err, ImportError::Commit(CommitError::Commit(_))));
        assert!(err.to_string().starts_with("Storage failure: "));
        assert!(committed.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failure_aborts() {
        let err = run_import(FakeStore::failing_lookups(), scenario_rows())
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Commit(CommitError::Lookup { id: 1, .. })));
    }

    #[tokio::test]
    async fn test_empty_upload() {
        let report = run_import(FakeStore::default(), Vec::new()).await.unwrap();
        assert_eq!(report, ImportReport::default());
        assert_eq!(report.message(), "Uploaded 0 new employees.");
    }

    #[tokio::test]
    async fn test_non_tabular_upload_is_decode_error() {
        let db = memory_database().await;
        let err = import_spreadsheet(&db, b"\x00\x01 not a workbook".to_vec(), SpreadsheetFormat::Workbook)
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Decode(_)));
        assert!(err.to_string().starts_with("Invalid spreadsheet: "));
    }

    #[tokio::test]
    async fn test_csv_import_against_database() {
        let db = memory_database().await;
        repository::insert_many(
            &db,
            &[contracts::domain::a001_employee::Employee {
                id: 5,
                name: "Existing".into(),
                age: 50,
                position: "CEO".into(),
                salary: 1.0,
            }],
        )
        .await
        .unwrap();

        let csv = "id,name,age,position,salary\n\
                   5,Eve,40,Ops,10\n\
                   6,Fay,29.7,Dev,inf\n\
                   7,Gus,,Dev,10\n\
                   6,Hal,33,Dev,10\n";
        let report = import_spreadsheet(&db, csv.as_bytes().to_vec(), SpreadsheetFormat::Csv)
            .await
            .unwrap();

        assert_eq!(report.inserted_count, 1);
        let reasons: Vec<&str> = report
            .skipped_records
            .iter()
            .map(|s| s.reason.as_str())
            .collect();
        assert_eq!(reasons, vec!["ID already exists", "Duplicate ID within upload"]);
        assert_eq!(report.invalid_rows[0].error, "Missing required fields");

        let fay = repository::get_by_id(&db, 6).await.unwrap().unwrap();
        assert_eq!(fay.age, 29);
        assert!(fay.salary.is_infinite());
    }
}
