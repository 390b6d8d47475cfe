use async_trait::async_trait;
use contracts::domain::a001_employee::Employee;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use thiserror::Error;

use crate::domain::a001_employee::repository;

/// Storage failures. Any of them aborts the whole upload.
#[derive(Debug, Error)]
pub enum CommitError {
    #[error("cannot open transaction: {0}")]
    Begin(String),

    #[error("lookup of id {id} failed: {message}")]
    Lookup { id: i64, message: String },

    #[error("cannot write staged rows: {0}")]
    Write(String),

    #[error("cannot commit transaction: {0}")]
    Commit(String),
}

/// Datastore seen by the import pipeline.
///
/// Staged records stay invisible until `commit`; dropping the store without
/// committing discards them.
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn exists_by_id(&self, id: i64) -> Result<bool, CommitError>;

    fn stage_insert(&mut self, employee: Employee);

    /// Persists every staged record atomically, returns how many were written
    async fn commit(self) -> Result<usize, CommitError>
    where
        Self: Sized;
}

/// One upload against SQLite: a transaction plus the rows waiting for it
pub struct ImportSession {
    txn: DatabaseTransaction,
    staged: Vec<Employee>,
}

impl ImportSession {
    pub async fn begin(db: &DatabaseConnection) -> Result<Self, CommitError> {
        let txn = db
            .begin()
            .await
            .map_err(|e| CommitError::Begin(e.to_string()))?;
        Ok(Self {
            txn,
            staged: Vec::new(),
        })
    }
}

#[async_trait]
impl EmployeeStore for ImportSession {
    async fn exists_by_id(&self, id: i64) -> Result<bool, CommitError> {
        repository::exists_by_id(&self.txn, id)
            .await
            .map_err(|e| CommitError::Lookup {
                id,
                message: e.to_string(),
            })
    }

    fn stage_insert(&mut self, employee: Employee) {
        self.staged.push(employee);
    }

    async fn commit(self) -> Result<usize, CommitError> {
        let count = self.staged.len();
        repository::insert_many(&self.txn, &self.staged)
            .await
            .map_err(|e| CommitError::Write(e.to_string()))?;
        self.txn
            .commit()
            .await
            .map_err(|e| CommitError::Commit(e.to_string()))?;
        Ok(count)
    }
}
