use contracts::domain::a001_employee::Employee;

use super::store::{CommitError, EmployeeStore};

/// Collects insertable records and writes them in a single commit
pub struct BatchCommitter<S: EmployeeStore> {
    store: S,
    queued: usize,
}

impl<S: EmployeeStore> BatchCommitter<S> {
    pub fn new(store: S) -> Self {
        Self { store, queued: 0 }
    }

    /// Lookups go through the same store, so they see the same transaction
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn queue(&mut self, employee: Employee) {
        self.store.stage_insert(employee);
        self.queued += 1;
    }

    pub fn queued(&self) -> usize {
        self.queued
    }

    /// All queued records become visible, or none do
    pub async fn commit(self) -> Result<usize, CommitError> {
        let queued = self.queued;
        let written = self.store.commit().await?;
        if written != queued {
            tracing::warn!("Committed {} employees, {} were queued", written, queued);
        }
        Ok(written)
    }
}
