//! In-memory [`EmployeeStore`] for pipeline tests

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use contracts::domain::a001_employee::Employee;

use super::store::{CommitError, EmployeeStore};

pub type Committed = Arc<Mutex<Vec<Employee>>>;

#[derive(Default)]
pub struct FakeStore {
    existing: HashSet<i64>,
    committed: Committed,
    staged: Vec<Employee>,
    lookups: Mutex<Vec<i64>>,
    fail_lookups: bool,
    fail_commit: bool,
}

impl FakeStore {
    pub fn with_existing(ids: &[i64]) -> Self {
        Self {
            existing: ids.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Fresh session over records committed by an earlier one
    pub fn sharing(committed: Committed) -> Self {
        Self {
            committed,
            ..Self::default()
        }
    }

    pub fn failing_lookups() -> Self {
        Self {
            fail_lookups: true,
            ..Self::default()
        }
    }

    pub fn failing_commit() -> Self {
        Self {
            fail_commit: true,
            ..Self::default()
        }
    }

    pub fn committed_handle(&self) -> Committed {
        Arc::clone(&self.committed)
    }

    pub fn lookups(&self) -> Vec<i64> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmployeeStore for FakeStore {
    async fn exists_by_id(&self, id: i64) -> Result<bool, CommitError> {
        self.lookups.lock().unwrap().push(id);
        if self.fail_lookups {
            return Err(CommitError::Lookup {
                id,
                message: "store offline".into(),
            });
        }
        let committed = self.committed.lock().unwrap();
        Ok(self.existing.contains(&id) || committed.iter().any(|e| e.id == id))
    }

    fn stage_insert(&mut self, employee: Employee) {
        self.staged.push(employee);
    }

    async fn commit(self) -> Result<usize, CommitError> {
        if self.fail_commit {
            return Err(CommitError::Commit("disk full".into()));
        }
        let count = self.staged.len();
        self.committed.lock().unwrap().extend(self.staged);
        Ok(count)
    }
}
