use std::collections::HashSet;

use super::store::{CommitError, EmployeeStore};

pub const DUPLICATE_IN_UPLOAD: &str = "Duplicate ID within upload";
pub const ALREADY_EXISTS: &str = "ID already exists";

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Id is free, the record may be queued
    Insert,
    Duplicate(&'static str),
}

/// Decides whether a validated record's id is still free.
/// Ids queued earlier in the same upload count as taken.
#[derive(Debug, Default)]
pub struct DuplicateResolver {
    queued: HashSet<i64>,
}

impl DuplicateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// On `Insert` the id is reserved for the rest of the upload
    pub async fn resolve<S: EmployeeStore>(
        &mut self,
        store: &S,
        id: i64,
    ) -> Result<Resolution, CommitError> {
        if self.queued.contains(&id) {
            return Ok(Resolution::Duplicate(DUPLICATE_IN_UPLOAD));
        }
        if store.exists_by_id(id).await? {
            return Ok(Resolution::Duplicate(ALREADY_EXISTS));
        }
        self.queued.insert(id);
        Ok(Resolution::Insert)
    }
}
