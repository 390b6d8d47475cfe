pub mod committer;
pub mod executor;
pub mod report;
pub mod resolver;
pub mod store;
pub mod validator;

#[cfg(test)]
mod testing;

pub use executor::{import_spreadsheet, run_import, ImportError};
pub use report::ImportReport;
pub use store::{CommitError, EmployeeStore, ImportSession};
