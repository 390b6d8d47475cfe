pub mod response;

pub use response::{ImportResponse, InvalidRow, SkippedRecord};

use crate::usecases::common::UseCaseMetadata;

pub struct ImportEmployees;

impl UseCaseMetadata for ImportEmployees {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "import_employees"
    }

    fn display_name() -> &'static str {
        "Employee spreadsheet import"
    }

    fn description() -> &'static str {
        "Bulk insert of employees from an uploaded xlsx/xls/ods/csv file"
    }
}
