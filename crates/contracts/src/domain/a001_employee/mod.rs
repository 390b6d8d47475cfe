pub mod aggregate;

pub use aggregate::{Employee, EmployeeDto, EMPLOYEE_COLUMNS};
