use contracts::domain::a001_employee::{Employee, EMPLOYEE_COLUMNS};
use thiserror::Error;

use crate::shared::spreadsheet::{CellValue, RawRow};

/// Reason a row cannot become an employee. The message is what the client sees.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowValidationError {
    #[error("Missing required fields")]
    MissingRequiredFields,

    #[error("Invalid salary type")]
    InvalidSalaryType,

    #[error("Invalid age type")]
    InvalidAgeType,

    #[error("Invalid id type")]
    InvalidIdType,

    #[error("cannot convert float infinity to integer")]
    AgeInfinite,

    #[error("Age out of range")]
    AgeOutOfRange,
}

/// Turns one decoded row into an employee, or tells why it cannot.
/// Checks run in a fixed order and the first failure wins.
pub fn validate_row(row: &RawRow) -> Result<Employee, RowValidationError> {
    if EMPLOYEE_COLUMNS.iter().any(|column| row.get(column).is_null()) {
        return Err(RowValidationError::MissingRequiredFields);
    }

    let salary = match row.get("salary") {
        CellValue::Number(value) => *value,
        CellValue::Null | CellValue::Text(_) | CellValue::Boolean(_) => {
            return Err(RowValidationError::InvalidSalaryType)
        }
    };

    let raw_age = match row.get("age") {
        CellValue::Number(value) => *value,
        CellValue::Null | CellValue::Text(_) | CellValue::Boolean(_) => {
            return Err(RowValidationError::InvalidAgeType)
        }
    };

    let id = parse_id(row.get("id")).ok_or(RowValidationError::InvalidIdType)?;
    let age = coerce_age(raw_age)?;

    Ok(Employee {
        id,
        name: row.get("name").to_string(),
        age,
        position: row.get("position").to_string(),
        salary,
    })
}

fn parse_id(cell: &CellValue) -> Option<i64> {
    match cell {
        CellValue::Number(value)
            if value.is_finite()
                && value.fract() == 0.0
                && *value >= i64::MIN as f64
                && *value < i64::MAX as f64 =>
        {
            Some(*value as i64)
        }
        CellValue::Text(text) => text.trim().parse::<i64>().ok(),
        CellValue::Number(_) | CellValue::Null | CellValue::Boolean(_) => None,
    }
}

/// Truncates toward zero. NaN never gets here, decoded cells carry it as `Null`.
fn coerce_age(value: f64) -> Result<i32, RowValidationError> {
    if value.is_infinite() {
        return Err(RowValidationError::AgeInfinite);
    }
    let truncated = value.trunc();
    if truncated < f64::from(i32::MIN) || truncated > f64::from(i32::MAX) {
        return Err(RowValidationError::AgeOutOfRange);
    }
    Ok(truncated as i32)
}
