use std::fmt;

static NULL_CELL: CellValue = CellValue::Null;

/// Raw value of one spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    /// NaN is a missing value, never a number
    pub fn from_number(value: f64) -> Self {
        if value.is_nan() {
            CellValue::Null
        } else {
            CellValue::Number(value)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            // f64 Display already drops the ".0" of whole numbers
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Boolean(flag) => write!(f, "{}", flag),
        }
    }
}

/// One decoded data row: column name -> cell, in source column order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    cells: Vec<(String, CellValue)>,
}

impl RawRow {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Self { cells }
    }

    /// Cell of the named column; an absent column reads as `Null`
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
            .unwrap_or(&NULL_CELL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, value)| value.is_null())
    }
}

impl FromIterator<(String, CellValue)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (String, CellValue)>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
