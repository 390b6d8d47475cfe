//! Decoding of uploaded spreadsheets into [`RawRow`]s.
//!
//! Workbooks (xlsx, xlsm, xlsb, xls, ods) go through calamine, plain text
//! through the csv crate. The first row is always the header row.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use thiserror::Error;

use super::cell::{CellValue, RawRow};

/// Largest integer an f64 holds exactly (2^53)
const MAX_EXACT_INT: i64 = 1 << 53;

/// Cell texts read as missing values
const NA_MARKERS: &[&str] = &["NaN", "nan", "NA", "N/A", "null", "NULL"];

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no worksheet")]
    NoWorksheet,

    #[error("cannot read csv: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Workbook,
    Csv,
}

impl SpreadsheetFormat {
    /// `.csv` files are text, everything else is handed to calamine
    pub fn from_file_name(file_name: Option<&str>) -> Self {
        match file_name {
            Some(name) if name.to_ascii_lowercase().ends_with(".csv") => SpreadsheetFormat::Csv,
            _ => SpreadsheetFormat::Workbook,
        }
    }
}

/// Parses the header and returns a lazy stream over the data rows.
/// Fails without yielding anything when the blob is not tabular.
pub fn decode(bytes: Vec<u8>, format: SpreadsheetFormat) -> Result<RowStream, DecodeError> {
    match format {
        SpreadsheetFormat::Workbook => Ok(RowStream::Sheet(SheetRows::open(bytes)?)),
        SpreadsheetFormat::Csv => Ok(RowStream::Csv(CsvRows::open(bytes)?)),
    }
}

/// Single pass over decoded rows; blank rows are skipped
pub enum RowStream {
    Sheet(SheetRows),
    Csv(CsvRows),
}

impl RowStream {
    pub fn headers(&self) -> &[String] {
        match self {
            RowStream::Sheet(rows) => &rows.headers,
            RowStream::Csv(rows) => &rows.headers,
        }
    }
}

impl Iterator for RowStream {
    type Item = Result<RawRow, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            RowStream::Sheet(rows) => rows.next().map(Ok),
            RowStream::Csv(rows) => rows.next(),
        }
    }
}

// ============================================================================
// Workbooks
// ============================================================================

pub struct SheetRows {
    range: Range<Data>,
    headers: Vec<String>,
    next_row: usize,
}

impl SheetRows {
    fn open(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(DecodeError::NoWorksheet)??;
        Ok(Self::from_range(range))
    }

    fn from_range(range: Range<Data>) -> Self {
        let headers = if range.is_empty() {
            Vec::new()
        } else {
            normalize_headers((0..range.width()).map(|col| header_text(range.get((0, col)))))
        };
        Self {
            range,
            headers,
            next_row: 1,
        }
    }
}

impl Iterator for SheetRows {
    type Item = RawRow;

    fn next(&mut self) -> Option<RawRow> {
        while self.next_row < self.range.height() {
            let row_idx = self.next_row;
            self.next_row += 1;

            let row: RawRow = self
                .headers
                .iter()
                .enumerate()
                .map(|(col, header)| (header.clone(), cell_value(self.range.get((row_idx, col)))))
                .collect();
            if !row.is_blank() {
                return Some(row);
            }
        }
        None
    }
}

fn header_text(cell: Option<&Data>) -> String {
    match cell {
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) => f.to_string(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Bool(b)) => b.to_string(),
        Some(Data::DateTime(dt)) => format!("{}", dt),
        Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => s.clone(),
        Some(Data::Error(_)) | Some(Data::Empty) | None => String::new(),
    }
}

fn cell_value(cell: Option<&Data>) -> CellValue {
    match cell {
        None | Some(Data::Empty) | Some(Data::Error(_)) => CellValue::Null,
        Some(Data::String(s)) if s.is_empty() => CellValue::Null,
        Some(Data::String(s)) => CellValue::Text(s.clone()),
        Some(Data::Float(f)) => CellValue::from_number(*f),
        Some(Data::Int(i)) => CellValue::Number(*i as f64),
        Some(Data::Bool(b)) => CellValue::Boolean(*b),
        Some(Data::DateTime(dt)) => CellValue::Text(format!("{}", dt)),
        Some(Data::DateTimeIso(s)) | Some(Data::DurationIso(s)) => CellValue::Text(s.clone()),
    }
}

// ============================================================================
// CSV
// ============================================================================

pub struct CsvRows {
    reader: csv::Reader<Cursor<Vec<u8>>>,
    headers: Vec<String>,
    record: csv::StringRecord,
    failed: bool,
}

impl CsvRows {
    fn open(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(Cursor::new(bytes));
        let headers = normalize_headers(reader.headers()?.iter().map(str::to_string));
        Ok(Self {
            reader,
            headers,
            record: csv::StringRecord::new(),
            failed: false,
        })
    }
}

impl Iterator for CsvRows {
    type Item = Result<RawRow, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {
                    let row: RawRow = self
                        .headers
                        .iter()
                        .enumerate()
                        .map(|(col, header)| {
                            let value = self.record.get(col).map_or(CellValue::Null, parse_csv_field);
                            (header.clone(), value)
                        })
                        .collect();
                    if !row.is_blank() {
                        return Some(Ok(row));
                    }
                }
                Ok(false) => return None,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

fn parse_csv_field(raw: &str) -> CellValue {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NA_MARKERS.contains(&trimmed) {
        return CellValue::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return CellValue::Boolean(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return CellValue::Boolean(false);
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        // wider integers would be rounded as f64, the text keeps them exact
        if int.unsigned_abs() > MAX_EXACT_INT as u64 {
            return CellValue::Text(trimmed.to_string());
        }
        return CellValue::Number(int as f64);
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        return CellValue::from_number(float);
    }
    CellValue::Text(raw.to_string())
}

/// Empty headers become `Unnamed: <col>`, repeats get a `.N` suffix
fn normalize_headers(raw: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw.enumerate()
        .map(|(col, name)| {
            let base = if name.trim().is_empty() {
                format!("Unnamed: {}", col)
            } else {
                name
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let header = if *count == 0 {
                base
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            header
        })
        .collect()
}
