use rust_xlsxwriter::{Workbook, XlsxError};

use super::cell::CellValue;

/// Writes one sheet with a header row and returns the xlsx file bytes
pub fn write_table<R>(sheet_name: &str, headers: &[&str], rows: R) -> Result<Vec<u8>, XlsxError>
where
    R: IntoIterator<Item = Vec<CellValue>>,
{
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (row_idx, cells) in rows.into_iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col, cell) in cells.iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Null => {}
                // xlsx has no representation for inf / NaN
                CellValue::Number(value) if !value.is_finite() => {
                    worksheet.write_string(row, col, cell.to_string())?;
                }
                CellValue::Number(value) => {
                    worksheet.write_number(row, col, *value)?;
                }
                CellValue::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                CellValue::Boolean(flag) => {
                    worksheet.write_boolean(row, col, *flag)?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}
