pub mod cell;
pub mod reader;
pub mod writer;

pub use cell::{CellValue, RawRow};
pub use reader::{decode, DecodeError, RowStream, SpreadsheetFormat};
pub use writer::write_table;
