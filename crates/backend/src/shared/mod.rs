pub mod config;
pub mod data;
pub mod format;
pub mod json_safe;
pub mod spreadsheet;
