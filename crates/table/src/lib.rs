//! Table ingestion for the deck generator.
//!
//! Reads CSV files whose encoding is not known up front, or the first
//! worksheet of an Excel or OpenDocument workbook, and resolves the
//! `title`, `content` and `image` columns regardless of case or padding.

pub mod decode;
pub mod reader;

pub use decode::{decode_text, TextEncoding};
pub use reader::{read_workbook, ColumnMap, Table, TableReader};
