//! Table readers for CSV files and spreadsheet workbooks.

use calamine::{open_workbook_auto, Reader};
use deck_core::{Error, Result, Row};
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

use crate::decode::decode_text;

/// Column indices of the slide fields, if present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub title: Option<usize>,
    pub content: Option<usize>,
    pub image: Option<usize>,
}

impl ColumnMap {
    /// Resolve slide columns from raw header names. The first matching
    /// header wins.
    pub fn resolve(headers: &[String]) -> Self {
        let mut map = Self::default();
        for (idx, header) in headers.iter().enumerate() {
            let slot = match normalize_header(header).as_str() {
                "title" => &mut map.title,
                "content" => &mut map.content,
                "image" => &mut map.image,
                _ => continue,
            };
            slot.get_or_insert(idx);
        }
        map
    }
}

/// A parsed table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Header names, trimmed.
    pub headers: Vec<String>,

    /// Data records, each padded or cut to the header count.
    pub records: Vec<Vec<String>>,

    pub columns: ColumnMap,
}

impl Table {
    /// Build a table from trimmed headers and raw records, padding or cutting
    /// each record to the header count.
    pub fn from_parts(headers: Vec<String>, mut records: Vec<Vec<String>>) -> Self {
        for record in &mut records {
            record.resize(headers.len(), String::new());
        }

        let columns = ColumnMap::resolve(&headers);
        log::debug!(
            "Read {} records, {} columns, slide columns {:?}",
            records.len(),
            headers.len(),
            columns
        );

        Self {
            headers,
            records,
            columns,
        }
    }

    /// Whether the table has both a title and a content column.
    pub fn has_slide_columns(&self) -> bool {
        self.columns.title.is_some() && self.columns.content.is_some()
    }

    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// The first `n` records.
    pub fn preview(&self, n: usize) -> &[Vec<String>] {
        &self.records[..n.min(self.records.len())]
    }

    /// Records as slide rows. Missing columns and empty cells are `None`.
    pub fn rows(&self) -> Vec<Row> {
        self.records
            .iter()
            .map(|record| Row {
                title: cell(record, self.columns.title),
                content: cell(record, self.columns.content),
                image: cell(record, self.columns.image),
            })
            .collect()
    }
}

/// Reader for CSV tables and spreadsheet workbooks.
#[derive(Debug, Clone)]
pub struct TableReader {
    delimiter: u8,
}

impl Default for TableReader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl TableReader {
    /// Create a comma-separated reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read a table from a `.csv` file or the first worksheet of a
    /// spreadsheet workbook, chosen by extension.
    pub fn read_path(&self, path: &Path) -> Result<Table> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => {
                let bytes = std::fs::read(path)?;
                self.read_bytes(&bytes)
            }
            Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext) => read_workbook(path),
            _ => Err(Error::UnsupportedFormat(format!(
                "{} is not a CSV or spreadsheet file",
                path.display()
            ))),
        }
    }

    /// Read a table from raw CSV bytes in any supported encoding.
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let (text, encoding) = decode_text(bytes);
        log::debug!("Decoded table as {:?}", encoding);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| Error::CsvError(format!("Failed to read header row: {}", e)))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let mut records: Vec<Vec<String>> = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record =
                result.map_err(|e| Error::CsvError(format!("Record {}: {}", idx + 1, e)))?;
            records.push(record.iter().map(str::to_string).collect());
        }

        Ok(Table::from_parts(headers, records))
    }
}

/// Workbook extensions read through the spreadsheet backend.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read the first worksheet of a workbook. Its first row holds the headers.
pub fn read_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| Error::SpreadsheetError(format!("{}: {}", path.display(), e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::SpreadsheetError(format!("{} has no worksheets", path.display())))?
        .map_err(|e| Error::SpreadsheetError(format!("{}: {}", path.display(), e)))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<String>>());

    let headers = rows
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    Ok(Table::from_parts(headers, rows.collect()))
}

/// Compatibility-normalize, trim and lowercase a header name.
fn normalize_header(header: &str) -> String {
    header
        .nfkc()
        .collect::<String>()
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .to_lowercase()
}

fn cell(record: &[String], idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_columns_case_insensitive() {
        let table = TableReader::new()
            .read_bytes(b" Title ,CONTENT,Image\nIntro,Hello,pic.png\n")
            .unwrap();
        assert!(table.has_slide_columns());
        assert_eq!(table.headers, vec!["Title", "CONTENT", "Image"]);
        assert_eq!(
            table.rows(),
            vec![Row::new(Some("Intro"), Some("Hello"), Some("pic.png"))]
        );
    }

    #[test]
    fn test_fullwidth_header_normalized() {
        let headers = vec!["Ｔｉｔｌｅ".to_string(), "content".to_string()];
        let map = ColumnMap::resolve(&headers);
        assert_eq!(map.title, Some(0));
        assert_eq!(map.content, Some(1));
        assert_eq!(map.image, None);
    }

    #[test]
    fn test_missing_image_column() {
        let table = TableReader::new()
            .read_bytes(b"title,content\nA,B\n")
            .unwrap();
        assert_eq!(table.rows()[0].image, None);
    }

    #[test]
    fn test_empty_cells_are_none() {
        let table = TableReader::new()
            .read_bytes(b"title,content,image\n  ,,\n")
            .unwrap();
        assert_eq!(table.rows(), vec![Row::default()]);
    }

    #[test]
    fn test_short_record_padded() {
        let table = TableReader::new()
            .read_bytes(b"title,content,image\nOnly title\n")
            .unwrap();
        assert_eq!(table.records[0].len(), 3);
        assert_eq!(table.rows()[0].title.as_deref(), Some("Only title"));
        assert_eq!(table.rows()[0].content, None);
    }

    #[test]
    fn test_multiline_quoted_content() {
        let table = TableReader::new()
            .read_bytes(b"title,content\nT,\"Point A\n- sub\"\n")
            .unwrap();
        assert_eq!(table.rows()[0].content.as_deref(), Some("Point A\n- sub"));
    }

    #[test]
    fn test_generic_table() {
        let table = TableReader::new()
            .read_bytes(b"name,qty\napple,3\npear,5\n")
            .unwrap();
        assert!(!table.has_slide_columns());
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.preview(1), &[vec!["apple".to_string(), "3".to_string()]]);
        assert_eq!(table.preview(10).len(), 2);
    }

    #[test]
    fn test_windows_1252_file() {
        let table = TableReader::new()
            .read_bytes(b"title,content\nCaf\xe9,ok\n")
            .unwrap();
        assert_eq!(table.rows()[0].title.as_deref(), Some("Café"));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let table = TableReader::new()
            .with_delimiter(b';')
            .read_bytes(b"title;content\nA;B\n")
            .unwrap();
        assert_eq!(table.rows()[0].content.as_deref(), Some("B"));
    }

    #[test]
    fn test_read_path() {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        file.write_all(b"Title,Content\nFrom disk,Body\n").unwrap();
        let table = TableReader::new().read_path(file.path()).unwrap();
        assert_eq!(table.rows()[0].title.as_deref(), Some("From disk"));
    }

    #[test]
    fn test_rejects_other_extensions() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = TableReader::new().read_path(file.path()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

    const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

    const WORKBOOK: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Slides" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

    const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

    /// Write a single-sheet workbook with inline string cells.
    fn write_xlsx(path: &Path, rows: &[&[&str]]) {
        let mut sheet_data = String::new();
        for (r, row) in rows.iter().enumerate() {
            sheet_data.push_str(&format!(r#"<row r="{}">"#, r + 1));
            for (c, value) in row.iter().enumerate() {
                let column = char::from(b'A' + c as u8);
                sheet_data.push_str(&format!(
                    r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                    column,
                    r + 1,
                    value
                ));
            }
            sheet_data.push_str("</row>");
        }
        let sheet = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
            sheet_data
        );

        let file = std::fs::File::create(path).unwrap();
        let mut archive = zip::ZipWriter::new(file);
        let options = zip::write::FileOptions::default();
        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", ROOT_RELS.to_string()),
            ("xl/workbook.xml", WORKBOOK.to_string()),
            ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.to_string()),
            ("xl/worksheets/sheet1.xml", sheet),
        ];
        for (name, body) in parts {
            archive.start_file(name, options).unwrap();
            archive.write_all(body.as_bytes()).unwrap();
        }
        archive.finish().unwrap();
    }

    #[test]
    fn test_read_xlsx_slide_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.xlsx");
        write_xlsx(
            &path,
            &[
                &[" TITLE ", "Content", "image"],
                &["From Excel", "Body text", "pic.png"],
                &["Second"],
            ],
        );

        let table = TableReader::new().read_path(&path).unwrap();
        assert!(table.has_slide_columns());
        assert_eq!(table.headers, vec!["TITLE", "Content", "image"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.rows(),
            vec![
                Row::new(Some("From Excel"), Some("Body text"), Some("pic.png")),
                Row::new(Some("Second"), None, None),
            ]
        );
    }

    #[test]
    fn test_read_xlsx_generic_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stock.XLSX");
        write_xlsx(&path, &[&["name", "qty"], &["apple", "3"]]);

        let table = TableReader::new().read_path(&path).unwrap();
        assert!(!table.has_slide_columns());
        assert_eq!(table.preview(10), &[vec!["apple".to_string(), "3".to_string()]]);
    }

    #[test]
    fn test_corrupt_workbook() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();
        let err = TableReader::new().read_path(file.path()).unwrap_err();
        assert!(matches!(err, Error::SpreadsheetError(_)));
    }
}
