//! Result Tables
//!
//! Column derivation, client-side pagination and CSV export for the
//! `table_data` section of a result.

use serde_json::Value;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::result::{value_text, Row};

/// Rows shown per table page
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// File name offered for CSV downloads
pub const CSV_FILENAME: &str = "real_estate_data.csv";

/// Tabular rows with the columns taken from the first record
#[derive(Debug, Clone, PartialEq)]
pub struct TableData {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl TableData {
    /// Build a table from backend rows. Returns `None` when there is nothing to show.
    pub fn from_rows(rows: &[Row]) -> Option<Self> {
        let first = rows.first()?;
        Some(Self {
            columns: first.keys().cloned().collect(),
            rows: rows.to_vec(),
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows visible on the pager's current page
    pub fn page(&self, pager: &Pager) -> &[Row] {
        &self.rows[pager.range()]
    }

    /// Display text of one cell. Absent and null cells are empty.
    pub fn cell(row: &Row, column: &str) -> String {
        row.get(column).map(value_text).unwrap_or_default()
    }

    /// Export every row, regardless of the current page.
    ///
    /// The header is the column list. String cells containing a comma are
    /// wrapped in double quotes; embedded quotes and newlines are written
    /// as-is.
    pub fn to_csv(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.columns.join(","));

        for row in &self.rows {
            let fields: Vec<String> = self
                .columns
                .iter()
                .map(|column| csv_field(row.get(column)))
                .collect();
            lines.push(fields.join(","));
        }

        lines.join("\n")
    }

    /// Write the CSV export to a file
    pub fn write_csv(&self, path: &Path) -> Result<(), ExportError> {
        std::fs::write(path, self.to_csv()).map_err(|error| ExportError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        tracing::info!("Exported {} rows to {:?}", self.rows.len(), path);
        Ok(())
    }
}

fn csv_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) if s.contains(',') => format!("\"{}\"", s),
        Some(other) => value_text(other),
        None => String::new(),
    }
}

/// CSV export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path:?}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
}

/// Pagination cursor over a fixed number of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    total_rows: usize,
    page_size: usize,
    page: usize,
}

impl Pager {
    pub fn new(total_rows: usize, page_size: usize) -> Self {
        Self {
            total_rows,
            page_size: page_size.max(1),
            page: 0,
        }
    }

    /// Same pager positioned at `page`, clamped to the last page
    pub fn with_page(mut self, page: usize) -> Self {
        self.set_page(page);
        self
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_count(&self) -> usize {
        self.total_rows.div_ceil(self.page_size)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.min(self.page_count().saturating_sub(1));
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count()
    }

    pub fn next(&mut self) {
        if self.has_next() {
            self.page += 1;
        }
    }

    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Row indices covered by the current page
    pub fn range(&self) -> Range<usize> {
        let start = (self.page * self.page_size).min(self.total_rows);
        let end = (start + self.page_size).min(self.total_rows);
        start..end
    }

    pub fn label(&self) -> String {
        format!("Page {} of {}", self.page + 1, self.page_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| match v {
                Value::Object(map) => map,
                other => panic!("not an object: {}", other),
            })
            .collect()
    }

    #[test]
    fn test_csv_quotes_comma_fields() {
        let table = TableData::from_rows(&rows(vec![json!({"x": "a,b", "y": 1})])).unwrap();
        assert_eq!(table.to_csv(), "x,y\n\"a,b\",1");
    }

    #[test]
    fn test_float_cells_drop_trailing_zero() {
        let table = TableData::from_rows(&rows(vec![
            json!({"year": 2020, "total_sales": 5000.0, "rate": 12.75, "name": "a,b"}),
        ]))
        .unwrap();

        let row = &table.rows()[0];
        assert_eq!(TableData::cell(row, "total_sales"), "5000");
        assert_eq!(TableData::cell(row, "rate"), "12.75");
        assert_eq!(table.to_csv(), "year,total_sales,rate,name\n2020,5000,12.75,\"a,b\"");
    }

    #[test]
    fn test_csv_exports_every_row() {
        let data: Vec<Value> = (0..12)
            .map(|i| json!({"year": 2000 + i, "area": "Wakad"}))
            .collect();
        let table = TableData::from_rows(&rows(data)).unwrap();

        let csv = table.to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "year,area");
        assert_eq!(lines[12], "2011,Wakad");
    }

    #[test]
    fn test_csv_leaves_quotes_and_nulls_alone() {
        let table = TableData::from_rows(&rows(vec![
            json!({"name": "say \"hi\"", "rate": null, "ok": true}),
            json!({"name": "plain"}),
        ]))
        .unwrap();

        assert_eq!(table.to_csv(), "name,rate,ok\nsay \"hi\",,true\nplain,,");
    }

    #[test]
    fn test_columns_come_from_first_row() {
        let table = TableData::from_rows(&rows(vec![
            json!({"b": 1, "a": 2}),
            json!({"a": 3, "c": 4}),
        ]))
        .unwrap();

        assert_eq!(table.columns(), &["b".to_string(), "a".to_string()]);
        assert_eq!(TableData::cell(&table.rows()[1], "b"), "");
        assert_eq!(TableData::cell(&table.rows()[1], "a"), "3");
    }

    #[test]
    fn test_empty_rows_have_no_table() {
        assert!(TableData::from_rows(&[]).is_none());
    }

    #[test]
    fn test_pagination_of_twelve_rows() {
        let data: Vec<Value> = (0..12).map(|i| json!({"i": i})).collect();
        let table = TableData::from_rows(&rows(data)).unwrap();
        let mut pager = Pager::new(table.len(), 5);

        assert_eq!(pager.page_count(), 3);
        assert_eq!(pager.range(), 0..5);
        assert!(!pager.has_previous());
        assert!(pager.has_next());
        assert_eq!(pager.label(), "Page 1 of 3");

        pager.next();
        pager.next();
        assert_eq!(pager.page(), 2);
        assert_eq!(pager.range(), 10..12);
        assert!(!pager.has_next());
        assert!(pager.has_previous());
        let page = table.page(&pager);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0]["i"], json!(10));
        assert_eq!(page[1]["i"], json!(11));

        pager.next();
        assert_eq!(pager.page(), 2);

        pager.previous();
        pager.previous();
        pager.previous();
        assert_eq!(pager.page(), 0);
    }

    #[test]
    fn test_pager_clamps_page() {
        let pager = Pager::new(7, 5).with_page(9);
        assert_eq!(pager.page(), 1);
        assert_eq!(pager.range(), 5..7);

        let empty = Pager::new(0, 5).with_page(3);
        assert_eq!(empty.page(), 0);
        assert_eq!(empty.range(), 0..0);
        assert!(!empty.has_next());
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CSV_FILENAME);
        let table = TableData::from_rows(&rows(vec![json!({"x": 1})])).unwrap();

        table.write_csv(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\n1");

        let missing = dir.path().join("missing").join("out.csv");
        let err = table.write_csv(&missing).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
