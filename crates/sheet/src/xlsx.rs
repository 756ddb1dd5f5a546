use crate::book::Book;
use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

/// Options for reading Excel files
#[derive(Debug, Clone, Default)]
pub struct XlsxReadOptions {
    /// Whether the first row contains headers
    pub has_headers: bool,
    /// Sheets to read; every sheet when `None`
    pub sheets: Option<Vec<String>>,
}

impl XlsxReadOptions {
    /// Set whether the first row contains headers
    #[must_use]
    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    /// Read only the named sheets. Names absent from the workbook are skipped.
    #[must_use]
    pub fn with_sheets<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sheets = Some(names.into_iter().map(Into::into).collect());
        self
    }

    fn wants(&self, sheet_name: &str) -> bool {
        self.sheets
            .as_ref()
            .map_or(true, |names| names.iter().any(|n| n == sheet_name))
    }
}

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel serial date (days since 1899-12-30)
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// Read the selected worksheets of an opened workbook into a `Book`
fn read_workbook<RS: Read + Seek>(
    mut workbook: Xlsx<RS>,
    book_name: &str,
    options: &XlsxReadOptions,
) -> Result<Book> {
    let sheet_names: Vec<String> = workbook
        .sheet_names()
        .iter()
        .filter(|name| options.wants(name))
        .map(|s| s.to_string())
        .collect();
    let mut book = Book::with_name(book_name);

    for sheet_name in sheet_names {
        let range = workbook.worksheet_range(&sheet_name)?;

        let data: Vec<Vec<CellValue>> = range
            .rows()
            .map(|row| row.iter().map(data_to_cell_value).collect())
            .collect();

        // The range starts at the first non-empty cell.
        let origin_row = range.start().map_or(0, |(row, _)| row as usize);
        debug!(sheet = %sheet_name, rows = data.len(), origin_row, "read worksheet");

        let mut sheet = Sheet::with_name(&sheet_name);
        *sheet.data_mut() = data;
        sheet.set_origin_row(origin_row);

        if options.has_headers && sheet.row_count() > 0 {
            sheet.name_columns_by_row(0)?;
        }

        book.add_sheet(&sheet_name, sheet)?;
    }

    Ok(book)
}

/// Write a sheet's cells into a worksheet
fn write_to_worksheet(sheet: &Sheet, worksheet: &mut Worksheet) -> Result<()> {
    for (row_idx, row) in sheet.data().iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let row_num = u32::try_from(row_idx)
                .map_err(|_| SheetError::Workbook("Row index overflow".to_string()))?;
            let col_num = u16::try_from(col_idx)
                .map_err(|_| SheetError::Workbook("Column index overflow".to_string()))?;

            match cell {
                CellValue::Null => {}
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_num, col_num, *b)?;
                }
                CellValue::Int(i) => {
                    // Excel stores all numbers as f64
                    worksheet.write_number(row_num, col_num, *i as f64)?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(row_num, col_num, *f)?;
                }
                CellValue::String(s) => {
                    worksheet.write_string(row_num, col_num, s)?;
                }
            }
        }
    }

    Ok(())
}

impl Book {
    /// Load a book from an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read.
    pub fn from_xlsx<P: AsRef<Path>>(path: P, options: XlsxReadOptions) -> Result<Self> {
        let workbook: Xlsx<BufReader<File>> = open_workbook(path.as_ref())?;
        let name = path
            .as_ref()
            .file_stem()
            .map_or_else(|| "Book1".to_string(), |s| s.to_string_lossy().into_owned());
        read_workbook(workbook, &name, &options)
    }

    /// Load a book from in-memory `.xlsx` bytes (e.g. an HTTP upload)
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a readable xlsx workbook.
    pub fn from_xlsx_bytes(bytes: &[u8], options: XlsxReadOptions) -> Result<Self> {
        let workbook: Xlsx<Cursor<&[u8]>> = Xlsx::new(Cursor::new(bytes))?;
        read_workbook(workbook, "Upload", &options)
    }

    /// Save the book to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = self.to_workbook()?;
        workbook.save(path.as_ref())?;
        Ok(())
    }

    /// Serialize the book to `.xlsx` bytes
    ///
    /// # Errors
    ///
    /// Returns error if the workbook cannot be assembled.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = self.to_workbook()?;
        Ok(workbook.save_to_buffer()?)
    }

    fn to_workbook(&self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        for (name, sheet) in self.sheets() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(name)?;
            write_to_worksheet(sheet, worksheet)?;
        }
        Ok(workbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_book() -> Book {
        let mut book = Book::new();
        book.add_sheet(
            "CX_KPI",
            Sheet::from_data(vec![
                vec![CellValue::from("Etapa"), CellValue::from("Conversion Rate")],
                vec![CellValue::from("Compra"), CellValue::Float(0.65)],
            ]),
        )
        .unwrap();
        book
    }

    #[test]
    fn test_xlsx_write_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kpi.xlsx");

        sample_book().save_as_xlsx(&path).unwrap();
        let loaded = Book::from_xlsx(&path, XlsxReadOptions::default().with_headers(true)).unwrap();

        assert_eq!(loaded.name(), "kpi");
        let sheet = loaded.get_sheet("CX_KPI").unwrap();
        assert_eq!(sheet.row_count(), 2);
        assert_eq!(sheet.get_by_name(1, "Conversion Rate").unwrap().as_float(), Some(0.65));
    }

    #[test]
    fn test_xlsx_bytes_round_trip() {
        let bytes = sample_book().to_xlsx_bytes().unwrap();
        let loaded = Book::from_xlsx_bytes(&bytes, XlsxReadOptions::default()).unwrap();

        assert_eq!(loaded.sheet_names(), vec!["CX_KPI"]);
        let sheet = loaded.get_sheet("CX_KPI").unwrap();
        assert_eq!(sheet.get(1, 0).unwrap(), &CellValue::String("Compra".to_string()));
    }

    #[test]
    fn test_xlsx_selected_sheets_only() {
        let mut book = sample_book();
        book.add_sheet("Notas", Sheet::from_data(vec![vec!["Nota", "Nota"]]))
            .unwrap();
        let bytes = book.to_xlsx_bytes().unwrap();

        let options = XlsxReadOptions::default()
            .with_headers(true)
            .with_sheets(["CX_KPI", "Riesgos"]);
        let loaded = Book::from_xlsx_bytes(&bytes, options).unwrap();

        assert_eq!(loaded.sheet_names(), vec!["CX_KPI"]);
    }

    #[test]
    fn test_xlsx_leading_blank_rows() {
        let mut book = Book::new();
        book.add_sheet(
            "CX_KPI",
            Sheet::from_data(vec![
                vec![CellValue::Null],
                vec![CellValue::Null],
                vec![CellValue::from("Etapa")],
                vec![CellValue::from("Compra")],
            ]),
        )
        .unwrap();
        let bytes = book.to_xlsx_bytes().unwrap();

        let loaded = Book::from_xlsx_bytes(&bytes, XlsxReadOptions::default().with_headers(true)).unwrap();
        let sheet = loaded.get_sheet("CX_KPI").unwrap();

        assert_eq!(sheet.origin_row(), 2);
        assert_eq!(sheet.get_by_name(1, "Etapa").unwrap().as_str(), "Compra");
    }

    #[test]
    fn test_xlsx_bytes_garbage() {
        let result = Book::from_xlsx_bytes(b"not a workbook", XlsxReadOptions::default());
        assert!(matches!(result, Err(SheetError::Workbook(_))));
    }
}
