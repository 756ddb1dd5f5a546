use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use std::collections::HashMap;

/// A sheet representing a 2D grid of cells (row-major storage)
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    data: Vec<Vec<CellValue>>,
    header_row: Option<usize>,
    origin_row: usize,
    column_names: Option<Vec<String>>,
    column_index: Option<HashMap<String, usize>>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            data: Vec::new(),
            header_row: None,
            origin_row: 0,
            column_names: None,
            column_index: None,
        }
    }

    /// Create a sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let mut sheet = Self::new();
        sheet.data = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        sheet
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Worksheet row (0-based) that row 0 of this sheet was read from
    #[must_use]
    pub fn origin_row(&self) -> usize {
        self.origin_row
    }

    /// Record where row 0 sits in the source worksheet
    pub fn set_origin_row(&mut self, row: usize) {
        self.origin_row = row;
    }

    /// Get the number of rows (header included)
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns (width of the widest row)
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the sheet is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // ===== Cell Access =====

    /// Get a cell value by row and column index (0-based)
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.data
            .get(row)
            .and_then(|r| r.get(col))
            .ok_or(SheetError::IndexOutOfBounds {
                row,
                col,
                rows: self.row_count(),
                cols: self.col_count(),
            })
    }

    /// Get a cell value by row index and column name
    pub fn get_by_name(&self, row: usize, col_name: &str) -> Result<&CellValue> {
        let col = self.column_position(col_name)?;
        self.get(row, col)
    }

    /// Get an entire row by index (0-based)
    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.data.get(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.row_count(),
        })
    }

    // ===== Named Access =====

    /// Use the specified row as column headers
    ///
    /// Header cells are trimmed. Blank header cells do not name a column, and
    /// a repeated name refers to its first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `SheetError::RowIndexOutOfBounds` if the row does not exist.
    pub fn name_columns_by_row(&mut self, row_index: usize) -> Result<()> {
        let header_row = self.row(row_index)?;
        let names: Vec<String> = header_row.iter().map(|c| c.as_str().trim().to_string()).collect();

        let mut index_map = HashMap::new();
        for (i, name) in names.iter().enumerate() {
            if !name.is_empty() {
                index_map.entry(name.clone()).or_insert(i);
            }
        }

        self.header_row = Some(row_index);
        self.column_names = Some(names);
        self.column_index = Some(index_map);
        Ok(())
    }

    /// Get column names (if set)
    #[must_use]
    pub fn column_names(&self) -> Option<&Vec<String>> {
        self.column_names.as_ref()
    }

    /// Get the column index by name
    pub fn column_position(&self, name: &str) -> Result<usize> {
        self.column_index
            .as_ref()
            .ok_or_else(|| {
                SheetError::ColumnsNotNamed("Call name_columns_by_row() first".to_string())
            })?
            .get(name)
            .copied()
            .ok_or_else(|| SheetError::ColumnNotFound {
                name: name.to_string(),
            })
    }

    /// Iterate over the rows below the header, paired with their sheet row index
    ///
    /// Without named columns every row is yielded.
    pub fn body_rows(&self) -> impl Iterator<Item = (usize, &Vec<CellValue>)> {
        let skip = self.header_row.map_or(0, |h| h + 1);
        self.data.iter().enumerate().skip(skip)
    }

    /// Get rows iterator
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.data.iter()
    }

    /// Get internal data reference
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.data
    }

    /// Get mutable internal data reference
    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.data
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_columns() {
        let mut sheet = Sheet::from_data(vec![
            vec!["Indicador", "Valor", "Unidad"],
            vec!["CAPEX", "5200000", "RD$"],
        ]);
        sheet.name_columns_by_row(0).unwrap();

        assert_eq!(sheet.column_position("Valor").unwrap(), 1);
        assert_eq!(
            sheet.get_by_name(1, "Unidad").unwrap(),
            &CellValue::String("RD$".to_string())
        );
        assert!(matches!(
            sheet.column_position("Meta"),
            Err(SheetError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_header_cells_trimmed() {
        let mut sheet = Sheet::from_data(vec![vec![" Riesgo ", ""], vec!["Fuga datos", ""]]);
        sheet.name_columns_by_row(0).unwrap();
        assert_eq!(sheet.column_position("Riesgo").unwrap(), 0);
        assert!(sheet.column_position("").is_err());
    }

    #[test]
    fn test_duplicate_header_keeps_first() {
        let mut sheet = Sheet::from_data(vec![vec!["Etapa", "NPS", "NPS"], vec!["Compra", "75", "x"]]);
        sheet.name_columns_by_row(0).unwrap();
        assert_eq!(sheet.column_position("NPS").unwrap(), 1);
        assert_eq!(sheet.get_by_name(1, "NPS").unwrap().as_float(), Some(75.0));
    }

    #[test]
    fn test_body_rows_skip_header() {
        let mut sheet = Sheet::from_data(vec![vec!["Etapa"], vec!["Compra"], vec!["Servicio"]]);
        assert_eq!(sheet.body_rows().count(), 3);

        sheet.name_columns_by_row(0).unwrap();
        let indices: Vec<usize> = sheet.body_rows().map(|(i, _)| i).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_unnamed_lookup_fails() {
        let sheet = Sheet::from_data(vec![vec![1, 2]]);
        assert!(matches!(
            sheet.column_position("A"),
            Err(SheetError::ColumnsNotNamed(_))
        ));
    }
}
