//! Sheet/Book module for kpidash
//!
//! Provides a small tabular model used to ingest dashboard workbooks: cells,
//! sheets with named columns, and books of named sheets, with `.xlsx` import
//! (calamine) and export (rust_xlsxwriter).
//!
//! # Examples
//!
//! ## Named column access
//!
//! ```
//! use kpidash_sheet::Sheet;
//!
//! let mut sheet = Sheet::from_data(vec![
//!     vec!["Indicador", "Valor"],
//!     vec!["CAPEX", "5200000"],
//! ]);
//!
//! sheet.name_columns_by_row(0).unwrap();
//! let value = sheet.get_by_name(1, "Valor").unwrap();
//! assert_eq!(value.as_float(), Some(5_200_000.0));
//! ```
//!
//! ## Working with books
//!
//! ```
//! use kpidash_sheet::{Book, Sheet};
//!
//! let mut book = Book::new();
//! book.add_sheet("CX_KPI", Sheet::new()).unwrap();
//! book.add_sheet("Riesgos", Sheet::new()).unwrap();
//!
//! assert_eq!(book.sheet_count(), 2);
//! ```
//!
//! ## Loading an uploaded workbook
//!
//! ```no_run
//! use kpidash_sheet::{Book, XlsxReadOptions};
//!
//! let bytes = std::fs::read("dashboard.xlsx").unwrap();
//! let book = Book::from_xlsx_bytes(&bytes, XlsxReadOptions::default().with_headers(true)).unwrap();
//! ```

mod book;
mod cell;
mod error;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
/// Re-export XLSX read options.
pub use xlsx::XlsxReadOptions;
