//! Data provider: builds a [`Dataset`] from sample data or an uploaded workbook.

use crate::error::{DashError, DashResult};
use crate::model::{
    columns, CultureMetric, CxStage, Dataset, FinancialValue, Risk, CULTURE_SHEET, CX_SHEET,
    FINANCIAL_SHEET, REQUIRED_SHEETS, RISK_SHEET,
};
use crate::sample::sample_dataset;
use kpidash_sheet::{Book, CellValue, Sheet, XlsxReadOptions};
use std::path::Path;
use tracing::{debug, info, warn};

/// Where the dashboard data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// Bundled sample values.
    Sample,
    /// Raw `.xlsx` bytes supplied by the user.
    Upload(Vec<u8>),
}

impl DataSource {
    /// Resolve the sample toggle against an optional upload.
    ///
    /// The toggle defaults to on when nothing was uploaded and off otherwise.
    /// An upload is only used when it is present and the toggle is off.
    #[must_use]
    pub fn select(upload: Option<Vec<u8>>, use_sample: Option<bool>) -> Self {
        let use_sample = use_sample.unwrap_or(upload.is_none());
        match upload {
            Some(bytes) if !use_sample => Self::Upload(bytes),
            _ => Self::Sample,
        }
    }

    #[must_use]
    pub fn is_upload(&self) -> bool {
        matches!(self, Self::Upload(_))
    }
}

/// Load the four tables for one render.
///
/// Either all four tables are produced or an error is returned.
pub fn load(source: &DataSource) -> DashResult<Dataset> {
    match source {
        DataSource::Sample => {
            debug!("using sample dataset");
            Ok(sample_dataset())
        }
        DataSource::Upload(bytes) => {
            debug!(bytes = bytes.len(), "parsing uploaded workbook");
            let book = Book::from_xlsx_bytes(bytes, read_options())?;
            dataset_from_book(&book)
        }
    }
}

/// Load the four tables from an `.xlsx` file on disk.
pub fn load_path<P: AsRef<Path>>(path: P) -> DashResult<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DashError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }
    let book = Book::from_xlsx(path, read_options())?;
    dataset_from_book(&book)
}

/// Only the required sheets are read; anything else in the workbook is ignored.
fn read_options() -> XlsxReadOptions {
    XlsxReadOptions::default()
        .with_headers(true)
        .with_sheets(REQUIRED_SHEETS)
}

/// Extract and validate the four tables from a workbook whose sheets have header rows.
pub fn dataset_from_book(book: &Book) -> DashResult<Dataset> {
    let dataset = Dataset {
        financial: parse_financial(&TableReader::open(book, FINANCIAL_SHEET)?)?,
        culture: parse_culture(&TableReader::open(book, CULTURE_SHEET)?)?,
        cx: parse_cx(&TableReader::open(book, CX_SHEET)?)?,
        risks: parse_risks(&TableReader::open(book, RISK_SHEET)?)?,
    };

    info!(
        financial = dataset.financial.len(),
        culture = dataset.culture.len(),
        cx = dataset.cx.len(),
        risks = dataset.risks.len(),
        "workbook loaded"
    );
    Ok(dataset)
}

/// Column-name access into one required sheet.
struct TableReader<'a> {
    sheet: &'a Sheet,
    name: &'static str,
}

/// A data row with its 1-based worksheet row number, for error messages.
struct Record<'a> {
    row: usize,
    cells: &'a [CellValue],
}

impl<'a> TableReader<'a> {
    fn open(book: &'a Book, name: &'static str) -> DashResult<Self> {
        if !book.has_sheet(name) {
            return Err(DashError::MissingSheet {
                sheet: name.to_string(),
            });
        }
        let sheet = book.get_sheet(name)?;
        Ok(Self { sheet, name })
    }

    /// Resolve required columns to their positions, in the given order.
    fn columns<const N: usize>(&self, names: [&str; N]) -> DashResult<[usize; N]> {
        let mut positions = [0; N];
        for (slot, name) in positions.iter_mut().zip(names) {
            *slot = self
                .sheet
                .column_position(name)
                .map_err(|_| DashError::missing_column(self.name, name))?;
        }
        Ok(positions)
    }

    /// Data rows below the header, skipping rows that are entirely blank.
    fn records(&self) -> impl Iterator<Item = Record<'a>> {
        let origin = self.sheet.origin_row();
        self.sheet
            .body_rows()
            .filter(|(_, cells)| !cells.iter().all(CellValue::is_blank))
            .map(move |(idx, cells)| Record {
                row: origin + idx + 1,
                cells: cells.as_slice(),
            })
    }

    fn cell(record: &Record<'_>, col: usize) -> CellValue {
        record.cells.get(col).cloned().unwrap_or_default()
    }

    fn text(record: &Record<'_>, col: usize) -> String {
        Self::cell(record, col).as_str()
    }

    fn number(&self, record: &Record<'_>, col: usize, column: &str) -> DashResult<f64> {
        let cell = Self::cell(record, col);
        cell.as_float()
            .filter(|v| v.is_finite())
            .ok_or_else(|| DashError::InvalidCell {
                sheet: self.name.to_string(),
                row: record.row,
                column: column.to_string(),
                expected: "a number",
                found: cell.as_str(),
            })
    }
}

fn parse_financial(table: &TableReader<'_>) -> DashResult<Vec<FinancialValue>> {
    let [indicator, value, unit] =
        table.columns([columns::INDICATOR, columns::VALUE, columns::UNIT])?;

    Ok(table
        .records()
        .map(|r| FinancialValue {
            indicator: TableReader::text(&r, indicator),
            value: TableReader::cell(&r, value),
            unit: TableReader::text(&r, unit),
        })
        .collect())
}

fn parse_culture(table: &TableReader<'_>) -> DashResult<Vec<CultureMetric>> {
    let [indicator, current, target, period] = table.columns([
        columns::INDICATOR,
        columns::CURRENT,
        columns::TARGET,
        columns::PERIOD,
    ])?;

    table
        .records()
        .map(|r| {
            Ok(CultureMetric {
                indicator: TableReader::text(&r, indicator),
                current: table.number(&r, current, columns::CURRENT)?,
                target: table.number(&r, target, columns::TARGET)?,
                period: TableReader::text(&r, period),
            })
        })
        .collect()
}

fn parse_cx(table: &TableReader<'_>) -> DashResult<Vec<CxStage>> {
    let [stage, conversion, satisfaction, nps] = table.columns([
        columns::STAGE,
        columns::CONVERSION_RATE,
        columns::SATISFACTION,
        columns::NPS,
    ])?;

    table
        .records()
        .map(|r| {
            Ok(CxStage {
                stage: TableReader::text(&r, stage),
                conversion_rate: table.number(&r, conversion, columns::CONVERSION_RATE)?,
                satisfaction: table.number(&r, satisfaction, columns::SATISFACTION)?,
                nps: table.number(&r, nps, columns::NPS)?,
            })
        })
        .collect()
}

fn parse_risks(table: &TableReader<'_>) -> DashResult<Vec<Risk>> {
    let [name, probability, impact, level, mitigation] = table.columns([
        columns::RISK,
        columns::PROBABILITY,
        columns::IMPACT,
        columns::LEVEL,
        columns::MITIGATION,
    ])?;

    let risks: Vec<Risk> = table
        .records()
        .map(|r| Risk {
            name: TableReader::text(&r, name),
            probability: TableReader::text(&r, probability),
            impact: TableReader::text(&r, impact),
            level: TableReader::text(&r, level),
            mitigation: TableReader::text(&r, mitigation),
        })
        .collect();

    for risk in risks.iter().filter(|r| r.position().is_none()) {
        warn!(
            risk = %risk.name,
            probability = %risk.probability,
            impact = %risk.impact,
            "risk level outside Baja/Media/Alta; it will not appear on the risk map"
        );
    }

    Ok(risks)
}
