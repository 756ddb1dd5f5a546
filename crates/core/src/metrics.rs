//! Indicator lookup and the four header metrics.

use crate::model::FinancialValue;
use kpidash_formatting::NumberFormat;

pub const ROI_TOTAL: &str = "ROI Total";
pub const ROI_ADJUSTED: &str = "ROI Ajustado";
pub const CAPEX: &str = "CAPEX";
pub const OPEX: &str = "OPEX";

/// Currency prefix for monetary figures.
pub const CURRENCY: &str = "RD$";

/// Look up an indicator's numeric value.
///
/// Matches `name` exactly against the `Indicador` column. Returns `None` when
/// no row or more than one row matches, or when the value is not numeric.
#[must_use]
pub fn metric(table: &[FinancialValue], name: &str) -> Option<f64> {
    let mut matches = table.iter().filter(|row| row.indicator == name);
    let row = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    row.value.as_float().filter(|v| v.is_finite())
}

/// A labelled figure in the dashboard header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
}

/// The header figures, each possibly absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HeaderMetrics {
    pub roi_total: Option<f64>,
    pub roi_adjusted: Option<f64>,
    pub capex: Option<f64>,
    pub opex: Option<f64>,
}

impl HeaderMetrics {
    #[must_use]
    pub fn from_financial(table: &[FinancialValue]) -> Self {
        Self {
            roi_total: metric(table, ROI_TOTAL),
            roi_adjusted: metric(table, ROI_ADJUSTED),
            capex: metric(table, CAPEX),
            opex: metric(table, OPEX),
        }
    }

    /// `145%`
    #[must_use]
    pub fn roi_total_display(&self) -> String {
        NumberFormat::fixed(0).format_or_placeholder("", self.roi_total, "%")
    }

    /// `4.5x`
    #[must_use]
    pub fn roi_adjusted_display(&self) -> String {
        NumberFormat::fixed(1).format_or_placeholder("", self.roi_adjusted, "x")
    }

    /// `RD$5,200,000`
    #[must_use]
    pub fn capex_display(&self) -> String {
        NumberFormat::grouped(0).format_or_placeholder(CURRENCY, self.capex, "")
    }

    #[must_use]
    pub fn opex_display(&self) -> String {
        NumberFormat::grouped(0).format_or_placeholder(CURRENCY, self.opex, "")
    }

    /// The four header cards in display order.
    #[must_use]
    pub fn cards(&self) -> [MetricCard; 4] {
        [
            MetricCard {
                label: ROI_TOTAL,
                value: self.roi_total_display(),
            },
            MetricCard {
                label: ROI_ADJUSTED,
                value: self.roi_adjusted_display(),
            },
            MetricCard {
                label: CAPEX,
                value: self.capex_display(),
            },
            MetricCard {
                label: OPEX,
                value: self.opex_display(),
            },
        ]
    }
}
