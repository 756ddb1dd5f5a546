//! Typed records for the four dashboard tables.

use kpidash_sheet::{Book, CellValue, Sheet};

/// Sheet holding the financial value indicators.
pub const FINANCIAL_SHEET: &str = "Valor_Financiero";
/// Sheet holding the digital culture metrics.
pub const CULTURE_SHEET: &str = "Cultura_Digital";
/// Sheet holding the customer-experience funnel.
pub const CX_SHEET: &str = "CX_KPI";
/// Sheet holding the risk register.
pub const RISK_SHEET: &str = "Riesgos";

/// The four sheets an uploaded workbook must contain, in display order.
pub const REQUIRED_SHEETS: [&str; 4] = [FINANCIAL_SHEET, CULTURE_SHEET, CX_SHEET, RISK_SHEET];

/// Column headers, kept literal for compatibility with existing workbooks.
pub mod columns {
    pub const INDICATOR: &str = "Indicador";
    pub const VALUE: &str = "Valor";
    pub const UNIT: &str = "Unidad";
    pub const CURRENT: &str = "Actual";
    pub const TARGET: &str = "Meta";
    pub const PERIOD: &str = "Periodo";
    pub const STAGE: &str = "Etapa";
    pub const CONVERSION_RATE: &str = "Conversion Rate";
    pub const SATISFACTION: &str = "Satisfacción";
    pub const NPS: &str = "NPS";
    pub const RISK: &str = "Riesgo";
    pub const PROBABILITY: &str = "Probabilidad";
    pub const IMPACT: &str = "Impacto";
    pub const LEVEL: &str = "Nivel";
    pub const MITIGATION: &str = "Mitigación";
}

/// A row of `Valor_Financiero`.
///
/// `value` keeps the raw cell; numeric interpretation happens at lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialValue {
    pub indicator: String,
    pub value: CellValue,
    pub unit: String,
}

/// A row of `Cultura_Digital`.
#[derive(Debug, Clone, PartialEq)]
pub struct CultureMetric {
    pub indicator: String,
    pub current: f64,
    pub target: f64,
    pub period: String,
}

/// A row of `CX_KPI`: one stage of the customer journey funnel.
#[derive(Debug, Clone, PartialEq)]
pub struct CxStage {
    pub stage: String,
    /// Fraction in `0..=1`.
    pub conversion_rate: f64,
    /// Score in `0..=100`.
    pub satisfaction: f64,
    pub nps: f64,
}

/// Ordinal rating used for risk probability and impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Parse the workbook label (`Baja`, `Media`, `Alta`). Exact match.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Baja" => Some(Self::Low),
            "Media" => Some(Self::Medium),
            "Alta" => Some(Self::High),
            _ => None,
        }
    }

    /// Position on the 1..=3 plotting axis.
    #[must_use]
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

/// A row of `Riesgos`.
///
/// Probability and impact keep the workbook label; labels outside
/// `Baja`/`Media`/`Alta` have no plot position.
#[derive(Debug, Clone, PartialEq)]
pub struct Risk {
    pub name: String,
    pub probability: String,
    pub impact: String,
    pub level: String,
    pub mitigation: String,
}

impl Risk {
    /// `(probability, impact)` on the 1..=3 grid, if both labels map.
    #[must_use]
    pub fn position(&self) -> Option<(u8, u8)> {
        let probability = RiskLevel::from_label(&self.probability)?;
        let impact = RiskLevel::from_label(&self.impact)?;
        Some((probability.ordinal(), impact.ordinal()))
    }
}

/// The four tables behind one render of the dashboard.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub financial: Vec<FinancialValue>,
    pub culture: Vec<CultureMetric>,
    pub cx: Vec<CxStage>,
    pub risks: Vec<Risk>,
}

impl Dataset {
    /// Lay the dataset out as a four-sheet workbook with header rows.
    ///
    /// The result parses back to an equal dataset.
    #[must_use]
    pub fn to_book(&self) -> Book {
        use columns::*;

        let mut financial = vec![vec![
            CellValue::from(INDICATOR),
            CellValue::from(VALUE),
            CellValue::from(UNIT),
        ]];
        financial.extend(self.financial.iter().map(|row| {
            vec![
                CellValue::from(row.indicator.as_str()),
                row.value.clone(),
                CellValue::from(row.unit.as_str()),
            ]
        }));

        let mut culture = vec![vec![
            CellValue::from(INDICATOR),
            CellValue::from(CURRENT),
            CellValue::from(TARGET),
            CellValue::from(PERIOD),
        ]];
        culture.extend(self.culture.iter().map(|row| {
            vec![
                CellValue::from(row.indicator.as_str()),
                CellValue::Float(row.current),
                CellValue::Float(row.target),
                CellValue::from(row.period.as_str()),
            ]
        }));

        let mut cx = vec![vec![
            CellValue::from(STAGE),
            CellValue::from(CONVERSION_RATE),
            CellValue::from(SATISFACTION),
            CellValue::from(NPS),
        ]];
        cx.extend(self.cx.iter().map(|row| {
            vec![
                CellValue::from(row.stage.as_str()),
                CellValue::Float(row.conversion_rate),
                CellValue::Float(row.satisfaction),
                CellValue::Float(row.nps),
            ]
        }));

        let mut risks = vec![vec![
            CellValue::from(RISK),
            CellValue::from(PROBABILITY),
            CellValue::from(IMPACT),
            CellValue::from(LEVEL),
            CellValue::from(MITIGATION),
        ]];
        risks.extend(self.risks.iter().map(|row| {
            vec![
                CellValue::from(row.name.as_str()),
                CellValue::from(row.probability.as_str()),
                CellValue::from(row.impact.as_str()),
                CellValue::from(row.level.as_str()),
                CellValue::from(row.mitigation.as_str()),
            ]
        }));

        Book::from_sheets(
            "kpidash",
            [
                (FINANCIAL_SHEET, Sheet::from_data(financial)),
                (CULTURE_SHEET, Sheet::from_data(culture)),
                (CX_SHEET, Sheet::from_data(cx)),
                (RISK_SHEET, Sheet::from_data(risks)),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn risk(probability: &str, impact: &str) -> Risk {
        Risk {
            name: "Ciberataque".to_string(),
            probability: probability.to_string(),
            impact: impact.to_string(),
            level: "Crítico".to_string(),
            mitigation: "Firewalls + MFA".to_string(),
        }
    }

    #[test]
    fn test_risk_level_mapping() {
        assert_eq!(RiskLevel::from_label("Alta").map(RiskLevel::ordinal), Some(3));
        assert_eq!(RiskLevel::from_label("Media").map(RiskLevel::ordinal), Some(2));
        assert_eq!(RiskLevel::from_label("Baja").map(RiskLevel::ordinal), Some(1));
        assert_eq!(RiskLevel::from_label("alta"), None);
        assert_eq!(RiskLevel::from_label("High"), None);
    }

    #[test]
    fn test_risk_position() {
        assert_eq!(risk("Alta", "Alta").position(), Some((3, 3)));
        assert_eq!(risk("Media", "Baja").position(), Some((2, 1)));
        assert_eq!(risk("Extrema", "Alta").position(), None);
        assert_eq!(risk("Alta", "").position(), None);
    }

    #[test]
    fn test_to_book_layout() {
        let book = Dataset::default().to_book();
        assert_eq!(book.sheet_names(), REQUIRED_SHEETS.to_vec());

        let cx = book.get_sheet(CX_SHEET).unwrap();
        assert_eq!(cx.row_count(), 1);
        assert_eq!(cx.get(0, 1).unwrap().as_str(), columns::CONVERSION_RATE);
    }
}
