//! Bundled sample data, shown when no workbook is uploaded.

use crate::model::{CultureMetric, CxStage, Dataset, FinancialValue, Risk};
use kpidash_sheet::CellValue;

/// Build the sample dataset. Deterministic.
#[must_use]
pub fn sample_dataset() -> Dataset {
    Dataset {
        financial: financial(),
        culture: culture(),
        cx: cx(),
        risks: risks(),
    }
}

fn financial() -> Vec<FinancialValue> {
    [
        ("ROI Total", 145.0, "%"),
        ("ROI Ajustado", 4.5, "x"),
        ("CAPEX", 5_200_000.0, "RD$"),
        ("OPEX", 4_800_000.0, "RD$"),
        ("Ahorro proyectado", 3_200_000.0, "RD$/año"),
        ("Payback", 14.0, "meses"),
    ]
    .into_iter()
    .map(|(indicator, value, unit)| FinancialValue {
        indicator: indicator.to_string(),
        value: CellValue::Float(value),
        unit: unit.to_string(),
    })
    .collect()
}

fn culture() -> Vec<CultureMetric> {
    [
        ("eNPS", 45.0, 70.0),
        ("Adopción Digital", 62.0, 90.0),
        ("Proyectos Ágiles", 25.0, 75.0),
    ]
    .into_iter()
    .map(|(indicator, current, target)| CultureMetric {
        indicator: indicator.to_string(),
        current,
        target,
        period: "18 meses".to_string(),
    })
    .collect()
}

fn cx() -> Vec<CxStage> {
    [
        ("Descubrimiento", 0.40, 72.0, 68.0),
        ("Evaluación", 0.55, 75.0, 72.0),
        ("Compra", 0.65, 80.0, 75.0),
        ("Servicio", 0.70, 78.0, 77.0),
        ("Fidelización", 0.75, 82.0, 80.0),
    ]
    .into_iter()
    .map(|(stage, conversion_rate, satisfaction, nps)| CxStage {
        stage: stage.to_string(),
        conversion_rate,
        satisfaction,
        nps,
    })
    .collect()
}

fn risks() -> Vec<Risk> {
    [
        ("Ciberataque", "Alta", "Alta", "Crítico", "Firewalls + MFA"),
        ("Pérdida CRM", "Media", "Alta", "Alto", "Backup diario"),
        ("Fraude interno", "Media", "Media", "Medio", "Auditoría"),
        ("Falla IA", "Media", "Alta", "Alto", "Auditoría ética"),
        ("Fuga datos", "Media", "Alta", "Alto", "Contrato NDA"),
    ]
    .into_iter()
    .map(|(name, probability, impact, level, mitigation)| Risk {
        name: name.to_string(),
        probability: probability.to_string(),
        impact: impact.to_string(),
        level: level.to_string(),
        mitigation: mitigation.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_is_deterministic() {
        assert_eq!(sample_dataset(), sample_dataset());
    }

    #[test]
    fn test_sample_shapes() {
        let data = sample_dataset();
        assert_eq!(data.financial.len(), 6);
        assert_eq!(data.culture.len(), 3);
        assert_eq!(data.cx.len(), 5);
        assert_eq!(data.risks.len(), 5);
        assert_eq!(data.cx[0].stage, "Descubrimiento");
        assert_eq!(data.cx[4].stage, "Fidelización");
    }

    #[test]
    fn test_sample_risks_all_plot() {
        let data = sample_dataset();
        assert!(data.risks.iter().all(|r| r.position().is_some()));
        assert_eq!(data.risks[0].position(), Some((3, 3)));
    }
}
