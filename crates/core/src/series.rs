//! Derived and simulated series shown on the dashboard tabs.
//!
//! The cash-flow and NPS trends are illustrative: they are fixed functions of
//! a few inputs, not computed from period data. Pages must label them as
//! simulated.

use crate::model::CxStage;
use kpidash_formatting::round_to;

/// Quarter labels for the cash-flow chart.
pub const QUARTERS: [&str; 6] = ["Q1", "Q2", "Q3", "Q4", "Q5", "Q6"];
/// Month labels for the NPS chart.
pub const MONTHS: [&str; 6] = ["M1", "M2", "M3", "M4", "M5", "M6"];

/// CAPEX assumed by the cash-flow simulation when none is available.
pub const DEFAULT_CAPEX: f64 = 2_000_000.0;
/// OPEX assumed by the cash-flow simulation when none is available.
pub const DEFAULT_OPEX: f64 = 1_500_000.0;

/// Fixed inflows for quarters 3 to 6.
const RECOVERY: [f64; 4] = [500_000.0, 1_200_000.0, 1_800_000.0, 2_200_000.0];

/// Offsets applied to the mean NPS for months 1 to 6.
pub const NPS_OFFSETS: [f64; 6] = [-4.0, -2.0, 0.0, 1.0, 2.0, 3.0];

/// Simulated six-quarter cash flow.
///
/// Q1 is `-(0.4·capex + 0.2·opex)`, Q2 is `-(0.3·capex + 0.2·opex)`, the rest
/// are fixed. A missing or zero CAPEX/OPEX falls back to its default.
#[must_use]
pub fn simulated_cash_flow(capex: Option<f64>, opex: Option<f64>) -> [f64; 6] {
    let capex = capex.filter(|v| *v != 0.0).unwrap_or(DEFAULT_CAPEX);
    let opex = opex.filter(|v| *v != 0.0).unwrap_or(DEFAULT_OPEX);

    [
        -capex * 0.4 - opex * 0.2,
        -capex * 0.3 - opex * 0.2,
        RECOVERY[0],
        RECOVERY[1],
        RECOVERY[2],
        RECOVERY[3],
    ]
}

/// Fraction to percentage, rounded to one decimal (`0.40` → `40.0`).
#[must_use]
pub fn conversion_percentage(rate: f64) -> f64 {
    round_to(rate * 100.0, 1)
}

/// Conversion percentages per stage, in table order.
#[must_use]
pub fn conversion_percentages(stages: &[CxStage]) -> Vec<f64> {
    stages
        .iter()
        .map(|s| conversion_percentage(s.conversion_rate))
        .collect()
}

/// Mean NPS across stages, `None` for an empty table.
#[must_use]
pub fn mean_nps(stages: &[CxStage]) -> Option<f64> {
    if stages.is_empty() {
        return None;
    }
    Some(stages.iter().map(|s| s.nps).sum::<f64>() / stages.len() as f64)
}

/// Simulated six-month NPS trend around `mean`.
#[must_use]
pub fn simulated_nps(mean: f64) -> [f64; 6] {
    NPS_OFFSETS.map(|offset| mean + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::sample_dataset;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_cash_flow_from_sample() {
        let flow = simulated_cash_flow(Some(5_200_000.0), Some(4_800_000.0));
        assert!(approx(flow[0], -3_040_000.0));
        assert!(approx(flow[1], -2_520_000.0));
        assert_eq!(&flow[2..], &[500_000.0, 1_200_000.0, 1_800_000.0, 2_200_000.0]);
    }

    #[test]
    fn test_cash_flow_defaults() {
        let flow = simulated_cash_flow(None, None);
        assert!(approx(flow[0], -1_100_000.0));
        assert!(approx(flow[1], -900_000.0));
        assert_eq!(simulated_cash_flow(Some(0.0), Some(0.0)), flow);
    }

    #[test]
    fn test_cash_flow_deterministic() {
        assert_eq!(
            simulated_cash_flow(Some(1.0), None),
            simulated_cash_flow(Some(1.0), None)
        );
    }

    #[test]
    fn test_conversion_percentage() {
        assert!(approx(conversion_percentage(0.40), 40.0));
        assert!(approx(conversion_percentage(0.55), 55.0));
        assert!(approx(conversion_percentage(0.1234), 12.3));
    }

    #[test]
    fn test_conversion_percentages_keep_order() {
        let data = sample_dataset();
        assert_eq!(
            conversion_percentages(&data.cx),
            vec![40.0, 55.0, 65.0, 70.0, 75.0]
        );
    }

    #[test]
    fn test_nps_trend() {
        let data = sample_dataset();
        let mean = mean_nps(&data.cx).unwrap();
        assert!(approx(mean, 74.4));

        let trend = simulated_nps(mean);
        assert!(approx(trend[0], 70.4));
        assert!(approx(trend[2], 74.4));
        assert!(approx(trend[5], 77.4));
    }

    #[test]
    fn test_nps_empty() {
        assert_eq!(mean_nps(&[]), None);
    }
}
