//! The four dashboard tabs.
//!
//! Each view takes only the tables it needs and returns a [`TabView`]; no
//! view depends on another's output.

use crate::chart::{
    AxisRange, ChartDataset, ChartKind, ChartOptions, ChartPoint, ChartSpec,
    PRIMARY_COLOR, SECONDARY_COLOR,
};
use crate::table::TableView;
use kpidash_core::model::columns;
use kpidash_core::series::{
    conversion_percentages, mean_nps, simulated_cash_flow, simulated_nps, MONTHS, QUARTERS,
};
use kpidash_core::{CultureMetric, CxStage, HeaderMetrics, Risk};
use kpidash_core::metrics::{CAPEX, CURRENCY, OPEX};

/// Thickness of each bar in the culture comparison, in category units.
pub const CULTURE_BAR_WIDTH: f64 = 0.4;
/// Label offset from a risk marker, in axis units.
pub const RISK_LABEL_OFFSET: f64 = 0.02;

/// Rollout plan shown under the culture charts. Not derived from data.
pub const ROLLOUT_PLAN_HTML: &str = r"<p><strong>Plan 90/180/365</strong></p>
<ul>
    <li><strong>90 días:</strong> Diagnóstico cultural digital y talleres de sensibilización.</li>
    <li><strong>180 días:</strong> Embajadores digitales y programas de certificación.</li>
    <li><strong>365 días:</strong> Integrar competencias digitales en evaluaciones de desempeño.</li>
</ul>";

/// One piece of tab content, in display order.
#[derive(Debug, Clone)]
pub enum Block {
    Chart(ChartSpec),
    Caption(String),
    Table(TableView),
    /// Bold paragraph heading.
    Label(String),
    /// Trusted, static HTML.
    StaticHtml(&'static str),
}

/// A tab's title, subheading and content.
#[derive(Debug, Clone)]
pub struct TabView {
    pub title: &'static str,
    pub subheader: &'static str,
    pub blocks: Vec<Block>,
}

impl TabView {
    fn new(title: &'static str, subheader: &'static str) -> Self {
        Self {
            title,
            subheader,
            blocks: Vec::new(),
        }
    }

    fn push(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Charts in this tab, in display order.
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Chart(chart) => Some(chart),
            _ => None,
        })
    }

    /// Tables in this tab, in display order.
    pub fn tables(&self) -> impl Iterator<Item = &TableView> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(table) => Some(table),
            _ => None,
        })
    }
}

fn y_label(text: &str) -> ChartOptions {
    ChartOptions {
        y_axis_label: Some(text.to_string()),
        ..ChartOptions::default()
    }
}

// ===== Valor & ROI =====

/// CAPEX/OPEX comparison and the simulated quarterly cash flow.
#[must_use]
pub fn value_view(header: &HeaderMetrics) -> TabView {
    let split = ChartSpec::new(ChartKind::Bar, "Distribución CAPEX / OPEX")
        .with_labels([CAPEX, OPEX])
        .with_dataset(ChartDataset::values(
            CURRENCY,
            vec![header.capex.unwrap_or(0.0), header.opex.unwrap_or(0.0)],
            PRIMARY_COLOR,
        ))
        .with_options(y_label(CURRENCY));

    let flow = ChartSpec::new(ChartKind::Line, "Flujo de Caja Trimestral y Recuperación")
        .with_labels(QUARTERS)
        .with_dataset(ChartDataset::values(
            "Flujo (simulado)",
            simulated_cash_flow(header.capex, header.opex).to_vec(),
            PRIMARY_COLOR,
        ))
        .with_options(y_label(CURRENCY));

    TabView::new("Valor & ROI", "Distribución CAPEX/OPEX y Flujo Financiero")
        .push(Block::Chart(split))
        .push(Block::Caption(
            "Flujo trimestral estimado (simulado para visualización)".to_string(),
        ))
        .push(Block::Chart(flow))
}

// ===== Customer Experience =====

/// Conversion funnel per stage and the simulated monthly NPS.
#[must_use]
pub fn cx_view(stages: &[CxStage]) -> TabView {
    let funnel = ChartSpec::new(ChartKind::Bar, "Embudo de Conversión por Etapa (CJM)")
        .with_labels(stages.iter().map(|s| s.stage.clone()))
        .with_dataset(ChartDataset::values(
            "% Conversión",
            conversion_percentages(stages),
            PRIMARY_COLOR,
        ))
        .with_options(ChartOptions {
            x_tick_rotation: Some(15.0),
            ..y_label("% Conversión")
        });

    let mut view = TabView::new("Customer Experience (CX)", "Embudo (CJM) y KPIs de Experiencia")
        .push(Block::Chart(funnel))
        .push(Block::Caption("Evolución NPS (simulada)".to_string()));

    if let Some(mean) = mean_nps(stages) {
        let trend = ChartSpec::new(ChartKind::Line, "NPS Mensual")
            .with_labels(MONTHS)
            .with_dataset(ChartDataset::values(
                "NPS (simulado)",
                simulated_nps(mean).to_vec(),
                PRIMARY_COLOR,
            ))
            .with_options(y_label("NPS"));
        view = view.push(Block::Chart(trend));
    }

    view
}

// ===== Cultura & Liderazgo =====

/// Culture targets table, Actual-vs-Meta bars and the rollout plan.
#[must_use]
pub fn culture_view(metrics: &[CultureMetric]) -> TabView {
    let table = TableView::new([columns::INDICATOR, columns::CURRENT, columns::TARGET]).with_rows(
        metrics.iter().map(|m| {
            vec![
                m.indicator.clone(),
                m.current.to_string(),
                m.target.to_string(),
            ]
        }),
    );

    // Two bars of CULTURE_BAR_WIDTH per indicator, centred at -0.2 and +0.2.
    let chart = ChartSpec::new(ChartKind::Bar, "Actual vs Meta (Cultura Digital)")
        .with_labels(metrics.iter().map(|m| m.indicator.clone()))
        .with_options(ChartOptions {
            x_axis_label: Some("Porcentaje / Puntuación".to_string()),
            show_legend: true,
            horizontal: true,
            bar_width: Some(CULTURE_BAR_WIDTH),
            ..ChartOptions::default()
        })
        .with_dataset(ChartDataset::values(
            columns::CURRENT,
            metrics.iter().map(|m| m.current).collect(),
            PRIMARY_COLOR,
        ))
        .with_dataset(ChartDataset::values(
            columns::TARGET,
            metrics.iter().map(|m| m.target).collect(),
            SECONDARY_COLOR,
        ));

    TabView::new("Cultura & Liderazgo", "Cultura y Adopción Digital")
        .push(Block::Table(table))
        .push(Block::Chart(chart))
        .push(Block::StaticHtml(ROLLOUT_PLAN_HTML))
}

// ===== Riesgo & Ética =====

/// Scatter points for risks whose probability and impact both map.
///
/// Risks with an unmapped level are left out of the map.
#[must_use]
pub fn risk_points(risks: &[Risk]) -> Vec<ChartPoint> {
    risks
        .iter()
        .filter_map(|risk| {
            let (probability, impact) = risk.position()?;
            Some(ChartPoint {
                x: f64::from(probability),
                y: f64::from(impact),
                label: Some(risk.name.clone()),
            })
        })
        .collect()
}

/// Probability/impact map and the mitigation table.
#[must_use]
pub fn risk_view(risks: &[Risk]) -> TabView {
    let grid = AxisRange {
        min: 0.5,
        max: 3.5,
        step: 1.0,
    };
    let map = ChartSpec::new(ChartKind::Scatter, "Mapa de Riesgos (Probabilidad vs Impacto)")
        .with_dataset(ChartDataset {
            label: "Riesgos".to_string(),
            points: risk_points(risks),
            background_color: Some(PRIMARY_COLOR.to_string()),
            ..ChartDataset::default()
        })
        .with_options(ChartOptions {
            x_axis_label: Some(columns::PROBABILITY.to_string()),
            y_axis_label: Some(columns::IMPACT.to_string()),
            x_range: Some(grid),
            y_range: Some(grid),
            label_offset: Some((RISK_LABEL_OFFSET, RISK_LABEL_OFFSET)),
            ..ChartOptions::default()
        });

    let table = TableView::new([columns::RISK, columns::LEVEL, columns::MITIGATION]).with_rows(
        risks
            .iter()
            .map(|r| vec![r.name.clone(), r.level.clone(), r.mitigation.clone()]),
    );

    TabView::new("Riesgo & Ética", "Heatmap de Riesgos y Mitigación")
        .push(Block::Chart(map))
        .push(Block::Label("Controles y Mitigación".to_string()))
        .push(Block::Table(table))
}
