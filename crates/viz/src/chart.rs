//! Chart specifications rendered client-side by Chart.js.

use serde::Serialize;
use serde_json::{json, Value};

/// Default series colours (matplotlib's first two).
pub const PRIMARY_COLOR: &str = "#1f77b4";
pub const SECONDARY_COLOR: &str = "#ff7f0e";

/// Chart specification for rendering.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub chart_type: ChartKind,
    pub title: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

/// Chart type for visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Scatter,
}

/// Chart data.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<ChartDataset>,
}

/// A dataset in a chart.
#[derive(Debug, Clone, Default)]
pub struct ChartDataset {
    pub label: String,
    /// Values for category charts (bar, line).
    pub data: Vec<f64>,
    /// Positioned points for scatter charts.
    pub points: Vec<ChartPoint>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
}

/// A scatter point with an optional text label.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
}

/// A numeric axis range with a tick step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// Chart rendering options.
#[derive(Debug, Clone, Default)]
pub struct ChartOptions {
    pub x_axis_label: Option<String>,
    pub y_axis_label: Option<String>,
    pub show_legend: bool,
    pub horizontal: bool,
    /// Thickness of each bar in category units (1.0 = full category).
    ///
    /// Bars of one category sit side by side, centred on the category.
    pub bar_width: Option<f64>,
    pub x_tick_rotation: Option<f64>,
    pub x_range: Option<AxisRange>,
    pub y_range: Option<AxisRange>,
    /// Offset, in axis units, between a point and its label.
    pub label_offset: Option<(f64, f64)>,
}

impl ChartDataset {
    /// A category series with a fill colour.
    #[must_use]
    pub fn values(label: impl Into<String>, data: Vec<f64>, color: &str) -> Self {
        Self {
            label: label.into(),
            data,
            background_color: Some(color.to_string()),
            border_color: Some(color.to_string()),
            ..Self::default()
        }
    }
}

impl ChartSpec {
    /// Create a new chart specification.
    #[must_use]
    pub fn new(chart_type: ChartKind, title: impl Into<String>) -> Self {
        Self {
            chart_type,
            title: title.into(),
            data: ChartData::default(),
            options: ChartOptions::default(),
        }
    }

    #[must_use]
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.data.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_dataset(mut self, dataset: ChartDataset) -> Self {
        self.data.datasets.push(dataset);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the Chart.js configuration object for this chart.
    #[must_use]
    pub fn to_chartjs(&self) -> Value {
        let datasets: Vec<Value> = self
            .data
            .datasets
            .iter()
            .map(|ds| self.dataset_config(ds))
            .collect();

        let mut x_scale = axis_config(self.options.x_axis_label.as_deref(), self.options.x_range);
        let y_scale = axis_config(self.options.y_axis_label.as_deref(), self.options.y_range);
        if let Some(rotation) = self.options.x_tick_rotation {
            x_scale["ticks"]["minRotation"] = json!(rotation);
            x_scale["ticks"]["maxRotation"] = json!(rotation);
        }

        let mut options = json!({
            "responsive": true,
            "plugins": {
                "title": { "display": true, "text": self.title },
                "legend": { "display": self.options.show_legend },
            },
            "scales": { "x": x_scale, "y": y_scale },
        });
        if self.options.horizontal {
            options["indexAxis"] = json!("y");
        }
        if let Some((dx, dy)) = self.options.label_offset {
            options["plugins"]["pointLabels"] = json!({ "dx": dx, "dy": dy });
        }

        let mut config = json!({
            "type": self.chart_type,
            "data": { "datasets": datasets },
            "options": options,
        });
        if self.chart_type != ChartKind::Scatter {
            config["data"]["labels"] = json!(self.data.labels);
        }
        config
    }

    fn dataset_config(&self, ds: &ChartDataset) -> Value {
        let mut value = match self.chart_type {
            ChartKind::Scatter => json!({
                "label": ds.label,
                "data": ds.points.iter().map(|p| json!({ "x": p.x, "y": p.y })).collect::<Vec<_>>(),
                "pointLabels": ds.points.iter().map(|p| p.label.clone().unwrap_or_default()).collect::<Vec<_>>(),
                "pointRadius": 6,
            }),
            ChartKind::Line => json!({
                "label": ds.label,
                "data": ds.data,
                "fill": false,
                "pointRadius": 4,
                "tension": 0,
            }),
            ChartKind::Bar => json!({ "label": ds.label, "data": ds.data }),
        };

        if let Some(color) = &ds.background_color {
            value["backgroundColor"] = json!(color);
        }
        if let Some(color) = &ds.border_color {
            value["borderColor"] = json!(color);
        }
        if let (ChartKind::Bar, Some(width)) = (self.chart_type, self.options.bar_width) {
            let series = self.data.datasets.len().max(1) as f64;
            value["barPercentage"] = json!(1.0);
            value["categoryPercentage"] = json!((width * series).min(1.0));
        }
        value
    }
}

fn axis_config(label: Option<&str>, range: Option<AxisRange>) -> Value {
    let mut axis = json!({ "ticks": {} });
    if let Some(text) = label {
        axis["title"] = json!({ "display": true, "text": text });
    }
    if let Some(range) = range {
        axis["min"] = json!(range.min);
        axis["max"] = json!(range.max);
        axis["ticks"]["stepSize"] = json!(range.step);
    }
    axis
}
