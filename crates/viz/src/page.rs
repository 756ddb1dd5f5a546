//! The dashboard page: sidebar, header metrics, tabs and captions.

use crate::html::{escape_html, escape_script_json};
use crate::views::{culture_view, cx_view, risk_view, value_view, Block, TabView};
use kpidash_core::{load, DashError, DataSource, Dataset, HeaderMetrics, REQUIRED_SHEETS};
use serde_json::json;
use tracing::{info, warn};

pub const PAGE_TITLE: &str = "Dashboard de Transformación Digital - Reid & Compañía S.A.";
pub const PAGE_CAPTION: &str = "Valor, Experiencia del Cliente, Cultura Digital y Riesgo & Ética";
pub const UPLOAD_SUCCESS: &str = "Excel cargado correctamente.";
pub const UPLOAD_ERROR_PREFIX: &str = "Error leyendo el Excel: ";

/// Where the rendered data came from, shown in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceStatus {
    Sample,
    Uploaded,
    Failed(String),
}

/// Page-level switches.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Show the upload form in the sidebar.
    pub upload_form: bool,
    /// Form target for uploads.
    pub form_action: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            upload_form: true,
            form_action: "/".to_string(),
        }
    }
}

impl PageOptions {
    /// Options for a static file: no upload form.
    #[must_use]
    pub fn offline() -> Self {
        Self {
            upload_form: false,
            ..Self::default()
        }
    }
}

/// Result of rendering from a data source.
#[derive(Debug)]
pub struct Rendered {
    pub html: String,
    /// Set when loading failed; `html` is then the error page.
    pub error: Option<DashError>,
}

impl Rendered {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Build the four tabs for a dataset.
#[must_use]
pub fn build_tabs(data: &Dataset, header: &HeaderMetrics) -> [TabView; 4] {
    [
        value_view(header),
        cx_view(&data.cx),
        culture_view(&data.culture),
        risk_view(&data.risks),
    ]
}

/// Load data from `source` and render the page.
///
/// A load failure renders the error page and nothing else.
#[must_use]
pub fn render_source(source: &DataSource, options: &PageOptions) -> Rendered {
    match load(source) {
        Ok(data) => {
            let status = if source.is_upload() {
                SourceStatus::Uploaded
            } else {
                SourceStatus::Sample
            };
            Rendered {
                html: render_dashboard(&data, &status, options),
                error: None,
            }
        }
        Err(err) => {
            warn!(error = %err, "could not load dashboard data");
            Rendered {
                html: render_error(&err.to_string(), options),
                error: Some(err),
            }
        }
    }
}

/// Render the full dashboard.
#[must_use]
pub fn render_dashboard(data: &Dataset, status: &SourceStatus, options: &PageOptions) -> String {
    let header = HeaderMetrics::from_financial(&data.financial);
    let tabs = build_tabs(data, &header);

    let mut charts = Vec::new();
    let mut tab_buttons = String::new();
    let mut tab_panels = String::new();
    for (idx, tab) in tabs.iter().enumerate() {
        let active = if idx == 0 { " active" } else { "" };
        tab_buttons.push_str(&format!(
            "<button class=\"tab-button{active}\" data-tab=\"tab-{idx}\">{}</button>\n",
            escape_html(tab.title)
        ));
        tab_panels.push_str(&format!(
            "<section class=\"tab-panel{active}\" id=\"tab-{idx}\">\n<h3>{}</h3>\n{}</section>\n",
            escape_html(tab.subheader),
            render_blocks(&tab.blocks, &mut charts),
        ));
    }

    let metrics: String = header
        .cards()
        .iter()
        .map(|card| {
            format!(
                "<div class=\"metric\"><div class=\"metric-label\">{}</div><div class=\"metric-value\">{}</div></div>\n",
                escape_html(card.label),
                escape_html(&card.value)
            )
        })
        .collect();

    info!(charts = charts.len(), tabs = tabs.len(), "rendered dashboard");

    let main = format!(
        r#"<h1>{title}</h1>
<p class="caption">{caption}</p>
<div class="metrics">
{metrics}</div>
<hr>
<nav class="tabs">
{tab_buttons}</nav>
{tab_panels}<hr>
<p class="caption">Carga tu propio Excel con las hojas: {sheets}.</p>"#,
        title = escape_html(PAGE_TITLE),
        caption = escape_html(PAGE_CAPTION),
        sheets = REQUIRED_SHEETS.join(", "),
    );

    let chart_json = escape_script_json(&json!(charts).to_string());
    document(&sidebar(status, options), &main, Some(&chart_json))
}

/// Render the fail-fast error page: sidebar with the message, no content.
#[must_use]
pub fn render_error(message: &str, options: &PageOptions) -> String {
    document(
        &sidebar(&SourceStatus::Failed(message.to_string()), options),
        "",
        None,
    )
}

fn render_blocks(blocks: &[Block], charts: &mut Vec<serde_json::Value>) -> String {
    let mut html = String::new();
    for block in blocks {
        match block {
            Block::Chart(spec) => {
                let id = format!("chart-{}", charts.len());
                html.push_str(&format!(
                    "<div class=\"chart\"><canvas id=\"{id}\"></canvas></div>\n"
                ));
                charts.push(json!({ "id": id, "config": spec.to_chartjs() }));
            }
            Block::Caption(text) => {
                html.push_str(&format!("<p class=\"caption\">{}</p>\n", escape_html(text)));
            }
            Block::Label(text) => {
                html.push_str(&format!("<p><strong>{}</strong></p>\n", escape_html(text)));
            }
            Block::Table(table) => {
                html.push_str(&table.to_html());
                html.push('\n');
            }
            Block::StaticHtml(fragment) => {
                html.push_str(fragment);
                html.push('\n');
            }
        }
    }
    html
}

fn sidebar(status: &SourceStatus, options: &PageOptions) -> String {
    let mut html = String::from("<h2>Reid &amp; Compañía</h2>\n<h4>Datos del Dashboard</h4>\n");

    if options.upload_form {
        let checked = if *status == SourceStatus::Sample { " checked" } else { "" };
        html.push_str(&format!(
            r#"<form method="post" action="{action}" enctype="multipart/form-data">
<label for="file">Sube el Excel base (.xlsx) con las 4 hojas</label>
<input type="file" id="file" name="file" accept=".xlsx">
<label><input type="checkbox" id="use_sample" name="use_sample" value="true"{checked}> Usar datos de ejemplo</label>
<button type="submit">Actualizar</button>
</form>
<p><a href="/template.xlsx">Descargar plantilla</a></p>
"#,
            action = escape_html(&options.form_action),
        ));
    }

    match status {
        SourceStatus::Sample => {}
        SourceStatus::Uploaded => {
            html.push_str(&format!("<div class=\"status success\">{UPLOAD_SUCCESS}</div>\n"));
        }
        SourceStatus::Failed(message) => {
            html.push_str(&format!(
                "<div class=\"status error\">{UPLOAD_ERROR_PREFIX}{}</div>\n",
                escape_html(message)
            ));
        }
    }
    html
}

fn document(sidebar: &str, main: &str, chart_json: Option<&str>) -> String {
    let scripts = chart_json.map_or_else(String::new, |json| {
        format!(
            "<script src=\"https://cdn.jsdelivr.net/npm/chart.js\"></script>\n<script>\nconst charts = {json};\n{PAGE_JS}</script>"
        )
    });

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Reid &amp; Compañía - Dashboard Transformación Digital</title>
    <style>{PAGE_CSS}</style>
</head>
<body>
<aside class="sidebar">
{sidebar}</aside>
<main>
{main}
</main>
{scripts}
</body>
</html>"#
    )
}

const PAGE_CSS: &str = r"
body { margin: 0; display: flex; font-family: sans-serif; color: #262730; }
.sidebar { width: 260px; min-height: 100vh; padding: 1.5rem; background: #f0f2f6; box-sizing: border-box; }
.sidebar form { display: flex; flex-direction: column; gap: 0.5rem; }
main { flex: 1; padding: 1.5rem 3rem; }
.caption { color: #808495; font-size: 0.9rem; }
.metrics { display: grid; grid-template-columns: repeat(4, 1fr); gap: 1rem; }
.metric-label { font-size: 0.9rem; }
.metric-value { font-size: 2rem; }
.tabs { display: flex; gap: 1rem; border-bottom: 1px solid #e6e9ef; }
.tab-button { background: none; border: none; padding: 0.5rem 0; cursor: pointer; font-size: 1rem; }
.tab-button.active { color: #ff4b4b; border-bottom: 2px solid #ff4b4b; }
.tab-panel { display: none; }
.tab-panel.active { display: block; }
.chart { max-width: 720px; }
.data-table { border-collapse: collapse; width: 100%; }
.data-table th, .data-table td { border: 1px solid #e6e9ef; padding: 0.3rem 0.6rem; text-align: left; }
.status { margin-top: 1rem; padding: 0.6rem; border-radius: 0.3rem; }
.status.success { background: #dff5e3; color: #1b5e20; }
.status.error { background: #fde4e4; color: #8b0000; }
";

const PAGE_JS: &str = r"
Chart.register({
    id: 'pointLabels',
    afterDatasetsDraw(chart, args, opts) {
        if (opts.dx === undefined) return;
        const { ctx, scales: { x, y } } = chart;
        ctx.save();
        ctx.font = '11px sans-serif';
        ctx.fillStyle = '#262730';
        chart.data.datasets.forEach((ds) => (ds.pointLabels || []).forEach((text, i) => {
            const p = ds.data[i];
            ctx.fillText(text, x.getPixelForValue(p.x + opts.dx), y.getPixelForValue(p.y + opts.dy));
        }));
        ctx.restore();
    },
});
charts.forEach((c) => new Chart(document.getElementById(c.id), c.config));
document.querySelectorAll('.tab-button').forEach((button) => {
    button.addEventListener('click', () => {
        document.querySelectorAll('.tab-button, .tab-panel').forEach((el) => el.classList.remove('active'));
        button.classList.add('active');
        document.getElementById(button.dataset.tab).classList.add('active');
    });
});
const file = document.getElementById('file');
if (file) {
    file.addEventListener('change', () => { document.getElementById('use_sample').checked = !file.value; });
}
";

#[cfg(test)]
mod tests {
    use super::*;
    use kpidash_core::sample_dataset;

    #[test]
    fn test_dashboard_header_and_tabs() {
        let html = render_dashboard(&sample_dataset(), &SourceStatus::Sample, &PageOptions::default());

        for value in ["145%", "4.5x", "RD$5,200,000", "RD$4,800,000"] {
            assert!(html.contains(value), "missing header value {value}");
        }
        for tab in ["Valor &amp; ROI", "Customer Experience (CX)", "Cultura &amp; Liderazgo", "Riesgo &amp; Ética"] {
            assert!(html.contains(tab), "missing tab {tab}");
        }
        assert_eq!(html.matches("<canvas").count(), 6);
        assert!(html.contains("Valor_Financiero, Cultura_Digital, CX_KPI, Riesgos"));
        assert!(html.contains(" checked>"));
    }

    #[test]
    fn test_upload_status_and_placeholders() {
        let mut data = sample_dataset();
        data.financial.clear();
        let html = render_dashboard(&data, &SourceStatus::Uploaded, &PageOptions::default());

        assert!(html.contains(UPLOAD_SUCCESS));
        assert!(html.contains("<div class=\"metric-value\">—</div>"));
        assert!(!html.contains(" checked>"));
    }

    #[test]
    fn test_error_page_has_no_content() {
        let html = render_error("missing sheet 'Riesgos'", &PageOptions::default());

        assert!(html.contains("Error leyendo el Excel: missing sheet &#39;Riesgos&#39;"));
        assert!(!html.contains("<canvas"));
        assert!(!html.contains("metric-value"));
        assert!(!html.contains("chart.js"));
    }

    #[test]
    fn test_offline_page_has_no_form() {
        let html = render_dashboard(&sample_dataset(), &SourceStatus::Sample, &PageOptions::offline());
        assert!(!html.contains("<form"));
        assert!(html.contains("<canvas"));
    }

    #[test]
    fn test_script_breakout_escaped() {
        let mut data = sample_dataset();
        data.risks[0].name = "</script><script>alert(1)</script>".to_string();
        let html = render_dashboard(&data, &SourceStatus::Sample, &PageOptions::default());

        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains("&lt;/script&gt;"));
    }

    #[test]
    fn test_render_source_sample() {
        let rendered = render_source(&DataSource::Sample, &PageOptions::default());
        assert!(rendered.is_ok());
        assert!(rendered.html.contains(PAGE_TITLE.split(" - ").next().unwrap()));
    }

    #[test]
    fn test_render_source_bad_upload() {
        let rendered = render_source(&DataSource::Upload(b"garbage".to_vec()), &PageOptions::default());
        assert!(!rendered.is_ok());
        assert!(rendered.html.contains(UPLOAD_ERROR_PREFIX));
        assert!(!rendered.html.contains("<canvas"));
    }
}
