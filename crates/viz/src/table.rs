//! Plain HTML tables for tabular tab content.

use crate::html::escape_html;

/// A header row plus text rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rows<I>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        self.rows.extend(rows);
        self
    }

    /// Render as an escaped `<table>`.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table class=\"data-table\">\n<thead><tr>");
        for column in &self.columns {
            html.push_str(&format!("<th>{}</th>", escape_html(column)));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &self.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>");
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_html() {
        let table = TableView::new(["Riesgo", "Nivel"])
            .with_rows([vec!["Fuga <datos>".to_string(), "Alto".to_string()]]);
        let html = table.to_html();
        assert!(html.contains("<th>Riesgo</th><th>Nivel</th>"));
        assert!(html.contains("<td>Fuga &lt;datos&gt;</td><td>Alto</td>"));
    }

    #[test]
    fn test_empty_table() {
        let html = TableView::new(["Riesgo"]).to_html();
        assert!(html.contains("<tbody>\n</tbody>"));
    }
}
