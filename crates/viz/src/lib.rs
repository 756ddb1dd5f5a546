//! # kpidash-viz
//!
//! Visualization and page rendering for kpidash.
//!
//! Charts are described as [`ChartSpec`]s and rendered in the browser by
//! Chart.js. Each dashboard tab is built by an independent view function in
//! [`views`]; [`page`] assembles the header metrics, the tabs and the sidebar
//! into one self-contained HTML document.
//!
//! ```
//! use kpidash_core::DataSource;
//! use kpidash_viz::{render_source, PageOptions};
//!
//! let rendered = render_source(&DataSource::Sample, &PageOptions::offline());
//! assert!(rendered.is_ok());
//! assert!(rendered.html.contains("145%"));
//! ```

pub mod chart;
pub mod html;
pub mod page;
pub mod table;
pub mod views;

pub use chart::{ChartDataset, ChartKind, ChartOptions, ChartPoint, ChartSpec};
pub use page::{
    build_tabs, render_dashboard, render_error, render_source, PageOptions, Rendered,
    SourceStatus,
};
pub use table::TableView;
pub use views::{Block, TabView};
