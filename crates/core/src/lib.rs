//! # kpidash-core
//!
//! Data side of the kpidash dashboard:
//!
//! - [`model`]: typed records for the four workbook tables
//! - [`provider`]: sample data or uploaded workbook → [`Dataset`]
//! - [`metrics`]: indicator lookup and header figures
//! - [`series`]: conversion percentages and the simulated trends

pub mod error;
pub mod metrics;
pub mod model;
pub mod provider;
pub mod sample;
pub mod series;

pub use error::{DashError, DashResult};
pub use metrics::{metric, HeaderMetrics, MetricCard};
pub use model::{
    CultureMetric, CxStage, Dataset, FinancialValue, Risk, RiskLevel, REQUIRED_SHEETS,
};
pub use provider::{dataset_from_book, load, load_path, DataSource};
pub use sample::sample_dataset;
