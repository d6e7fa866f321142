//! Layer farm production dashboard primitives.
//!
//! This crate focuses on the *data products* behind the dashboard rather than
//! on drawing. It generates a synthetic daily flock time series and derives
//! from it: hen-day production, feed conversion, water:feed ratio, headline
//! KPIs with day-over-day deltas, chart series and a CSV-exportable table.

pub mod charts;
pub mod config;
pub mod error;
pub mod export;
pub mod fixtures;
pub mod metrics;
pub mod types;
pub mod view;

pub use crate::error::MetricsError;
pub use crate::metrics::generator::{generate, EggYield, MetricsGenerator, TrendConfig};
pub use crate::metrics::kpi::HeadlineMetrics;
pub use crate::types::{DailyRecord, Dataset};
